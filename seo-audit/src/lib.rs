pub mod commands;
pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use handlers::{
    AuditArgs, ConfigOverrides, build_selection, emit_report, parse_url_line, run_audit,
    write_default_config,
};
