pub mod audit;
pub mod checks;
pub mod config;
pub mod error;
pub mod markup;
pub mod registry;
pub mod report;
pub mod selection;

pub use audit::{AuditOptions, AuditProgressCallback, Auditor, execute_audit};
pub use config::AuditConfig;
pub use error::AuditError;
pub use registry::{AUDIT_CHECKS, AuditCheck};
pub use report::{AuditReport, CheckStatus, ReportFormat, ReportItem};
pub use selection::CheckSelection;

use colored::Colorize;

pub fn print_banner() {
    let banner = r#"
   ____  _____ ___       _             _ _ _
  / ___|| ____/ _ \     / \  _   _  __| (_) |_
  \___ \|  _|| | | |   / _ \| | | |/ _` | | __|
   ___) | |__| |_| |  / ___ \ |_| | (_| | | |_
  |____/|_____\___/  /_/   \_\__,_|\__,_|_|\__|  PRO
"#;
    eprintln!("{}", banner.bright_cyan().bold());
    eprintln!(
        "  {} {}\n",
        "Live on-page SEO auditor".bright_white(),
        format!("v{}", env!("CARGO_PKG_VERSION")).bright_black()
    );
}
