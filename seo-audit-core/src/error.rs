use seo_audit_scanner::ScanError;
use thiserror::Error;

/// Pre-flight and I/O failures. A page that cannot be fetched is not one of
/// these: it still produces a report, holding a single "Audit Failed" item.
#[derive(Error, Debug)]
pub enum AuditError {
    #[error("Please select at least one audit check.")]
    NoChecksSelected,

    #[error("Unknown audit check: {0}")]
    UnknownCheck(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Scan(#[from] ScanError),
}

pub type Result<T> = std::result::Result<T, AuditError>;
