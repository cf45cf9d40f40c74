// User configuration stored as JSON under ~/.config/seo-audit

use crate::error::{AuditError, Result};
use crate::selection::CheckSelection;
use seo_audit_scanner::{DEFAULT_RELAY_ENDPOINT, ProxyFetcher};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DEFAULT_CONFIG_PATH: &str = "~/.config/seo-audit/config.json";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_MAX_CONCURRENT_PROBES: usize = 50;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    /// CORS relay every request goes through; `None` fetches directly
    pub relay_endpoint: Option<String>,
    pub timeout_secs: u64,
    /// Upper bound on simultaneous broken-link probes
    pub max_concurrent_probes: usize,
    pub user_agent: String,
    /// Checks run when none are given on the command line; `None` runs all
    pub default_checks: Option<Vec<String>>,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            relay_endpoint: Some(DEFAULT_RELAY_ENDPOINT.to_string()),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_concurrent_probes: DEFAULT_MAX_CONCURRENT_PROBES,
            user_agent: format!("SEO-Audit-Pro/{}", env!("CARGO_PKG_VERSION")),
            default_checks: None,
        }
    }
}

pub fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).as_ref())
}

impl AuditConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        let config: AuditConfig = serde_json::from_str(&raw)
            .map_err(|e| AuditError::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load from `path`, or from the default location when `None`. A missing
    /// file yields the defaults; a malformed one is an error.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => expand_path(DEFAULT_CONFIG_PATH),
        };

        if !path.exists() {
            debug!("No configuration at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load(&path)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            return Err(AuditError::Config("timeout_secs must be at least 1".to_string()));
        }
        if self.max_concurrent_probes == 0 {
            return Err(AuditError::Config(
                "max_concurrent_probes must be at least 1".to_string(),
            ));
        }
        if let Some(relay) = &self.relay_endpoint
            && !relay.trim().is_empty()
            && url::Url::parse(relay).is_err()
        {
            return Err(AuditError::Config(format!("invalid relay_endpoint: {}", relay)));
        }
        Ok(())
    }

    pub fn build_fetcher(&self) -> Result<ProxyFetcher> {
        let fetcher = ProxyFetcher::new(self.timeout_secs, &self.user_agent)?
            .with_relay(self.relay_endpoint.clone());
        Ok(fetcher)
    }

    /// The selection to use when the caller names no checks.
    pub fn default_selection(&self) -> Result<CheckSelection> {
        match &self.default_checks {
            Some(ids) => CheckSelection::from_ids(ids),
            None => Ok(CheckSelection::all()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AuditConfig::default();
        assert_eq!(config.relay_endpoint.as_deref(), Some("https://corsproxy.io/"));
        assert_eq!(config.timeout_secs, 10);
        assert_eq!(config.max_concurrent_probes, 50);
        assert!(config.default_selection().unwrap().is_all_selected());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: AuditConfig =
            serde_json::from_str(r#"{"timeout_secs": 3, "relay_endpoint": null}"#).unwrap();
        assert_eq!(config.timeout_secs, 3);
        assert!(config.relay_endpoint.is_none());
        assert_eq!(config.max_concurrent_probes, DEFAULT_MAX_CONCURRENT_PROBES);
    }

    #[test]
    fn test_validate_rejects_zero_values() {
        let config = AuditConfig {
            max_concurrent_probes: 0,
            ..AuditConfig::default()
        };
        assert!(matches!(config.validate(), Err(AuditError::Config(_))));
    }

    #[test]
    fn test_default_selection_from_ids() {
        let config = AuditConfig {
            default_checks: Some(vec!["h1".to_string(), "meta-title".to_string()]),
            ..AuditConfig::default()
        };
        assert_eq!(config.default_selection().unwrap().frozen(), vec!["meta-title", "h1"]);
    }
}
