//! Client configuration management.
//!
//! Holds the endpoint, credentials and logging switches used to build an API
//! client. Configuration can be persisted as TOML on disk or picked up from
//! the `VMRAY_*` environment variables.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::error::{VmrayError, VmrayResult};

/// Connection settings for the VMRay service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// API endpoint. Empty means [`constants::DEFAULT_URL`].
    #[serde(default)]
    pub url: String,

    /// Account email, sent as basic-auth username and `email` field.
    #[serde(default)]
    pub email: String,

    /// Account password.
    #[serde(default)]
    pub password: String,

    /// Request timeout in seconds. None leaves requests unbounded.
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Dump non-200 responses to the error log.
    #[serde(default = "default_true")]
    pub error_log: bool,

    /// Dump every request and response to the trace log.
    #[serde(default)]
    pub trace_log: bool,
}

fn default_true() -> bool {
    true
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            email: String::new(),
            password: String::new(),
            timeout_secs: None,
            error_log: true,
            trace_log: false,
        }
    }
}

impl ClientConfig {
    /// Build a configuration from `VMRAY_EMAIL`, `VMRAY_PASSWD` and `VMRAY_URL`.
    ///
    /// Missing variables are left empty.
    pub fn from_env() -> Self {
        Self {
            url: std::env::var(constants::ENV_URL).unwrap_or_default(),
            email: std::env::var(constants::ENV_EMAIL).unwrap_or_default(),
            password: std::env::var(constants::ENV_PASSWORD).unwrap_or_default(),
            ..Self::default()
        }
    }

    /// Load configuration from the default config file path.
    pub fn load_default() -> VmrayResult<Self> {
        let path = Self::default_config_path()?;
        if path.exists() {
            Self::load_from_file(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from_file(path: &Path) -> VmrayResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: ClientConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to a specific file path.
    pub fn save_to_file(&self, path: &Path) -> VmrayResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)
            .map_err(|e| VmrayError::Config(format!("failed to serialize config: {e}")))?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// `<config dir>/vmray/config.toml`.
    pub fn default_config_path() -> VmrayResult<PathBuf> {
        let base = dirs::config_dir()
            .ok_or_else(|| VmrayError::Config("could not determine config directory".into()))?;
        Ok(base.join("vmray").join("config.toml"))
    }

    /// The endpoint to use, with the default applied and normalized.
    pub fn effective_url(&self) -> String {
        let url = Self::normalize_url(&self.url);
        if url.is_empty() {
            constants::DEFAULT_URL.to_string()
        } else {
            url
        }
    }

    /// Trim whitespace and surrounding quotes and make sure the URL ends
    /// with exactly one slash.
    pub fn normalize_url(url: &str) -> String {
        let trimmed = url.trim().trim_matches('"').trim();
        if trimmed.is_empty() {
            return String::new();
        }
        if trimmed.ends_with('/') {
            trimmed.to_string()
        } else {
            format!("{trimmed}/")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert!(config.error_log);
        assert!(!config.trace_log);
        assert!(config.timeout_secs.is_none());
        assert_eq!(config.effective_url(), constants::DEFAULT_URL);
    }

    #[test]
    fn test_normalize_url() {
        assert_eq!(
            ClientConfig::normalize_url("https://vmray.example.com/api"),
            "https://vmray.example.com/api/"
        );
        assert_eq!(
            ClientConfig::normalize_url("  \"https://vmray.example.com/api/\"  "),
            "https://vmray.example.com/api/"
        );
        assert_eq!(ClientConfig::normalize_url("   "), "");
    }

    #[test]
    fn test_roundtrip_toml_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = ClientConfig {
            url: "https://vmray.example.com/api/".into(),
            email: "analyst@example.com".into(),
            password: "hunter2".into(),
            timeout_secs: Some(60),
            error_log: false,
            trace_log: true,
        };
        config.save_to_file(&path).unwrap();

        let loaded = ClientConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded.email, "analyst@example.com");
        assert_eq!(loaded.timeout_secs, Some(60));
        assert!(loaded.trace_log);
        assert!(!loaded.error_log);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: ClientConfig = toml::from_str("email = \"a@b.c\"").unwrap();
        assert_eq!(config.email, "a@b.c");
        assert!(config.error_log);
        assert!(config.url.is_empty());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "timeout_secs = \"soon\"").unwrap();
        let err = ClientConfig::load_from_file(&path).unwrap_err();
        assert!(matches!(err, VmrayError::Config(_)));
    }
}
