// src/config.rs

//! Startup configuration loading.
//!
//! A missing config file means defaults; a malformed one is fatal. The
//! SMTP password is always required.

use std::path::Path;

use crate::error::{AppError, Result};
use crate::models::Config;

/// Load configuration (falling back to defaults if absent) and validate it.
pub fn load_config(path: &Path) -> Result<Config> {
    let config = Config::load_or_default(path)
        .map_err(|e| AppError::config(format!("Cannot load config {path:?}: {e}")))?;
    config
        .validate()
        .map_err(|e| AppError::config(format!("Invalid config {path:?}: {e}")))?;
    Ok(config)
}

/// Read a required secret from the process environment.
pub fn require_secret(name: &str) -> Result<String> {
    require_secret_with(name, |var| std::env::var(var).ok())
}

fn require_secret_with(name: &str, lookup: impl Fn(&str) -> Option<String>) -> Result<String> {
    match lookup(name) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(AppError::config(format!("set {name} env var"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_secret_is_config_error() {
        let err = require_secret_with("EMAIL_PWD", |_| None).unwrap_err();
        assert!(matches!(err, AppError::Config(ref m) if m.contains("EMAIL_PWD")));
    }

    #[test]
    fn test_empty_secret_rejected() {
        assert!(require_secret_with("EMAIL_PWD", |_| Some(String::new())).is_err());
    }

    #[test]
    fn test_present_secret_returned() {
        let value = require_secret_with("EMAIL_PWD", |name| {
            (name == "EMAIL_PWD").then(|| "hunter2".to_string())
        })
        .unwrap();
        assert_eq!(value, "hunter2");
    }

    #[test]
    fn test_invalid_file_rejected() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("stockwatch.toml");
        std::fs::write(&path, "[schedule]\ninterval_secs = 0\n").unwrap();

        assert!(matches!(load_config(&path), Err(AppError::Config(_))));
    }

    #[test]
    fn test_malformed_file_is_fatal() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("stockwatch.toml");
        // Unterminated string.
        let content = "[email]\nto = \"ops@example.org\n[store]\ndir = \"/var/lib/sent\"\n";
        std::fs::write(&path, content).unwrap();

        let err = load_config(&path).unwrap_err();
        assert!(matches!(err, AppError::Config(ref m) if m.contains("Cannot load")));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let tmp = tempfile::TempDir::new().unwrap();
        let config = load_config(&tmp.path().join("absent.toml")).unwrap();
        assert_eq!(config.store.dir, "sent");
    }
}
