//! Configuration Module
//!
//! This module defines all configuration structures for the loan calculator.
//! Configuration is loaded from TOML files and parsed using serde. Every
//! field has a default, so a partial (or missing) file still yields a
//! usable configuration.

use crate::error::{LoanError, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable naming the configuration file to load.
pub const CONFIG_PATH_ENV: &str = "LOAN_CALCULATOR_CONFIG";

/// Configuration file used when `LOAN_CALCULATOR_CONFIG` is not set.
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Main configuration structure
///
/// # Example TOML
/// ```toml
/// [api]
/// host = "0.0.0.0"
/// port = 8080
/// cors_allowed_origins = ["*"]
///
/// [limits]
/// max_principal = 1000000000000.0
/// max_interest_rate = 1000.0
/// max_period_in_years = 100
///
/// [logging]
/// level = "info"
/// format = "pretty"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub limits: LimitsConfig,
    pub logging: LoggingConfig,
    /// File this configuration was read from; `None` when running on defaults.
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

/// API server configuration
///
/// # Fields
/// - `host`: IP address to bind to (e.g., "127.0.0.1" or "0.0.0.0")
/// - `port`: TCP port to listen on
/// - `cors_allowed_origins`: origins allowed to call the API from a browser;
///   a single `"*"` allows any origin
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            cors_allowed_origins: vec!["*".to_string()],
        }
    }
}

/// Upper bounds on accepted loan inputs.
///
/// These keep every figure the calculator derives finite.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    pub max_principal: f64,
    /// Percent per annum.
    pub max_interest_rate: f64,
    pub max_period_in_years: u32,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_principal: 1_000_000_000_000.0,
            max_interest_rate: 1000.0,
            max_period_in_years: 100,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Logging configuration
///
/// `level` is an `EnvFilter` directive; `RUST_LOG` takes precedence when set.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "loan_calculator=info,tower_http=info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Returns
    /// * `Ok(Config)` if the file was read, parsed and validated
    /// * `Err` if the file couldn't be read, the TOML is invalid, or a value
    ///   is out of range
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&content)?;
        config.validate()?;
        config.source = Some(path.to_path_buf());
        Ok(config)
    }

    /// Load the file named by `LOAN_CALCULATOR_CONFIG` (or the default path),
    /// falling back to defaults when that file does not exist, then apply
    /// environment overrides.
    pub fn from_env() -> Result<Self> {
        Self::resolve(
            std::env::var(CONFIG_PATH_ENV).ok().as_deref(),
            std::env::var("PORT").ok().as_deref(),
        )
    }

    /// `from_env` with the environment values passed in.
    fn resolve(config_path: Option<&str>, port: Option<&str>) -> Result<Self> {
        let path = Path::new(config_path.unwrap_or(DEFAULT_CONFIG_PATH));

        let mut config = if path.exists() {
            Self::load(path)?
        } else {
            Self::default()
        };

        config.apply_port_override(port)?;
        Ok(config)
    }

    /// Hosting platforms hand the listening port over in `PORT`.
    fn apply_port_override(&mut self, port: Option<&str>) -> Result<()> {
        if let Some(port) = port {
            self.api.port = port.trim().parse().map_err(|_| LoanError::InvalidConfig {
                field: "PORT".to_string(),
                reason: format!("'{}' is not a valid port", port),
            })?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.api.host.trim().is_empty() {
            return Err(invalid("api.host", "host cannot be empty"));
        }

        let limits = &self.limits;
        if !(limits.max_principal.is_finite() && limits.max_principal > 0.0) {
            return Err(invalid("limits.max_principal", "must be a positive finite number"));
        }
        if !(limits.max_interest_rate.is_finite() && limits.max_interest_rate > 0.0) {
            return Err(invalid("limits.max_interest_rate", "must be a positive finite number"));
        }
        if limits.max_period_in_years == 0 {
            return Err(invalid("limits.max_period_in_years", "must be at least 1"));
        }

        Ok(())
    }
}

fn invalid(field: &str, reason: &str) -> LoanError {
    LoanError::InvalidConfig {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_full_config() {
        let file = write_config(
            r#"
            [api]
            host = "127.0.0.1"
            port = 9000
            cors_allowed_origins = ["http://localhost:3000"]

            [limits]
            max_principal = 5000000.0
            max_interest_rate = 50.0
            max_period_in_years = 40

            [logging]
            level = "debug"
            format = "json"
            "#,
        );

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.api.host, "127.0.0.1");
        assert_eq!(config.api.port, 9000);
        assert_eq!(config.api.cors_allowed_origins, vec!["http://localhost:3000"]);
        assert_eq!(config.limits.max_principal, 5_000_000.0);
        assert_eq!(config.limits.max_interest_rate, 50.0);
        assert_eq!(config.limits.max_period_in_years, 40);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.source.as_deref(), Some(file.path()));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let file = write_config("[api]\nport = 3001\n");

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.api.port, 3001);
        assert_eq!(config.api.host, "0.0.0.0");
        assert_eq!(config.limits, LimitsConfig::default());
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn test_invalid_toml_is_rejected() {
        let file = write_config("[api\nport = ");
        assert!(matches!(Config::load(file.path()), Err(LoanError::ConfigParse(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        assert!(matches!(
            Config::load("does/not/exist.toml"),
            Err(LoanError::Io(_))
        ));
    }

    #[test]
    fn test_non_positive_limits_are_rejected() {
        let file = write_config("[limits]\nmax_principal = 0.0\n");
        assert!(matches!(
            Config::load(file.path()),
            Err(LoanError::InvalidConfig { field, .. }) if field == "limits.max_principal"
        ));

        let file = write_config("[limits]\nmax_period_in_years = 0\n");
        assert!(Config::load(file.path()).is_err());
    }

    #[test]
    fn test_resolve_reads_named_config_file() {
        let file = write_config("[api]\nport = 4000\n");
        let path = file.path().to_str().unwrap();

        let config = Config::resolve(Some(path), None).unwrap();
        assert_eq!(config.api.port, 4000);
        assert_eq!(config.source.as_deref(), Some(file.path()));

        let config = Config::resolve(Some(path), Some("5000")).unwrap();
        assert_eq!(config.api.port, 5000);
    }

    #[test]
    fn test_resolve_falls_back_to_defaults_when_file_is_missing() {
        let config = Config::resolve(Some("does/not/exist.toml"), None).unwrap();

        assert!(config.source.is_none());
        assert_eq!(config.api.port, ApiConfig::default().port);
        assert_eq!(config.limits, LimitsConfig::default());
    }

    #[test]
    fn test_resolve_rejects_invalid_named_file() {
        let file = write_config("[limits]\nmax_interest_rate = -1.0\n");
        let path = file.path().to_str().unwrap();
        assert!(Config::resolve(Some(path), None).is_err());
    }

    #[test]
    fn test_port_override() {
        let mut config = Config::default();
        config.apply_port_override(Some("10000")).unwrap();
        assert_eq!(config.api.port, 10000);

        config.apply_port_override(None).unwrap();
        assert_eq!(config.api.port, 10000);

        assert!(config.apply_port_override(Some("not-a-port")).is_err());
    }
}
