//! Error types shared across the crate.
//!
//! Field validation problems are not errors: they travel as data in a
//! `ValidationErrorSet`. This enum only covers configuration, transport,
//! and client failures.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Invalid configuration value for {field}: {reason}")]
    InvalidConfig { field: String, reason: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, LoanError>;
