//! Error types for the resolution core
//!
//! Resolution outcomes (`Unmapped`, `Ambiguous`, missing snapshot) are plain
//! values and never appear here. These errors cover the few conditions that
//! stop a batch outright: upstream contract violations, bad configuration and
//! failures of the caller-supplied reference store.

use thiserror::Error;

/// Main error type for the resolver
#[derive(Error, Debug)]
pub enum ResolverError {
    #[error("Invalid report row {index}: missing required field '{field}'")]
    InvalidRow { index: usize, field: &'static str },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Reference store error: {0}")]
    Store(#[from] anyhow::Error),
}

/// Configuration loading and validation errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid value for '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error("Failed to initialize logging: {0}")]
    Logging(String),
}

pub type Result<T> = std::result::Result<T, ResolverError>;
