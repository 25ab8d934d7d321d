//! Configuration error types

use thiserror::Error;

/// Errors raised while loading an [`InteractionConfig`](crate::InteractionConfig)
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The document is not valid TOML or does not match the schema
    #[error("Failed to parse interaction config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value parsed but is out of range
    #[error("Invalid interaction config: {0}")]
    Invalid(String),
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;
