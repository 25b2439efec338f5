//! Endpoint configuration and option application errors.

use thiserror::Error;

/// Endpoint configuration errors.
///
/// Produced during option application for Dial and Listen. Option
/// application is atomic: the first failing option aborts the whole step
/// and no partial configuration is used.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Invalid value for a configuration option
    #[error("Invalid value for option '{option}': {reason}")]
    InvalidValue { option: String, reason: String },

    /// Conflicting configuration options
    #[error("Conflicting configuration: {conflict}")]
    Conflict { conflict: String },
}
