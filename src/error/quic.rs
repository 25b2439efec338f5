//! QUIC protocol specific errors.

use thiserror::Error;

/// QUIC protocol specific errors.
///
/// Covers session establishment, stream management, and crypto
/// configuration. These wrap underlying Quinn errors with more specific
/// context.
#[derive(Error, Debug)]
pub enum QuicError {
    /// QUIC session establishment failed
    #[error("QUIC connection failed: {reason}")]
    ConnectionFailed { reason: String },

    /// QUIC stream open or accept failed after the session existed
    #[error("QUIC stream error: {reason}")]
    StreamError { reason: String },

    /// QUIC crypto or transport configuration error
    #[error("QUIC configuration error: {reason}")]
    ConfigError { reason: String },

    /// QUIC connection idle timeout
    #[error("QUIC connection idle timeout")]
    IdleTimeout,
}
