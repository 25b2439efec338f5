//! Error handling for the quicrpc transport bridge.
//!
//! This module provides a hierarchical error system using `thiserror` that
//! covers configuration, address resolution, socket and session failures,
//! certificate material, and handshake dispatch. Errors are per-attempt:
//! no component in this crate retries on its own.

mod certificate;
mod config;
mod handshake;
mod network;
mod quic;

pub use certificate::CertificateError;
pub use config::ConfigError;
pub use handshake::HandshakeError;
pub use network::{NetworkError, SocketError};
pub use quic::QuicError;

use thiserror::Error;

/// Main error type for the quicrpc transport bridge.
///
/// Each variant maps to a functional domain of the bridge. Dial and Listen
/// surface these directly; the accept loop treats all of them as
/// per-attempt except [`NetworkError::ConnectionClosed`].
#[derive(Error, Debug)]
pub enum QuicRpcError {
    /// Endpoint configuration and option application errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Address resolution and connection errors
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    /// Packet socket errors
    #[error("Socket error: {0}")]
    Socket(#[from] SocketError),

    /// Certificate and key material errors
    #[error("Certificate error: {0}")]
    Certificate(#[from] CertificateError),

    /// QUIC session and stream errors
    #[error("QUIC protocol error: {0}")]
    Quic(#[from] QuicError),

    /// Credential handshake errors
    #[error("Handshake error: {0}")]
    Handshake(#[from] HandshakeError),

    /// I/O operations errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic system errors for unrecoverable conditions
    #[error("System error: {message}")]
    System { message: String },
}

impl QuicRpcError {
    /// Creates a new QuicRpcError with a system message.
    pub fn system(message: impl Into<String>) -> Self {
        QuicRpcError::System {
            message: message.into(),
        }
    }

    /// Creates a QuicRpcError for a failed connection attempt.
    pub fn connection_failed(address: impl Into<String>) -> Self {
        QuicRpcError::Network(NetworkError::ConnectionFailed {
            address: address.into(),
        })
    }

    /// Creates a QuicRpcError for an unusable target or bind address.
    pub fn invalid_address(address: impl Into<String>) -> Self {
        QuicRpcError::Network(NetworkError::InvalidAddress {
            address: address.into(),
        })
    }

    /// True when the underlying listener or session reports a permanent
    /// closed state, as opposed to a per-attempt failure.
    pub fn is_closed(&self) -> bool {
        matches!(self, QuicRpcError::Network(NetworkError::ConnectionClosed))
    }
}

/// Result type alias for quicrpc operations.
pub type Result<T> = std::result::Result<T, QuicRpcError>;
