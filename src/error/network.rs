//! Address resolution, connection, and socket errors.

use thiserror::Error;

/// Network communication errors.
///
/// Encompasses address resolution failures, connection establishment
/// failures, and timeouts. These are fatal to the single Dial or Accept
/// attempt that produced them, never to the listener itself.
#[derive(Error, Debug)]
pub enum NetworkError {
    /// Connection to remote peer failed
    #[error("Connection failed to {address}")]
    ConnectionFailed { address: String },

    /// The listener or session has permanently closed
    #[error("Connection closed")]
    ConnectionClosed,

    /// Network timeout occurred
    #[error("Network operation timed out")]
    Timeout,

    /// Invalid target or bind address
    #[error("Invalid network address: {address}")]
    InvalidAddress { address: String },

    /// Address resolution failed
    #[error("Address resolution failed: {hostname}")]
    AddressResolution { hostname: String },
}

/// Packet socket errors.
///
/// Covers creation and binding of the UDP sockets that back QUIC
/// endpoints.
#[derive(Error, Debug)]
pub enum SocketError {
    /// Socket creation failed
    #[error("Socket creation failed: {reason}")]
    CreationFailed { reason: String },

    /// Socket binding failed
    #[error("Socket bind failed: {address}")]
    BindFailed { address: String },
}
