//! Credential handshake errors.

use thiserror::Error;

/// Credential handshake errors.
///
/// Only the classic byte-stream path can fail here; natively secured
/// connections perform no additional handshake. TLS failures are surfaced
/// verbatim from the TLS backend.
#[derive(Error, Debug)]
pub enum HandshakeError {
    /// Classic TLS handshake failed
    #[error("TLS handshake failed: {reason}")]
    TlsFailed { reason: String },

    /// Server name could not be used for SNI
    #[error("Invalid server name: {name}")]
    InvalidServerName { name: String },

    /// Server-side handshake requested without a configured certificate
    #[error("No server certificate configured")]
    MissingServerCertificate,

    /// Handshake exceeded the configured time budget
    #[error("Handshake timed out")]
    Timeout,
}
