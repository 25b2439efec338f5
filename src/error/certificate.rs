//! Certificate and key material errors.

use thiserror::Error;

/// Certificate and key material errors.
///
/// Handles loading and parsing of TLS certificates, private keys, and
/// trust pools. Certificate contents are not exposed in messages.
#[derive(Error, Debug)]
pub enum CertificateError {
    /// Certificate file could not be loaded
    #[error("Certificate loading failed: {path}")]
    LoadFailed { path: std::path::PathBuf },

    /// Private key file could not be loaded
    #[error("Private key loading failed: {path}")]
    PrivateKeyLoadFailed { path: std::path::PathBuf },

    /// PEM data did not contain the expected material
    #[error("Unsupported certificate format")]
    UnsupportedFormat,

    /// No private key found where one was required
    #[error("No private key found")]
    MissingPrivateKey,

    /// No certificate could be added to the trust pool
    #[error("Failed to append certificates to pool")]
    EmptyPool,

    /// Certificate chain rejected by the TLS backend
    #[error("Invalid certificate chain")]
    InvalidChain,
}
