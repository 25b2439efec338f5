//! TLS security material and rustls configuration building.
//!
//! [`TlsConfig`] is the immutable value the dual-mode credentials and the
//! endpoint factory share: certificate chain, private key, trust pool,
//! server-name override, and the verification-skipping switch. The
//! builders here turn it into the `rustls` client and server configs used
//! both for the QUIC session crypto and for the classic byte-stream
//! handshake, so the two paths cannot drift apart.

pub mod no_verify;

use crate::error::{CertificateError, HandshakeError, Result};
use rustls::pki_types::{CertificateDer, PrivateKeyDer};
use rustls::RootCertStore;
use std::sync::Arc;

/// Security material for one endpoint.
///
/// Servers populate `certificates` and `private_key`; clients populate
/// `roots` (or set `insecure_skip_verify` for test/bootstrap use). The
/// `server_name` override applies to SNI on both handshake paths.
#[derive(Debug, Default)]
pub struct TlsConfig {
    /// Certificate chain presented to peers (server side)
    pub certificates: Vec<CertificateDer<'static>>,
    /// Private key matching the leaf certificate (server side)
    pub private_key: Option<PrivateKeyDer<'static>>,
    /// Trusted root certificates for peer verification (client side)
    pub roots: Option<RootCertStore>,
    /// SNI override; falls back to the dialed authority when unset
    pub server_name: Option<String>,
    /// Disable certificate verification. Only use this for testing!
    pub insecure_skip_verify: bool,
}

impl Clone for TlsConfig {
    fn clone(&self) -> Self {
        Self {
            certificates: self.certificates.clone(),
            private_key: self.private_key.as_ref().map(|key| key.clone_key()),
            roots: self.roots.clone(),
            server_name: self.server_name.clone(),
            insecure_skip_verify: self.insecure_skip_verify,
        }
    }
}

impl TlsConfig {
    /// Builds a `rustls::ClientConfig` from this material.
    ///
    /// Empty trust pool plus verification enabled yields a config that
    /// rejects every peer; callers wanting that combination get exactly
    /// what they asked for.
    pub fn build_client_config(&self) -> Result<rustls::ClientConfig> {
        let roots = self.roots.clone().unwrap_or_else(RootCertStore::empty);

        let mut config = rustls::ClientConfig::builder()
            .with_root_certificates(roots)
            .with_no_client_auth();

        config.alpn_protocols = crate::constants::ALPN_PROTOCOLS.clone();

        if self.insecure_skip_verify {
            config
                .dangerous()
                .set_certificate_verifier(Arc::new(no_verify::NoVerifier));
        }

        Ok(config)
    }

    /// Builds a `rustls::ServerConfig` from this material.
    ///
    /// Fails when no certificate chain or key is configured; Listen calls
    /// this eagerly so misconfiguration surfaces before any socket is
    /// bound.
    pub fn build_server_config(&self) -> Result<rustls::ServerConfig> {
        if self.certificates.is_empty() {
            return Err(HandshakeError::MissingServerCertificate.into());
        }
        let key = self
            .private_key
            .as_ref()
            .ok_or(CertificateError::MissingPrivateKey)?
            .clone_key();

        let mut config = rustls::ServerConfig::builder()
            .with_no_client_auth()
            .with_single_cert(self.certificates.clone(), key)
            .map_err(|_| CertificateError::InvalidChain)?;

        config.alpn_protocols = crate::constants::ALPN_PROTOCOLS.clone();

        Ok(config)
    }
}
