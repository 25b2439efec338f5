//! Shared helpers for the integration tests.

use quicrpc::tls::TlsConfig;
use rustls::pki_types::{CertificateDer, PrivateKeyDer, PrivatePkcs8KeyDer};

/// Generates a self-signed certificate and key for the given hosts.
pub fn self_signed(hosts: &[&str]) -> (Vec<CertificateDer<'static>>, PrivateKeyDer<'static>) {
    let certified = rcgen::generate_simple_self_signed(
        hosts.iter().map(|h| h.to_string()).collect::<Vec<_>>(),
    )
    .expect("generate self-signed certificate");

    let cert = certified.cert.der().clone();
    let key = PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(certified.key_pair.serialize_der()));
    (vec![cert], key)
}

/// Server-side TLS material with a fresh self-signed certificate.
pub fn server_tls(hosts: &[&str]) -> TlsConfig {
    let (certificates, key) = self_signed(hosts);
    TlsConfig {
        certificates,
        private_key: Some(key),
        ..TlsConfig::default()
    }
}

/// Client-side TLS material with verification disabled.
pub fn insecure_client_tls() -> TlsConfig {
    TlsConfig {
        insecure_skip_verify: true,
        ..TlsConfig::default()
    }
}
