//! Dual-mode transport credentials.
//!
//! One credentials instance serves a mixed environment: connections that
//! arrive as QUIC sessions are already secured and need no further
//! handshake, while generic byte connections get a classic TLS handshake
//! layered on top. Dispatch is by connection variant, decided per
//! handshake; the result travels with the returned [`AuthInfo`], so
//! concurrent mixed-mode use never races on shared state. A latching
//! native flag only biases [`Credentials::info`] reporting and is reset
//! by [`Clone`].

use crate::certificates;
use crate::constants::{
    CLASSIC_SECURITY_PROTOCOL, CLASSIC_SECURITY_VERSION, NATIVE_PROTOCOL_VERSION,
    NATIVE_SECURITY_PROTOCOL, NATIVE_SECURITY_VERSION,
};
use crate::error::{HandshakeError, Result};
use crate::tls::TlsConfig;
use crate::transport::{ByteConn, Connection};
use rustls::pki_types::{CertificateDer, PrivateKeyDer, ServerName};
use rustls::RootCertStore;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio_rustls::{TlsAcceptor, TlsConnector};
use tracing::debug;

/// Handshake result describing the negotiated security context.
#[derive(Debug, Clone)]
pub enum AuthInfo {
    /// Security established by the QUIC session itself.
    QuicTls(QuicTlsInfo),
    /// Security negotiated by a classic byte-stream TLS handshake.
    Tls(TlsInfo),
}

impl AuthInfo {
    /// The security marker the RPC framework keys authorization on.
    pub fn auth_type(&self) -> &'static str {
        match self {
            AuthInfo::QuicTls(_) => NATIVE_SECURITY_PROTOCOL,
            AuthInfo::Tls(_) => CLASSIC_SECURITY_PROTOCOL,
        }
    }
}

/// Introspection data for a natively secured connection: the session's
/// address identity.
#[derive(Debug, Clone)]
pub struct QuicTlsInfo {
    pub local_addr: SocketAddr,
    pub remote_addr: SocketAddr,
}

/// Introspection data for a classic TLS handshake.
#[derive(Debug, Clone, Default)]
pub struct TlsInfo {
    /// SNI observed by the server side, if any
    pub server_name: Option<String>,
    /// Negotiated ALPN protocol
    pub alpn: Option<Vec<u8>>,
    /// Negotiated TLS protocol version
    pub version: Option<String>,
}

/// Protocol descriptor reported to the RPC framework.
#[derive(Debug, Clone)]
pub struct ProtocolInfo {
    pub protocol_version: String,
    pub security_protocol: String,
    pub security_version: String,
    pub server_name: Option<String>,
}

/// Dual-mode transport credentials.
///
/// Shared across all connections of one client or server. Holds only
/// immutable security material plus the latching native-mode flag; all
/// per-connection state lives in the handshake result.
#[derive(Debug)]
pub struct Credentials {
    tls: TlsConfig,
    // Latches to true on the first native handshake and stays there for
    // this instance's lifetime. Clone starts over.
    native: AtomicBool,
}

impl Clone for Credentials {
    fn clone(&self) -> Self {
        Self {
            tls: self.tls.clone(),
            native: AtomicBool::new(false),
        }
    }
}

impl Credentials {
    /// Builds credentials from explicit security material.
    pub fn new(tls: TlsConfig) -> Self {
        Self {
            tls,
            native: AtomicBool::new(false),
        }
    }

    /// Server credentials from an in-memory certificate chain and key.
    pub fn from_cert(
        certificates: Vec<CertificateDer<'static>>,
        private_key: PrivateKeyDer<'static>,
    ) -> Self {
        Self::new(TlsConfig {
            certificates,
            private_key: Some(private_key),
            ..TlsConfig::default()
        })
    }

    /// Server credentials from a certificate/key file pair.
    pub fn from_files(cert_path: &Path, key_path: &Path) -> Result<Self> {
        let certificates = certificates::load_certificates_from_file(cert_path)?;
        let private_key = certificates::load_private_key_from_file(key_path)?;
        Ok(Self::from_cert(certificates, private_key))
    }

    /// Client credentials trusting the CAs in a PEM bundle on disk.
    pub fn from_ca_file(path: &Path, server_name_override: Option<&str>) -> Result<Self> {
        let roots = certificates::load_root_store_from_file(path)?;
        Ok(Self::from_ca_pool(roots, server_name_override))
    }

    /// Client credentials trusting an explicit CA pool.
    pub fn from_ca_pool(roots: RootCertStore, server_name_override: Option<&str>) -> Self {
        Self::new(TlsConfig {
            roots: Some(roots),
            server_name: server_name_override.map(String::from),
            ..TlsConfig::default()
        })
    }

    /// Client credentials that skip certificate verification entirely.
    /// Only use this for testing!
    pub fn insecure_skip_verify() -> Self {
        Self::new(TlsConfig {
            insecure_skip_verify: true,
            ..TlsConfig::default()
        })
    }

    /// The security material these credentials were built from. The
    /// endpoint factory reads this to configure the QUIC session crypto.
    pub fn tls_config(&self) -> &TlsConfig {
        &self.tls
    }

    /// Sets the server-name override, effective for all subsequent
    /// handshakes and protocol-info reporting.
    pub fn override_server_name(&mut self, name: &str) -> Result<()> {
        if name.is_empty() {
            return Err(HandshakeError::InvalidServerName {
                name: name.to_string(),
            }
            .into());
        }
        self.tls.server_name = Some(name.to_string());
        Ok(())
    }

    /// Client-side handshake dispatch.
    ///
    /// A natively secured connection is returned unchanged; a generic
    /// byte connection gets a full TLS client handshake, with SNI taken
    /// from the override or the dialed authority.
    pub async fn client_handshake(
        &self,
        authority: &str,
        conn: Connection,
    ) -> Result<(Connection, AuthInfo)> {
        match conn {
            Connection::Quic(conn) => {
                self.native.store(true, Ordering::Relaxed);
                debug!("Native session security for {}", conn.remote_addr());
                let info = QuicTlsInfo {
                    local_addr: conn.local_addr(),
                    remote_addr: conn.remote_addr(),
                };
                Ok((Connection::Quic(conn), AuthInfo::QuicTls(info)))
            }
            Connection::Byte(conn) => {
                let name = self
                    .tls
                    .server_name
                    .clone()
                    .unwrap_or_else(|| host_of(authority).to_string());
                let server_name =
                    ServerName::try_from(name.clone()).map_err(|_| {
                        HandshakeError::InvalidServerName { name: name.clone() }
                    })?;

                let config = self.tls.build_client_config()?;
                let connector = TlsConnector::from(Arc::new(config));

                let (io, local_addr, peer_addr) = conn.into_parts();
                let stream = connector.connect(server_name, io).await.map_err(|e| {
                    HandshakeError::TlsFailed {
                        reason: e.to_string(),
                    }
                })?;

                debug!("Classic TLS handshake completed with {} ({})", peer_addr, name);

                let session = stream.get_ref().1;
                let info = TlsInfo {
                    server_name: Some(name),
                    alpn: session.alpn_protocol().map(Vec::from),
                    version: session.protocol_version().map(|v| format!("{v:?}")),
                };
                Ok((
                    Connection::Byte(ByteConn::new(Box::new(stream), local_addr, peer_addr)),
                    AuthInfo::Tls(info),
                ))
            }
        }
    }

    /// Server-side handshake dispatch; same rule as the client side.
    pub async fn server_handshake(&self, conn: Connection) -> Result<(Connection, AuthInfo)> {
        match conn {
            Connection::Quic(conn) => {
                self.native.store(true, Ordering::Relaxed);
                debug!("Native session security for {}", conn.remote_addr());
                let info = QuicTlsInfo {
                    local_addr: conn.local_addr(),
                    remote_addr: conn.remote_addr(),
                };
                Ok((Connection::Quic(conn), AuthInfo::QuicTls(info)))
            }
            Connection::Byte(conn) => {
                let config = self.tls.build_server_config()?;
                let acceptor = TlsAcceptor::from(Arc::new(config));

                let (io, local_addr, peer_addr) = conn.into_parts();
                let stream = acceptor.accept(io).await.map_err(|e| {
                    HandshakeError::TlsFailed {
                        reason: e.to_string(),
                    }
                })?;

                debug!("Classic TLS handshake completed with {}", peer_addr);

                let session = stream.get_ref().1;
                let info = TlsInfo {
                    server_name: session.server_name().map(String::from),
                    alpn: session.alpn_protocol().map(Vec::from),
                    version: session.protocol_version().map(|v| format!("{v:?}")),
                };
                Ok((
                    Connection::Byte(ByteConn::new(Box::new(stream), local_addr, peer_addr)),
                    AuthInfo::Tls(info),
                ))
            }
        }
    }

    /// Reports the protocol descriptor for these credentials. Once a
    /// native handshake has happened on this instance, the native
    /// descriptor is reported from then on.
    pub fn info(&self) -> ProtocolInfo {
        if self.native.load(Ordering::Relaxed) {
            ProtocolInfo {
                protocol_version: NATIVE_PROTOCOL_VERSION.to_string(),
                security_protocol: NATIVE_SECURITY_PROTOCOL.to_string(),
                security_version: NATIVE_SECURITY_VERSION.to_string(),
                server_name: self.tls.server_name.clone(),
            }
        } else {
            ProtocolInfo {
                protocol_version: String::new(),
                security_protocol: CLASSIC_SECURITY_PROTOCOL.to_string(),
                security_version: CLASSIC_SECURITY_VERSION.to_string(),
                server_name: self.tls.server_name.clone(),
            }
        }
    }
}

/// Extracts the host portion of a `host:port` authority, tolerating
/// bracketed IPv6 literals.
pub(crate) fn host_of(authority: &str) -> &str {
    let host = match authority.rsplit_once(':') {
        Some((host, _)) if !host.is_empty() => host,
        _ => authority,
    };
    host.trim_start_matches('[').trim_end_matches(']')
}
