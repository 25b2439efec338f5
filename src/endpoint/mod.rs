//! Endpoint factory: builds packet sockets, resolves addresses, and wires
//! session establishment into the RPC framework's dial and serve hooks.
//!
//! Session configuration is an explicit per-call value derived from the
//! endpoint configuration; there is no process-wide tuning state.
//! Keep-alive defaults on, flow-control windows stay at quinn defaults.

use crate::config::{defaults, ClientConfig, DialOption, ServerConfig, ServerOption};
use crate::credentials::Credentials;
use crate::error::{NetworkError, QuicError, Result, SocketError};
use crate::rpc::{Channel, DialFuture, Dialer, Server};
use crate::transport::{Connection, QuicConn, QuicListener};
use std::net::{SocketAddr, ToSocketAddrs};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Builds a client channel for `target`.
///
/// Applies `options` atomically, derives credentials from the resulting
/// TLS configuration, and hands the framework a dialer that establishes
/// one fresh session plus one stream per invocation. No connection is
/// attempted here; dialing happens when the channel connects.
pub fn dial(target: &str, options: impl IntoIterator<Item = DialOption>) -> Result<Channel> {
    let mut config = ClientConfig::apply(options)?;

    let credentials = Credentials::new(config.tls.clone());
    let connect_timeout = config.connect_timeout;
    let rpc_options = std::mem::take(&mut config.rpc_options);
    let dialer = new_quic_dialer(config);

    Ok(Channel::new(
        target,
        dialer,
        credentials,
        connect_timeout,
        rpc_options,
    ))
}

/// Binds a listening endpoint at `addr` and returns the framework server
/// handle plus the listener for its accept loop.
///
/// Fails fast: option application, address parsing, crypto building, and
/// socket binding all happen before anything is returned, and the quinn
/// endpoint is the sole owner of its socket, so an early error leaks
/// nothing.
pub fn listen(
    addr: &str,
    options: impl IntoIterator<Item = ServerOption>,
) -> Result<(Server, QuicListener)> {
    let mut config = ServerConfig::apply(options)?;
    let credentials = Credentials::new(config.tls.clone());
    let rpc_options = std::mem::take(&mut config.rpc_options);

    let bind_addr = addr
        .to_socket_addrs()
        .map_err(|_| NetworkError::InvalidAddress {
            address: addr.to_string(),
        })?
        .next()
        .ok_or_else(|| NetworkError::InvalidAddress {
            address: addr.to_string(),
        })?;

    let crypto = config.tls.build_server_config()?;
    let crypto =
        quinn::crypto::rustls::QuicServerConfig::try_from(crypto).map_err(|e| {
            QuicError::ConfigError {
                reason: e.to_string(),
            }
        })?;
    let mut server_config = quinn::ServerConfig::with_crypto(Arc::new(crypto));
    server_config.transport_config(Arc::new(session_transport_config(config.keep_alive)));

    let endpoint = quinn::Endpoint::server(server_config, bind_addr).map_err(|_| {
        SocketError::BindFailed {
            address: bind_addr.to_string(),
        }
    })?;

    info!("Listening for QUIC sessions on {}", endpoint.local_addr()?);

    Ok((
        Server::new(credentials, rpc_options),
        QuicListener::new(endpoint),
    ))
}

/// Builds the framework's dialer hook around one client configuration.
fn new_quic_dialer(config: ClientConfig) -> Dialer {
    Box::new(move |target: String, timeout: Duration| -> DialFuture {
        let config = config.clone();
        Box::pin(async move { dial_session(&config, &target, timeout).await })
    })
}

/// One dial attempt: ephemeral packet socket, target resolution, session
/// handshake, one stream. The timeout bounds handshake and stream opening
/// together and cancels the in-progress handshake when it elapses.
async fn dial_session(
    config: &ClientConfig,
    target: &str,
    timeout: Duration,
) -> Result<Connection> {
    let remote = resolve_target(target).await?;

    // Bind to the address family of the resolved target
    let bind_addr: SocketAddr = if remote.is_ipv6() {
        "[::]:0".parse().expect("valid bind address")
    } else {
        "0.0.0.0:0".parse().expect("valid bind address")
    };

    let mut endpoint =
        quinn::Endpoint::client(bind_addr).map_err(|e| SocketError::CreationFailed {
            reason: e.to_string(),
        })?;
    endpoint.set_default_client_config(client_quic_config(config)?);

    let server_name = config
        .tls
        .server_name
        .clone()
        .unwrap_or_else(|| crate::credentials::host_of(target).to_string());

    debug!(
        "Dialing QUIC session {} -> {} (SNI: {})",
        endpoint.local_addr()?,
        remote,
        server_name
    );

    let connecting =
        endpoint
            .connect(remote, &server_name)
            .map_err(|e| QuicError::ConnectionFailed {
                reason: e.to_string(),
            })?;

    let established = async {
        let connection = connecting.await.map_err(|e| QuicError::ConnectionFailed {
            reason: e.to_string(),
        })?;
        QuicConn::connect(endpoint, connection).await
    };

    let conn = match tokio::time::timeout(timeout, established).await {
        Ok(result) => result?,
        Err(_) => return Err(NetworkError::Timeout.into()),
    };

    debug!("QUIC session established with {}", remote);
    Ok(Connection::Quic(conn))
}

/// Resolves `target` to the first usable socket address.
async fn resolve_target(target: &str) -> Result<SocketAddr> {
    let mut addrs = tokio::net::lookup_host(target)
        .await
        .map_err(|_| NetworkError::AddressResolution {
            hostname: target.to_string(),
        })?;

    addrs.next().ok_or_else(|| {
        NetworkError::AddressResolution {
            hostname: target.to_string(),
        }
        .into()
    })
}

fn client_quic_config(config: &ClientConfig) -> Result<quinn::ClientConfig> {
    let crypto = config.tls.build_client_config()?;
    let crypto =
        quinn::crypto::rustls::QuicClientConfig::try_from(crypto).map_err(|e| {
            QuicError::ConfigError {
                reason: e.to_string(),
            }
        })?;

    let mut client_config = quinn::ClientConfig::new(Arc::new(crypto));
    client_config.transport_config(Arc::new(session_transport_config(config.keep_alive)));
    Ok(client_config)
}

/// Session-level transport configuration shared by both roles.
fn session_transport_config(keep_alive: bool) -> quinn::TransportConfig {
    let mut transport = quinn::TransportConfig::default();

    if keep_alive {
        transport.keep_alive_interval(Some(defaults::default_keep_alive_interval()));
    }
    transport.max_idle_timeout(Some(
        quinn::IdleTimeout::try_from(defaults::default_idle_timeout())
            .expect("idle timeout within range"),
    ));

    transport
}
