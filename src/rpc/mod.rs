//! RPC framework hooks.
//!
//! The host framework's dialing and serving machinery is an external
//! collaborator; this module models the two hooks the endpoint factory
//! wires into it. [`Channel`] is the client side: it runs the dialer and
//! then the credentials' client handshake, exactly as the framework's
//! dial path would. [`Server`] drives the accept loop and the server
//! handshake, handing each secured connection to a caller-supplied
//! handler on its own task. Call dispatch, service registration, and
//! interceptors stay out of scope.

use crate::credentials::{AuthInfo, Credentials, ProtocolInfo};
use crate::error::Result;
use crate::transport::{Connection, QuicListener};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Future returned by a [`Dialer`] invocation.
pub type DialFuture = Pin<Box<dyn Future<Output = Result<Connection>> + Send>>;

/// The framework's dialer hook: `(target, timeout) -> Connection`.
pub type Dialer = Box<dyn Fn(String, Duration) -> DialFuture + Send + Sync>;

/// Framework-native options forwarded unchanged through Dial.
#[derive(Debug, Clone)]
pub enum ChannelOption {
    /// Overrides the authority presented during the client handshake.
    Authority(String),
}

/// Framework-native options forwarded unchanged through Listen.
#[derive(Debug, Clone)]
pub enum ServeOption {
    /// Bounds the server-side handshake for each accepted connection.
    HandshakeTimeout(Duration),
}

/// Client handle: a dial target bound to a dialer and credentials.
pub struct Channel {
    target: String,
    authority: String,
    connect_timeout: Duration,
    dialer: Dialer,
    credentials: Arc<Credentials>,
}

impl Channel {
    pub fn new(
        target: impl Into<String>,
        dialer: Dialer,
        credentials: Credentials,
        connect_timeout: Duration,
        options: Vec<ChannelOption>,
    ) -> Self {
        let target = target.into();
        let mut authority = target.clone();
        for option in options {
            match option {
                ChannelOption::Authority(value) => authority = value,
            }
        }
        Self {
            target,
            authority,
            connect_timeout,
            dialer,
            credentials: Arc::new(credentials),
        }
    }

    /// Dials the target and performs the credential handshake, yielding a
    /// ready connection and its negotiated security context.
    pub async fn connect(&self) -> Result<(Connection, AuthInfo)> {
        let conn = (self.dialer)(self.target.clone(), self.connect_timeout).await?;
        self.credentials
            .client_handshake(&self.authority, conn)
            .await
    }

    /// Protocol descriptor of the channel's credentials.
    pub fn protocol_info(&self) -> ProtocolInfo {
        self.credentials.info()
    }
}

/// Server handle: credentials plus the accept-loop policy.
pub struct Server {
    credentials: Arc<Credentials>,
    handshake_timeout: Option<Duration>,
}

impl Server {
    pub fn new(credentials: Credentials, options: Vec<ServeOption>) -> Self {
        let mut handshake_timeout = None;
        for option in options {
            match option {
                ServeOption::HandshakeTimeout(timeout) => handshake_timeout = Some(timeout),
            }
        }
        Self {
            credentials: Arc::new(credentials),
            handshake_timeout,
        }
    }

    /// Protocol descriptor of the server's credentials.
    pub fn protocol_info(&self) -> ProtocolInfo {
        self.credentials.info()
    }

    /// Drives the accept loop until the listener closes.
    ///
    /// Each accepted connection is handshaked and handed to `handler` on
    /// its own task. Per-connection failures are logged and do not stop
    /// the loop.
    pub async fn serve<F, Fut>(&self, listener: QuicListener, handler: F) -> Result<()>
    where
        F: Fn(Connection, AuthInfo) -> Fut + Clone + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        if let Ok(addr) = listener.local_addr() {
            info!("Serving RPC connections on {}", addr);
        }

        loop {
            let conn = match listener.accept().await {
                Ok(conn) => conn,
                Err(e) if e.is_closed() => return Ok(()),
                Err(e) => {
                    warn!("Accept failed: {}", e);
                    continue;
                }
            };

            let credentials = self.credentials.clone();
            let handshake_timeout = self.handshake_timeout;
            let handler = handler.clone();

            tokio::spawn(async move {
                let remote = conn.remote_addr();
                let handshake = credentials.server_handshake(conn);
                let result = match handshake_timeout {
                    Some(timeout) => match tokio::time::timeout(timeout, handshake).await {
                        Ok(result) => result,
                        Err(_) => Err(crate::error::HandshakeError::Timeout.into()),
                    },
                    None => handshake.await,
                };

                let (conn, auth) = match result {
                    Ok(pair) => pair,
                    Err(e) => {
                        warn!("Handshake with {} failed: {}", remote, e);
                        return;
                    }
                };

                if let Err(e) = handler(conn, auth).await {
                    warn!("Connection handler for {} failed: {}", remote, e);
                }
            });
        }
    }
}
