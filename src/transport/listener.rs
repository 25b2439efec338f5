//! Listener adapter: accepts QUIC sessions and promotes each session's
//! first stream to a connection.

use super::conn::{Connection, QuicConn};
use crate::error::{NetworkError, QuicError, Result};
use std::net::SocketAddr;
use tracing::debug;

/// Wraps a server-side QUIC endpoint behind the framework's generic
/// listener contract.
///
/// Each `accept` call performs exactly one session-to-connection
/// promotion. A session that opens further streams exposes only its first
/// one through this path; one logical connection per session by design.
#[derive(Debug)]
pub struct QuicListener {
    endpoint: quinn::Endpoint,
}

impl QuicListener {
    pub(crate) fn new(endpoint: quinn::Endpoint) -> Self {
        Self { endpoint }
    }

    /// Blocks until a new session is established and its peer opens the
    /// first bidirectional stream, then wraps both into a connection.
    ///
    /// Errors are per-attempt: a failed session or stream accept leaves
    /// the listener usable for subsequent calls. A closed endpoint yields
    /// [`NetworkError::ConnectionClosed`].
    pub async fn accept(&self) -> Result<Connection> {
        let incoming = self
            .endpoint
            .accept()
            .await
            .ok_or(NetworkError::ConnectionClosed)?;

        let remote = incoming.remote_address();
        let connection = incoming.await.map_err(|e| QuicError::ConnectionFailed {
            reason: format!("handshake with {remote}: {e}"),
        })?;

        debug!("QUIC session established from {}", remote);

        let (send, recv) = connection
            .accept_bi()
            .await
            .map_err(|e| QuicError::StreamError {
                reason: format!("first stream from {remote}: {e}"),
            })?;

        debug!("RPC stream accepted from {}", remote);

        let local_addr = self.endpoint.local_addr()?;
        Ok(Connection::Quic(QuicConn::accepted(
            connection, send, recv, local_addr,
        )))
    }

    /// Closes the listening endpoint. Connections already handed out are
    /// left alone.
    pub fn close(&self) {
        self.endpoint.close(quinn::VarInt::from_u32(0), b"");
    }

    /// The bound local address of the listening packet socket.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.endpoint.local_addr()?)
    }
}
