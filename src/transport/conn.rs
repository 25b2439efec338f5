//! Connection adapters: one QUIC session plus one stream behind the
//! framework's stream-connection contract, and its generic byte-stream
//! counterpart.

use crate::error::{NetworkError, QuicError, Result};
use std::future::Future;
use std::net::SocketAddr;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time::Instant;
use tracing::debug;

/// Object-safe alias for anything readable and writable as a byte stream.
pub trait TransportStreamTrait: AsyncRead + AsyncWrite + Unpin + Send {}
impl<T: AsyncRead + AsyncWrite + Unpin + Send + ?Sized> TransportStreamTrait for T {}

/// Boxed generic byte stream (TCP, TLS-wrapped TCP, ...).
pub type TransportStream = Box<dyn TransportStreamTrait>;

/// Per-direction I/O deadlines, the stream-level cancellation hook of the
/// connection contract.
#[derive(Debug, Default, Clone, Copy)]
struct Deadlines {
    read: Option<Instant>,
    write: Option<Instant>,
}

async fn with_deadline<T>(
    deadline: Option<Instant>,
    fut: impl Future<Output = Result<T>>,
) -> Result<T> {
    match deadline {
        Some(at) => match tokio::time::timeout_at(at, fut).await {
            Ok(result) => result,
            Err(_) => Err(NetworkError::Timeout.into()),
        },
        None => fut.await,
    }
}

/// The unit the RPC framework consumes: either a natively secured QUIC
/// connection or a generic byte connection still in need of a classic
/// handshake. The credentials dispatch on the variant, never on a runtime
/// downcast.
#[derive(Debug)]
pub enum Connection {
    /// Secured at the session layer; no further handshake required.
    Quic(QuicConn),
    /// Generic byte stream; classic TLS applies on top.
    Byte(ByteConn),
}

impl Connection {
    pub async fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        match self {
            Connection::Quic(conn) => conn.read(buf).await,
            Connection::Byte(conn) => conn.read(buf).await,
        }
    }

    pub async fn write(&mut self, buf: &[u8]) -> Result<usize> {
        match self {
            Connection::Quic(conn) => conn.write(buf).await,
            Connection::Byte(conn) => conn.write(buf).await,
        }
    }

    pub async fn close(&mut self) -> Result<()> {
        match self {
            Connection::Quic(conn) => conn.close(),
            Connection::Byte(conn) => conn.close().await,
        }
    }

    pub fn local_addr(&self) -> SocketAddr {
        match self {
            Connection::Quic(conn) => conn.local_addr(),
            Connection::Byte(conn) => conn.local_addr(),
        }
    }

    pub fn remote_addr(&self) -> SocketAddr {
        match self {
            Connection::Quic(conn) => conn.remote_addr(),
            Connection::Byte(conn) => conn.remote_addr(),
        }
    }

    /// Sets both the read and write deadline.
    pub fn set_deadline(&mut self, deadline: Option<Instant>) {
        self.set_read_deadline(deadline);
        self.set_write_deadline(deadline);
    }

    pub fn set_read_deadline(&mut self, deadline: Option<Instant>) {
        match self {
            Connection::Quic(conn) => conn.deadlines.read = deadline,
            Connection::Byte(conn) => conn.deadlines.read = deadline,
        }
    }

    pub fn set_write_deadline(&mut self, deadline: Option<Instant>) {
        match self {
            Connection::Quic(conn) => conn.deadlines.write = deadline,
            Connection::Byte(conn) => conn.deadlines.write = deadline,
        }
    }
}

/// One QUIC session plus the single bidirectional stream carrying RPC
/// traffic.
///
/// Reads and writes delegate verbatim to the stream; address identity is
/// the session's, since streams have no addresses of their own. Closing
/// is not idempotent: callers close once.
#[derive(Debug)]
pub struct QuicConn {
    connection: quinn::Connection,
    send: quinn::SendStream,
    recv: quinn::RecvStream,
    local_addr: SocketAddr,
    // Client role keeps the endpoint alive so the packet socket lives
    // exactly as long as its one session.
    endpoint: Option<quinn::Endpoint>,
    deadlines: Deadlines,
}

impl QuicConn {
    /// Client role: opens one bidirectional stream on an established
    /// session. Fails if the session is already closed.
    pub async fn connect(endpoint: quinn::Endpoint, connection: quinn::Connection) -> Result<Self> {
        let local_addr = endpoint.local_addr()?;
        let (send, recv) = connection.open_bi().await.map_err(|e| QuicError::StreamError {
            reason: e.to_string(),
        })?;

        debug!(
            "Opened RPC stream on session {} -> {}",
            local_addr,
            connection.remote_address()
        );

        Ok(Self {
            connection,
            send,
            recv,
            local_addr,
            endpoint: Some(endpoint),
            deadlines: Deadlines::default(),
        })
    }

    /// Server role: wraps a session and its already-accepted first stream.
    /// The listener's endpoint owns the packet socket.
    pub(crate) fn accepted(
        connection: quinn::Connection,
        send: quinn::SendStream,
        recv: quinn::RecvStream,
        local_addr: SocketAddr,
    ) -> Self {
        Self {
            connection,
            send,
            recv,
            local_addr,
            endpoint: None,
            deadlines: Deadlines::default(),
        }
    }

    /// Reads from the stream. Returns 0 at end of stream.
    pub async fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        let recv = &mut self.recv;
        with_deadline(self.deadlines.read, async move {
            match recv.read(buf).await {
                Ok(Some(n)) => Ok(n),
                Ok(None) => Ok(0),
                Err(e) => Err(QuicError::StreamError {
                    reason: e.to_string(),
                }
                .into()),
            }
        })
        .await
    }

    /// Writes to the stream, returning the number of bytes accepted.
    pub async fn write(&mut self, buf: &[u8]) -> Result<usize> {
        let send = &mut self.send;
        with_deadline(self.deadlines.write, async move {
            send.write(buf).await.map_err(|e| {
                QuicError::StreamError {
                    reason: e.to_string(),
                }
                .into()
            })
        })
        .await
    }

    /// Closes the stream first, then the session. Stream-close errors are
    /// suppressed; session closure is authoritative.
    pub fn close(&mut self) -> Result<()> {
        let _ = self.send.finish();
        self.connection.close(quinn::VarInt::from_u32(0), b"");
        if let Some(endpoint) = self.endpoint.take() {
            endpoint.close(quinn::VarInt::from_u32(0), b"");
        }
        Ok(())
    }

    /// The session's local address (the packet socket's bound address).
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// The session's remote address.
    pub fn remote_addr(&self) -> SocketAddr {
        self.connection.remote_address()
    }
}

/// A generic byte connection: boxed stream plus the address identity
/// captured when it was created.
pub struct ByteConn {
    io: TransportStream,
    local_addr: SocketAddr,
    peer_addr: SocketAddr,
    deadlines: Deadlines,
}

impl std::fmt::Debug for ByteConn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ByteConn")
            .field("local_addr", &self.local_addr)
            .field("peer_addr", &self.peer_addr)
            .finish_non_exhaustive()
    }
}

impl ByteConn {
    pub fn new(io: TransportStream, local_addr: SocketAddr, peer_addr: SocketAddr) -> Self {
        Self {
            io,
            local_addr,
            peer_addr,
            deadlines: Deadlines::default(),
        }
    }

    /// Wraps an established TCP stream, capturing its address pair.
    pub fn from_tcp(stream: tokio::net::TcpStream) -> Result<Self> {
        let local_addr = stream.local_addr()?;
        let peer_addr = stream.peer_addr()?;
        Ok(Self::new(Box::new(stream), local_addr, peer_addr))
    }

    /// Splits the connection for a handshake that consumes the raw stream.
    pub(crate) fn into_parts(self) -> (TransportStream, SocketAddr, SocketAddr) {
        (self.io, self.local_addr, self.peer_addr)
    }

    pub async fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        let io = &mut self.io;
        with_deadline(self.deadlines.read, async move {
            Ok(io.read(buf).await?)
        })
        .await
    }

    pub async fn write(&mut self, buf: &[u8]) -> Result<usize> {
        let io = &mut self.io;
        with_deadline(self.deadlines.write, async move {
            Ok(io.write(buf).await?)
        })
        .await
    }

    pub async fn close(&mut self) -> Result<()> {
        self.io.shutdown().await?;
        Ok(())
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn remote_addr(&self) -> SocketAddr {
        self.peer_addr
    }
}
