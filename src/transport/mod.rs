//! Transport adapters bridging QUIC sessions to the RPC framework's
//! connection contract.

mod conn;
mod listener;

pub use conn::{ByteConn, Connection, QuicConn, TransportStream, TransportStreamTrait};
pub use listener::QuicListener;
