//! quicrpc bridges an RPC framework's stream-oriented transport contract
//! onto QUIC: one secure session carrying one ordered, reliable stream per
//! logical RPC connection.
//!
//! The adapter core consists of three pieces: [`transport::QuicConn`] maps
//! a session plus its stream onto the framework's connection contract,
//! [`transport::QuicListener`] promotes accepted sessions to connections,
//! and [`credentials::Credentials`] negotiates either the session's native
//! security or a classic byte-stream TLS handshake depending on the
//! connection it is handed. [`endpoint`] wires those pieces into the
//! framework's dial and serve hooks.

pub mod certificates;
pub mod config;
pub mod constants;
pub mod credentials;
pub mod endpoint;
pub mod error;
pub mod rpc;
pub mod tls;
pub mod transport;

pub use error::{QuicRpcError, Result};
