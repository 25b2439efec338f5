//! Protocol constants shared across the quicrpc transport.

use std::sync::LazyLock;

/// ALPN protocols offered on both the QUIC handshake and the classic TLS
/// handshake, so either path negotiates the same application protocol.
pub static ALPN_PROTOCOLS: LazyLock<Vec<Vec<u8>>> =
    LazyLock::new(|| vec![b"quicrpc".to_vec()]);

/// Protocol version reported for natively secured connections.
pub const NATIVE_PROTOCOL_VERSION: &str = "/quic/1.0.0";

/// Security protocol marker for connections secured at the session layer.
pub const NATIVE_SECURITY_PROTOCOL: &str = "quic-tls";

/// Security version reported for natively secured connections.
pub const NATIVE_SECURITY_VERSION: &str = "1.2.0";

/// Security protocol marker for classic byte-stream TLS.
pub const CLASSIC_SECURITY_PROTOCOL: &str = "tls";

/// Security version reported for classic byte-stream TLS.
pub const CLASSIC_SECURITY_VERSION: &str = "1.2";
