//! Classic-mode credentials tests: a generic byte connection gets a
//! real TLS handshake layered on top.

mod common;

use quicrpc::credentials::{AuthInfo, Credentials};
use quicrpc::transport::{ByteConn, Connection};
use tokio::net::{TcpListener, TcpStream};

#[tokio::test]
async fn generic_connection_uses_classic_handshake() {
    let (certificates, key) = common::self_signed(&["localhost"]);
    let server_creds = Credentials::from_cert(certificates, key);
    let client_creds = Credentials::insecure_skip_verify();

    let tcp_listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = tcp_listener.local_addr().unwrap();

    let server_task = tokio::spawn(async move {
        let (stream, _) = tcp_listener.accept().await.unwrap();
        let conn = Connection::Byte(ByteConn::from_tcp(stream).unwrap());
        let (mut conn, auth) = server_creds.server_handshake(conn).await.unwrap();

        let mut buf = vec![0u8; 64];
        let n = conn.read(&mut buf).await.unwrap();
        conn.write(&buf[..n]).await.unwrap();
        auth
    });

    let stream = TcpStream::connect(addr).await.unwrap();
    let conn = Connection::Byte(ByteConn::from_tcp(stream).unwrap());

    let authority = format!("localhost:{}", addr.port());
    let (mut conn, auth) = client_creds.client_handshake(&authority, conn).await.unwrap();
    assert_eq!(auth.auth_type(), "tls");

    conn.write(b"ping").await.unwrap();
    let mut buf = [0u8; 16];
    let n = conn.read(&mut buf).await.unwrap();
    assert_eq!(&buf[..n], b"ping");

    let server_auth = server_task.await.unwrap();
    assert_eq!(server_auth.auth_type(), "tls");
    match server_auth {
        AuthInfo::Tls(info) => {
            // SNI derived from the dialed authority
            assert_eq!(info.server_name.as_deref(), Some("localhost"));
            assert!(info.version.is_some());
        }
        other => panic!("expected classic auth info, got {other:?}"),
    }

    // Classic handshakes never latch native reporting.
    assert_eq!(client_creds.info().security_protocol, "tls");
    conn.close().await.unwrap();
}

#[tokio::test]
async fn server_name_override_wins_over_authority() {
    let (certificates, key) = common::self_signed(&["rpc.internal"]);
    let server_creds = Credentials::from_cert(certificates, key);

    let mut client_creds = Credentials::insecure_skip_verify();
    client_creds.override_server_name("rpc.internal").unwrap();

    let tcp_listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = tcp_listener.local_addr().unwrap();

    let server_task = tokio::spawn(async move {
        let (stream, _) = tcp_listener.accept().await.unwrap();
        let conn = Connection::Byte(ByteConn::from_tcp(stream).unwrap());
        let (_, auth) = server_creds.server_handshake(conn).await.unwrap();
        auth
    });

    let stream = TcpStream::connect(addr).await.unwrap();
    let conn = Connection::Byte(ByteConn::from_tcp(stream).unwrap());

    // Authority names an address, not the certificate's host; the
    // override supplies the SNI instead.
    let (_, auth) = client_creds
        .client_handshake(&addr.to_string(), conn)
        .await
        .unwrap();

    match auth {
        AuthInfo::Tls(info) => assert_eq!(info.server_name.as_deref(), Some("rpc.internal")),
        other => panic!("expected classic auth info, got {other:?}"),
    }

    match server_task.await.unwrap() {
        AuthInfo::Tls(info) => assert_eq!(info.server_name.as_deref(), Some("rpc.internal")),
        other => panic!("expected classic auth info, got {other:?}"),
    }
}

#[tokio::test]
async fn server_handshake_without_key_fails() {
    let creds = Credentials::new(quicrpc::tls::TlsConfig::default());

    let tcp_listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = tcp_listener.local_addr().unwrap();

    let accept = tokio::spawn(async move {
        let (stream, _) = tcp_listener.accept().await.unwrap();
        let conn = Connection::Byte(ByteConn::from_tcp(stream).unwrap());
        creds.server_handshake(conn).await
    });

    let _client = TcpStream::connect(addr).await.unwrap();
    assert!(accept.await.unwrap().is_err());
}
