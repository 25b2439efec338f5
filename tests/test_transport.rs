//! Adapter-level transport tests: address identity, close cascade,
//! timeout bounds, and accept isolation.

mod common;

use quicrpc::config::{DialOption, ServerOption};
use quicrpc::endpoint;
use std::time::Duration;

fn client_options() -> Vec<DialOption> {
    vec![
        DialOption::TlsConfig(common::insecure_client_tls()),
        DialOption::ConnectTimeout(Duration::from_secs(5)),
    ]
}

fn server_options() -> Vec<ServerOption> {
    vec![ServerOption::TlsConfig(common::server_tls(&["localhost"]))]
}

#[tokio::test]
async fn dialed_connection_address_identity() {
    let (_, listener) = endpoint::listen("127.0.0.1:0", server_options()).unwrap();
    let server_addr = listener.local_addr().unwrap();

    let accept = tokio::spawn(async move { listener.accept().await });

    let channel = endpoint::dial(&server_addr.to_string(), client_options()).unwrap();
    let (mut conn, _) = channel.connect().await.unwrap();

    assert_eq!(conn.remote_addr(), server_addr);
    assert_ne!(conn.local_addr().port(), 0);

    // The stream only becomes visible to the acceptor once data flows.
    conn.write(b"\n").await.unwrap();

    // The accepted connection is paired with exactly this client's socket.
    let accepted = accept.await.unwrap().unwrap();
    assert_eq!(accepted.remote_addr().port(), conn.local_addr().port());
    assert_eq!(accepted.local_addr(), server_addr);
}

#[tokio::test]
async fn close_cascades_to_stream_and_session() {
    let (_, listener) = endpoint::listen("127.0.0.1:0", server_options()).unwrap();
    let server_addr = listener.local_addr().unwrap();

    let accept = tokio::spawn(async move { listener.accept().await });

    let channel = endpoint::dial(&server_addr.to_string(), client_options()).unwrap();
    let (mut conn, _) = channel.connect().await.unwrap();

    conn.write(b"x").await.unwrap();
    let mut server_conn = accept.await.unwrap().unwrap();

    let mut buf = [0u8; 8];
    let n = server_conn.read(&mut buf).await.unwrap();
    assert_eq!(&buf[..n], b"x");

    conn.close().await.unwrap();
    assert!(conn.write(b"y").await.is_err());
    assert!(conn.read(&mut buf).await.is_err());

    // The peer observes end of stream or session closure, never data.
    let result = server_conn.read(&mut buf).await;
    assert!(matches!(result, Ok(0) | Err(_)));
}

#[tokio::test]
async fn dial_timeout_is_bounded() {
    // RFC 5737 TEST-NET address; nothing answers there
    let channel = endpoint::dial(
        "192.0.2.1:4242",
        [
            DialOption::TlsConfig(common::insecure_client_tls()),
            DialOption::ConnectTimeout(Duration::from_millis(50)),
        ],
    )
    .unwrap();

    let start = std::time::Instant::now();
    let result = channel.connect().await;

    assert!(result.is_err());
    assert!(start.elapsed() < Duration::from_millis(200));
}

#[tokio::test]
async fn concurrent_clients_get_isolated_connections() {
    let (server, listener) = endpoint::listen("127.0.0.1:0", server_options()).unwrap();
    let server_addr = listener.local_addr().unwrap().to_string();

    tokio::spawn(async move {
        server
            .serve(listener, |mut conn, _auth| async move {
                let peer = conn.remote_addr();
                let mut buf = vec![0u8; 256];
                let n = conn.read(&mut buf).await?;
                let reply = format!("{}:{}", String::from_utf8_lossy(&buf[..n]), peer.port());
                conn.write(reply.as_bytes()).await?;
                Ok(())
            })
            .await
    });

    let run_client = |tag: &'static str| {
        let server_addr = server_addr.clone();
        async move {
            let channel = endpoint::dial(&server_addr, client_options()).unwrap();
            let (mut conn, _) = channel.connect().await.unwrap();
            conn.write(tag.as_bytes()).await.unwrap();
            let mut buf = vec![0u8; 256];
            let n = conn.read(&mut buf).await.unwrap();
            (
                String::from_utf8_lossy(&buf[..n]).to_string(),
                conn.local_addr().port(),
            )
        }
    };

    let (alpha, beta) = tokio::join!(run_client("alpha"), run_client("beta"));

    // Each client sees its own bytes echoed against its own socket; no
    // stream ever crosses sessions.
    assert_eq!(alpha.0, format!("alpha:{}", alpha.1));
    assert_eq!(beta.0, format!("beta:{}", beta.1));
    assert_ne!(alpha.1, beta.1);
}

#[tokio::test]
async fn listen_without_certificate_fails_fast() {
    let result = endpoint::listen("127.0.0.1:0", []);
    assert!(result.is_err());
}

#[tokio::test]
async fn listen_rejects_invalid_address() {
    let result = endpoint::listen("not an address", server_options());
    assert!(result.is_err());
}

#[tokio::test]
async fn dial_surfaces_resolution_failure() {
    let channel = endpoint::dial("invalid.invalid:4242", client_options()).unwrap();
    assert!(channel.connect().await.is_err());
}
