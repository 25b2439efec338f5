//! End-to-end scenario: an RPC-style hello exchange over a dialed QUIC
//! connection, secured natively by the session.

mod common;

use quicrpc::config::{DialOption, ServerOption};
use quicrpc::constants::{CLASSIC_SECURITY_PROTOCOL, NATIVE_SECURITY_PROTOCOL};
use quicrpc::endpoint;
use rstest::{fixture, rstest};
use std::time::Duration;
use tracing_test::traced_test;

#[fixture]
fn server_tls() -> quicrpc::tls::TlsConfig {
    common::server_tls(&["localhost"])
}

#[rstest]
#[tokio::test]
#[traced_test]
async fn hello_round_trip(server_tls: quicrpc::tls::TlsConfig) {
    let target = "127.0.0.1:5847";

    let (server, listener) =
        endpoint::listen(target, [ServerOption::TlsConfig(server_tls)]).unwrap();

    tokio::spawn(async move {
        server
            .serve(listener, |mut conn, auth| async move {
                let mut buf = vec![0u8; 1024];
                let n = conn.read(&mut buf).await?;
                let request: serde_json::Value =
                    serde_json::from_slice(&buf[..n]).expect("request is JSON");
                let name = request["name"].as_str().unwrap_or_default();

                let reply = serde_json::json!({
                    "message": format!("Hello {name}"),
                    "auth": auth.auth_type(),
                });
                conn.write(reply.to_string().as_bytes()).await?;
                Ok(())
            })
            .await
    });

    let channel = endpoint::dial(
        target,
        [
            DialOption::TlsConfig(common::insecure_client_tls()),
            DialOption::ConnectTimeout(Duration::from_secs(5)),
        ],
    )
    .unwrap();

    // No handshake yet: the channel still reports the classic descriptor.
    assert_eq!(
        channel.protocol_info().security_protocol,
        CLASSIC_SECURITY_PROTOCOL
    );

    let (mut conn, auth) = channel.connect().await.unwrap();
    assert_eq!(auth.auth_type(), NATIVE_SECURITY_PROTOCOL);
    assert_eq!(
        channel.protocol_info().security_protocol,
        NATIVE_SECURITY_PROTOCOL
    );

    conn.set_deadline(Some(tokio::time::Instant::now() + Duration::from_secs(1)));

    let request = serde_json::json!({ "name": "World" });
    conn.write(request.to_string().as_bytes()).await.unwrap();

    let mut buf = vec![0u8; 1024];
    let n = conn.read(&mut buf).await.unwrap();
    let reply: serde_json::Value = serde_json::from_slice(&buf[..n]).unwrap();

    assert_eq!(reply["message"], "Hello World");
    // The server side saw native session security, no classic handshake.
    assert_eq!(reply["auth"], NATIVE_SECURITY_PROTOCOL);

    conn.close().await.unwrap();
}
