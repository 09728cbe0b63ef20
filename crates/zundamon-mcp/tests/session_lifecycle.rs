//! End-to-end session tests over in-memory stream pairs.

use std::sync::Arc;

use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use zundamon::PeoplePolicy;
use zundamon_mcp::handlers::build_registry;
use zundamon_mcp::session::{Session, SessionState, ShutdownReason};
use zundamon_mcp::transport::StdioTransport;
use zundamon_mcp::types::McpError;

fn registry() -> Arc<zundamon_mcp::CapabilityRegistry> {
    Arc::new(build_registry(PeoplePolicy::Normalize).unwrap())
}

fn output_lines(written: Vec<u8>) -> Vec<Value> {
    String::from_utf8(written)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[tokio::test]
async fn test_tools_list_then_call_then_eof() {
    let input = concat!(
        r#"{"jsonrpc":"2.0","id":1,"method":"tools/list"}"#,
        "\n",
        r#"{"jsonrpc":"2.0","id":2,"method":"tools/call","params":{"name":"calculate_zunda","arguments":{"people":2}}}"#,
        "\n",
    );
    let transport = StdioTransport::new(input.as_bytes(), Vec::new());
    let mut session = Session::new(registry(), transport);

    let reason = session.run_until(std::future::pending()).await.unwrap();
    assert_eq!(reason, ShutdownReason::EndOfStream);
    assert_eq!(session.state(), SessionState::Closed);

    let (_, written) = session.into_transport().into_inner();
    let lines = output_lines(written);
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["id"], 1);
    assert_eq!(lines[0]["result"]["tools"][0]["name"], "calculate_zunda");
    assert_eq!(lines[1]["id"], 2);
    assert_eq!(
        lines[1]["result"]["content"][0]["text"],
        "2人分のずんだもちは6個必要なのだ！"
    );
}

#[tokio::test]
async fn test_handshake_reaches_serving() {
    let input = concat!(
        r#"{"jsonrpc":"2.0","id":0,"method":"initialize","params":{"protocolVersion":"2024-11-05","capabilities":{},"clientInfo":{"name":"t","version":"1"}}}"#,
        "\n",
        r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
        "\n",
        r#"{"jsonrpc":"2.0","id":1,"method":"resources/read","params":{"uri":"zundamon://greeting"}}"#,
        "\n",
    );
    let mut session = Session::new(registry(), StdioTransport::new(input.as_bytes(), Vec::new()));

    session.run_until(std::future::pending()).await.unwrap();
    assert!(session.handler().is_initialized());
    assert_eq!(session.state(), SessionState::Closed);

    let (_, written) = session.into_transport().into_inner();
    let lines = output_lines(written);
    // The notification gets no reply.
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["result"]["serverInfo"]["name"], "hello-zundamon");
    assert_eq!(
        lines[1]["result"]["contents"][0]["text"],
        "ぼくはずんだもん！ずんだの精霊なのだ！よろしくなのだ！"
    );
}

#[tokio::test]
async fn test_malformed_line_does_not_end_session() {
    let input = concat!(
        "{\"broken\":\n",
        "\n",
        r#"{"jsonrpc":"2.0","id":3,"method":"ping"}"#,
        "\n",
    );
    let mut session = Session::new(registry(), StdioTransport::new(input.as_bytes(), Vec::new()));
    let reason = session.run_until(std::future::pending()).await.unwrap();
    assert_eq!(reason, ShutdownReason::EndOfStream);

    let (_, written) = session.into_transport().into_inner();
    let lines = output_lines(written);
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["id"], Value::Null);
    assert_eq!(lines[0]["error"]["code"], -32700);
    assert_eq!(lines[1]["id"], 3);
}

#[tokio::test]
async fn test_every_request_line_gets_one_reply() {
    let input = concat!(
        r#"{"jsonrpc":"2.0","id":18446744073709551615,"method":"tools/list"}"#,
        "\n",
        r#"{"jsonrpc":"2.0","id":1.5,"method":"tools/list"}"#,
        "\n",
        r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
        "\n",
    );
    let mut session = Session::new(registry(), StdioTransport::new(input.as_bytes(), Vec::new()));
    session.run_until(std::future::pending()).await.unwrap();

    let (_, written) = session.into_transport().into_inner();
    let lines = output_lines(written);
    assert_eq!(lines.len(), 2);
    for line in lines {
        assert_eq!(line["id"], Value::Null);
        assert_eq!(line["error"]["code"], -32600);
    }
}

#[tokio::test]
async fn test_scripted_reader() {
    let reader = tokio_test::io::Builder::new()
        .read(br#"{"jsonrpc":"2.0","id":1,"method":"resources/list"}"#)
        .read(b"\n")
        .build();
    let mut session = Session::new(registry(), StdioTransport::new(reader, Vec::new()));
    session.run_until(std::future::pending()).await.unwrap();

    let (_, written) = session.into_transport().into_inner();
    let lines = output_lines(written);
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["result"]["resources"][0]["uri"], "zundamon://greeting");
}

#[tokio::test]
async fn test_interrupt_before_any_input() {
    let (_client, server_in) = tokio::io::duplex(1024);
    let mut session = Session::new(registry(), StdioTransport::new(server_in, Vec::new()));

    let reason = session.run_until(std::future::ready(())).await.unwrap();
    assert_eq!(reason, ShutdownReason::Interrupted);
    assert_eq!(session.state(), SessionState::Closed);

    let (_, written) = session.into_transport().into_inner();
    assert!(written.is_empty());
}

#[tokio::test]
async fn test_interrupt_after_exchange() {
    let (mut client_in, server_in) = tokio::io::duplex(4096);
    let (server_out, client_out) = tokio::io::duplex(4096);
    let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();

    let mut session = Session::new(registry(), StdioTransport::new(server_in, server_out));
    let shutdown = async {
        let _ = stop_rx.await;
    };

    let client = async move {
        client_in
            .write_all(b"{\"jsonrpc\":\"2.0\",\"id\":7,\"method\":\"ping\"}\n")
            .await
            .unwrap();
        let mut reader = BufReader::new(client_out);
        let mut line = String::new();
        reader.read_line(&mut line).await.unwrap();
        stop_tx.send(()).unwrap();
        (client_in, reader, line)
    };

    let (reason, (_client_in, _reader, line)) = tokio::join!(session.run_until(shutdown), client);
    assert_eq!(reason.unwrap(), ShutdownReason::Interrupted);
    assert_eq!(session.state(), SessionState::Closed);

    let reply: Value = serde_json::from_str(&line).unwrap();
    assert_eq!(reply, json!({ "jsonrpc": "2.0", "id": 7, "result": {} }));
}

#[tokio::test]
async fn test_closed_session_cannot_restart() {
    let mut session = Session::new(registry(), StdioTransport::new(&b""[..], Vec::new()));
    session.run_until(std::future::pending()).await.unwrap();
    assert_eq!(session.state(), SessionState::Closed);

    let err = session.run_until(std::future::pending()).await.unwrap_err();
    assert!(matches!(err, McpError::InvalidStateTransition { .. }));
    assert_eq!(session.state(), SessionState::Closed);
}
