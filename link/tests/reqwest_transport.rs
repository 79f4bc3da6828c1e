//! `ReqwestTransport` against a local one-shot HTTP responder.

use engine_link::{
    EngineLinkClient, EngineLinkTimeouts, ExecutionState, HttpRequest, HttpTransport, HttpVersion,
    ReqwestTransport, TransportErrorKind,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// One received request: head lines lower-cased on the header name, plus body
struct Captured {
    request_line: String,
    headers: Vec<(String, String)>,
    body: String,
}

impl Captured {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

async fn read_request(stream: &mut TcpStream) -> Captured {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    let head_end = loop {
        let n = stream.read(&mut chunk).await.unwrap();
        assert!(n > 0, "connection closed before request head");
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos;
        }
    };

    let head = String::from_utf8_lossy(&buf[..head_end]).into_owned();
    let mut lines = head.split("\r\n");
    let request_line = lines.next().unwrap_or_default().to_string();
    let headers: Vec<(String, String)> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(k, v)| (k.trim().to_ascii_lowercase(), v.trim().to_string()))
        .collect();

    let content_length = headers
        .iter()
        .find(|(k, _)| k == "content-length")
        .and_then(|(_, v)| v.parse::<usize>().ok())
        .unwrap_or(0);
    let mut body = buf[head_end + 4..].to_vec();
    while body.len() < content_length {
        let n = stream.read(&mut chunk).await.unwrap();
        assert!(n > 0, "connection closed before request body");
        body.extend_from_slice(&chunk[..n]);
    }

    Captured {
        request_line,
        headers,
        body: String::from_utf8_lossy(&body).into_owned(),
    }
}

async fn write_response(stream: &mut TcpStream, status: &str, body: &str) {
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    );
    stream.write_all(response.as_bytes()).await.unwrap();
    stream.shutdown().await.unwrap();
}

/// Serve `replies` to successive connections, one response per connection.
///
/// Each reply body may contain `{base}`, replaced with the server's own URL.
async fn serve(replies: Vec<(&'static str, String)>) -> (String, tokio::task::JoinHandle<Vec<Captured>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let server_base = base.clone();

    let handle = tokio::spawn(async move {
        let mut captured = Vec::new();
        for (status, body) in replies {
            let (mut stream, _) = listener.accept().await.unwrap();
            captured.push(read_request(&mut stream).await);
            write_response(&mut stream, status, &body.replace("{base}", &server_base)).await;
        }
        captured
    });

    (base, handle)
}

fn transport() -> ReqwestTransport {
    let timeouts = EngineLinkTimeouts::builder()
        .connection_timeout(Duration::from_secs(2))
        .request_timeout(Duration::from_secs(5))
        .build();
    ReqwestTransport::new(&timeouts, HttpVersion::Http1).unwrap()
}

/// Transport that ignores any proxy settings from the environment
fn direct_transport() -> ReqwestTransport {
    let client = reqwest::Client::builder()
        .no_proxy()
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap();
    ReqwestTransport::with_client(client)
}

#[tokio::test]
async fn test_post_carries_body_and_headers() {
    let (base, server) = serve(vec![("200 OK", r#"{"id":"q1"}"#.to_string())]).await;

    let request = HttpRequest::post(format!("{}/v1/statement", base), "SELECT 1")
        .with_header("X-Engine-User", "alice")
        .with_header("X-Engine-Catalog", "hive");
    let response = direct_transport().send(request).await.unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(response.text(), r#"{"id":"q1"}"#);
    assert_eq!(response.header("content-type"), Some("application/json"));

    let captured = server.await.unwrap();
    assert_eq!(captured[0].request_line, "POST /v1/statement HTTP/1.1");
    assert_eq!(captured[0].header("x-engine-user"), Some("alice"));
    assert_eq!(captured[0].header("x-engine-catalog"), Some("hive"));
    assert_eq!(captured[0].body, "SELECT 1");
}

#[tokio::test]
async fn test_error_status_is_not_a_transport_error() {
    let (base, server) = serve(vec![("503 Service Unavailable", "busy".to_string())]).await;

    let response = direct_transport()
        .send(HttpRequest::delete(format!("{}/v1/stage/q1.0", base)))
        .await
        .unwrap();
    assert_eq!(response.status, 503);
    assert_eq!(response.text(), "busy");

    let captured = server.await.unwrap();
    assert_eq!(captured[0].request_line, "DELETE /v1/stage/q1.0 HTTP/1.1");
}

#[tokio::test]
async fn test_connection_refused_is_connect_error() {
    // Bind then drop to get a port nothing listens on
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = transport()
        .send(HttpRequest::get(format!("http://{}/v1/statement/q1/1", addr)))
        .await
        .unwrap_err();
    assert_eq!(err.transport_kind(), Some(TransportErrorKind::Connect));
}

#[tokio::test]
async fn test_full_query_over_http() {
    let (base, server) = serve(vec![
        (
            "200 OK",
            r#"{"id":"q7","nextUri":"{base}/v1/statement/q7/1","stats":{"state":"QUEUED"}}"#.to_string(),
        ),
        (
            "200 OK",
            r#"{"id":"q7","columns":[{"name":"n","type":"integer"}],"data":[[1],[2]],"stats":{"state":"FINISHED"}}"#
                .to_string(),
        ),
    ])
    .await;

    let client = EngineLinkClient::builder()
        .endpoint(format!("{}/v1/statement", base))
        .catalog("tpch")
        .schema("tiny")
        .user("bob")
        .poll_interval(Duration::from_millis(5))
        .transport(Arc::new(direct_transport()))
        .build()
        .unwrap();

    let mut session = client.session();
    session.execute("SELECT n FROM t").await.unwrap();
    assert_eq!(session.state(), ExecutionState::Finished);
    assert_eq!(session.get_data().map(|rows| rows.len()), Some(2));

    let captured = server.await.unwrap();
    assert_eq!(captured.len(), 2);
    assert_eq!(captured[0].body, "SELECT n FROM t");
    assert_eq!(captured[0].header("x-engine-schema"), Some("tiny"));
    assert_eq!(captured[1].request_line, "GET /v1/statement/q7/1 HTTP/1.1");
    assert_eq!(captured[1].header("x-engine-user"), Some("bob"));
}
