// Connection handling module
// Serves exactly one request per accepted TCP connection

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

use crate::config::AppState;
use crate::handler;
use crate::http::{write_response, Request, RequestLine};
use crate::logger::{self, AccessLogEntry};

/// Log and spawn a task that serves one connection
pub fn accept_connection(stream: TcpStream, peer_addr: SocketAddr, state: &Arc<AppState>) {
    logger::log_connection_accepted(&peer_addr);

    let state = Arc::clone(state);
    tokio::spawn(async move {
        if let Err(err) = serve_connection(stream, Some(peer_addr), &state).await {
            logger::log_connection_error(&err);
        }
    });
}

/// Read one request, dispatch it, write one response, close
///
/// A connection that sends nothing, or a blank first line, is dropped
/// without a response. Header lines are read and discarded. The stream is
/// closed on every return path.
pub async fn serve_connection<S>(
    stream: S,
    peer_addr: Option<SocketAddr>,
    state: &AppState,
) -> io::Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let started = Instant::now();
    let mut reader = BufReader::new(stream);

    let Some(first_line) = read_line(&mut reader).await? else {
        return Ok(());
    };
    let Some(request_line) = RequestLine::parse(&first_line) else {
        return Ok(());
    };

    consume_headers(&mut reader).await?;

    let response = match Request::from_line(&request_line) {
        Ok(req) => handler::handle_request(&req, state).await,
        Err(err) => {
            logger::log_debug(&format!("Rejecting request: {err}"));
            err.into_response()
        }
    };

    let stream = reader.get_mut();
    write_response(stream, request_line.response_version(), &response).await?;
    if let Err(err) = stream.shutdown().await {
        logger::log_debug(&format!("Shutdown after response failed: {err}"));
    }

    if state.access_log {
        let entry = AccessLogEntry::record(peer_addr, &request_line, &response, started.elapsed());
        logger::log_access(&entry, &state.access_log_format);
    }
    Ok(())
}

/// Next line as text, or `None` at end of stream
async fn read_line<R>(reader: &mut R) -> io::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();
    if reader.read_until(b'\n', &mut buf).await? == 0 {
        return Ok(None);
    }
    Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
}

/// Read header lines up to the blank separator line (or end of stream)
async fn consume_headers<R>(reader: &mut R) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    while let Some(line) = read_line(reader).await? {
        if line.trim_end_matches(['\r', '\n']).is_empty() {
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::StaticResolver;
    use crate::routing::RouteRegistry;
    use tempfile::TempDir;
    use tokio::io::{duplex, AsyncReadExt};

    struct Fixture {
        _dir: TempDir,
        state: AppState,
    }

    fn fixture() -> Fixture {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("index.html"), "<h1>HTTP Server Demo</h1>").unwrap();

        let mut routes = RouteRegistry::new();
        routes.register("/app/test", |_| Ok(r#"{"ok":true}"#.to_string()));
        routes.register("/app/hello", |req| {
            Ok(serde_json::json!({ "message": format!("Hello {}", req.value("name")) }).to_string())
        });
        routes.register("/app/fail", |_| Err("service exploded".into()));

        let mut state = AppState::new(routes, StaticResolver::new(dir.path()));
        state.access_log = false;
        Fixture { _dir: dir, state }
    }

    /// Send raw bytes, half-close, and collect everything the server writes
    async fn exchange(state: &AppState, raw: &[u8]) -> Vec<u8> {
        let (mut client, server) = duplex(64 * 1024);
        client.write_all(raw).await.unwrap();
        client.shutdown().await.unwrap();

        serve_connection(server, None, state).await.unwrap();

        let mut out = Vec::new();
        client.read_to_end(&mut out).await.unwrap();
        out
    }

    fn split_response(raw: &[u8]) -> (String, Vec<u8>) {
        let split = raw.windows(4).position(|w| w == b"\r\n\r\n").unwrap() + 4;
        (
            String::from_utf8(raw[..split].to_vec()).unwrap(),
            raw[split..].to_vec(),
        )
    }

    fn content_length(head: &str) -> usize {
        head.lines()
            .find_map(|l| l.strip_prefix("Content-Length: "))
            .unwrap()
            .trim()
            .parse()
            .unwrap()
    }

    #[tokio::test]
    async fn test_registered_route() {
        let fx = fixture();
        let raw = exchange(
            &fx.state,
            b"GET /app/test?x=1 HTTP/1.1\r\nHost: localhost\r\nAccept: */*\r\n\r\n",
        )
        .await;
        let (head, body) = split_response(&raw);

        assert!(head.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(head.contains("Content-Type: application/json"));
        assert!(head.contains("Connection: close\r\n"));
        assert_eq!(body, br#"{"ok":true}"#);
        assert_eq!(content_length(&head), body.len());
    }

    #[tokio::test]
    async fn test_query_reaches_handler() {
        let fx = fixture();
        let raw = exchange(
            &fx.state,
            b"GET /app/hello?name=Ana%20Mar%C3%ADa HTTP/1.1\r\n\r\n",
        )
        .await;
        let (head, body) = split_response(&raw);

        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["message"], "Hello Ana María");
        assert_eq!(content_length(&head), body.len());
    }

    #[tokio::test]
    async fn test_static_index() {
        let fx = fixture();
        let raw = exchange(&fx.state, b"GET / HTTP/1.1\r\n\r\n").await;
        let (head, body) = split_response(&raw);

        assert!(head.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(head.contains("Content-Type: text/html"));
        assert!(String::from_utf8(body).unwrap().to_lowercase().contains("http server demo"));
    }

    #[tokio::test]
    async fn test_not_found() {
        let fx = fixture();
        let raw = exchange(&fx.state, b"GET /nothing/here HTTP/1.1\r\n\r\n").await;
        let (head, body) = split_response(&raw);

        assert!(head.starts_with("HTTP/1.1 404 Not Found\r\n"));
        assert_eq!(body, b"Not Found: /nothing/here");
        assert_eq!(content_length(&head), body.len());
    }

    #[tokio::test]
    async fn test_handler_failure() {
        let fx = fixture();
        let raw = exchange(&fx.state, b"GET /app/fail HTTP/1.1\r\n\r\n").await;
        let (head, body) = split_response(&raw);

        assert!(head.starts_with("HTTP/1.1 500 Internal Server Error\r\n"));
        assert!(String::from_utf8(body.clone()).unwrap().contains("service exploded"));
        assert_eq!(content_length(&head), body.len());
    }

    #[tokio::test]
    async fn test_malformed_target() {
        let fx = fixture();
        let raw = exchange(&fx.state, b"GET /a\x7fb HTTP/1.1\r\n\r\n").await;
        let (head, body) = split_response(&raw);

        assert!(head.starts_with("HTTP/1.1 400 Bad Request\r\n"));
        assert_eq!(body, b"Bad Request");
    }

    #[tokio::test]
    async fn test_invalid_uri_syntax_is_bad_request() {
        let fx = fixture();
        for target in ["/%zz", "/app/hello?name=%zz", "/a^b", "/a{b}", "/a|b", "/a\"b"] {
            let raw = format!("GET {target} HTTP/1.1\r\n\r\n");
            let raw = exchange(&fx.state, raw.as_bytes()).await;
            let (head, body) = split_response(&raw);

            assert!(head.starts_with("HTTP/1.1 400 Bad Request\r\n"), "{target}: {head}");
            assert_eq!(body, b"Bad Request", "{target}");
        }
    }

    #[tokio::test]
    async fn test_traversal_request() {
        let fx = fixture();
        let raw = exchange(&fx.state, b"GET /../secret HTTP/1.1\r\n\r\n").await;
        let (head, body) = split_response(&raw);

        assert!(head.starts_with("HTTP/1.1 404 Not Found\r\n"));
        assert_eq!(body, b"Not Found: /secret");
    }

    #[tokio::test]
    async fn test_empty_connection_gets_no_response() {
        let fx = fixture();
        assert!(exchange(&fx.state, b"").await.is_empty());
        assert!(exchange(&fx.state, b"\r\n").await.is_empty());
    }

    #[tokio::test]
    async fn test_short_request_line_defaults() {
        let fx = fixture();
        // No target, no version: treated as GET / HTTP/1.1
        let raw = exchange(&fx.state, b"GET\r\n\r\n").await;
        let (head, _) = split_response(&raw);
        assert!(head.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(head.contains("Content-Type: text/html"));
    }

    #[tokio::test]
    async fn test_echoes_http_10() {
        let fx = fixture();
        let raw = exchange(&fx.state, b"GET /app/test HTTP/1.0\r\n\r\n").await;
        assert!(raw.starts_with(b"HTTP/1.0 200 OK\r\n"));
    }

    #[tokio::test]
    async fn test_post_skips_routes() {
        let fx = fixture();
        let raw = exchange(&fx.state, b"POST /app/test HTTP/1.1\r\nContent-Length: 0\r\n\r\n").await;
        assert!(raw.starts_with(b"HTTP/1.1 404 Not Found\r\n"));
    }

    #[tokio::test]
    async fn test_headers_without_terminator() {
        let fx = fixture();
        // Client half-closes before the blank line
        let raw = exchange(&fx.state, b"GET /app/test HTTP/1.1\r\nHost: x\r\n").await;
        assert!(raw.starts_with(b"HTTP/1.1 200 OK\r\n"));
    }
}
