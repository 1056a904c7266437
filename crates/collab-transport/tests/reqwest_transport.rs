//! Integration tests for the reqwest transport.
//!
//! These spin up a one-shot HTTP responder on a loopback port and point a
//! real `ReqwestTransport` at it, so the bytes that hit the wire are the
//! ones asserted on.

#[cfg(feature = "reqwest")]
mod reqwest_transport {
    use collab_transport::{HttpRequest, HttpTransport, ReqwestTransport, TransportError};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Accepts one connection, captures the raw request, and answers with
    /// `status` and `body`. Returns the base URL and a handle yielding the
    /// captured request text.
    async fn one_shot_server(
        status: u16,
        body: &'static str,
    ) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("should bind");
        let addr = listener.local_addr().expect("has addr");

        let handle = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.expect("should accept");
            let raw = read_request(&mut stream).await;

            let reply = format!(
                "HTTP/1.1 {status} Status\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(reply.as_bytes()).await.expect("should write");
            stream.shutdown().await.ok();
            raw
        });

        (format!("http://{addr}"), handle)
    }

    /// Reads until the headers are complete and `content-length` bytes of
    /// body have arrived.
    async fn read_request(stream: &mut tokio::net::TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = stream.read(&mut chunk).await.expect("should read");
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);

            let text = String::from_utf8_lossy(&buf).to_string();
            if let Some(header_end) = text.find("\r\n\r\n") {
                let content_length = text[..header_end]
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if buf.len() >= header_end + 4 + content_length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).to_string()
    }

    fn request(bearer: Option<&str>) -> HttpRequest {
        HttpRequest {
            path: "/graphql".into(),
            bearer: bearer.map(str::to_owned),
            body: br#"{"query":"query GetMe { me { id } }"}"#.to_vec(),
        }
    }

    #[tokio::test]
    async fn test_post_sends_bearer_and_body() {
        let (base, server) = one_shot_server(200, r#"{"data":{"me":null}}"#).await;
        let transport = ReqwestTransport::new(&base).expect("valid base");

        let response = transport.post(request(Some("T-123"))).await.expect("should post");
        let raw = server.await.expect("server task").to_ascii_lowercase();

        assert_eq!(response.status, 200);
        assert_eq!(response.body, br#"{"data":{"me":null}}"#);
        assert!(raw.starts_with("post /graphql http/1.1"), "got: {raw}");
        assert!(raw.contains("authorization: bearer t-123"));
        assert!(raw.contains("content-type: application/json"));
        assert!(raw.contains("query getme"));
    }

    #[tokio::test]
    async fn test_post_without_bearer_sends_no_authorization() {
        let (base, server) = one_shot_server(200, "{}").await;
        let transport = ReqwestTransport::new(&base).expect("valid base");

        transport.post(request(None)).await.expect("should post");
        let raw = server.await.expect("server task").to_ascii_lowercase();

        assert!(!raw.contains("authorization:"), "got: {raw}");
    }

    #[tokio::test]
    async fn test_post_returns_error_statuses_as_responses() {
        let (base, _server) = one_shot_server(401, r#"{"message":"Unauthorized"}"#).await;
        let transport = ReqwestTransport::new(&base).expect("valid base");

        let response = transport.post(request(Some("stale"))).await.expect("a status came back");

        assert_eq!(response.status, 401);
        assert!(!response.is_success());
    }

    #[tokio::test]
    async fn test_post_keeps_path_prefix_of_base() {
        let (base, server) = one_shot_server(200, "{}").await;
        let transport = ReqwestTransport::new(&format!("{base}/api")).expect("valid base");

        transport.post(request(None)).await.expect("should post");
        let raw = server.await.expect("server task").to_ascii_lowercase();

        assert!(raw.starts_with("post /api/graphql http/1.1"), "got: {raw}");
    }

    #[tokio::test]
    async fn test_post_to_closed_port_is_connect_error() {
        // Bind then drop to get a port nobody is listening on.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let transport = ReqwestTransport::new(&format!("http://{addr}")).expect("valid base");
        let result = transport.post(request(None)).await;

        assert!(
            matches!(result, Err(TransportError::Connect(_))),
            "expected Connect, got {result:?}"
        );
    }
}
