//! End-to-end tests: a real `CollabClient` over HTTP against a scripted
//! loopback service.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use collab::prelude::*;
use serde_json::{Value, json};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

// =========================================================================
// Loopback service
// =========================================================================

/// One request as the service saw it.
#[derive(Debug, Clone)]
struct Seen {
    path: String,
    authorization: Option<String>,
    body: Value,
}

/// Picks a reply for a request. Returning `None` means never answer.
type Router = Arc<dyn Fn(&Seen) -> Option<(u16, Value)> + Send + Sync>;

/// Serves every connection on a loopback port with `router`. Returns the
/// base URL and a log of requests.
async fn serve(router: Router) -> (String, Arc<Mutex<Vec<Seen>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("should bind");
    let addr = listener.local_addr().expect("has addr");
    let log = Arc::new(Mutex::new(Vec::new()));

    let log_for_server = Arc::clone(&log);
    tokio::spawn(async move {
        loop {
            let Ok((stream, _)) = listener.accept().await else {
                break;
            };
            let router = Arc::clone(&router);
            let log = Arc::clone(&log_for_server);
            tokio::spawn(async move { answer(stream, router, log).await });
        }
    });

    (format!("http://{addr}"), log)
}

async fn answer(mut stream: TcpStream, router: Router, log: Arc<Mutex<Vec<Seen>>>) {
    let raw = read_request(&mut stream).await;
    let (head, body) = raw.split_once("\r\n\r\n").unwrap_or((raw.as_str(), ""));
    let path = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/")
        .to_string();
    let authorization = head.lines().find_map(|line| {
        let (name, value) = line.split_once(':')?;
        name.eq_ignore_ascii_case("authorization")
            .then(|| value.trim().to_string())
    });
    let seen = Seen {
        path,
        authorization,
        body: serde_json::from_str(body).unwrap_or(Value::Null),
    };
    log.lock().unwrap().push(seen.clone());

    let Some((status, reply)) = router(&seen) else {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        return;
    };
    let reply = reply.to_string();
    let response = format!(
        "HTTP/1.1 {status} Status\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{reply}",
        reply.len()
    );
    stream.write_all(response.as_bytes()).await.ok();
    stream.shutdown().await.ok();
}

async fn read_request(stream: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 2048];
    loop {
        let Ok(n) = stream.read(&mut chunk).await else {
            break;
        };
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        let text = String::from_utf8_lossy(&buf).to_string();
        if let Some(end) = text.find("\r\n\r\n") {
            let length = text[..end]
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if buf.len() >= end + 4 + length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).to_string()
}

/// A service that knows one account and a couple of workspaces.
fn collab_service(valid_token: &'static str) -> Router {
    let user = json!({ "id": "u1", "email": "ada@example.com", "globalStatus": "ADMIN" });
    Arc::new(move |seen: &Seen| {
        let expected = format!("Bearer {valid_token}");
        let authorized = seen.authorization.as_deref() == Some(expected.as_str());
        let query = seen.body["query"].as_str().unwrap_or_default();
        match seen.path.as_str() {
            "/api/auth/logout" => Some((200, json!({ "message": "Logged out" }))),
            "/graphql" if query.contains("login(") => {
                if seen.body["variables"]["input"]["password"] == "pw" {
                    Some((200, json!({ "data": { "login": { "accessToken": valid_token, "user": user.clone() } } })))
                } else {
                    Some((200, json!({ "data": null, "errors": [{ "message": "Invalid email or password" }] })))
                }
            }
            "/graphql" if !authorized => Some((401, json!({ "message": "Invalid or expired token" }))),
            "/graphql" if query.contains("me {") => Some((200, json!({ "data": { "me": user.clone() } }))),
            "/graphql" if query.contains("myWorkspaces") => Some((
                200,
                json!({ "data": { "myWorkspaces": [{
                    "id": "w1",
                    "name": "Platform",
                    "description": "Core team",
                    "createdAt": "2024-03-01T09:00:00.000Z",
                    "createdBy": { "id": "u1", "email": "ada@example.com" },
                    "members": []
                }] } }),
            )),
            "/graphql" if query.contains("summarizeTask") => None,
            _ => Some((404, json!({ "message": "not found" }))),
        }
    })
}

fn client(base: &str, credential_file: &std::path::Path) -> CollabClient {
    CollabClient::builder()
        .base_url(base)
        .request_timeout(Duration::from_millis(500))
        .credential_file(credential_file)
        .build()
        .expect("client should build")
}

// =========================================================================
// Tests
// =========================================================================

#[tokio::test]
async fn test_login_persists_and_restores_session() {
    let (base, log) = serve(collab_service("T-1")).await;
    let dir = tempfile::tempdir().unwrap();
    let token_file = dir.path().join("token");

    let first = client(&base, &token_file);
    assert_eq!(first.session().check_session().await, SessionState::Anonymous);
    first.session().login("ada@example.com", "pw").await.expect("login");
    assert_eq!(std::fs::read_to_string(&token_file).unwrap(), "T-1");
    drop(first);

    // A fresh client picks the credential back up.
    let second = client(&base, &token_file);
    let state = second.session().check_session().await;

    assert_eq!(state.identity().map(|u| u.email.as_str()), Some("ada@example.com"));
    let seen = log.lock().unwrap().clone();
    let me = seen.iter().find(|s| s.body["query"].as_str().unwrap_or_default().contains("me {")).unwrap();
    assert_eq!(me.authorization.as_deref(), Some("Bearer T-1"));
}

#[tokio::test]
async fn test_wrong_password_surfaces_service_message() {
    let (base, _log) = serve(collab_service("T-1")).await;
    let dir = tempfile::tempdir().unwrap();
    let client = client(&base, &dir.path().join("token"));
    client.session().check_session().await;

    let err = client.session().login("ada@example.com", "nope").await.unwrap_err();

    assert_eq!(err.to_string(), "Invalid email or password");
    assert_eq!(client.session().state(), SessionState::Anonymous);
}

#[tokio::test]
async fn test_revoked_credential_tears_down_and_deletes_file() {
    let (base, _log) = serve(collab_service("T-new")).await;
    let dir = tempfile::tempdir().unwrap();
    let token_file = dir.path().join("token");
    std::fs::write(&token_file, "T-old").unwrap();
    let client = client(&base, &token_file);

    let state = client.session().check_session().await;

    assert_eq!(state, SessionState::Anonymous);
    assert!(!token_file.exists());
}

#[tokio::test]
async fn test_workspaces_and_logout() {
    let (base, log) = serve(collab_service("T-1")).await;
    let dir = tempfile::tempdir().unwrap();
    let client = client(&base, &dir.path().join("token"));
    client.session().login("ada@example.com", "pw").await.unwrap();
    let mut events = client.session().events();

    let workspaces = client.gateway().my_workspaces().await;
    assert_eq!(workspaces[0].name, "Platform");

    let notification = client.session().logout().unwrap();
    assert_eq!(events.recv().await.unwrap(), SessionEvent::SignedOut);
    notification.await.unwrap();

    let seen = log.lock().unwrap().clone();
    let logout = seen.iter().find(|s| s.path == "/api/auth/logout").unwrap();
    assert_eq!(logout.authorization.as_deref(), Some("Bearer T-1"));
    assert!(client.gateway().credentials().get().is_none());
}

#[tokio::test]
async fn test_unresponsive_summarizer_falls_back() {
    let (base, _log) = serve(collab_service("T-1")).await;
    let dir = tempfile::tempdir().unwrap();
    let client = client(&base, &dir.path().join("token"));
    client.session().login("ada@example.com", "pw").await.unwrap();

    let description = "Migrate the billing service to the new queue. ".repeat(5);
    let summary = client.gateway().summarize_task(&description).await.unwrap();

    assert_eq!(summary.source, SummarySource::Fallback);
    assert!(summary.text.ends_with("..."));
    assert!(client.session().is_authenticated(), "a timeout is not a logout");
}
