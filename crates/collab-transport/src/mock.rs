//! Scripted in-memory transport for tests.
//!
//! Replies are queued per path. Each request pops the next reply for its
//! path; the last queued reply is sticky and answers every later request.
//! A path with nothing queued answers `404` so a missing script shows up as
//! a failure instead of a hang.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::{HttpRequest, HttpResponse, HttpTransport, TransportError};

/// What the mock does with a request.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Answer with this status and body.
    Respond { status: u16, body: Vec<u8> },
    /// Answer after a delay.
    Delayed(Duration, Box<MockReply>),
    /// Never answer.
    Hang,
    /// Fail as if the host were unreachable.
    Refuse,
}

impl MockReply {
    /// A JSON body with the given status.
    pub fn json(status: u16, body: serde_json::Value) -> Self {
        Self::Respond {
            status,
            body: body.to_string().into_bytes(),
        }
    }

    /// `200` with `{"data": {field: value}}`.
    pub fn data(field: &str, value: serde_json::Value) -> Self {
        Self::json(200, serde_json::json!({ "data": { field: value } }))
    }

    /// `200` with `{"data": null, "errors": [{"message": ...}]}`.
    pub fn remote_error(message: &str) -> Self {
        Self::json(
            200,
            serde_json::json!({ "data": null, "errors": [{ "message": message }] }),
        )
    }

    /// An empty body with the given status.
    pub fn status(status: u16) -> Self {
        Self::Respond {
            status,
            body: Vec::new(),
        }
    }
}

#[derive(Default)]
struct MockState {
    replies: HashMap<String, VecDeque<MockReply>>,
    seen: Vec<HttpRequest>,
}

/// A scripted [`HttpTransport`]. Clones share the same script and history.
#[derive(Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `reply` for requests to `path`.
    pub fn on(&self, path: &str, reply: MockReply) -> &Self {
        self.state
            .lock()
            .replies
            .entry(path.to_owned())
            .or_default()
            .push_back(reply);
        self
    }

    /// Drops whatever is still queued for `path`.
    pub fn reset(&self, path: &str) -> &Self {
        self.state.lock().replies.remove(path);
        self
    }

    /// Every request seen so far, in order.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.state.lock().seen.clone()
    }

    /// Requests seen for one path.
    pub fn requests_to(&self, path: &str) -> Vec<HttpRequest> {
        self.state
            .lock()
            .seen
            .iter()
            .filter(|r| r.path == path)
            .cloned()
            .collect()
    }

    /// Number of requests seen so far.
    pub fn request_count(&self) -> usize {
        self.state.lock().seen.len()
    }

    fn next_reply(&self, request: &HttpRequest) -> MockReply {
        let mut state = self.state.lock();
        state.seen.push(request.clone());
        match state.replies.get_mut(&request.path) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap_or(MockReply::Hang),
            Some(queue) => queue.front().cloned().unwrap_or(MockReply::Hang),
            None => MockReply::json(
                404,
                serde_json::json!({ "message": format!("no mock reply for {}", request.path) }),
            ),
        }
    }
}

impl HttpTransport for MockTransport {
    async fn post(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut reply = self.next_reply(&request);
        loop {
            match reply {
                MockReply::Respond { status, body } => {
                    return Ok(HttpResponse { status, body });
                }
                MockReply::Delayed(delay, inner) => {
                    tokio::time::sleep(delay).await;
                    reply = *inner;
                }
                MockReply::Hang => return std::future::pending().await,
                MockReply::Refuse => {
                    return Err(TransportError::Connect(
                        std::io::Error::new(
                            std::io::ErrorKind::ConnectionRefused,
                            "mock: connection refused",
                        )
                        .into(),
                    ));
                }
            }
        }
    }
}
