//! Transport abstraction layer for collab.
//!
//! Provides the [`HttpTransport`] trait: one POST of a body to a path,
//! optionally carrying a bearer credential, yielding a status and a body.
//! The gateway above decides what statuses mean.
//!
//! # Feature Flags
//!
//! - `reqwest` (default): HTTPS transport via `reqwest`
//! - `mock`: [`MockTransport`], a scripted in-memory transport for tests

mod error;
#[cfg(feature = "mock")]
mod mock;
#[cfg(feature = "reqwest")]
mod reqwest_transport;

pub use error::{BoxError, TransportError};
#[cfg(feature = "mock")]
pub use mock::{MockReply, MockTransport};
#[cfg(feature = "reqwest")]
pub use reqwest_transport::ReqwestTransport;

use std::fmt;
use std::future::Future;

/// Opaque identifier for one outbound request, used to correlate log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(u64);

impl RequestId {
    /// Creates a new `RequestId` from a raw `u64`.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the underlying `u64` value.
    pub fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "req-{}", self.0)
    }
}

/// One outbound POST.
#[derive(Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// Path relative to the transport's base URL, e.g. `/graphql`.
    pub path: String,
    /// Bearer credential for the `Authorization` header. `None` means the
    /// header is not sent at all.
    pub bearer: Option<String>,
    /// JSON body.
    pub body: Vec<u8>,
}

impl fmt::Debug for HttpRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpRequest")
            .field("path", &self.path)
            .field("bearer", &self.bearer.as_ref().map(|_| "<redacted>"))
            .field("body_len", &self.body.len())
            .finish()
    }
}

/// Whatever the service answered, success or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// `true` for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends requests to the remote service.
///
/// The returned future must be `Send`: the session layer spawns
/// fire-and-forget requests onto the Tokio runtime.
pub trait HttpTransport: Send + Sync + 'static {
    /// Sends `request` and returns the response, whatever its status.
    ///
    /// # Errors
    /// Returns a [`TransportError`] only when no HTTP status was obtained.
    fn post(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_id_new_and_into_inner() {
        let id = RequestId::new(42);
        assert_eq!(id.into_inner(), 42);
    }

    #[test]
    fn test_request_id_display() {
        assert_eq!(RequestId::new(7).to_string(), "req-7");
    }

    #[test]
    fn test_http_request_debug_redacts_bearer() {
        let request = HttpRequest {
            path: "/graphql".into(),
            bearer: Some("secret-token".into()),
            body: b"{}".to_vec(),
        };
        let printed = format!("{request:?}");
        assert!(!printed.contains("secret-token"));
        assert!(printed.contains("<redacted>"));
    }

    #[test]
    fn test_http_response_is_success_range() {
        let ok = HttpResponse { status: 204, body: vec![] };
        let unauthorized = HttpResponse { status: 401, body: vec![] };
        assert!(ok.is_success());
        assert!(!unauthorized.is_success());
    }
}
