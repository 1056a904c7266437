//! Turning a raw HTTP response into a result or a classified failure.
//!
//! Timeouts and transport failures are decided before a response exists,
//! so this module only sees responses. Precedence among the rest:
//!
//! ```text
//! 401, or envelope error that is an auth failure  → Unauthenticated
//! 5xx                                             → Server
//! envelope error                                  → Application (message verbatim)
//! other non-2xx                                   → Application ("HTTP <status>")
//! 2xx, body doesn't decode                        → Protocol
//! 2xx                                             → Ok(body)
//! ```

use collab_protocol::{Codec, JsonCodec, RemoteError, ResponseEnvelope};
use collab_transport::HttpResponse;
use serde_json::Value;

use crate::GatewayError;

/// Structured error codes that mean "your credential is no good".
const UNAUTHENTICATED_CODES: &[&str] = &["UNAUTHENTICATED"];

/// Classifies `response`. On success returns the decoded body; an empty
/// 2xx body decodes as `null`.
pub(crate) fn classify(response: HttpResponse, codec: &JsonCodec) -> Result<Value, GatewayError> {
    let status = response.status;
    let body: Option<Value> = if response.body.is_empty() {
        None
    } else {
        codec.decode(&response.body).ok()
    };
    let remote = body.as_ref().and_then(first_remote_error);

    if status == 401 {
        let message = remote
            .map(|e| e.message)
            .or_else(|| body.as_ref().and_then(plain_message))
            .unwrap_or_else(|| "HTTP 401".to_string());
        return Err(GatewayError::Unauthenticated { message });
    }
    if let Some(err) = remote.as_ref().filter(|e| is_auth_failure(e)) {
        return Err(GatewayError::Unauthenticated {
            message: err.message.clone(),
        });
    }
    if (500..600).contains(&status) {
        let message = remote
            .map(|e| e.message)
            .or_else(|| body.as_ref().and_then(plain_message))
            .unwrap_or_else(|| format!("HTTP {status}"));
        return Err(GatewayError::Server { status, message });
    }
    if let Some(err) = remote {
        return Err(GatewayError::Application(err.message));
    }
    if !response.is_success() {
        let message = body
            .as_ref()
            .and_then(plain_message)
            .unwrap_or_else(|| format!("HTTP {status}"));
        return Err(GatewayError::Application(message));
    }

    match body {
        Some(value) => Ok(value),
        None if response.body.is_empty() => Ok(Value::Null),
        // Re-decode to surface the real parse error.
        None => codec
            .decode::<Value>(&response.body)
            .map_err(GatewayError::Protocol),
    }
}

/// The first entry of an `errors` array, if the body is envelope-shaped.
fn first_remote_error(body: &Value) -> Option<RemoteError> {
    let envelope: ResponseEnvelope<Value> = serde_json::from_value(body.clone()).ok()?;
    envelope.first_error().cloned()
}

/// `{"message": "..."}` or `{"error": "..."}`, the shapes the REST
/// endpoints use.
fn plain_message(body: &Value) -> Option<String> {
    ["message", "error"]
        .iter()
        .find_map(|key| body.get(key)?.as_str())
        .map(str::to_owned)
}

/// Decides whether an envelope error is an authentication failure.
///
/// A structured code is authoritative when present. Without one, fall back
/// to [`legacy::mentions_credential`].
pub(crate) fn is_auth_failure(err: &RemoteError) -> bool {
    match err.code() {
        Some(code) => UNAUTHENTICATED_CODES.contains(&code),
        None => legacy::mentions_credential(&err.message),
    }
}

mod legacy {
    /// Older service builds report auth failures with no code, only a
    /// message such as "Invalid token" or "Not authenticated". This match
    /// also catches "Not authorized", which is a permissions error. Remove
    /// once every deployment sends `extensions.code`.
    pub(super) fn mentions_credential(message: &str) -> bool {
        let lower = message.to_lowercase();
        lower.contains("token") || lower.contains("auth")
    }
}
