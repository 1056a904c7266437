//! The request payload and response envelope of the submission endpoint.
//!
//! Every remote operation is one POST of an [`Operation`] to a single
//! endpoint. The service answers with a [`ResponseEnvelope`]: either a
//! `data` object holding the result under the operation's field name, or a
//! list of [`RemoteError`]s, or both.

use serde::{Deserialize, Serialize};

/// An operation payload: the query/mutation document plus its variables.
///
/// `variables` is omitted from the JSON when `None`, which is what the
/// service expects for parameterless queries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    /// The query or mutation document.
    pub query: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variables: Option<serde_json::Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_name: Option<String>,
}

impl Operation {
    /// Creates an operation without variables.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            variables: None,
            operation_name: None,
        }
    }

    /// Attaches variables to the operation.
    pub fn with_variables(mut self, variables: serde_json::Value) -> Self {
        self.variables = Some(variables);
        self
    }

    /// Sets the operation name sent alongside the document.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.operation_name = Some(name.into());
        self
    }

    /// A short label for logs: the operation name when set, otherwise the
    /// first word after `query`/`mutation` in the document.
    pub fn label(&self) -> &str {
        if let Some(name) = &self.operation_name {
            return name;
        }
        let mut words = self
            .query
            .split(|c: char| c.is_whitespace() || c == '(' || c == '{')
            .filter(|w| !w.is_empty());
        match words.next() {
            Some("query") | Some("mutation") => words.next().unwrap_or("anonymous"),
            _ => "anonymous",
        }
    }
}

// ---------------------------------------------------------------------------
// Errors reported inside an envelope
// ---------------------------------------------------------------------------

/// Structured metadata the service may attach to an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorExtensions {
    /// Machine-readable error code, e.g. `UNAUTHENTICATED`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// One logical error reported by the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteError {
    /// Human-readable message, surfaced to callers verbatim.
    pub message: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<ErrorExtensions>,
}

impl RemoteError {
    /// Creates an error with only a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            extensions: None,
        }
    }

    /// The structured error code, if the service sent one.
    pub fn code(&self) -> Option<&str> {
        self.extensions.as_ref()?.code.as_deref()
    }
}

// ---------------------------------------------------------------------------
// ResponseEnvelope
// ---------------------------------------------------------------------------

/// The response shape of the submission endpoint.
///
/// ```text
/// { "data": { "<field>": ... }, "errors": [ { "message": "..." } ] }
/// ```
///
/// Both members are optional on the wire. An envelope with a non-empty
/// `errors` list is a logical failure even when `data` is also present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: serde::de::DeserializeOwned"))]
pub struct ResponseEnvelope<T> {
    #[serde(default)]
    pub data: Option<T>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<RemoteError>>,
}

impl<T> ResponseEnvelope<T> {
    /// Returns the first reported error, if any.
    pub fn first_error(&self) -> Option<&RemoteError> {
        self.errors.as_ref()?.first()
    }
}

#[cfg(feature = "json")]
impl ResponseEnvelope<serde_json::Value> {
    /// Pulls `data.<field>` out of the envelope and deserializes it.
    ///
    /// A `null` field deserializes as `T` would from `null`, so
    /// `Option<T>` and `Vec<T>` callers see `None`/error respectively and
    /// decide for themselves.
    ///
    /// # Errors
    /// - `ProtocolError::InvalidMessage` if `data` or the field is missing.
    /// - `ProtocolError::Decode` if the field has the wrong shape.
    pub fn take_field<T: serde::de::DeserializeOwned>(
        self,
        field: &str,
    ) -> Result<T, crate::ProtocolError> {
        let mut data = self.data.ok_or_else(|| {
            crate::ProtocolError::InvalidMessage("response carried no data".into())
        })?;
        let value = data
            .get_mut(field)
            .map(serde_json::Value::take)
            .ok_or_else(|| {
                crate::ProtocolError::InvalidMessage(format!(
                    "response data has no `{field}` field"
                ))
            })?;
        serde_json::from_value(value).map_err(crate::ProtocolError::Decode)
    }
}
