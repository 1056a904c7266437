//! Error types for the protocol layer.
//!
//! Every crate in the workspace has its own error enum. A `ProtocolError`
//! always means the bytes were wrong, never that the network was.

/// Errors raised while encoding or decoding wire payloads.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization of an outbound payload failed.
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// The response body was not valid for the expected shape:
    /// malformed JSON, missing required fields, wrong types.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// The payload decoded but violates the envelope contract, e.g. a
    /// successful envelope whose `data` lacks the requested field.
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}
