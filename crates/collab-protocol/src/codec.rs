//! Codec trait and implementations for request and response bodies.
//!
//! The gateway never calls `serde_json` directly for bodies. It goes through
//! a [`Codec`], so the body format can be swapped without touching the
//! classification logic.

use serde::{Serialize, de::DeserializeOwned};

use crate::ProtocolError;

/// Encodes outbound payloads to bytes and decodes response bodies.
///
/// `Send + Sync + 'static` because the gateway that owns the codec is
/// shared across tasks.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if the value can't be represented.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes into a value.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` if the bytes are malformed or don't
    /// match `T`.
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] backed by `serde_json`. The remote service only speaks JSON.
///
/// ## Example
///
/// ```rust
/// use collab_protocol::{Codec, JsonCodec, Operation, catalog};
///
/// let codec = JsonCodec;
/// let op: Operation = catalog::me().operation;
///
/// let bytes = codec.encode(&op).unwrap();
/// let decoded: Operation = codec.decode(&bytes).unwrap();
/// assert_eq!(op, decoded);
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}
