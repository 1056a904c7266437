//! Unified error type for the collab client.

use collab_gateway::{CredentialError, GatewayError};
use collab_protocol::ProtocolError;
use collab_session::SessionError;
use collab_transport::TransportError;

use crate::ConfigError;

/// Top-level error that wraps all crate-specific errors.
///
/// When using the `collab` meta-crate, you deal with this single error type
/// instead of importing errors from each sub-crate. The `#[from]` attribute
/// on each variant generates the `From` impl, so `?` converts sub-crate
/// errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum CollabError {
    /// A transport-level error (bad URL, unreachable host).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode, invalid message).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A classified remote call failure.
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// A session-level error (not signed in, forbidden, superseded).
    #[error(transparent)]
    Session(#[from] SessionError),

    /// The credential slot could not be opened or written.
    #[error(transparent)]
    Credential(#[from] CredentialError),

    /// Invalid configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl CollabError {
    /// `true` if sending the same request again might work.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Gateway(e) | Self::Session(SessionError::Gateway(e)) => e.is_retryable(),
            _ => false,
        }
    }
}
