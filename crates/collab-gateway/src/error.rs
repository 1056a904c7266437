//! Error types for the gateway layer.

use std::fmt;
use std::time::Duration;

use collab_protocol::ProtocolError;
use collab_transport::TransportError;

use crate::CredentialError;

/// A classified request failure.
///
/// Every failed remote call lands in exactly one of these. The first five
/// variants are the classification proper, listed in precedence order: if a
/// response matches more than one, the earlier variant wins.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The bounded wait elapsed before a response arrived. Safe to retry.
    #[error("request timed out after {}s", .0.as_secs_f32())]
    Timeout(Duration),

    /// The service rejected the credential. Unless the request opted out of
    /// teardown, the credential is already cleared and the session torn
    /// down by the time the caller sees this. Displays the service's message
    /// verbatim.
    #[error("{message}")]
    Unauthenticated { message: String },

    /// The service failed internally (HTTP 5xx). Safe to retry.
    #[error("server error (HTTP {status}): {message}")]
    Server { status: u16, message: String },

    /// The call completed but the service reported a logical failure.
    /// Displays the service's message verbatim.
    #[error("{0}")]
    Application(String),

    /// The service could not be reached. Safe to retry.
    #[error("network failure: {0}")]
    Network(#[source] TransportError),

    /// A success status with a body that doesn't decode.
    #[error("malformed response: {0}")]
    Protocol(#[from] ProtocolError),

    /// Rejected locally before any request was made.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The credential slot could not be written.
    #[error(transparent)]
    Credential(#[from] CredentialError),
}

/// The coarse classification of a [`GatewayError`], for logs and metrics
/// labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    Timeout,
    Unauthenticated,
    Server,
    Application,
    Network,
    Protocol,
    InvalidInput,
    Credential,
}

impl FailureKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::Unauthenticated => "unauthenticated",
            Self::Server => "server",
            Self::Application => "application",
            Self::Network => "network",
            Self::Protocol => "protocol",
            Self::InvalidInput => "invalid_input",
            Self::Credential => "credential",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl GatewayError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Timeout(_) => FailureKind::Timeout,
            Self::Unauthenticated { .. } => FailureKind::Unauthenticated,
            Self::Server { .. } => FailureKind::Server,
            Self::Application(_) => FailureKind::Application,
            Self::Network(_) => FailureKind::Network,
            Self::Protocol(_) => FailureKind::Protocol,
            Self::InvalidInput(_) => FailureKind::InvalidInput,
            Self::Credential(_) => FailureKind::Credential,
        }
    }

    /// `true` for failures where the same request might succeed if sent
    /// again: timeouts, server errors, and network failures. The gateway
    /// never retries on its own.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Timeout(_) | Self::Server { .. } | Self::Network(_)
        )
    }

    /// `true` when the request never produced a usable answer from the
    /// service. Drives the login fallback.
    pub(crate) fn is_incomplete(&self) -> bool {
        self.is_retryable()
    }

    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, Self::Unauthenticated { .. })
    }
}
