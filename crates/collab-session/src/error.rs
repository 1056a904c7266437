//! Error types for the session layer.

use collab_gateway::{CredentialError, GatewayError};

/// Errors that can occur during session management.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The operation needs a signed-in user and there isn't one.
    #[error("not signed in")]
    NotAuthenticated,

    /// Signed in, but without the `ADMIN` status.
    #[error("admin access required")]
    Forbidden,

    /// A logout, a teardown, or another login finished while this login
    /// was in flight. The grant was discarded.
    #[error("session changed while signing in")]
    Superseded,

    /// The remote call failed. Carries the gateway's classification
    /// untouched, so a rejected password shows the service's message.
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// The credential could not be stored.
    #[error(transparent)]
    Credential(#[from] CredentialError),
}
