//! Authentication failure signalling.
//!
//! The gateway decides *that* a session is dead; it doesn't own the session
//! state. When a request comes back unauthenticated, the gateway clears the
//! credential and then tells every registered [`AuthFailureHook`]. The
//! session manager registers one and performs the state transition itself.

/// What the gateway hands to hooks when a request fails authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthFailure {
    /// The failure message as classified.
    pub message: String,

    /// Where the user should be sent: the anonymous entry point.
    pub redirect_to: String,
}

/// Receives authentication failure signals from the gateway.
///
/// Called synchronously on the task that made the failing request, after
/// the credential has been cleared. Keep it quick: set some state, send on
/// a channel. Don't block.
///
/// # Example
///
/// ```rust
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use collab_gateway::{AuthFailure, AuthFailureHook};
///
/// #[derive(Default)]
/// struct CountExpiries(AtomicUsize);
///
/// impl AuthFailureHook for CountExpiries {
///     fn on_auth_failure(&self, _failure: &AuthFailure) {
///         self.0.fetch_add(1, Ordering::Relaxed);
///     }
/// }
/// ```
pub trait AuthFailureHook: Send + Sync + 'static {
    fn on_auth_failure(&self, failure: &AuthFailure);
}
