//! The session manager: the only writer of session state.
//!
//! State lives in a `watch` channel so any number of readers can take a
//! snapshot or wait for a change without locking. Transitions are also
//! published on a `broadcast` channel as [`SessionEvent`]s.
//!
//! # Concurrency note
//!
//! `login` and `check_session` await the network; `logout` doesn't. A
//! logout that lands while a login is in flight must win, or the user
//! would be signed back in after clicking "log out". The same holds for a
//! teardown triggered by another request's 401. Every commit of a remote
//! result therefore goes through `epoch`: logout, teardown, and successful
//! login bump it, and an in-flight operation that finds it changed drops
//! its result.

use std::sync::Arc;

use collab_gateway::{AuthFailure, AuthFailureHook, Credential, CredentialStore, GatewayClient};
use collab_protocol::User;
use collab_transport::HttpTransport;
use parking_lot::Mutex;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;

use crate::{SessionError, SessionEvent, SessionState};

/// Events buffered per subscriber before the slowest one starts lagging.
const EVENT_CAPACITY: usize = 32;

/// State shared between the manager and the hook it registers with the
/// gateway.
struct Shared {
    state: watch::Sender<SessionState>,
    events: broadcast::Sender<SessionEvent>,
    /// Bumped by every transition that invalidates in-flight results.
    epoch: Mutex<u64>,
}

impl Shared {
    /// Replaces the state and returns the previous one.
    fn replace(&self, next: SessionState) -> SessionState {
        self.state.send_replace(next)
    }

    fn emit(&self, event: SessionEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }

    /// Drops to `Anonymous`, announcing an expiry if someone was signed in.
    fn expire(&self, redirect_to: &str) {
        let mut epoch = self.epoch.lock();
        self.expire_locked(&mut epoch, redirect_to);
    }

    /// [`expire`](Self::expire) for callers already holding the epoch.
    fn expire_locked(&self, epoch: &mut u64, redirect_to: &str) {
        *epoch += 1;
        let previous = self.replace(SessionState::Anonymous);
        if let SessionState::Authenticated(user) = previous {
            tracing::info!(user = %user.id, redirect_to, "session expired");
            self.emit(SessionEvent::Expired {
                redirect_to: redirect_to.to_owned(),
            });
        }
    }
}

impl AuthFailureHook for Shared {
    fn on_auth_failure(&self, failure: &AuthFailure) {
        self.expire(&failure.redirect_to);
    }
}

/// Owns the session lifecycle on top of a [`GatewayClient`].
///
/// ## Lifecycle
///
/// ```text
/// new() ──→ [Unknown] ──check_session()──→ [Anonymous] or [Authenticated]
///
/// [Anonymous] ──login()──→ [Authenticated] ──logout()──→ [Anonymous]
///                                │
///                                └──any request 401s──→ [Anonymous] + Expired
/// ```
pub struct SessionManager<T: HttpTransport, S: CredentialStore> {
    gateway: Arc<GatewayClient<T, S>>,
    shared: Arc<Shared>,
}

impl<T: HttpTransport, S: CredentialStore> SessionManager<T, S> {
    /// Creates a manager in the `Unknown` state and registers it with the
    /// gateway for authentication failure signals.
    pub fn new(gateway: Arc<GatewayClient<T, S>>) -> Self {
        let (state, _) = watch::channel(SessionState::Unknown);
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let shared = Arc::new(Shared {
            state,
            events,
            epoch: Mutex::new(0),
        });
        gateway.register_hook(shared.clone());
        Self { gateway, shared }
    }

    pub fn gateway(&self) -> &Arc<GatewayClient<T, S>> {
        &self.gateway
    }

    // -----------------------------------------------------------------------
    // Observation
    // -----------------------------------------------------------------------

    /// A snapshot of the current state.
    pub fn state(&self) -> SessionState {
        self.shared.state.borrow().clone()
    }

    /// The signed-in user, if any.
    pub fn identity(&self) -> Option<User> {
        self.shared.state.borrow().identity().cloned()
    }

    pub fn is_authenticated(&self) -> bool {
        self.shared.state.borrow().is_authenticated()
    }

    /// A receiver that always holds the latest state. Use `changed()` to
    /// wait for the next transition.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.shared.state.subscribe()
    }

    /// A receiver of transition events from now on.
    pub fn events(&self) -> broadcast::Receiver<SessionEvent> {
        self.shared.events.subscribe()
    }

    /// Admin route guard.
    ///
    /// # Errors
    /// - [`SessionError::NotAuthenticated`] unless signed in.
    /// - [`SessionError::Forbidden`] if signed in without `ADMIN`.
    pub fn require_admin(&self) -> Result<User, SessionError> {
        match self.identity() {
            Some(user) if user.is_admin() => Ok(user),
            Some(_) => Err(SessionError::Forbidden),
            None => Err(SessionError::NotAuthenticated),
        }
    }

    // -----------------------------------------------------------------------
    // Transitions
    // -----------------------------------------------------------------------

    /// Resolves the session from the stored credential.
    ///
    /// Without a credential this settles on `Anonymous` and makes no call.
    /// With one, it asks the service who the credential belongs to: success
    /// means `Authenticated`, any failure clears the credential and means
    /// `Anonymous`. Safe to call repeatedly.
    ///
    /// An identity that arrives after the session was torn down, signed
    /// out, or replaced is dropped.
    pub async fn check_session(&self) -> SessionState {
        let epoch = *self.shared.epoch.lock();
        if !self.gateway.credentials().is_present() {
            self.settle_anonymous(epoch);
            return self.state();
        }

        match self.gateway.me().await {
            Ok(user) => {
                let epoch_now = self.shared.epoch.lock();
                if *epoch_now != epoch || !self.gateway.credentials().is_present() {
                    tracing::debug!("session changed during check, discarding identity");
                } else {
                    self.sign_in(user);
                }
            }
            Err(e) => {
                tracing::info!(kind = %e.kind(), error = %e, "session check failed, signing out");
                let mut epoch_now = self.shared.epoch.lock();
                if *epoch_now == epoch {
                    if let Err(e) = self.gateway.credentials().clear() {
                        tracing::warn!(error = %e, "failed to clear credential");
                    }
                    self.shared
                        .expire_locked(&mut epoch_now, &self.gateway.config().anonymous_entry);
                }
            }
        }
        self.state()
    }

    /// Exchanges email and password for a session.
    ///
    /// On success the credential is stored, the state becomes
    /// `Authenticated`, and the user is returned. On failure nothing is
    /// stored and the state is untouched.
    ///
    /// # Errors
    /// - [`SessionError::Gateway`] with the classified failure. A rejected
    ///   password carries the service's message verbatim.
    /// - [`SessionError::Credential`] if the credential couldn't be stored.
    /// - [`SessionError::Superseded`] if a logout, a teardown, or another
    ///   login finished first.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, SessionError> {
        let epoch = *self.shared.epoch.lock();
        let grant = self.gateway.login(email, password).await?;

        let mut epoch_now = self.shared.epoch.lock();
        if *epoch_now != epoch {
            tracing::warn!("session changed during login, discarding grant");
            return Err(SessionError::Superseded);
        }
        self.gateway
            .credentials()
            .set(Credential::new(grant.access_token))?;
        *epoch_now += 1;
        self.sign_in(grant.user.clone());
        Ok(grant.user)
    }

    /// Ends the session locally, then tells the service in the background.
    ///
    /// The credential is cleared and the state is `Anonymous` before this
    /// returns. The remote notification is best-effort: it carries the old
    /// credential, its outcome is only logged, and it can't disturb a
    /// session started after it. Returns the notification task so callers
    /// that care can await it; `None` outside a tokio runtime, where the
    /// notification is skipped.
    ///
    /// Before the first [`check_session`](Self::check_session) the state
    /// stays `Unknown`: the credential is gone, and the next check settles
    /// on `Anonymous` without a call.
    pub fn logout(&self) -> Option<JoinHandle<()>> {
        let credential = {
            let mut epoch = self.shared.epoch.lock();
            *epoch += 1;
            let credential = self.gateway.credentials().get();
            if let Err(e) = self.gateway.credentials().clear() {
                tracing::warn!(error = %e, "failed to clear credential");
            }
            if self.shared.state.borrow().is_resolved() {
                let previous = self.shared.replace(SessionState::Anonymous);
                if let SessionState::Authenticated(user) = previous {
                    tracing::info!(user = %user.id, "signed out");
                    self.shared.emit(SessionEvent::SignedOut);
                }
            }
            credential
        };

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!("no async runtime, skipping logout notification");
            return None;
        };
        let gateway = Arc::clone(&self.gateway);
        Some(runtime.spawn(async move {
            match gateway.notify_logout(credential).await {
                Ok(()) => tracing::debug!("logout notification delivered"),
                Err(e) => {
                    tracing::warn!(kind = %e.kind(), error = %e, "logout notification failed, ignoring");
                }
            }
        }))
    }

    fn settle_anonymous(&self, epoch: u64) {
        let epoch_now = self.shared.epoch.lock();
        if *epoch_now == epoch {
            self.shared.replace(SessionState::Anonymous);
        }
    }

    fn sign_in(&self, user: User) {
        let previous = self.shared.replace(SessionState::Authenticated(user.clone()));
        if previous.identity() != Some(&user) {
            tracing::info!(user = %user.id, status = %user.global_status, "signed in");
            self.shared.emit(SessionEvent::SignedIn(user));
        }
    }
}
