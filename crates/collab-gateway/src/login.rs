//! Credential exchange.
//!
//! The service has two login entry points that have historically run side
//! by side: the `login` mutation on the submission endpoint, and a plain
//! REST endpoint. [`GatewayClient::login`] walks them in order and stops at
//! the first one that completes, whether it completes with a grant or with
//! a definitive "no".

use collab_protocol::{LoginGrant, catalog};
use serde::Serialize;

use crate::{Credential, CredentialStore, GatewayClient, GatewayError, RequestOptions};
use collab_transport::HttpTransport;

/// One way of exchanging email and password for a [`LoginGrant`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginStrategy {
    /// The `login` mutation on the submission endpoint.
    Primary,
    /// `POST` to the conventional login endpoint.
    Secondary,
}

impl LoginStrategy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Secondary => "secondary",
        }
    }
}

#[derive(Serialize)]
struct LoginBody<'a> {
    email: &'a str,
    password: &'a str,
}

impl<T: HttpTransport, S: CredentialStore> GatewayClient<T, S> {
    /// The strategies `login` will try, in order.
    pub fn login_plan(&self) -> &'static [LoginStrategy] {
        if self.config().login_fallback {
            &[LoginStrategy::Primary, LoginStrategy::Secondary]
        } else {
            &[LoginStrategy::Primary]
        }
    }

    /// Exchanges email and password for a grant.
    ///
    /// Tries each strategy from [`login_plan`](Self::login_plan). A strategy
    /// that fails to complete (timeout, network, server error) hands over
    /// to the next one. Anything else, success or a rejection, is final.
    /// The grant is returned, not stored; storing it is the session
    /// manager's call.
    ///
    /// # Errors
    /// The last strategy's [`GatewayError`]. A rejected password is
    /// `Application` or `Unauthenticated` depending on the endpoint.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginGrant, GatewayError> {
        let plan = self.login_plan();
        let mut outcome = Err(GatewayError::InvalidInput("no login strategy".into()));
        for (i, strategy) in plan.iter().copied().enumerate() {
            outcome = self.login_via(strategy, email, password).await;
            match &outcome {
                Err(e) if e.is_incomplete() && i + 1 < plan.len() => {
                    tracing::warn!(
                        strategy = strategy.as_str(),
                        kind = %e.kind(),
                        "login did not complete, trying next strategy"
                    );
                }
                _ => break,
            }
        }
        outcome
    }

    /// Runs exactly one login strategy.
    ///
    /// # Errors
    /// - `InvalidInput` if email or password is blank.
    /// - `Protocol` if the grant carries an empty access token.
    /// - Any request classification otherwise.
    pub async fn login_via(
        &self,
        strategy: LoginStrategy,
        email: &str,
        password: &str,
    ) -> Result<LoginGrant, GatewayError> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(GatewayError::InvalidInput(
                "email and password are required".into(),
            ));
        }
        let options = RequestOptions::default().without_teardown();
        let grant: LoginGrant = match strategy {
            LoginStrategy::Primary => {
                self.execute(&catalog::login(email, password), options)
                    .await?
            }
            LoginStrategy::Secondary => {
                let path = self.config().login_path.clone();
                self.post_rest(&path, &LoginBody { email, password }, options)
                    .await?
            }
        };
        if grant.access_token.is_empty() {
            return Err(GatewayError::Protocol(
                collab_protocol::ProtocolError::InvalidMessage(
                    "login grant carried an empty access token".into(),
                ),
            ));
        }
        tracing::debug!(strategy = strategy.as_str(), user = %grant.user.id, "login accepted");
        Ok(grant)
    }

    /// Tells the service a credential is being discarded.
    ///
    /// Sent with `credential` explicitly and without teardown, so it can run
    /// after the local session is already gone.
    ///
    /// # Errors
    /// Any request classification. Callers treat this as best-effort.
    pub async fn notify_logout(&self, credential: Option<Credential>) -> Result<(), GatewayError> {
        let path = self.config().logout_path.clone();
        let _: serde_json::Value = self
            .post_rest(&path, &serde_json::json!({}), RequestOptions::detached(credential))
            .await?;
        Ok(())
    }
}
