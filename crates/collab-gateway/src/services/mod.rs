//! Typed service operations.
//!
//! Thin wrappers over [`GatewayClient::execute`] with the catalog
//! operation, the result type, and the failure contract each screen of the
//! dashboard expects. Most propagate failures. A few degrade to an empty or
//! local result instead, and say so in their docs.

mod admin;
mod ai;
mod projects;
mod tasks;
mod workspaces;

pub use admin::{DEFAULT_AUDIT_LOG_LIMIT, collect_users};
pub use ai::{SUMMARY_FALLBACK_CHARS, Summary, SummarySource, summary_fallback};

use collab_protocol::{User, catalog};
use collab_transport::HttpTransport;

use crate::{CredentialStore, GatewayClient, GatewayError, RequestOptions};

impl<T: HttpTransport, S: CredentialStore> GatewayClient<T, S> {
    /// Identity check: who does the current credential belong to?
    ///
    /// # Errors
    /// Any request classification.
    pub async fn me(&self) -> Result<User, GatewayError> {
        self.execute(&catalog::me(), RequestOptions::default()).await
    }
}

/// Rejects blank required text before anything is sent.
fn require(value: &str, what: &str) -> Result<(), GatewayError> {
    if value.trim().is_empty() {
        return Err(GatewayError::InvalidInput(format!("{what} is required")));
    }
    Ok(())
}
