//! Platform administration. The service enforces the `ADMIN` status; the
//! client only hides the screens.

use std::collections::HashSet;

use collab_protocol::{AuditLog, User, UserId, UserRef, Workspace, catalog};
use collab_transport::HttpTransport;

use super::require;
use crate::{CredentialStore, GatewayClient, GatewayError, RequestOptions};

/// Audit entries fetched when the caller doesn't say.
pub const DEFAULT_AUDIT_LOG_LIMIT: u32 = 50;

impl<T: HttpTransport, S: CredentialStore> GatewayClient<T, S> {
    /// Every workspace on the platform, with members.
    ///
    /// # Errors
    /// Any request classification.
    pub async fn all_workspaces(&self) -> Result<Vec<Workspace>, GatewayError> {
        let workspaces: Option<Vec<Workspace>> = self
            .execute(&catalog::all_workspaces(), RequestOptions::default())
            .await?;
        Ok(workspaces.unwrap_or_default())
    }

    /// The most recent `limit` audit entries.
    ///
    /// # Errors
    /// Any request classification.
    pub async fn audit_logs(&self, limit: u32) -> Result<Vec<AuditLog>, GatewayError> {
        let logs: Option<Vec<AuditLog>> = self
            .execute(&catalog::audit_logs(limit), RequestOptions::default())
            .await?;
        Ok(logs.unwrap_or_default())
    }

    /// Bans a user and returns their updated record.
    ///
    /// # Errors
    /// Any request classification.
    pub async fn ban_user(&self, user_id: &UserId) -> Result<User, GatewayError> {
        require(user_id.as_str(), "user id")?;
        let user: User = self
            .execute(&catalog::ban_user(user_id), RequestOptions::default())
            .await?;
        tracing::info!(user = %user.id, status = %user.global_status, "user banned");
        Ok(user)
    }

    /// Sets a new password for a user. Returns whether the service applied
    /// it.
    ///
    /// # Errors
    /// `InvalidInput` for a blank password, otherwise any request
    /// classification.
    pub async fn admin_reset_password(
        &self,
        user_id: &UserId,
        new_password: &str,
    ) -> Result<bool, GatewayError> {
        require(user_id.as_str(), "user id")?;
        require(new_password, "new password")?;
        let applied: Option<bool> = self
            .execute(
                &catalog::admin_reset_password(user_id, new_password),
                RequestOptions::default(),
            )
            .await?;
        let applied = applied.unwrap_or(false);
        tracing::info!(user = %user_id, applied, "password reset");
        Ok(applied)
    }
}

/// Every distinct user who created or belongs to one of `workspaces`, in
/// first-seen order. This is how the admin panel builds its user list.
pub fn collect_users(workspaces: &[Workspace]) -> Vec<UserRef> {
    let mut seen = HashSet::new();
    workspaces
        .iter()
        .flat_map(|w| std::iter::once(&w.created_by).chain(w.members.iter().map(|m| &m.user)))
        .filter(|user| seen.insert(user.id.clone()))
        .cloned()
        .collect()
}
