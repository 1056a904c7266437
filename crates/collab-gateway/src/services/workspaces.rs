use collab_protocol::{Workspace, WorkspaceId, catalog};
use collab_transport::HttpTransport;

use super::require;
use crate::{CredentialStore, GatewayClient, GatewayError, RequestOptions};

impl<T: HttpTransport, S: CredentialStore> GatewayClient<T, S> {
    /// Workspaces the caller belongs to.
    ///
    /// Never fails: any failure is logged and shows up as an empty list, so
    /// the dashboard renders "no workspaces" instead of an error page. An
    /// authentication failure still tears the session down first.
    pub async fn my_workspaces(&self) -> Vec<Workspace> {
        match self
            .execute::<Option<Vec<Workspace>>>(&catalog::my_workspaces(), RequestOptions::default())
            .await
        {
            Ok(list) => list.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(kind = %e.kind(), error = %e, "workspace list unavailable, showing none");
                Vec::new()
            }
        }
    }

    /// One workspace with its members. `None` if the service has no such
    /// workspace or won't show it.
    ///
    /// # Errors
    /// Any request classification.
    pub async fn workspace(&self, id: &WorkspaceId) -> Result<Option<Workspace>, GatewayError> {
        if id.is_empty() {
            return Ok(None);
        }
        self.execute(&catalog::workspace(id), RequestOptions::default())
            .await
    }

    /// Creates a workspace owned by the caller.
    ///
    /// # Errors
    /// `InvalidInput` for a blank name, otherwise any request classification.
    pub async fn create_workspace(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> Result<Workspace, GatewayError> {
        require(name, "workspace name")?;
        let workspace: Workspace = self
            .execute(
                &catalog::create_workspace(name.trim(), description),
                RequestOptions::default(),
            )
            .await?;
        tracing::info!(workspace = %workspace.id, "workspace created");
        Ok(workspace)
    }
}
