use collab_protocol::{Project, WorkspaceId, catalog};
use collab_transport::HttpTransport;

use super::require;
use crate::{CredentialStore, GatewayClient, GatewayError, RequestOptions};

impl<T: HttpTransport, S: CredentialStore> GatewayClient<T, S> {
    /// Projects in one workspace.
    ///
    /// Never fails. An empty id returns an empty list without touching the
    /// network; any failure is logged and returns an empty list.
    pub async fn workspace_projects(&self, workspace_id: &WorkspaceId) -> Vec<Project> {
        if workspace_id.is_empty() {
            return Vec::new();
        }
        match self
            .execute::<Option<Vec<Project>>>(
                &catalog::workspace_projects(workspace_id),
                RequestOptions::default(),
            )
            .await
        {
            Ok(list) => list.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(
                    workspace = %workspace_id,
                    kind = %e.kind(),
                    error = %e,
                    "project list unavailable, showing none"
                );
                Vec::new()
            }
        }
    }

    /// Creates a project inside a workspace.
    ///
    /// # Errors
    /// `InvalidInput` for a blank name or workspace id, otherwise any
    /// request classification.
    pub async fn create_project(
        &self,
        name: &str,
        description: &str,
        workspace_id: &WorkspaceId,
    ) -> Result<Project, GatewayError> {
        require(name, "project name")?;
        require(workspace_id.as_str(), "workspace id")?;
        let project: Project = self
            .execute(
                &catalog::create_project(name.trim(), description.trim(), workspace_id),
                RequestOptions::default(),
            )
            .await?;
        tracing::info!(project = %project.id, workspace = %workspace_id, "project created");
        Ok(project)
    }
}
