use collab_protocol::{ProjectId, Task, TaskId, TaskStatus, catalog};
use collab_transport::HttpTransport;

use crate::{CredentialStore, GatewayClient, GatewayError, RequestOptions};

impl<T: HttpTransport, S: CredentialStore> GatewayClient<T, S> {
    /// Tasks assigned to the caller, optionally only those in `status`.
    ///
    /// # Errors
    /// Any request classification.
    pub async fn my_assigned_tasks(
        &self,
        status: Option<TaskStatus>,
    ) -> Result<Vec<Task>, GatewayError> {
        let tasks: Option<Vec<Task>> = self
            .execute(&catalog::my_assigned_tasks(status), RequestOptions::default())
            .await?;
        Ok(tasks.unwrap_or_default())
    }

    /// # Errors
    /// Any request classification.
    pub async fn project_tasks(&self, project_id: &ProjectId) -> Result<Vec<Task>, GatewayError> {
        let tasks: Option<Vec<Task>> = self
            .execute(&catalog::project_tasks(project_id), RequestOptions::default())
            .await?;
        Ok(tasks.unwrap_or_default())
    }

    /// Moves a task to `status` and returns it as the service now sees it.
    ///
    /// # Errors
    /// `Application` if the service returns no task, otherwise any request
    /// classification.
    pub async fn update_task(&self, task_id: &TaskId, status: TaskStatus) -> Result<Task, GatewayError> {
        let task: Option<Task> = self
            .execute(&catalog::update_task(task_id, status), RequestOptions::default())
            .await?;
        task.ok_or_else(|| GatewayError::Application("Failed to update task".into()))
    }
}
