//! The operation catalog: every query and mutation the client issues.
//!
//! Each constructor returns a [`PreparedOperation`] holding the payload and
//! the name of the field under `data` where the service puts the result.
//! Keeping the document next to its result field means a typo in one shows
//! up next to the other.

use serde_json::json;

use crate::{Operation, ProjectId, TaskId, TaskStatus, UserId, WorkspaceId};

/// An operation payload paired with the `data` field its result lands in.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedOperation {
    pub operation: Operation,
    pub field: &'static str,
}

impl PreparedOperation {
    fn new(field: &'static str, query: &str) -> Self {
        Self {
            operation: Operation::new(query),
            field,
        }
    }

    fn vars(mut self, variables: serde_json::Value) -> Self {
        self.operation = self.operation.with_variables(variables);
        self
    }
}

const USER_FIELDS: &str = "id email globalStatus";
const CREATOR_FIELDS: &str = "createdBy { id email }";

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// Identity check for the current credential.
pub fn me() -> PreparedOperation {
    PreparedOperation::new("me", &format!("query GetMe {{ me {{ {USER_FIELDS} }} }}"))
}

/// Credential exchange on the submission endpoint. Returns a
/// [`LoginGrant`](crate::LoginGrant).
pub fn login(email: &str, password: &str) -> PreparedOperation {
    PreparedOperation::new(
        "login",
        &format!(
            "mutation Login($input: LoginInput!) {{ login(input: $input) {{ accessToken user {{ {USER_FIELDS} }} }} }}"
        ),
    )
    .vars(json!({ "input": { "email": email, "password": password } }))
}

// ---------------------------------------------------------------------------
// Workspaces
// ---------------------------------------------------------------------------

pub fn my_workspaces() -> PreparedOperation {
    PreparedOperation::new(
        "myWorkspaces",
        &format!(
            "query GetMyWorkspaces {{ myWorkspaces {{ id name description createdAt {CREATOR_FIELDS} members {{ id user {{ id email }} role }} }} }}"
        ),
    )
}

pub fn workspace(id: &WorkspaceId) -> PreparedOperation {
    PreparedOperation::new(
        "workspace",
        &format!(
            "query GetWorkspace($id: ID!) {{ workspace(id: $id) {{ id name description createdAt {CREATOR_FIELDS} members {{ id user {{ id email }} role }} }} }}"
        ),
    )
    .vars(json!({ "id": id }))
}

/// A missing description is sent as the empty string.
pub fn create_workspace(name: &str, description: Option<&str>) -> PreparedOperation {
    PreparedOperation::new(
        "createWorkspace",
        &format!(
            "mutation CreateWorkspace($input: CreateWorkspaceInput!) {{ createWorkspace(input: $input) {{ id name description createdAt {CREATOR_FIELDS} }} }}"
        ),
    )
    .vars(json!({ "input": { "name": name, "description": description.unwrap_or_default() } }))
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

pub fn workspace_projects(workspace_id: &WorkspaceId) -> PreparedOperation {
    PreparedOperation::new(
        "workspaceProjects",
        &format!(
            "query GetWorkspaceProjects($workspaceId: ID!) {{ workspaceProjects(workspaceId: $workspaceId) {{ id name description createdAt {CREATOR_FIELDS} }} }}"
        ),
    )
    .vars(json!({ "workspaceId": workspace_id }))
}

pub fn create_project(
    name: &str,
    description: &str,
    workspace_id: &WorkspaceId,
) -> PreparedOperation {
    PreparedOperation::new(
        "createProject",
        &format!(
            "mutation CreateProject($input: CreateProjectInput!) {{ createProject(input: $input) {{ id name description createdAt {CREATOR_FIELDS} }} }}"
        ),
    )
    .vars(json!({
        "input": { "name": name, "description": description, "workspaceId": workspace_id }
    }))
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

const TASK_FIELDS: &str =
    "id title description status dueDate project { id name workspace { id name } }";

/// Tasks assigned to the caller, optionally filtered by status. Without a
/// filter the variables object is sent empty.
pub fn my_assigned_tasks(status: Option<TaskStatus>) -> PreparedOperation {
    let vars = match status {
        Some(status) => json!({ "status": status }),
        None => json!({}),
    };
    PreparedOperation::new(
        "myAssignedTasks",
        &format!(
            "query GetMyAssignedTasks($status: TaskStatus) {{ myAssignedTasks(status: $status) {{ {TASK_FIELDS} }} }}"
        ),
    )
    .vars(vars)
}

pub fn project_tasks(project_id: &ProjectId) -> PreparedOperation {
    PreparedOperation::new(
        "projectTasks",
        &format!(
            "query GetProjectTasks($projectId: ID!) {{ projectTasks(projectId: $projectId) {{ {TASK_FIELDS} }} }}"
        ),
    )
    .vars(json!({ "projectId": project_id }))
}

pub fn update_task(task_id: &TaskId, status: TaskStatus) -> PreparedOperation {
    PreparedOperation::new(
        "updateTask",
        &format!(
            "mutation UpdateTask($input: UpdateTaskInput!) {{ updateTask(input: $input) {{ {TASK_FIELDS} }} }}"
        ),
    )
    .vars(json!({ "input": { "taskId": task_id, "status": status } }))
}

// ---------------------------------------------------------------------------
// AI assistant
// ---------------------------------------------------------------------------

pub fn summarize_task(task_description: &str) -> PreparedOperation {
    PreparedOperation::new(
        "summarizeTask",
        "query SummarizeTask($input: AISummarizeInput!) { summarizeTask(input: $input) }",
    )
    .vars(json!({ "input": { "taskDescription": task_description } }))
}

pub fn generate_tasks(prompt: &str, project_id: &ProjectId) -> PreparedOperation {
    PreparedOperation::new(
        "generateTasksFromPrompt",
        "mutation GenerateTasksFromPrompt($input: AIGenerateTasksInput!) { generateTasksFromPrompt(input: $input) { id title description status } }",
    )
    .vars(json!({ "input": { "prompt": prompt, "projectId": project_id } }))
}

// ---------------------------------------------------------------------------
// Admin
// ---------------------------------------------------------------------------

pub fn all_workspaces() -> PreparedOperation {
    PreparedOperation::new(
        "getAllWorkspaces",
        &format!(
            "query GetAllWorkspaces {{ getAllWorkspaces {{ id name description createdAt {CREATOR_FIELDS} members {{ user {{ {USER_FIELDS} }} role }} }} }}"
        ),
    )
}

pub fn audit_logs(limit: u32) -> PreparedOperation {
    PreparedOperation::new(
        "getAuditLogs",
        "query GetAuditLogs($limit: Int) { getAuditLogs(limit: $limit) { id timestamp level userId ipAddress action details message } }",
    )
    .vars(json!({ "limit": limit }))
}

pub fn ban_user(user_id: &UserId) -> PreparedOperation {
    PreparedOperation::new(
        "userBan",
        &format!("mutation BanUser($userId: ID!) {{ userBan(userId: $userId) {{ {USER_FIELDS} }} }}"),
    )
    .vars(json!({ "userId": user_id }))
}

pub fn admin_reset_password(user_id: &UserId, new_password: &str) -> PreparedOperation {
    PreparedOperation::new(
        "adminResetPassword",
        "mutation AdminResetPassword($input: AdminResetPasswordInput!) { adminResetPassword(input: $input) }",
    )
    .vars(json!({ "input": { "userId": user_id, "newPassword": new_password } }))
}
