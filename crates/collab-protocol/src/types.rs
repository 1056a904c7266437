//! Domain records returned by the collab service.
//!
//! These are passed through from the service as-is. Field names are
//! camelCase on the wire; enums use the service's SCREAMING_SNAKE_CASE
//! values. Timestamps stay as the ISO-8601 strings the service sends since
//! the client never does arithmetic on them.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Returns the id as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// `true` for the empty id, which the service never issues.
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

string_id!(
    /// Identifier of a user account.
    UserId
);
string_id!(
    /// Identifier of a workspace.
    WorkspaceId
);
string_id!(
    /// Identifier of a project inside a workspace.
    ProjectId
);
string_id!(
    /// Identifier of a task.
    TaskId
);

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// Account-wide status. Closed set: the service never sends anything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GlobalStatus {
    Active,
    Banned,
    Admin,
}

impl fmt::Display for GlobalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "ACTIVE"),
            Self::Banned => write!(f, "BANNED"),
            Self::Admin => write!(f, "ADMIN"),
        }
    }
}

/// A user record. When it comes back from the identity check it is the
/// session's identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub global_status: GlobalStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login: Option<String>,
}

impl User {
    /// `true` if the account has the `ADMIN` status.
    pub fn is_admin(&self) -> bool {
        self.global_status == GlobalStatus::Admin
    }
}

/// A user as embedded in other records (`createdBy`, member lists). The
/// service only selects a subset of fields there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRef {
    pub id: UserId,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_status: Option<GlobalStatus>,
}

/// Result of a successful login: the bearer token and who it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginGrant {
    pub access_token: String,
    pub user: User,
}

// ---------------------------------------------------------------------------
// Workspaces & projects
// ---------------------------------------------------------------------------

/// A member's role inside a workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkspaceRole {
    Owner,
    Member,
    Viewer,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceMember {
    /// Membership id. The admin listing doesn't select it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub user: UserRef,
    pub role: WorkspaceRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub joined_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workspace {
    pub id: WorkspaceId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: String,
    pub created_by: UserRef,
    /// Absent from mutation results, which don't select members.
    #[serde(default)]
    pub members: Vec<WorkspaceMember>,
}

/// A project. `workspace` is only present when selected through a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<UserRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace: Option<WorkspaceRef>,
}

/// A workspace as embedded under a task's project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceRef {
    pub id: WorkspaceId,
    pub name: String,
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Done,
}

impl TaskStatus {
    /// The wire spelling, as used in operation variables.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Todo => "TODO",
            Self::InProgress => "IN_PROGRESS",
            Self::Done => "DONE",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = crate::ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().replace('-', "_").as_str() {
            "TODO" => Ok(Self::Todo),
            "IN_PROGRESS" => Ok(Self::InProgress),
            "DONE" => Ok(Self::Done),
            other => Err(crate::ProtocolError::InvalidMessage(format!(
                "unknown task status `{other}`"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: TaskStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<Project>,
}

/// A task produced by the AI generation mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedTask {
    pub id: TaskId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: TaskStatus,
}

/// Per-status tally of a task list, as shown on the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskStatusCounts {
    pub todo: usize,
    pub in_progress: usize,
    pub done: usize,
}

impl TaskStatusCounts {
    /// Counts `tasks` by status.
    pub fn tally<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Self {
        tasks.into_iter().fold(Self::default(), |mut counts, task| {
            match task.status {
                TaskStatus::Todo => counts.todo += 1,
                TaskStatus::InProgress => counts.in_progress += 1,
                TaskStatus::Done => counts.done += 1,
            }
            counts
        })
    }

    pub fn total(&self) -> usize {
        self.todo + self.in_progress + self.done
    }
}

// ---------------------------------------------------------------------------
// Audit log
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditLevel {
    Info,
    Warn,
    Error,
    Security,
}

/// One audit log entry. `details` is free-form JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLog {
    pub id: String,
    pub timestamp: String,
    pub level: AuditLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    pub action: String,
    #[serde(default)]
    pub details: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn task(status: TaskStatus) -> Task {
        Task {
            id: TaskId::from("t"),
            title: "t".into(),
            description: None,
            status,
            due_date: None,
            project: None,
        }
    }

    #[test]
    fn test_user_deserializes_from_service_shape() {
        let user: User = serde_json::from_value(json!({
            "id": "u1",
            "email": "ada@example.com",
            "globalStatus": "ADMIN"
        }))
        .unwrap();

        assert_eq!(user.id, UserId::from("u1"));
        assert_eq!(user.global_status, GlobalStatus::Admin);
        assert!(user.is_admin());
        assert!(user.last_login.is_none());
    }

    #[test]
    fn test_user_unknown_status_is_rejected() {
        let result: Result<User, _> = serde_json::from_value(json!({
            "id": "u1",
            "email": "a@b.c",
            "globalStatus": "SUSPENDED"
        }));
        assert!(result.is_err(), "status is a closed set");
    }

    #[test]
    fn test_id_serializes_as_plain_string() {
        let json = serde_json::to_string(&WorkspaceId::from("w-9")).unwrap();
        assert_eq!(json, "\"w-9\"");
        assert_eq!(WorkspaceId::from("w-9").to_string(), "w-9");
    }

    #[test]
    fn test_login_grant_reads_camel_case_token() {
        let grant: LoginGrant = serde_json::from_value(json!({
            "accessToken": "T",
            "user": {"id": "u1", "email": "a@b.c", "globalStatus": "ACTIVE"}
        }))
        .unwrap();
        assert_eq!(grant.access_token, "T");
        assert_eq!(grant.user.global_status, GlobalStatus::Active);
    }

    #[test]
    fn test_workspace_without_members_defaults_to_empty() {
        let ws: Workspace = serde_json::from_value(json!({
            "id": "w1",
            "name": "Ops",
            "description": "",
            "createdAt": "2024-01-01T00:00:00Z",
            "createdBy": {"id": "u1", "email": "a@b.c"}
        }))
        .unwrap();
        assert!(ws.members.is_empty());
    }

    #[test]
    fn test_task_with_nested_project_and_workspace() {
        let task: Task = serde_json::from_value(json!({
            "id": "t1",
            "title": "Ship it",
            "status": "IN_PROGRESS",
            "dueDate": null,
            "project": {"id": "p1", "name": "Site", "workspace": {"id": "w1", "name": "Ops"}}
        }))
        .unwrap();

        assert_eq!(task.status, TaskStatus::InProgress);
        let project = task.project.expect("project selected");
        assert_eq!(project.workspace.expect("workspace selected").name, "Ops");
    }

    #[test]
    fn test_task_status_from_str_accepts_cli_spellings() {
        assert_eq!("in-progress".parse::<TaskStatus>().unwrap(), TaskStatus::InProgress);
        assert_eq!("done".parse::<TaskStatus>().unwrap(), TaskStatus::Done);
        assert!("blocked".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn test_task_status_counts_tally() {
        let tasks = vec![
            task(TaskStatus::Todo),
            task(TaskStatus::Todo),
            task(TaskStatus::Done),
        ];
        let counts = TaskStatusCounts::tally(&tasks);

        assert_eq!(counts.todo, 2);
        assert_eq!(counts.in_progress, 0);
        assert_eq!(counts.done, 1);
        assert_eq!(counts.total(), 3);
    }

    #[test]
    fn test_audit_log_level_is_lowercase() {
        let log: AuditLog = serde_json::from_value(json!({
            "id": "a1",
            "timestamp": "2024-01-01T00:00:00Z",
            "level": "security",
            "userId": "u1",
            "action": "USER_BAN",
            "details": {"target": "u2"}
        }))
        .unwrap();
        assert_eq!(log.level, AuditLevel::Security);
        assert_eq!(log.details["target"], "u2");
    }
}
