//! Wire protocol for the collab service.
//!
//! - **Envelope** ([`Operation`], [`ResponseEnvelope`], [`RemoteError`]):
//!   what goes to the single submission endpoint and what comes back.
//! - **Records** ([`User`], [`Workspace`], [`Task`], ...): the domain data
//!   the service returns, passed through untouched.
//! - **Catalog** ([`catalog`]): every operation the client issues.
//! - **Codec** ([`Codec`], [`JsonCodec`]): body encoding.
//!
//! This crate knows nothing about HTTP, credentials, or sessions.
//!
//! ```text
//! Transport (bytes) → Protocol (Operation / Envelope) → Gateway (classified results)
//! ```

pub mod catalog;
mod codec;
mod envelope;
mod error;
mod types;

pub use catalog::PreparedOperation;
pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use envelope::{ErrorExtensions, Operation, RemoteError, ResponseEnvelope};
pub use error::ProtocolError;
pub use types::{
    AuditLevel, AuditLog, GeneratedTask, GlobalStatus, LoginGrant, Project, ProjectId, Task,
    TaskId, TaskStatus, TaskStatusCounts, User, UserId, UserRef, Workspace, WorkspaceId,
    WorkspaceMember, WorkspaceRef, WorkspaceRole,
};
