//! # Collab
//!
//! Client core for the workspace/project/task collaboration service.
//!
//! Two components do the work:
//!
//! - the **session manager** ([`Session`]) knows who is signed in, and
//!   moves between `Unknown`, `Anonymous`, and `Authenticated`;
//! - the **gateway** ([`Gateway`]) makes every remote call, attaching the
//!   credential, bounding the wait, classifying failures, and tearing the
//!   session down when the service stops accepting the credential.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use collab::prelude::*;
//!
//! # async fn run() -> Result<(), CollabError> {
//! collab::init_tracing();
//!
//! let client = CollabClient::builder()
//!     .credential_file("/tmp/collab-token")
//!     .build()?;
//!
//! let session = client.session();
//! if !session.check_session().await.is_authenticated() {
//!     session.login("ada@example.com", "secret").await?;
//! }
//! let tasks = client.gateway().my_assigned_tasks(None).await?;
//! println!("{} tasks", tasks.len());
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod error;
mod telemetry;

pub use client::{CollabClient, CollabClientBuilder, CredentialSlot, Gateway, Session};
pub use config::{ClientConfig, ConfigError, ENV_API_URL, ENV_CREDENTIAL_FILE, ENV_REQUEST_TIMEOUT};
pub use error::CollabError;
pub use telemetry::{DEFAULT_LOG_FILTER, init_tracing};

pub use collab_gateway as gateway;
pub use collab_protocol as protocol;
pub use collab_session as session;
pub use collab_transport as transport;

pub mod prelude {
    pub use crate::{ClientConfig, CollabClient, CollabError, Gateway, Session};
    pub use collab_gateway::{
        Credential, CredentialStore, GatewayConfig, GatewayError, RequestOptions, Summary,
        SummarySource,
    };
    pub use collab_protocol::{
        AuditLog, GlobalStatus, Project, ProjectId, Task, TaskId, TaskStatus, TaskStatusCounts,
        User, UserId, Workspace, WorkspaceId, WorkspaceRole,
    };
    pub use collab_session::{SessionError, SessionEvent, SessionState};
}
