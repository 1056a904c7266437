//! The gateway layer for the collab client.
//!
//! Every remote call the client makes goes through [`GatewayClient`]. It
//! owns the cross-cutting rules so no caller has to repeat them:
//!
//! - **Credential**: read once per request from the [`CredentialStore`]
//!   and sent as a bearer token. No credential, no `Authorization` header.
//! - **Timeout**: every request is bounded, 15 seconds unless configured.
//! - **Classification**: every failure becomes exactly one
//!   [`GatewayError`] variant.
//! - **Teardown**: an authentication failure clears the credential and
//!   notifies every [`AuthFailureHook`]. The gateway never touches session
//!   state directly.
//!
//! On top of that sit the typed service operations (`me`, `my_workspaces`,
//! `create_project`, `summarize_task`, ...) and the two-step login.
//!
//! ```text
//! caller → GatewayClient::execute → HttpTransport::post → classify → result
//!                                                            │
//!                                          Unauthenticated ──┴→ store.clear() + hooks
//! ```

mod classify;
mod client;
mod config;
mod credential;
mod error;
mod hook;
mod login;
mod services;

pub use client::{GatewayClient, RequestOptions};
pub use config::{DEFAULT_BASE_URL, DEFAULT_REQUEST_TIMEOUT, GatewayConfig};
pub use credential::{
    Credential, CredentialError, CredentialStore, FileCredentialStore, MemoryCredentialStore,
};
pub use error::{FailureKind, GatewayError};
pub use hook::{AuthFailure, AuthFailureHook};
pub use login::LoginStrategy;
pub use services::{
    DEFAULT_AUDIT_LOG_LIMIT, SUMMARY_FALLBACK_CHARS, Summary, SummarySource, collect_users,
    summary_fallback,
};
