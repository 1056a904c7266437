//! `CollabClient` builder.
//!
//! Ties the layers together: reqwest transport → gateway → session.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use collab_gateway::{
    Credential, CredentialError, CredentialStore, FileCredentialStore, GatewayClient,
    GatewayConfig, MemoryCredentialStore,
};
use collab_session::SessionManager;
use collab_transport::ReqwestTransport;

use crate::{ClientConfig, CollabError};

/// The gateway as wired by [`CollabClient`].
pub type Gateway = GatewayClient<ReqwestTransport, CredentialSlot>;

/// The session manager as wired by [`CollabClient`].
pub type Session = SessionManager<ReqwestTransport, CredentialSlot>;

// ---------------------------------------------------------------------------
// CredentialSlot
// ---------------------------------------------------------------------------

/// The credential store picked at build time.
#[derive(Debug)]
pub enum CredentialSlot {
    Memory(MemoryCredentialStore),
    File(FileCredentialStore),
}

impl CredentialStore for CredentialSlot {
    fn get(&self) -> Option<Credential> {
        match self {
            Self::Memory(store) => store.get(),
            Self::File(store) => store.get(),
        }
    }

    fn set(&self, credential: Credential) -> Result<(), CredentialError> {
        match self {
            Self::Memory(store) => store.set(credential),
            Self::File(store) => store.set(credential),
        }
    }

    fn clear(&self) -> Result<(), CredentialError> {
        match self {
            Self::Memory(store) => store.clear(),
            Self::File(store) => store.clear(),
        }
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Builder for a [`CollabClient`].
///
/// # Example
///
/// ```rust,no_run
/// use collab::prelude::*;
///
/// # async fn run() -> Result<(), CollabError> {
/// let client = CollabClient::builder()
///     .config(ClientConfig::from_env()?)
///     .build()?;
///
/// if client.session().check_session().await.is_authenticated() {
///     for workspace in client.gateway().my_workspaces().await {
///         println!("{}", workspace.name);
///     }
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct CollabClientBuilder {
    config: ClientConfig,
}

impl CollabClientBuilder {
    /// Creates a builder with default settings: the hosted service and an
    /// in-memory credential.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole configuration.
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Replaces the gateway configuration.
    pub fn gateway_config(mut self, gateway: GatewayConfig) -> Self {
        self.config.gateway = gateway;
        self
    }

    /// Sets the base URL of the remote service.
    pub fn base_url(mut self, url: &str) -> Self {
        self.config.gateway.base_url = url.to_string();
        self
    }

    /// Sets the per-request timeout.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.gateway.request_timeout = timeout;
        self
    }

    /// Persists the credential at `path` so the session survives restarts.
    pub fn credential_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.credential_file = Some(path.into());
        self
    }

    /// Builds the client. Makes no network call; run
    /// [`Session::check_session`] to resolve the session.
    ///
    /// # Errors
    /// - [`CollabError::Transport`] if the base URL doesn't parse.
    /// - [`CollabError::Credential`] if the credential file can't be read.
    pub fn build(self) -> Result<CollabClient, CollabError> {
        let transport = ReqwestTransport::new(&self.config.gateway.base_url)?;
        let store = match &self.config.credential_file {
            Some(path) => CredentialSlot::File(FileCredentialStore::open(path)?),
            None => CredentialSlot::Memory(MemoryCredentialStore::new()),
        };
        tracing::debug!(
            base_url = %self.config.gateway.base_url,
            persistent = self.config.credential_file.is_some(),
            "collab client built"
        );

        let gateway = Arc::new(GatewayClient::new(
            transport,
            Arc::new(store),
            self.config.gateway,
        ));
        Ok(CollabClient {
            session: SessionManager::new(gateway),
        })
    }
}

// ---------------------------------------------------------------------------
// CollabClient
// ---------------------------------------------------------------------------

/// A ready-to-use client: session lifecycle plus typed remote operations.
pub struct CollabClient {
    session: Session,
}

impl CollabClient {
    /// Creates a new builder.
    pub fn builder() -> CollabClientBuilder {
        CollabClientBuilder::new()
    }

    /// Session lifecycle: `check_session`, `login`, `logout`, observers.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Typed remote operations.
    pub fn gateway(&self) -> &Gateway {
        self.session.gateway()
    }
}
