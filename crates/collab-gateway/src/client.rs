//! The gateway client: every remote call goes through here.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use collab_protocol::{
    Codec, JsonCodec, Operation, PreparedOperation, ProtocolError, ResponseEnvelope,
};
use collab_transport::{HttpRequest, HttpTransport, RequestId};
use parking_lot::RwLock;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::classify::classify;
use crate::{
    AuthFailure, AuthFailureHook, Credential, CredentialStore, GatewayConfig, GatewayError,
};

static NEXT_REQUEST_ID: AtomicU64 = AtomicU64::new(1);

// ---------------------------------------------------------------------------
// RequestOptions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
enum CredentialSource {
    /// Read the slot when the request is issued.
    Store,
    /// Use exactly this, ignoring the slot.
    Explicit(Option<Credential>),
}

/// Per-call overrides.
///
/// The default reads the credential slot, uses the configured timeout, and
/// tears the session down on an authentication failure.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    timeout: Option<Duration>,
    credential: CredentialSource,
    teardown: bool,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            timeout: None,
            credential: CredentialSource::Store,
            teardown: true,
        }
    }
}

impl RequestOptions {
    /// A request that uses `credential` instead of the slot and never tears
    /// the session down.
    ///
    /// Used for calls that outlive the session they belong to, like the
    /// logout notification: a late 401 there must not clear a credential
    /// that a newer login has since stored.
    pub fn detached(credential: Option<Credential>) -> Self {
        Self {
            timeout: None,
            credential: CredentialSource::Explicit(credential),
            teardown: false,
        }
    }

    /// Overrides the configured timeout for this call.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Keeps the credential and session intact if this call comes back
    /// unauthenticated. Login uses this: a wrong password isn't an expired
    /// session.
    pub fn without_teardown(mut self) -> Self {
        self.teardown = false;
        self
    }
}

// ---------------------------------------------------------------------------
// GatewayClient
// ---------------------------------------------------------------------------

/// The single chokepoint for remote calls.
///
/// Generic over the transport (`ReqwestTransport` in production,
/// `MockTransport` in tests) and the credential store. Share it with `Arc`;
/// every method takes `&self`.
///
/// For each request the gateway:
/// 1. reads the credential once and attaches it as a bearer, if present
/// 2. bounds the wait with `tokio::time::timeout`
/// 3. classifies the outcome into a [`GatewayError`] variant
/// 4. on `Unauthenticated`, clears the credential and notifies every
///    [`AuthFailureHook`]
pub struct GatewayClient<T: HttpTransport, S: CredentialStore> {
    transport: T,
    store: Arc<S>,
    config: GatewayConfig,
    codec: JsonCodec,
    hooks: RwLock<Vec<Arc<dyn AuthFailureHook>>>,
}

impl<T: HttpTransport, S: CredentialStore> GatewayClient<T, S> {
    pub fn new(transport: T, store: Arc<S>, config: GatewayConfig) -> Self {
        Self {
            transport,
            store,
            config,
            codec: JsonCodec,
            hooks: RwLock::new(Vec::new()),
        }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// The credential slot this gateway reads from.
    pub fn credentials(&self) -> &Arc<S> {
        &self.store
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Registers a hook to be told about authentication failures.
    pub fn register_hook(&self, hook: Arc<dyn AuthFailureHook>) {
        self.hooks.write().push(hook);
    }

    /// Submits `operation` and returns the whole `data` object.
    ///
    /// # Errors
    /// Any [`GatewayError`] classification. A success response without
    /// `data` is `Application`.
    pub async fn request(
        &self,
        operation: &Operation,
        options: RequestOptions,
    ) -> Result<Value, GatewayError> {
        let envelope = self.envelope(operation, options).await?;
        envelope.data.ok_or_else(no_data)
    }

    /// Submits a catalog operation and deserializes its result field.
    ///
    /// # Errors
    /// Any [`GatewayError`] classification. A success response without
    /// `data` is `Application`; a missing or misshapen result field is
    /// `Protocol`.
    pub async fn execute<R: DeserializeOwned>(
        &self,
        prepared: &PreparedOperation,
        options: RequestOptions,
    ) -> Result<R, GatewayError> {
        let envelope = self.envelope(&prepared.operation, options).await?;
        if envelope.data.is_none() {
            return Err(no_data());
        }
        Ok(envelope.take_field(prepared.field)?)
    }

    /// Submits `operation` and decodes the envelope, with `null` data
    /// normalised to absent.
    async fn envelope(
        &self,
        operation: &Operation,
        options: RequestOptions,
    ) -> Result<ResponseEnvelope<Value>, GatewayError> {
        let body = self.codec.encode(operation)?;
        let value = self
            .submit(&self.config.submit_path, operation.label(), body, &options)
            .await?;
        let mut envelope: ResponseEnvelope<Value> =
            serde_json::from_value(value).map_err(ProtocolError::Decode)?;
        envelope.data = envelope.data.filter(|data| !data.is_null());
        Ok(envelope)
    }

    /// Posts a JSON body to one of the conventional REST endpoints.
    pub(crate) async fn post_rest<B: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        options: RequestOptions,
    ) -> Result<R, GatewayError> {
        let body = self.codec.encode(body)?;
        let value = self.submit(path, path, body, &options).await?;
        Ok(serde_json::from_value(value).map_err(ProtocolError::Decode)?)
    }

    async fn submit(
        &self,
        path: &str,
        label: &str,
        body: Vec<u8>,
        options: &RequestOptions,
    ) -> Result<Value, GatewayError> {
        let id = RequestId::new(NEXT_REQUEST_ID.fetch_add(1, Ordering::Relaxed));
        let bearer = match &options.credential {
            CredentialSource::Store => self.store.get(),
            CredentialSource::Explicit(credential) => credential.clone(),
        };
        let authenticated = bearer.is_some();
        let request = HttpRequest {
            path: path.to_owned(),
            bearer: bearer.map(Credential::into_inner),
            body,
        };
        let timeout = options.timeout.unwrap_or(self.config.request_timeout);

        let started = Instant::now();
        let outcome = match tokio::time::timeout(timeout, self.transport.post(request)).await {
            Err(_elapsed) => Err(GatewayError::Timeout(timeout)),
            Ok(Err(e)) => Err(GatewayError::Network(e)),
            Ok(Ok(response)) => classify(response, &self.codec),
        };
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match &outcome {
            Ok(_) => tracing::debug!(%id, op = label, authenticated, elapsed_ms, "request succeeded"),
            Err(e) => tracing::debug!(
                %id,
                op = label,
                authenticated,
                elapsed_ms,
                kind = %e.kind(),
                error = %e,
                "request failed"
            ),
        }

        if let Err(GatewayError::Unauthenticated { message }) = &outcome {
            if options.teardown {
                self.tear_down(message);
            }
        }
        outcome
    }

    /// Clears the credential, then tells every hook.
    fn tear_down(&self, message: &str) {
        if let Err(e) = self.store.clear() {
            tracing::warn!(error = %e, "failed to clear credential during teardown");
        }
        let failure = AuthFailure {
            message: message.to_owned(),
            redirect_to: self.config.anonymous_entry.clone(),
        };
        tracing::info!(redirect_to = %failure.redirect_to, "authentication failed, session torn down");

        // Snapshot so a hook may register another without deadlocking.
        let hooks: Vec<_> = self.hooks.read().clone();
        for hook in hooks {
            hook.on_auth_failure(&failure);
        }
    }
}

fn no_data() -> GatewayError {
    GatewayError::Application("response carried no data".into())
}
