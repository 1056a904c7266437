//! HTTPS transport implementation using `reqwest`.

use reqwest::Url;
use reqwest::header::{ACCEPT, CONTENT_TYPE};

use crate::{HttpRequest, HttpResponse, HttpTransport, TransportError};

/// A `reqwest`-backed [`HttpTransport`] bound to one base URL.
///
/// Request paths are appended to the base path: with a base of
/// `https://host/api`, the path `/graphql` goes to `https://host/api/graphql`.
///
/// No client-level timeout is configured; the gateway bounds every call.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    base: Url,
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Creates a transport for `base_url` with a default client.
    ///
    /// # Errors
    /// Returns [`TransportError::InvalidUrl`] if `base_url` doesn't parse,
    /// or [`TransportError::Connect`] if the TLS backend fails to initialise.
    pub fn new(base_url: &str) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| TransportError::Connect(Box::new(e)))?;
        Self::with_client(base_url, client)
    }

    /// Creates a transport that reuses an existing `reqwest::Client`.
    ///
    /// # Errors
    /// Returns [`TransportError::InvalidUrl`] if `base_url` doesn't parse.
    pub fn with_client(base_url: &str, client: reqwest::Client) -> Result<Self, TransportError> {
        let mut base = Url::parse(base_url)
            .map_err(|e| TransportError::InvalidUrl(format!("{base_url}: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(TransportError::InvalidUrl(format!(
                "{base_url}: not a hierarchical URL"
            )));
        }
        // A trailing slash makes the last segment a directory for `join`.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        tracing::debug!(%base, "HTTP transport ready");
        Ok(Self { base, client })
    }

    /// The base URL every request path is joined to. Always ends in `/`.
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// The full URL for a request path.
    ///
    /// # Errors
    /// Returns [`TransportError::InvalidUrl`] if the joined URL is invalid.
    pub fn resolve(&self, path: &str) -> Result<Url, TransportError> {
        self.base
            .join(path.trim_start_matches('/'))
            .map_err(|e| TransportError::InvalidUrl(format!("{path}: {e}")))
    }
}

impl HttpTransport for ReqwestTransport {
    async fn post(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let url = self.resolve(&request.path)?;

        let mut builder = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .body(request.body);
        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await.map_err(classify)?;
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::Request(Box::new(e)))?;

        Ok(HttpResponse {
            status,
            body: body.to_vec(),
        })
    }
}

/// Splits `reqwest` failures into "never reached the service" and
/// "reached it, then failed".
fn classify(err: reqwest::Error) -> TransportError {
    if err.is_builder() {
        TransportError::InvalidUrl(err.to_string())
    } else if err.is_connect() {
        TransportError::Connect(Box::new(err))
    } else {
        TransportError::Request(Box::new(err))
    }
}
