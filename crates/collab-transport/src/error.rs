/// Boxed source error from whichever HTTP stack produced it.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur in the transport layer.
///
/// Every variant means the request never produced an HTTP status. Anything
/// that did produce one comes back as an [`HttpResponse`](crate::HttpResponse),
/// whatever the status.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The base URL or request path could not form a valid URL.
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    /// The service could not be reached (DNS, refused, unreachable, TLS).
    #[error("connect failed: {0}")]
    Connect(#[source] BoxError),

    /// The connection was made but the exchange failed mid-flight.
    #[error("request failed: {0}")]
    Request(#[source] BoxError),
}
