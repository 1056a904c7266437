//! Gateway configuration.

use std::time::Duration;

/// Where the service lives and how long to wait for it.
///
/// `Default` points at the hosted service with the paths it exposes.
/// Override only the fields you care about:
///
/// ```rust
/// use std::time::Duration;
/// use collab_gateway::GatewayConfig;
///
/// let config = GatewayConfig {
///     request_timeout: Duration::from_secs(5),
///     ..GatewayConfig::default()
/// };
/// assert_eq!(config.submit_path, "/graphql");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    /// Base URL of the remote service.
    pub base_url: String,

    /// The single operation-submission endpoint.
    pub submit_path: String,

    /// Conventional credential exchange endpoint, used only as the login
    /// fallback.
    pub login_path: String,

    /// Best-effort logout notification endpoint.
    pub logout_path: String,

    /// Bounded wait for every request. Overridable per call through
    /// [`RequestOptions::with_timeout`](crate::RequestOptions::with_timeout).
    pub request_timeout: Duration,

    /// Anonymous entry point carried in the teardown signal so the UI knows
    /// where to send the user.
    pub anonymous_entry: String,

    /// Whether login may fall back to `login_path` when the submission
    /// endpoint fails to complete.
    pub login_fallback: bool,
}

/// Default request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Hosted service the dashboard talks to.
pub const DEFAULT_BASE_URL: &str = "https://collaboration-platform-9ngo.onrender.com";

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            submit_path: "/graphql".to_string(),
            login_path: "/api/auth/login".to_string(),
            logout_path: "/api/auth/logout".to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            anonymous_entry: "/login".to_string(),
            login_fallback: true,
        }
    }
}
