//! Client configuration from the environment.

use std::path::PathBuf;
use std::time::Duration;

use collab_gateway::GatewayConfig;

/// Base URL of the remote service. A path prefix such as `/api` is kept.
pub const ENV_API_URL: &str = "COLLAB_API_URL";
/// Request timeout in whole seconds.
pub const ENV_REQUEST_TIMEOUT: &str = "COLLAB_REQUEST_TIMEOUT_SECS";
/// Where to persist the credential. Unset means keep it in memory.
pub const ENV_CREDENTIAL_FILE: &str = "COLLAB_CREDENTIAL_FILE";

/// Errors from reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be an http(s) URL, got `{value}`")]
    InvalidUrl { var: &'static str, value: String },

    #[error("{var} must be a positive number of seconds, got `{value}`")]
    InvalidTimeout { var: &'static str, value: String },
}

/// Everything needed to build a [`CollabClient`](crate::CollabClient).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientConfig {
    pub gateway: GatewayConfig,

    /// Persist the credential here. `None` keeps it in memory only.
    pub credential_file: Option<PathBuf>,
}

impl ClientConfig {
    /// Reads `COLLAB_API_URL`, `COLLAB_REQUEST_TIMEOUT_SECS`, and
    /// `COLLAB_CREDENTIAL_FILE` on top of the defaults.
    ///
    /// # Errors
    /// Returns [`ConfigError`] if a variable is set to something unusable.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Like [`from_env`](Self::from_env), reading variables through
    /// `lookup`. Empty values count as unset.
    ///
    /// # Errors
    /// Returns [`ConfigError`] if a variable is set to something unusable.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(url) = get(ENV_API_URL) {
            let url = url.trim().trim_end_matches('/').to_string();
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::InvalidUrl {
                    var: ENV_API_URL,
                    value: url,
                });
            }
            config.gateway.base_url = url;
        }

        if let Some(raw) = get(ENV_REQUEST_TIMEOUT) {
            let secs = raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(ConfigError::InvalidTimeout {
                    var: ENV_REQUEST_TIMEOUT,
                    value: raw.clone(),
                })?;
            config.gateway.request_timeout = Duration::from_secs(secs);
        }

        config.credential_file = get(ENV_CREDENTIAL_FILE).map(PathBuf::from);
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_from_lookup_nothing_set_is_default() {
        let config = ClientConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.gateway.request_timeout, Duration::from_secs(15));
    }

    #[test]
    fn test_from_lookup_reads_all_vars() {
        let config = ClientConfig::from_lookup(lookup(&[
            (ENV_API_URL, "http://localhost:4000/"),
            (ENV_REQUEST_TIMEOUT, "5"),
            (ENV_CREDENTIAL_FILE, "/tmp/collab-token"),
        ]))
        .unwrap();

        assert_eq!(config.gateway.base_url, "http://localhost:4000");
        assert_eq!(config.gateway.request_timeout, Duration::from_secs(5));
        assert_eq!(config.credential_file, Some(PathBuf::from("/tmp/collab-token")));
    }

    #[test]
    fn test_from_lookup_keeps_base_path() {
        let config =
            ClientConfig::from_lookup(lookup(&[(ENV_API_URL, "https://host.example/api/")])).unwrap();
        assert_eq!(config.gateway.base_url, "https://host.example/api");
    }

    #[test]
    fn test_from_lookup_rejects_bad_url() {
        let err = ClientConfig::from_lookup(lookup(&[(ENV_API_URL, "localhost:4000")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { .. }));
        assert!(err.to_string().contains("COLLAB_API_URL"));
    }

    #[test]
    fn test_from_lookup_rejects_zero_and_garbage_timeout() {
        for value in ["0", "-3", "soon"] {
            let err = ClientConfig::from_lookup(lookup(&[(ENV_REQUEST_TIMEOUT, value)])).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidTimeout { .. }), "{value}");
        }
    }

    #[test]
    fn test_from_lookup_blank_values_are_unset() {
        let config = ClientConfig::from_lookup(lookup(&[(ENV_CREDENTIAL_FILE, "  ")])).unwrap();
        assert!(config.credential_file.is_none());
    }
}
