//! Configuration for the arXiv digest view layer.

use std::time::Duration;

use crate::models::ListFilter;

/// API configuration constants.
pub mod api {
    /// Default backend origin.
    pub const BASE_URL: &str = "http://localhost:8000";

    /// Path segments of the papers resource.
    pub const PAPERS: [&str; 2] = ["api", "papers"];

    /// Path segments of the subscriptions resource.
    pub const SUBSCRIPTIONS: [&str; 2] = ["api", "subscriptions"];

    /// Well-known key holding the bearer token in the key-value store.
    pub const CREDENTIAL_KEY: &str = "token";

    /// Category shown on first load.
    pub const DEFAULT_CATEGORY: &str = "cs.CV";

    /// Page size shown on first load.
    pub const DEFAULT_MAX_RESULTS: u32 = 10;

    /// Largest page size the backend honours.
    pub const MAX_RESULTS_CAP: u32 = 50;
}

/// Client configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Backend origin, e.g. `http://localhost:8000`.
    pub api_base_url: String,

    /// Optional per-request timeout. `None` means the gateway never times out.
    pub request_timeout: Option<Duration>,

    /// Key under which the bearer token is stored.
    pub credential_key: String,

    /// Filter used for the initial listing.
    pub default_filter: ListFilter,
}

impl Config {
    /// Create a configuration for the given backend origin.
    #[must_use]
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            request_timeout: None,
            credential_key: api::CREDENTIAL_KEY.to_string(),
            default_filter: ListFilter::default(),
        }
    }

    /// Create a test configuration pointing at a mock server.
    #[must_use]
    pub fn for_testing(base_url: &str) -> Self {
        Self {
            request_timeout: Some(Duration::from_secs(5)),
            ..Self::new(base_url)
        }
    }

    /// Create configuration from environment variables (and `.env`, if present).
    ///
    /// # Errors
    ///
    /// Returns error if `ARXIV_DIGEST_TIMEOUT_SECS` is not an integer.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();

        let base = std::env::var("ARXIV_DIGEST_API_URL").unwrap_or_else(|_| api::BASE_URL.into());
        let mut config = Self::new(base);

        if let Ok(secs) = std::env::var("ARXIV_DIGEST_TIMEOUT_SECS") {
            let secs: u64 = secs
                .parse()
                .map_err(|e| anyhow::anyhow!("ARXIV_DIGEST_TIMEOUT_SECS={secs:?}: {e}"))?;
            config.request_timeout = Some(Duration::from_secs(secs));
        }

        Ok(config)
    }

    /// Set the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(api::BASE_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.api_base_url, api::BASE_URL);
        assert!(config.request_timeout.is_none());
        assert_eq!(config.credential_key, "token");
        assert_eq!(config.default_filter.category, "cs.CV");
        assert_eq!(config.default_filter.max_results, 10);
    }

    #[test]
    fn test_config_for_testing() {
        let config = Config::for_testing("http://127.0.0.1:9999");
        assert_eq!(config.api_base_url, "http://127.0.0.1:9999");
        assert_eq!(config.request_timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_with_timeout() {
        let config = Config::default().with_timeout(Duration::from_secs(3));
        assert_eq!(config.request_timeout, Some(Duration::from_secs(3)));
    }
}
