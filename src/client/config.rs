//! Client configuration options.

use std::time::Duration;

use crate::models::ApiFamily;
use crate::{Error, Result};

/// Default token endpoint for the Riksbank client-credentials grant.
pub const DEFAULT_TOKEN_URL: &str = "https://api.riksbank.se/oauth2/token";

/// Configuration for the Riksbank client.
///
/// # Example
///
/// ```
/// use riksbank_rs::{ApiFamily, ClientConfig};
/// use std::time::Duration;
///
/// let config = ClientConfig::default()
///     .with_timeout(Duration::from_secs(60))
///     .with_base_url(ApiFamily::Swea, "http://localhost:8080/swea/v1");
/// assert_eq!(config.base_url(ApiFamily::Swea), "http://localhost:8080/swea/v1");
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Per-request timeout for data requests
    pub timeout: Duration,
    /// Per-request timeout for token requests
    pub token_timeout: Duration,
    /// User-Agent header value
    pub user_agent: String,
    /// Default retry policy for data requests
    pub retry: RetryConfig,
    /// Base URL of the SWEA API
    pub swea_base_url: String,
    /// Base URL of the TORA API
    pub tora_base_url: String,
    /// Base URL of the Kolada API
    pub kolada_base_url: String,
    /// OAuth2 token endpoint
    pub token_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            token_timeout: Duration::from_secs(10),
            user_agent: format!("riksbank-rs/{} (Rust)", env!("CARGO_PKG_VERSION")),
            retry: RetryConfig::default(),
            swea_base_url: ApiFamily::Swea.default_base_url().to_string(),
            tora_base_url: ApiFamily::Tora.default_base_url().to_string(),
            kolada_base_url: ApiFamily::Kolada.default_base_url().to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
        }
    }
}

impl ClientConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by `RIKSBANK_SWEA_BASE_URL`,
    /// `RIKSBANK_TORA_BASE_URL`, `KOLADA_BASE_URL` and `RIKSBANK_TOKEN_URL`.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());

        if let Some(url) = var("RIKSBANK_SWEA_BASE_URL") {
            config.swea_base_url = url;
        }
        if let Some(url) = var("RIKSBANK_TORA_BASE_URL") {
            config.tora_base_url = url;
        }
        if let Some(url) = var("KOLADA_BASE_URL") {
            config.kolada_base_url = url;
        }
        if let Some(url) = var("RIKSBANK_TOKEN_URL") {
            config.token_url = url;
        }
        config
    }

    /// Set the data request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the token request timeout.
    pub fn with_token_timeout(mut self, timeout: Duration) -> Self {
        self.token_timeout = timeout;
        self
    }

    /// Set the User-Agent header.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the default retry configuration.
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Point a family at a different base URL.
    pub fn with_base_url(mut self, family: ApiFamily, url: impl Into<String>) -> Self {
        let url = url.into();
        match family {
            ApiFamily::Swea => self.swea_base_url = url,
            ApiFamily::Tora => self.tora_base_url = url,
            ApiFamily::Kolada => self.kolada_base_url = url,
        }
        self
    }

    /// Set the OAuth2 token endpoint.
    pub fn with_token_url(mut self, url: impl Into<String>) -> Self {
        self.token_url = url.into();
        self
    }

    /// Configured base URL for `family`.
    pub fn base_url(&self, family: ApiFamily) -> &str {
        match family {
            ApiFamily::Swea => &self.swea_base_url,
            ApiFamily::Tora => &self.tora_base_url,
            ApiFamily::Kolada => &self.kolada_base_url,
        }
    }

    /// Base URL for `family`, rejecting blank values.
    pub(crate) fn require_base_url(&self, family: ApiFamily) -> Result<&str> {
        let url = self.base_url(family).trim();
        if url.is_empty() {
            return Err(Error::Config(format!("No base URL configured for {} API", family)));
        }
        Ok(url.trim_end_matches('/'))
    }
}

/// Retry policy for data requests.
///
/// Transport failures and responses whose status is in
/// `retry_statuses` are retried up to `max_retries` times, waiting
/// `base_delay * 2^(n-1)` before the n-th retry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    /// Maximum number of retry attempts after the first request
    pub max_retries: u32,
    /// Wait before the first retry
    pub base_delay: Duration,
    /// HTTP status codes to retry on
    pub retry_statuses: Vec<u16>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_secs(1),
            retry_statuses: vec![429, 502, 503, 504],
        }
    }
}

impl RetryConfig {
    /// Create a configuration with no retries.
    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            ..Default::default()
        }
    }

    /// Set the maximum number of retries.
    pub fn with_max_retries(mut self, max: u32) -> Self {
        self.max_retries = max;
        self
    }

    /// Set the wait before the first retry.
    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    /// Replace the set of retryable status codes.
    pub fn with_retry_statuses(mut self, statuses: impl Into<Vec<u16>>) -> Self {
        self.retry_statuses = statuses.into();
        self
    }

    /// Wait before retry number `attempt` (1-based).
    pub fn backoff_for_attempt(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(31);
        self.base_delay.saturating_mul(1u32 << exponent)
    }

    /// Check if a status code should be retried.
    pub fn should_retry_status(&self, status: u16) -> bool {
        self.retry_statuses.contains(&status)
    }

    /// Check if a failed attempt should be retried under this policy.
    pub fn should_retry(&self, err: &Error) -> bool {
        match err {
            Error::HttpStatus { status, .. } => self.should_retry_status(*status),
            other => other.is_retryable(),
        }
    }
}
