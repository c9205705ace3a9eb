//! OAuth2 client-credentials token management.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use crate::{Error, Result};

/// Tokens are treated as expired this many seconds before their real expiry.
pub const TOKEN_SAFETY_MARGIN_SECS: i64 = 300;

/// Lifetime assumed when the token endpoint omits `expires_in`.
pub const DEFAULT_EXPIRES_IN_SECS: i64 = 3600;

/// Environment variable holding the OAuth2 client id.
pub const CLIENT_ID_ENV: &str = "RIKSBANK_CLIENT_ID";

/// Environment variable holding the OAuth2 client secret.
pub const CLIENT_SECRET_ENV: &str = "RIKSBANK_CLIENT_SECRET";

/// OAuth2 client credentials.
///
/// An unconfigured value is valid: it lets the client start, and every
/// authenticated call then fails fast with [`Error::AuthConfig`].
#[derive(Clone, Default)]
pub struct Credentials {
    client_id: Option<String>,
    client_secret: Option<SecretString>,
}

impl Credentials {
    /// Credentials from explicit values. Empty strings count as absent.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        let client_id = client_id.into();
        let client_secret = client_secret.into();
        Self {
            client_id: (!client_id.is_empty()).then_some(client_id),
            client_secret: (!client_secret.is_empty()).then(|| SecretString::from(client_secret)),
        }
    }

    /// No credentials at all.
    pub fn none() -> Self {
        Self::default()
    }

    /// Read `RIKSBANK_CLIENT_ID` / `RIKSBANK_CLIENT_SECRET`.
    ///
    /// Missing variables do not fail; a warning is logged instead.
    pub fn from_env() -> Self {
        let credentials = Self::new(
            std::env::var(CLIENT_ID_ENV).unwrap_or_default(),
            std::env::var(CLIENT_SECRET_ENV).unwrap_or_default(),
        );
        if !credentials.is_configured() {
            warn!(
                "Riksbank API credentials not found in environment variables. \
                 Authentication will fail when used."
            );
        }
        credentials
    }

    /// Returns `true` if both id and secret are present.
    pub fn is_configured(&self) -> bool {
        self.client_id.is_some() && self.client_secret.is_some()
    }

    /// The configured client id, if any.
    pub fn client_id(&self) -> Option<&str> {
        self.client_id.as_deref()
    }

    fn pair(&self) -> Option<(&str, &SecretString)> {
        Some((self.client_id.as_deref()?, self.client_secret.as_ref()?))
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field(
                "client_secret",
                &self.client_secret.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

/// A bearer token and the instant it stops being valid upstream.
#[derive(Clone)]
pub(crate) struct AccessToken {
    secret: SecretString,
    expires_at: DateTime<Utc>,
}

impl AccessToken {
    pub(crate) fn new(secret: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            secret: SecretString::from(secret.into()),
            expires_at,
        }
    }

    /// Usable while `now < expires_at - TOKEN_SAFETY_MARGIN_SECS`.
    fn is_usable_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at
            .checked_sub_signed(Duration::seconds(TOKEN_SAFETY_MARGIN_SECS))
            .is_some_and(|usable_until| now < usable_until)
    }
}

/// Fetches and caches a single client-credentials token.
///
/// Cloning is cheap and clones share the cached token.
///
/// # Thread Safety
///
/// The cached token is replaced as a whole and the lock is never held
/// across the token request, so concurrent callers that all see a stale
/// token may each refresh it. The last writer wins; a redundant refresh
/// only costs one extra request.
#[derive(Clone)]
pub struct TokenProvider {
    inner: Arc<ProviderInner>,
}

struct ProviderInner {
    credentials: Credentials,
    token_url: String,
    http: reqwest::Client,
    timeout: StdDuration,
    cached: RwLock<Option<Arc<AccessToken>>>,
}

impl TokenProvider {
    /// Create a provider for `token_url`.
    ///
    /// `timeout` bounds each token request independently of any retry
    /// policy used for data requests.
    pub fn new(
        credentials: Credentials,
        token_url: impl Into<String>,
        http: reqwest::Client,
        timeout: StdDuration,
    ) -> Self {
        Self {
            inner: Arc::new(ProviderInner {
                credentials,
                token_url: token_url.into(),
                http,
                timeout,
                cached: RwLock::new(None),
            }),
        }
    }

    /// Returns `true` if credentials are configured.
    pub fn has_credentials(&self) -> bool {
        self.inner.credentials.is_configured()
    }

    /// The token endpoint this provider talks to.
    pub fn token_url(&self) -> &str {
        &self.inner.token_url
    }

    /// Return a usable bearer token, fetching a new one if needed.
    ///
    /// # Errors
    ///
    /// - [`Error::AuthConfig`] if credentials are absent; no request is sent
    /// - [`Error::TokenResponse`] if the token payload is unusable
    /// - [`Error::Network`] / [`Error::HttpStatus`] from the token request,
    ///   unretried
    pub async fn get_valid_token(&self) -> Result<SecretString> {
        if !self.has_credentials() {
            error!("Riksbank API credentials not found in environment variables");
            return Err(Error::AuthConfig);
        }

        if let Some(token) = self.cached_usable().await {
            return Ok(token.secret.clone());
        }

        let token = self.fetch_new_token().await?;
        Ok(token.secret.clone())
    }

    /// Request a fresh token and replace the cached one.
    pub(crate) async fn fetch_new_token(&self) -> Result<Arc<AccessToken>> {
        let (client_id, client_secret) = self.inner.credentials.pair().ok_or(Error::AuthConfig)?;

        debug!(url = %self.inner.token_url, "Fetching new access token");

        let response = self
            .inner
            .http
            .post(&self.inner.token_url)
            .timeout(self.inner.timeout)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", client_id),
                ("client_secret", client_secret.expose_secret()),
            ])
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Network error when requesting access token");
                Error::Network(e)
            })?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            error!(status = status.as_u16(), "HTTP error when requesting access token");
            return Err(Error::from_status_body(status.as_u16(), &text));
        }

        let payload: TokenResponse = serde_json::from_str(&text)
            .map_err(|e| Error::TokenResponse(format!("token body is not valid JSON: {}", e)))?;

        let access_token = payload
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                error!("Token response did not contain access_token");
                Error::TokenResponse("response did not contain access_token".to_string())
            })?;
        let expires_in = payload.expires_in.unwrap_or(DEFAULT_EXPIRES_IN_SECS);

        let expires_at = Duration::try_seconds(expires_in)
            .and_then(|lifetime| Utc::now().checked_add_signed(lifetime))
            .ok_or_else(|| {
                error!(expires_in, "Token lifetime out of range");
                Error::TokenResponse(format!("expires_in out of range: {}", expires_in))
            })?;

        let token = Arc::new(AccessToken::new(access_token, expires_at));
        *self.inner.cached.write().await = Some(token.clone());

        info!(expires_in, "Obtained new access token");
        Ok(token)
    }

    /// Expiry of the cached token, if one has been fetched.
    pub async fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.inner.cached.read().await.as_ref().map(|t| t.expires_at)
    }

    /// Drop the cached token so the next call fetches a new one.
    pub async fn invalidate(&self) {
        *self.inner.cached.write().await = None;
    }

    async fn cached_usable(&self) -> Option<Arc<AccessToken>> {
        let cached = self.inner.cached.read().await;
        cached
            .as_ref()
            .filter(|t| t.is_usable_at(Utc::now()))
            .cloned()
    }

    #[cfg(test)]
    pub(crate) async fn store(&self, token: AccessToken) {
        *self.inner.cached.write().await = Some(Arc::new(token));
    }
}

impl std::fmt::Debug for TokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenProvider")
            .field("credentials", &self.inner.credentials)
            .field("token_url", &self.inner.token_url)
            .field("access_token", &"[REDACTED]")
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
}
