//! HTTP client and request executor for the Riksbank APIs.

use std::sync::Arc;

use reqwest::header::CONTENT_TYPE;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tracing::{debug, error, warn};
use url::Url;

use crate::api::{CalendarService, InterestRatesService, KoladaService};
use crate::auth::{Credentials, TokenProvider};
use crate::models::{ApiFamily, ApiResult, ErrorInfo, Listing};
use crate::{Error, Result};

use super::config::{ClientConfig, RetryConfig};
use super::paginated::Paginator;
use super::request::{HttpMethod, RequestSpec};

/// The main client for the Riksbank SWEA/TORA and Kolada APIs.
///
/// One client owns one HTTP connection pool and one [`TokenProvider`]. It is
/// cheap to clone and safe to share between tasks; all clones use the same
/// cached token.
///
/// # Example
///
/// ```no_run
/// use riksbank_rs::api::CalendarDaysQuery;
/// use riksbank_rs::{ApiFamily, RequestSpec, RiksbankClient};
///
/// # async fn example() -> riksbank_rs::Result<()> {
/// let client = RiksbankClient::from_env()?;
///
/// let query = CalendarDaysQuery::new("2023-01-01").to_date("2023-01-31");
/// let days = client.calendar().calendar_days(&query).await;
/// match days {
///     Ok(days) => println!("{} calendar days", days.count),
///     Err(info) => eprintln!("{info}"),
/// }
///
/// // Raw access to any endpoint
/// let spec = RequestSpec::get("/interestrate").with_query("limit", 10);
/// let raw = client.execute(&spec, ApiFamily::Tora, &Default::default()).await;
/// # let _ = raw;
/// # Ok(())
/// # }
/// ```
pub struct RiksbankClient {
    pub(crate) inner: Arc<ClientInner>,
}

pub(crate) struct ClientInner {
    pub(crate) http: reqwest::Client,
    pub(crate) tokens: TokenProvider,
    pub(crate) config: ClientConfig,
}

impl RiksbankClient {
    /// Create a client with explicit credentials and configuration.
    ///
    /// Missing credentials are allowed; authenticated calls then fail with
    /// an `auth_config` error without touching the network.
    pub fn new(credentials: Credentials, config: ClientConfig) -> Result<Self> {
        let http = build_http_client(&config)?;
        let tokens = TokenProvider::new(
            credentials,
            config.token_url.clone(),
            http.clone(),
            config.token_timeout,
        );
        Ok(Self::from_parts(http, tokens, config))
    }

    /// Create a client from `RIKSBANK_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(Credentials::from_env(), ClientConfig::from_env())
    }

    /// Create a client around an existing token provider.
    ///
    /// Clients built from clones of the same provider share its token cache.
    pub fn with_token_provider(tokens: TokenProvider, config: ClientConfig) -> Result<Self> {
        let http = build_http_client(&config)?;
        Ok(Self::from_parts(http, tokens, config))
    }

    fn from_parts(http: reqwest::Client, tokens: TokenProvider, config: ClientConfig) -> Self {
        Self {
            inner: Arc::new(ClientInner {
                http,
                tokens,
                config,
            }),
        }
    }

    /// Get the SWEA calendar service.
    pub fn calendar(&self) -> CalendarService {
        CalendarService::new(self.inner.clone())
    }

    /// Get the TORA interest rate service.
    pub fn interest_rates(&self) -> InterestRatesService {
        InterestRatesService::new(self.inner.clone())
    }

    /// Get the Kolada statistics service.
    pub fn kolada(&self) -> KoladaService {
        KoladaService::new(self.inner.clone())
    }

    /// Execute one request with retry, returning the decoded JSON body.
    ///
    /// SWEA and TORA requests carry a bearer token from the shared provider.
    /// An empty response body yields `Value::Null`.
    pub async fn execute(
        &self,
        spec: &RequestSpec,
        family: ApiFamily,
        retry: &RetryConfig,
    ) -> ApiResult<Value> {
        self.inner.execute(spec, family, retry).await
    }

    /// Fetch every page starting at `spec` and merge the items.
    ///
    /// Uses the family's default page shape and the configured retry policy.
    pub async fn fetch_all(&self, spec: &RequestSpec, family: ApiFamily) -> ApiResult<Listing> {
        self.paginator(family).fetch_all(spec).await
    }

    /// A paginator for `family` that can be customised before use.
    pub fn paginator(&self, family: ApiFamily) -> Paginator {
        Paginator::new(self.inner.clone(), family)
    }

    /// The shared token provider.
    pub fn token_provider(&self) -> &TokenProvider {
        &self.inner.tokens
    }

    /// The client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }
}

fn build_http_client(config: &ClientConfig) -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .build()?)
}

impl ClientInner {
    /// Build the full request URL for `spec`.
    ///
    /// Absolute endpoints bypass the family base URL.
    pub(crate) fn resolve_url(&self, spec: &RequestSpec, family: ApiFamily) -> Result<Url> {
        let mut url = if spec.is_absolute() {
            Url::parse(&spec.endpoint)?
        } else {
            let base = self.config.require_base_url(family)?;
            let raw = format!("{}{}", base, spec.normalized_endpoint());
            Url::parse(&raw).map_err(|e| {
                Error::Config(format!("Invalid base URL for {} API: {} ({})", family, base, e))
            })?
        };

        if !spec.query.is_empty() {
            url.query_pairs_mut().extend_pairs(spec.query.iter());
        }
        Ok(url)
    }

    /// Resolve, execute and convert failures at the boundary.
    pub(crate) async fn execute(
        &self,
        spec: &RequestSpec,
        family: ApiFamily,
        retry: &RetryConfig,
    ) -> ApiResult<Value> {
        let url = self
            .resolve_url(spec, family)
            .map_err(|e| ErrorInfo::from_error(e, spec.endpoint.clone()))?;

        self.try_execute(spec, &url, family, retry)
            .await
            .map_err(|e| ErrorInfo::from_error(e, url.as_str()))
    }

    /// Send `spec` to `url`, retrying transient failures.
    ///
    /// The token is looked up before every attempt so a refresh between
    /// attempts is picked up. Token failures are returned immediately.
    /// Authenticated families only talk to the origin of their base URL.
    pub(crate) async fn try_execute(
        &self,
        spec: &RequestSpec,
        url: &Url,
        family: ApiFamily,
        retry: &RetryConfig,
    ) -> Result<Value> {
        if family.requires_auth() {
            self.ensure_same_origin(url, family)?;
        }
        let mut attempt: u32 = 0;

        loop {
            let token = if family.requires_auth() {
                Some(self.tokens.get_valid_token().await?)
            } else {
                None
            };

            match self.send_once(spec, url, token.as_ref()).await {
                Ok(body) => return Ok(body),
                Err(err) if attempt < retry.max_retries && retry.should_retry(&err) => {
                    attempt += 1;
                    let delay = retry.backoff_for_attempt(attempt);
                    warn!(
                        family = %family,
                        url = %url,
                        attempt,
                        max_retries = retry.max_retries,
                        status = ?err.status(),
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "Transient failure, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(err) => {
                    error!(
                        family = %family,
                        url = %url,
                        attempts = attempt + 1,
                        status = ?err.status(),
                        error = %err,
                        "Request failed"
                    );
                    return Err(err);
                }
            }
        }
    }

    fn ensure_same_origin(&self, url: &Url, family: ApiFamily) -> Result<()> {
        let base = Url::parse(self.config.require_base_url(family)?)?;
        if url.origin() != base.origin() {
            warn!(family = %family, url = %url, "Refusing to send credentials to foreign origin");
            return Err(Error::Config(format!(
                "URL {} is outside the {} API origin {}",
                url,
                family,
                base.origin().ascii_serialization()
            )));
        }
        Ok(())
    }

    async fn send_once(
        &self,
        spec: &RequestSpec,
        url: &Url,
        token: Option<&SecretString>,
    ) -> Result<Value> {
        let mut request = match spec.method {
            HttpMethod::Get => self.http.get(url.clone()),
            HttpMethod::Post => self.http.post(url.clone()),
        }
        .timeout(self.config.timeout);

        for (name, value) in &spec.headers {
            request = request.header(name.as_str(), value.as_str());
        }
        if let Some(token) = token {
            request = request.bearer_auth(token.expose_secret());
        }
        if let Some(body) = &spec.body {
            if !spec.has_header(CONTENT_TYPE.as_str()) {
                request = request.header(CONTENT_TYPE, "application/json");
            }
            request = request.body(serde_json::to_vec(body)?);
        }

        debug!(method = %spec.method, url = %url, "Sending request");
        let response = request.send().await.map_err(Error::from_send)?;
        let status = response.status();
        let text = response.text().await?;

        if status.is_success() {
            if text.trim().is_empty() {
                return Ok(Value::Null);
            }
            return Ok(serde_json::from_str(&text)?);
        }

        Err(Error::from_status_body(status.as_u16(), &text))
    }
}

impl Clone for RiksbankClient {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl std::fmt::Debug for RiksbankClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RiksbankClient")
            .field("config", &self.inner.config)
            .field("tokens", &self.inner.tokens)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> RiksbankClient {
        let config = ClientConfig::default()
            .with_base_url(ApiFamily::Swea, "http://localhost:1/swea/v1/")
            .with_base_url(ApiFamily::Kolada, "");
        RiksbankClient::new(Credentials::none(), config).unwrap()
    }

    #[test]
    fn test_resolve_relative_endpoint() {
        let client = client();
        let spec = RequestSpec::get("calendar/calendardays")
            .with_query("fromDate", "2023-01-01")
            .with_query("limit", 100);

        let url = client.inner.resolve_url(&spec, ApiFamily::Swea).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:1/swea/v1/calendar/calendardays?fromDate=2023-01-01&limit=100"
        );
    }

    #[test]
    fn test_resolve_absolute_endpoint_ignores_base() {
        let client = client();
        let spec = RequestSpec::get("https://api.kolada.se/v2/kpi?title=skola&page=2");

        let url = client.inner.resolve_url(&spec, ApiFamily::Kolada).unwrap();
        assert_eq!(url.as_str(), "https://api.kolada.se/v2/kpi?title=skola&page=2");
    }

    #[test]
    fn test_resolve_missing_base_url() {
        let client = client();
        let err = client
            .inner
            .resolve_url(&RequestSpec::get("/kpi"), ApiFamily::Kolada)
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_query_values_are_encoded() {
        let client = client();
        let spec = RequestSpec::get("/x").with_query("title", "skola & vård");
        let url = client.inner.resolve_url(&spec, ApiFamily::Swea).unwrap();
        assert_eq!(url.query(), Some("title=skola+%26+v%C3%A5rd"));
    }

    #[test]
    fn test_authenticated_family_stays_on_base_origin() {
        let client = client();
        let inner = &client.inner;

        let same = Url::parse("http://localhost:1/other/path?page=2").unwrap();
        assert!(inner.ensure_same_origin(&same, ApiFamily::Swea).is_ok());

        for foreign in [
            "http://localhost:2/swea/v1/calendar",
            "https://localhost:1/swea/v1/calendar",
            "http://evil.test:1/swea/v1/calendar",
        ] {
            let url = Url::parse(foreign).unwrap();
            let err = inner.ensure_same_origin(&url, ApiFamily::Swea).unwrap_err();
            assert!(matches!(err, Error::Config(_)), "{foreign}");
        }
    }
}
