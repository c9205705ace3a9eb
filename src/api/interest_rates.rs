//! TORA interest rate service.

use std::sync::Arc;

use tracing::debug;

use crate::client::{ClientInner, Paginator, RequestSpec};
use crate::models::{
    ApiDate, ApiFamily, ApiResult, InterestRate, InterestRateType, InterestRateTypeFilter, Listing,
};

const INTEREST_RATES_PATH: &str = "/interestrate";
const INTEREST_RATE_TYPES_PATH: &str = "/interest-rates/types";

/// Default number of observations requested per query.
pub const DEFAULT_RATE_LIMIT: u32 = 100;

/// Query for [`InterestRatesService::list`].
#[derive(Debug, Clone, PartialEq)]
pub struct InterestRatesQuery {
    /// First observation date
    pub from_date: Option<ApiDate>,
    /// Last observation date
    pub to_date: Option<ApiDate>,
    /// Series identifier, e.g. `"REPO"`
    pub interest_rate_id: Option<String>,
    /// Maximum number of observations
    pub limit: Option<u32>,
}

impl Default for InterestRatesQuery {
    fn default() -> Self {
        Self {
            from_date: None,
            to_date: None,
            interest_rate_id: None,
            limit: Some(DEFAULT_RATE_LIMIT),
        }
    }
}

impl InterestRatesQuery {
    /// Empty query with the default limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the first observation date.
    pub fn from_date(mut self, date: impl Into<ApiDate>) -> Self {
        self.from_date = Some(date.into());
        self
    }

    /// Set the last observation date.
    pub fn to_date(mut self, date: impl Into<ApiDate>) -> Self {
        self.to_date = Some(date.into());
        self
    }

    /// Restrict to one series.
    pub fn interest_rate_id(mut self, id: impl Into<String>) -> Self {
        self.interest_rate_id = Some(id.into());
        self
    }

    /// Set the limit, or `None` to let the API decide.
    pub fn limit(mut self, limit: Option<u32>) -> Self {
        self.limit = limit;
        self
    }

    fn to_request(&self) -> RequestSpec {
        RequestSpec::get(INTEREST_RATES_PATH)
            .with_query_opt("fromDate", self.from_date.as_ref())
            .with_query_opt("toDate", self.to_date.as_ref())
            .with_query_opt("interestRateId", self.interest_rate_id.as_deref())
            .with_query_opt("limit", self.limit.filter(|l| *l > 0))
    }
}

/// Service for TORA interest rates.
///
/// # Example
///
/// ```no_run
/// use riksbank_rs::api::InterestRatesQuery;
/// use riksbank_rs::models::InterestRateTypeFilter;
///
/// # async fn example(client: riksbank_rs::RiksbankClient) -> Result<(), riksbank_rs::ErrorInfo> {
/// let repo = client
///     .interest_rates()
///     .list(&InterestRatesQuery::new().interest_rate_id("REPO").from_date("2024-01-01"))
///     .await?;
/// println!("{} observations", repo.count);
///
/// let policy = client
///     .interest_rates()
///     .types(&InterestRateTypeFilter::new().category("policy"))
///     .await?;
/// # let _ = policy;
/// # Ok(())
/// # }
/// ```
pub struct InterestRatesService {
    inner: Arc<ClientInner>,
}

impl InterestRatesService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// Fetch interest rate observations.
    pub async fn list(&self, query: &InterestRatesQuery) -> ApiResult<Listing<InterestRate>> {
        debug!(?query, "Fetching interest rates");
        let raw = Paginator::new(self.inner.clone(), ApiFamily::Tora)
            .fetch_all(&query.to_request())
            .await?;
        Ok(raw.map(|item| InterestRate::from_raw(&item)))
    }

    /// Fetch the interest rate series TORA offers.
    ///
    /// The filter is sent upstream as `category`, `from` and `to`.
    /// [`InterestRateTypeFilter::apply`] repeats it locally on a cached list.
    pub async fn types(
        &self,
        filter: &InterestRateTypeFilter,
    ) -> ApiResult<Listing<InterestRateType>> {
        let spec = filter
            .query_params()
            .into_iter()
            .fold(RequestSpec::get(INTEREST_RATE_TYPES_PATH), |spec, (k, v)| {
                spec.with_query(k, v)
            });

        let raw = Paginator::new(self.inner.clone(), ApiFamily::Tora)
            .fetch_all(&spec)
            .await?;
        Ok(raw.map(|item| InterestRateType::from_raw(&item)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_request() {
        let spec = InterestRatesQuery::new().to_request();
        assert_eq!(spec.endpoint, INTEREST_RATES_PATH);
        assert_eq!(spec.query, vec![("limit".to_string(), "100".to_string())]);
    }

    #[test]
    fn test_full_request() {
        let spec = InterestRatesQuery::new()
            .from_date("2024-01-01")
            .to_date("2024-06-30")
            .interest_rate_id("REPO")
            .limit(Some(10))
            .to_request();
        let keys: Vec<_> = spec.query.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["fromDate", "toDate", "interestRateId", "limit"]);
    }
}
