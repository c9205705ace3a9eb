//! SWEA calendar service.

use std::sync::Arc;

use chrono::{Days, NaiveDate};
use tracing::debug;

use super::decode_listing;
use crate::client::{ClientInner, Paginator, RequestSpec};
use crate::models::{ApiDate, ApiFamily, ApiResult, CalendarDay, ErrorInfo, Listing};
use crate::Error;

const CALENDAR_DAYS_PATH: &str = "/calendar/calendardays";

/// Default number of days requested per calendar query.
pub const DEFAULT_CALENDAR_LIMIT: u32 = 100;

/// Query for [`CalendarService::calendar_days`].
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarDaysQuery {
    /// First day of the range (inclusive)
    pub from_date: ApiDate,
    /// Last day of the range (inclusive)
    pub to_date: Option<ApiDate>,
    /// Maximum number of days to return
    pub limit: Option<u32>,
    /// Include weekends and holidays
    pub include_non_business_days: bool,
}

impl CalendarDaysQuery {
    /// All days from `from_date`, limited to [`DEFAULT_CALENDAR_LIMIT`].
    pub fn new(from_date: impl Into<ApiDate>) -> Self {
        Self {
            from_date: from_date.into(),
            to_date: None,
            limit: Some(DEFAULT_CALENDAR_LIMIT),
            include_non_business_days: true,
        }
    }

    /// Set the last day of the range.
    pub fn to_date(mut self, date: impl Into<ApiDate>) -> Self {
        self.to_date = Some(date.into());
        self
    }

    /// Set the limit, or `None` to let the API decide.
    pub fn limit(mut self, limit: Option<u32>) -> Self {
        self.limit = limit;
        self
    }

    /// Only return business days.
    pub fn business_days_only(mut self) -> Self {
        self.include_non_business_days = false;
        self
    }

    fn to_request(&self) -> RequestSpec {
        let spec = RequestSpec::get(CALENDAR_DAYS_PATH)
            .with_query("fromDate", &self.from_date)
            .with_query_opt("toDate", self.to_date.as_ref())
            .with_query_opt("limit", self.limit.filter(|l| *l > 0));

        if self.include_non_business_days {
            spec
        } else {
            spec.with_query("businessDaysOnly", true)
        }
    }
}

/// Service for SWEA calendar lookups.
///
/// # Example
///
/// ```no_run
/// use riksbank_rs::api::CalendarDaysQuery;
///
/// # async fn example(client: riksbank_rs::RiksbankClient) {
/// let query = CalendarDaysQuery::new("2023-01-01").to_date("2023-01-31");
/// match client.calendar().calendar_days(&query).await {
///     Ok(days) => {
///         for day in days.items {
///             println!("{:?} {:?}", day.date, day.weekday);
///         }
///     }
///     Err(info) => eprintln!("{info}"),
/// }
///
/// let open = client.calendar().is_business_day("2023-12-25").await.unwrap_or(true);
/// # let _ = open;
/// # }
/// ```
pub struct CalendarService {
    inner: Arc<ClientInner>,
}

impl CalendarService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// Fetch calendar days, enriched with weekday and quarter.
    pub async fn calendar_days(&self, query: &CalendarDaysQuery) -> ApiResult<Listing<CalendarDay>> {
        debug!(?query, "Fetching calendar days");
        let raw = Paginator::new(self.inner.clone(), ApiFamily::Swea)
            .fetch_all(&query.to_request())
            .await?;

        let days: Listing<CalendarDay> = decode_listing(raw, CALENDAR_DAYS_PATH)?;
        Ok(days.map(CalendarDay::enrich))
    }

    /// Fetch business days only.
    pub async fn business_days(
        &self,
        from_date: impl Into<ApiDate>,
        to_date: Option<ApiDate>,
        limit: Option<u32>,
    ) -> ApiResult<Listing<CalendarDay>> {
        let mut query = CalendarDaysQuery::new(from_date).limit(limit).business_days_only();
        query.to_date = to_date;
        self.calendar_days(&query).await
    }

    /// Check whether banks are open on `date`.
    ///
    /// A date the calendar does not know is not a business day. Upstream
    /// failures are returned as errors; use `unwrap_or(true)` to fail open.
    pub async fn is_business_day(&self, date: impl Into<ApiDate>) -> ApiResult<bool> {
        let date = date.into();
        let query = CalendarDaysQuery::new(date.clone()).to_date(date);
        let days = self.calendar_days(&query).await?;

        Ok(days
            .items
            .first()
            .map(CalendarDay::is_business_day)
            .unwrap_or(false))
    }

    /// The next `count` business days strictly after `after`.
    pub async fn next_business_days(
        &self,
        after: impl Into<ApiDate>,
        count: usize,
    ) -> ApiResult<Listing<CalendarDay>> {
        let after = after.into();
        let start = after.to_naive_date().ok_or_else(|| {
            ErrorInfo::from_error(
                Error::InvalidInput(format!("Invalid date: {}", after)),
                CALENDAR_DAYS_PATH,
            )
        })?;
        if count == 0 {
            return Ok(Listing::default());
        }

        let window = count.saturating_mul(2).saturating_add(10);
        let from = offset(start, 1);
        let to = offset(start, window as u64);
        let query = CalendarDaysQuery::new(from)
            .to_date(to)
            .limit(u32::try_from(window).ok())
            .business_days_only();

        let days = self.calendar_days(&query).await?;
        Ok(Listing::new(
            days.items
                .into_iter()
                .filter(|d| d.is_business_day() && d.naive_date().is_some_and(|n| n > start))
                .take(count)
                .collect(),
        ))
    }
}

fn offset(date: NaiveDate, days: u64) -> NaiveDate {
    date.checked_add_days(Days::new(days)).unwrap_or(NaiveDate::MAX)
}
