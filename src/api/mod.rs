//! API service modules for the Riksbank and Kolada endpoints.
//!
//! Each service maps logical operations onto requests against one
//! [`ApiFamily`](crate::ApiFamily) and shapes the merged result.

mod calendar;
mod interest_rates;
mod kolada;

pub use calendar::{CalendarDaysQuery, CalendarService, DEFAULT_CALENDAR_LIMIT};
pub use interest_rates::{InterestRatesQuery, InterestRatesService, DEFAULT_RATE_LIMIT};
pub use kolada::KoladaService;

use serde::de::DeserializeOwned;

use crate::models::{ApiResult, ErrorInfo, Listing};

/// Decode raw items, reporting failures against `endpoint`.
pub(crate) fn decode_listing<T: DeserializeOwned>(
    listing: Listing,
    endpoint: &str,
) -> ApiResult<Listing<T>> {
    listing
        .try_map()
        .map_err(|e| ErrorInfo::from_error(e, endpoint))
}
