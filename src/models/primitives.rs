//! Primitive types and newtypes for type-safe API interactions.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Date format used by every date-bearing query parameter.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// The upstream API family a request is sent to.
///
/// SWEA and TORA share one OAuth2 credential but live under different
/// base URLs. Kolada is a public API and is called without a token.
///
/// # Example
///
/// ```
/// use riksbank_rs::ApiFamily;
///
/// let family: ApiFamily = "tora".parse().unwrap();
/// assert_eq!(family, ApiFamily::Tora);
/// assert!(family.requires_auth());
/// assert!("nope".parse::<ApiFamily>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiFamily {
    /// Riksbank SWEA API (calendar, series, exchange rates).
    Swea,
    /// Riksbank TORA API (interest rates).
    Tora,
    /// Kolada open municipality data API.
    Kolada,
}

impl ApiFamily {
    /// Default base URL for this family.
    pub fn default_base_url(&self) -> &'static str {
        match self {
            ApiFamily::Swea => "https://api.riksbank.se/swea/v1",
            ApiFamily::Tora => "https://api.riksbank.se/tora/v1",
            ApiFamily::Kolada => "https://api.kolada.se/v2",
        }
    }

    /// Returns `true` if requests to this family carry a bearer token.
    pub fn requires_auth(&self) -> bool {
        !matches!(self, ApiFamily::Kolada)
    }

    /// Lowercase identifier, as accepted by [`FromStr`].
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiFamily::Swea => "swea",
            ApiFamily::Tora => "tora",
            ApiFamily::Kolada => "kolada",
        }
    }
}

impl fmt::Display for ApiFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str().to_uppercase())
    }
}

impl FromStr for ApiFamily {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "swea" => Ok(ApiFamily::Swea),
            "tora" => Ok(ApiFamily::Tora),
            "kolada" => Ok(ApiFamily::Kolada),
            _ => Err(Error::Config(format!("Invalid API type: {}", s))),
        }
    }
}

/// A date query parameter, normalised to `YYYY-MM-DD`.
///
/// Calendar values are formatted on conversion; strings are passed
/// through untouched so callers can forward dates they already hold.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use riksbank_rs::ApiDate;
///
/// let date = ApiDate::from(NaiveDate::from_ymd_opt(2023, 1, 3).unwrap());
/// assert_eq!(date.as_str(), "2023-01-03");
/// assert_eq!(ApiDate::from("2023-01-03"), date);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApiDate(String);

impl ApiDate {
    /// Create a date parameter from a raw string.
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the date as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse the value back into a calendar date, if it is well formed.
    pub fn to_naive_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.0, DATE_FORMAT).ok()
    }
}

impl fmt::Display for ApiDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ApiDate {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<NaiveDate> for ApiDate {
    fn from(date: NaiveDate) -> Self {
        Self(date.format(DATE_FORMAT).to_string())
    }
}

impl From<NaiveDateTime> for ApiDate {
    fn from(dt: NaiveDateTime) -> Self {
        Self::from(dt.date())
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for ApiDate {
    fn from(dt: DateTime<Tz>) -> Self {
        Self::from(dt.naive_local().date())
    }
}

impl From<String> for ApiDate {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ApiDate {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}
