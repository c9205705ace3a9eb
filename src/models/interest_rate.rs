//! TORA interest rate models.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::primitives::ApiDate;

const OPEN_RANGE_START: &str = "1900-01-01";
const OPEN_RANGE_END: &str = "2100-12-31";

/// One observation of an interest rate series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterestRate {
    /// Series identifier, e.g. `"REPO"`
    pub id: Option<String>,
    /// Observed value
    pub value: Option<f64>,
    /// Observation date
    pub date: Option<String>,
    /// Rate type as reported upstream
    #[serde(rename = "type")]
    pub rate_type: Option<String>,
    /// Series description
    pub description: Option<String>,
    /// Unit of `value`; percent unless upstream says otherwise
    pub unit: String,
    /// Where the observation came from
    pub source: String,
}

impl InterestRate {
    /// Reshape a raw TORA item.
    pub fn from_raw(raw: &Value) -> Self {
        Self {
            id: string_field(raw, "id"),
            value: raw.get("value").and_then(Value::as_f64),
            date: string_field(raw, "date"),
            rate_type: string_field(raw, "type"),
            description: string_field(raw, "description"),
            unit: string_field(raw, "unit").unwrap_or_else(|| "%".to_string()),
            source: "TORA API".to_string(),
        }
    }
}

/// Availability window of an interest rate series.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DateRange {
    /// First available date
    pub from: String,
    /// Last available date
    pub to: String,
}

/// Metadata describing an interest rate series offered by TORA.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterestRateType {
    /// Series identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Longer description
    pub description: String,
    /// Category, e.g. `"Policy Rate"` or `"Money Market"`
    pub category: String,
    /// Availability window
    pub date_range: DateRange,
}

impl InterestRateType {
    /// Reshape a raw `/interest-rates/types` item.
    pub fn from_raw(raw: &Value) -> Self {
        Self {
            id: string_field(raw, "id").unwrap_or_default(),
            name: string_field(raw, "name").unwrap_or_default(),
            description: string_field(raw, "description").unwrap_or_default(),
            category: string_field(raw, "category").unwrap_or_default(),
            date_range: DateRange {
                from: string_field(raw, "availableFrom").unwrap_or_default(),
                to: string_field(raw, "availableTo").unwrap_or_default(),
            },
        }
    }
}

/// Filter for interest rate series metadata.
///
/// Used both as query parameters for `/interest-rates/types` and to
/// filter a list that is already in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterestRateTypeFilter {
    /// Category, matched case-insensitively
    pub category: Option<String>,
    /// Series must be available on or after this date
    pub date_from: Option<ApiDate>,
    /// Series must be available on or before this date
    pub date_to: Option<ApiDate>,
}

impl InterestRateTypeFilter {
    /// Create an empty filter that matches everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to a category.
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Restrict to series available from `date`.
    pub fn date_from(mut self, date: impl Into<ApiDate>) -> Self {
        self.date_from = Some(date.into());
        self
    }

    /// Restrict to series available until `date`.
    pub fn date_to(mut self, date: impl Into<ApiDate>) -> Self {
        self.date_to = Some(date.into());
        self
    }

    /// Returns `true` if no criterion is set.
    pub fn is_empty(&self) -> bool {
        self.category.is_none() && self.date_from.is_none() && self.date_to.is_none()
    }

    /// Query parameters understood by the TORA types endpoint.
    pub fn query_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some(category) = &self.category {
            params.push(("category".to_string(), category.clone()));
        }
        if let Some(from) = &self.date_from {
            params.push(("from".to_string(), from.to_string()));
        }
        if let Some(to) = &self.date_to {
            params.push(("to".to_string(), to.to_string()));
        }
        params
    }

    /// Returns `true` if `rate` satisfies every criterion.
    ///
    /// Date criteria match when the series' availability window overlaps
    /// the requested window. Missing bounds are treated as open.
    pub fn matches(&self, rate: &InterestRateType) -> bool {
        if let Some(category) = &self.category {
            if !rate.category.eq_ignore_ascii_case(category) {
                return false;
            }
        }

        let range_from = non_empty_or(&rate.date_range.from, OPEN_RANGE_START);
        let range_to = non_empty_or(&rate.date_range.to, OPEN_RANGE_END);

        // ISO dates compare correctly as strings.
        match (&self.date_from, &self.date_to) {
            (Some(from), Some(to)) => range_from <= to.as_str() && range_to >= from.as_str(),
            (Some(from), None) => range_to >= from.as_str(),
            (None, Some(to)) => range_from <= to.as_str(),
            (None, None) => true,
        }
    }

    /// Filter an in-memory list.
    pub fn apply(&self, rates: &[InterestRateType]) -> Vec<InterestRateType> {
        rates.iter().filter(|r| self.matches(r)).cloned().collect()
    }
}

fn non_empty_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.is_empty() {
        fallback
    } else {
        value
    }
}

fn string_field(raw: &Value, key: &str) -> Option<String> {
    match raw.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}
