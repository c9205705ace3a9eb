//! SWEA calendar day models.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::primitives::DATE_FORMAT;

/// One day from the SWEA calendar.
///
/// Upstream fields the client does not interpret are kept in `extra`
/// and serialized back unchanged.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CalendarDay {
    /// Calendar date, `YYYY-MM-DD`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// Whether Swedish banks are open on this day
    #[serde(
        rename = "isBusinessDay",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub is_business_day: Option<bool>,
    /// English weekday name, e.g. `"Sunday"`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weekday: Option<String>,
    /// Weekday ordinal with Monday = 0
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weekday_number: Option<u32>,
    /// Calendar quarter, 1-4
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quarter: Option<u32>,
    /// Remaining upstream fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CalendarDay {
    /// Parse `date`, if present and well formed.
    pub fn naive_date(&self) -> Option<NaiveDate> {
        self.date
            .as_deref()
            .and_then(|d| NaiveDate::parse_from_str(d, DATE_FORMAT).ok())
    }

    /// Derive weekday name, weekday number and quarter from `date`.
    ///
    /// Days whose date is missing or malformed are returned unchanged.
    ///
    /// ```
    /// use riksbank_rs::models::CalendarDay;
    ///
    /// let day = CalendarDay {
    ///     date: Some("2023-01-01".into()),
    ///     ..Default::default()
    /// }
    /// .enrich();
    /// assert_eq!(day.weekday.as_deref(), Some("Sunday"));
    /// assert_eq!(day.weekday_number, Some(6));
    /// assert_eq!(day.quarter, Some(1));
    /// ```
    pub fn enrich(mut self) -> Self {
        if let Some(date) = self.naive_date() {
            self.weekday = Some(date.format("%A").to_string());
            self.weekday_number = Some(date.weekday().num_days_from_monday());
            self.quarter = Some((date.month() - 1) / 3 + 1);
        }
        self
    }

    /// Business-day flag; a day without the flag counts as a business day.
    pub fn is_business_day(&self) -> bool {
        self.is_business_day.unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn day(value: Value) -> CalendarDay {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_enrich_new_year_2023() {
        let d = day(json!({"date": "2023-01-01", "isBusinessDay": false})).enrich();
        assert_eq!(d.weekday.as_deref(), Some("Sunday"));
        assert_eq!(d.weekday_number, Some(6));
        assert_eq!(d.quarter, Some(1));
        assert!(!d.is_business_day());

        let d = day(json!({"date": "2023-01-02", "isBusinessDay": true})).enrich();
        assert_eq!(d.weekday.as_deref(), Some("Monday"));
        assert_eq!(d.weekday_number, Some(0));
    }

    #[test]
    fn test_enrich_quarters() {
        for (date, quarter) in [
            ("2024-03-31", 1),
            ("2024-04-01", 2),
            ("2024-09-30", 3),
            ("2024-12-31", 4),
        ] {
            let d = day(json!({ "date": date })).enrich();
            assert_eq!(d.quarter, Some(quarter), "{date}");
        }
    }

    #[test]
    fn test_enrich_keeps_malformed_days() {
        let d = day(json!({"date": "not-a-date", "note": "x"})).enrich();
        assert_eq!(d.weekday, None);
        assert_eq!(d.quarter, None);
        assert_eq!(d.extra.get("note"), Some(&json!("x")));
    }

    #[test]
    fn test_missing_flag_defaults_to_business_day() {
        let d = day(json!({"date": "2023-01-04"}));
        assert!(d.is_business_day());
    }

    #[test]
    fn test_extra_fields_round_trip() {
        let d = day(json!({"date": "2023-01-02", "swedishBankday": true})).enrich();
        let out = serde_json::to_value(&d).unwrap();
        assert_eq!(out["swedishBankday"], true);
        assert_eq!(out["weekday"], "Monday");
        assert!(out.get("isBusinessDay").is_none());
    }
}
