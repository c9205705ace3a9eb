//! Caller-facing result types.
//!
//! Every public operation returns [`ApiResult`]: either the data or an
//! [`ErrorInfo`] describing why it could not be produced. Callers branch on
//! the variant; nothing below this boundary panics or leaks an internal
//! error type.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::Error;

/// Result of a public client operation.
pub type ApiResult<T> = std::result::Result<T, ErrorInfo>;

/// Classification of a failed operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Credentials are not configured.
    AuthConfig,
    /// The token endpoint returned an unusable payload.
    TokenResponse,
    /// Connection, DNS or timeout failure after retries.
    Network,
    /// Non-2xx response.
    HttpStatus,
    /// Unknown API family or unusable base URL.
    Config,
    /// A response body could not be decoded.
    Decode,
    /// The caller passed an unusable argument.
    InvalidInput,
}

/// Serializable description of a failed operation.
///
/// Serializes as `{"error": message, "details": ..., "endpoint": ...}`
/// with `status` and `kind` alongside.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Human-readable summary.
    #[serde(rename = "error")]
    pub message: String,
    /// Parsed error body, raw text, or the underlying error message.
    #[serde(default)]
    pub details: Option<Value>,
    /// URL (or endpoint path) the failing request targeted.
    pub endpoint: String,
    /// HTTP status, when the failure came from a response.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    /// Failure classification.
    pub kind: ErrorKind,
}

impl ErrorInfo {
    /// Convert an internal error into its caller-facing form.
    pub fn from_error(err: Error, endpoint: impl Into<String>) -> Self {
        let kind = err.kind();
        let status = err.status();
        let (message, details) = match err {
            Error::HttpStatus { status, body } => (
                format!("HTTP error accessing API: {}", status),
                Some(body),
            ),
            Error::Network(e) => (
                format!("Network error accessing API: {}", e),
                Some(Value::String(e.to_string())),
            ),
            other => {
                let text = other.to_string();
                (text.clone(), Some(Value::String(text)))
            }
        };

        Self {
            message,
            details,
            endpoint: endpoint.into(),
            status,
            kind,
        }
    }

    /// Returns `true` if this failure came from a response status.
    pub fn is_http_status(&self) -> bool {
        self.kind == ErrorKind::HttpStatus
    }
}

impl fmt::Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.endpoint)
    }
}

impl std::error::Error for ErrorInfo {}

/// The merged items of one logical (possibly multi-page) request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing<T = Value> {
    /// Number of items.
    pub count: usize,
    /// Items in upstream order.
    pub items: Vec<T>,
}

impl<T> Listing<T> {
    /// Build a listing; `count` always equals `items.len()`.
    pub fn new(items: Vec<T>) -> Self {
        Self {
            count: items.len(),
            items,
        }
    }

    /// Returns `true` if there are no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Transform every item, keeping the count consistent.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Listing<U> {
        Listing::new(self.items.into_iter().map(f).collect())
    }

    /// Keep only the items matching `pred`.
    pub fn filter(self, pred: impl FnMut(&T) -> bool) -> Listing<T> {
        Listing::new(self.items.into_iter().filter(pred).collect())
    }
}

impl Listing<Value> {
    /// Decode every raw item into a typed view.
    pub fn try_map<T: DeserializeOwned>(self) -> crate::Result<Listing<T>> {
        let items = self
            .items
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<T>, _>>()?;
        Ok(Listing::new(items))
    }
}

impl<T> Default for Listing<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

/// Render a result as the JSON object handed to the orchestrating agent.
///
/// ```
/// use riksbank_rs::models::{response_json, Listing};
///
/// let ok: riksbank_rs::ApiResult<Listing> = Ok(Listing::new(vec![serde_json::json!({"id": 1})]));
/// assert_eq!(response_json(&ok)["count"], 1);
/// ```
pub fn response_json<T: Serialize>(result: &ApiResult<T>) -> Value {
    let rendered = match result {
        Ok(value) => serde_json::to_value(value),
        Err(info) => serde_json::to_value(info),
    };
    rendered.unwrap_or_else(|e| json!({ "error": format!("Failed to render response: {}", e) }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_info_from_http_status() {
        let err = Error::HttpStatus {
            status: 404,
            body: json!({"message": "not found"}),
        };
        let info = ErrorInfo::from_error(err, "https://api.test/swea/v1/x");

        assert_eq!(info.message, "HTTP error accessing API: 404");
        assert_eq!(info.status, Some(404));
        assert_eq!(info.kind, ErrorKind::HttpStatus);
        assert_eq!(info.details, Some(json!({"message": "not found"})));
    }

    #[test]
    fn test_error_info_serializes_contract_keys() {
        let info = ErrorInfo::from_error(Error::AuthConfig, "/calendar/calendardays");
        let value = serde_json::to_value(&info).unwrap();

        assert!(value["error"]
            .as_str()
            .unwrap()
            .contains("Missing Riksbank API credentials"));
        assert_eq!(value["endpoint"], "/calendar/calendardays");
        assert_eq!(value["kind"], "auth_config");
        assert!(value.get("status").is_none());
    }

    #[test]
    fn test_listing_count_follows_items() {
        let listing = Listing::new(vec![1, 2, 3]).filter(|n| *n != 2);
        assert_eq!(listing.count, 2);
        assert_eq!(listing.items, vec![1, 3]);
        assert!(Listing::<i32>::default().is_empty());
    }

    #[test]
    fn test_response_json_shapes() {
        let ok: ApiResult<Listing<i32>> = Ok(Listing::new(vec![7]));
        assert_eq!(response_json(&ok), json!({"count": 1, "items": [7]}));

        let err: ApiResult<Listing<i32>> =
            Err(ErrorInfo::from_error(Error::Config("Invalid API type: x".into()), "/x"));
        let rendered = response_json(&err);
        assert!(rendered.get("error").is_some());
        assert!(rendered.get("count").is_none());
    }
}
