//! Request description passed to the executor.

use std::borrow::Cow;

use serde_json::Value;
use url::Url;

use crate::{Error, Result};

/// HTTP methods used by the Riksbank and Kolada APIs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// GET
    Get,
    /// POST
    Post,
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HttpMethod::Get => f.write_str("GET"),
            HttpMethod::Post => f.write_str("POST"),
        }
    }
}

/// A single logical request against one API family.
///
/// `endpoint` is a path under the family's base URL, or an absolute
/// `http(s)://` URL which is then used as is. Query parameters keep their
/// insertion order.
///
/// # Example
///
/// ```
/// use riksbank_rs::RequestSpec;
///
/// let spec = RequestSpec::get("calendar/calendardays")
///     .with_query("fromDate", "2023-01-01")
///     .with_query_opt("toDate", None::<String>);
/// assert_eq!(spec.normalized_endpoint(), "/calendar/calendardays");
/// assert_eq!(spec.query.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSpec {
    /// HTTP method
    pub method: HttpMethod,
    /// Path relative to the family base URL, or an absolute URL
    pub endpoint: String,
    /// Ordered query parameters
    pub query: Vec<(String, String)>,
    /// Optional JSON body
    pub body: Option<Value>,
    /// Extra request headers
    pub headers: Vec<(String, String)>,
}

impl RequestSpec {
    /// Create a request with no query, body or extra headers.
    pub fn new(method: HttpMethod, endpoint: impl Into<String>) -> Self {
        Self {
            method,
            endpoint: endpoint.into(),
            query: Vec::new(),
            body: None,
            headers: Vec::new(),
        }
    }

    /// A GET request.
    pub fn get(endpoint: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, endpoint)
    }

    /// A POST request with a JSON body.
    pub fn post(endpoint: impl Into<String>, body: Value) -> Self {
        Self::new(HttpMethod::Post, endpoint).with_body(body)
    }

    /// Append a query parameter.
    pub fn with_query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Append a query parameter if `value` is present.
    pub fn with_query_opt<V: ToString>(self, key: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(v) => self.with_query(key, v),
            None => self,
        }
    }

    /// Set `key` to `value`, dropping any earlier values for `key`.
    pub fn with_replaced_query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.retain(|(k, _)| k != key);
        self.with_query(key, value)
    }

    /// Set the JSON body.
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Add a request header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Returns `true` if a header with this name is set (case-insensitive).
    pub fn has_header(&self, name: &str) -> bool {
        self.headers.iter().any(|(k, _)| k.eq_ignore_ascii_case(name))
    }

    /// Returns `true` if `endpoint` is an absolute URL.
    pub fn is_absolute(&self) -> bool {
        is_absolute_url(&self.endpoint)
    }

    /// The endpoint with a guaranteed leading `/`, unless it is absolute.
    pub fn normalized_endpoint(&self) -> Cow<'_, str> {
        if self.is_absolute() || self.endpoint.starts_with('/') {
            Cow::Borrowed(&self.endpoint)
        } else {
            Cow::Owned(format!("/{}", self.endpoint))
        }
    }
}

pub(crate) fn is_absolute_url(s: &str) -> bool {
    let lower = s.get(..8).unwrap_or(s).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Join `segments` into a `/`-rooted path, percent-encoding each one.
///
/// Empty, `.` and `..` segments are rejected since they would change which
/// resource the path names.
pub(crate) fn encode_path<'a, I>(segments: I) -> Result<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut url = Url::parse("http://localhost/")?;
    {
        let mut path = url
            .path_segments_mut()
            .map_err(|_| Error::InvalidInput("URL cannot hold a path".to_string()))?;
        path.clear();
        for segment in segments {
            if matches!(segment, "" | "." | "..") {
                return Err(Error::InvalidInput(format!("Invalid path segment: {:?}", segment)));
            }
            path.push(segment);
        }
    }
    Ok(url.path().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_endpoint_normalisation() {
        assert_eq!(RequestSpec::get("interestrate").normalized_endpoint(), "/interestrate");
        assert_eq!(RequestSpec::get("/interestrate").normalized_endpoint(), "/interestrate");

        let absolute = RequestSpec::get("https://api.kolada.se/v2/kpi?page=2");
        assert!(absolute.is_absolute());
        assert_eq!(absolute.normalized_endpoint(), "https://api.kolada.se/v2/kpi?page=2");
        assert!(RequestSpec::get("HTTP://x.test").is_absolute());
        assert!(!RequestSpec::get("http").is_absolute());
    }

    #[test]
    fn test_query_order_and_replacement() {
        let spec = RequestSpec::get("/x")
            .with_query("fromDate", "2023-01-01")
            .with_query("page", 1)
            .with_query("limit", 100)
            .with_replaced_query("page", "abc");

        let keys: Vec<_> = spec.query.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["fromDate", "limit", "page"]);
        assert_eq!(spec.query[2].1, "abc");
    }

    #[test]
    fn test_post_and_headers() {
        let spec = RequestSpec::post("/search", json!({"q": 1})).with_header("content-TYPE", "text/plain");
        assert_eq!(spec.method, HttpMethod::Post);
        assert!(spec.has_header("Content-Type"));
        assert_eq!(spec.body, Some(json!({"q": 1})));
    }

    #[test]
    fn test_encode_path_escapes_segments() {
        assert_eq!(encode_path(["kpi", "N00945"]).unwrap(), "/kpi/N00945");
        assert_eq!(encode_path(["kpi", "a/b?c"]).unwrap(), "/kpi/a%2Fb%3Fc");
        assert_eq!(encode_path(["kpi", "a#b c"]).unwrap(), "/kpi/a%23b%20c");
        assert_eq!(encode_path(["year", "2022,2023"]).unwrap(), "/year/2022,2023");
    }

    #[test]
    fn test_encode_path_rejects_dot_segments() {
        for bad in ["", ".", ".."] {
            let err = encode_path(["kpi", bad]).unwrap_err();
            assert!(matches!(err, Error::InvalidInput(_)));
        }
    }
}
