//! Pagination over multi-page API responses.
//!
//! A [`Paginator`] executes an initial request, collects the items of each
//! page and follows the page's next pointer until there is none. Pages are
//! fetched strictly in order and keyed by their resolved URL, so a chain that
//! points back to an earlier page ends instead of looping.

use std::collections::HashSet;
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;
use url::Url;

use super::config::RetryConfig;
use super::request::{is_absolute_url, RequestSpec};
use super::ClientInner;
use crate::models::{ApiFamily, ApiResult, ErrorInfo, Listing};
use crate::Result;

/// Where a family puts the items and the next-page pointer of a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageShape {
    /// Item array fields, tried in order
    pub item_fields: Vec<String>,
    /// Field holding the next-page pointer
    pub next_field: String,
    /// Query parameter carrying an opaque continuation token
    pub cursor_param: String,
}

impl Default for PageShape {
    fn default() -> Self {
        Self {
            item_fields: vec!["items".to_string(), "values".to_string()],
            next_field: "next_page".to_string(),
            cursor_param: "page".to_string(),
        }
    }
}

impl PageShape {
    /// Default shape for `family`.
    ///
    /// Kolada wraps results in `values` and links pages by absolute URL.
    pub fn for_family(family: ApiFamily) -> Self {
        match family {
            ApiFamily::Kolada => Self {
                item_fields: vec!["values".to_string(), "items".to_string()],
                ..Self::default()
            },
            ApiFamily::Swea | ApiFamily::Tora => Self::default(),
        }
    }

    /// Set the item fields.
    pub fn with_item_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.item_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Set the next-pointer field.
    pub fn with_next_field(mut self, field: impl Into<String>) -> Self {
        self.next_field = field.into();
        self
    }

    /// Set the cursor query parameter.
    pub fn with_cursor_param(mut self, param: impl Into<String>) -> Self {
        self.cursor_param = param.into();
        self
    }

    /// Split a decoded response body into a [`Page`].
    ///
    /// A top-level array is a single final page. Objects without any of the
    /// item fields contribute no items. Numeric pointers are accepted.
    pub fn parse(&self, body: Value) -> Page {
        match body {
            Value::Array(items) => Page {
                items,
                next_page_token: None,
            },
            Value::Object(mut map) => {
                let items = self
                    .item_fields
                    .iter()
                    .find_map(|field| match map.remove(field) {
                        Some(Value::Array(items)) => Some(items),
                        _ => None,
                    })
                    .unwrap_or_default();

                let next_page_token = match map.remove(&self.next_field) {
                    Some(Value::String(s)) if !s.trim().is_empty() => Some(s),
                    Some(Value::Number(n)) => Some(n.to_string()),
                    _ => None,
                };

                Page {
                    items,
                    next_page_token,
                }
            }
            _ => Page::default(),
        }
    }
}

/// One page of results.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    /// Items in this page
    pub items: Vec<Value>,
    /// Pointer to the next page, if any
    pub next_page_token: Option<String>,
}

/// Follows next-page pointers and merges every page into one [`Listing`].
///
/// # Example
///
/// ```no_run
/// use riksbank_rs::{ApiFamily, PageShape, RequestSpec, RiksbankClient};
///
/// # async fn example(client: RiksbankClient) {
/// let kpis = client
///     .paginator(ApiFamily::Kolada)
///     .with_shape(PageShape::for_family(ApiFamily::Kolada))
///     .fetch_all(&RequestSpec::get("/kpi").with_query("title", "skola"))
///     .await;
///
/// match kpis {
///     Ok(listing) => println!("{} KPIs", listing.count),
///     Err(info) => eprintln!("{info}"),
/// }
/// # }
/// ```
pub struct Paginator {
    inner: Arc<ClientInner>,
    family: ApiFamily,
    shape: PageShape,
    retry: RetryConfig,
}

impl Paginator {
    pub(crate) fn new(inner: Arc<ClientInner>, family: ApiFamily) -> Self {
        let retry = inner.config.retry.clone();
        Self {
            inner,
            family,
            shape: PageShape::for_family(family),
            retry,
        }
    }

    /// Use a different page shape.
    pub fn with_shape(mut self, shape: PageShape) -> Self {
        self.shape = shape;
        self
    }

    /// Use a different retry policy for each page request.
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Fetch all pages starting at `initial`.
    ///
    /// A failing page replaces the whole result with its error; items from
    /// earlier pages are discarded.
    pub async fn fetch_all(&self, initial: &RequestSpec) -> ApiResult<Listing> {
        let mut items = Vec::new();
        let mut visited = HashSet::new();
        let mut spec = initial.clone();

        loop {
            let url = self
                .inner
                .resolve_url(&spec, self.family)
                .map_err(|e| ErrorInfo::from_error(e, spec.endpoint.clone()))?;

            if !visited.insert(url.to_string()) {
                debug!(family = %self.family, url = %url, "Page already visited, stopping");
                break;
            }

            debug!(family = %self.family, page = visited.len(), url = %url, "Fetching page");
            let body = self
                .inner
                .try_execute(&spec, &url, self.family, &self.retry)
                .await
                .map_err(|e| ErrorInfo::from_error(e, url.as_str()))?;

            let page = self.shape.parse(body);
            items.extend(page.items);

            match page.next_page_token {
                Some(pointer) => {
                    spec = self
                        .next_request(initial, &url, &pointer)
                        .map_err(|e| ErrorInfo::from_error(e, pointer.clone()))?;
                }
                None => break,
            }
        }

        debug!(family = %self.family, pages = visited.len(), count = items.len(), "Pagination complete");
        Ok(Listing::new(items))
    }

    /// Request for the page `pointer` refers to.
    ///
    /// URL pointers (absolute, or rooted at `/` or `?`) are resolved against
    /// the current page and followed verbatim. Anything else is a cursor token
    /// sent on the original request.
    fn next_request(&self, initial: &RequestSpec, current: &Url, pointer: &str) -> Result<RequestSpec> {
        if is_absolute_url(pointer) || pointer.starts_with('/') || pointer.starts_with('?') {
            let next = current.join(pointer)?;
            Ok(RequestSpec {
                endpoint: next.into(),
                query: Vec::new(),
                ..initial.clone()
            })
        } else {
            Ok(initial
                .clone()
                .with_replaced_query(&self.shape.cursor_param, pointer))
        }
    }
}

impl std::fmt::Debug for Paginator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Paginator")
            .field("family", &self.family)
            .field("shape", &self.shape)
            .field("retry", &self.retry)
            .finish()
    }
}
