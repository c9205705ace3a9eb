//! HTTP client, request execution and pagination.
//!
//! [`RiksbankClient`] is the entry point. It executes [`RequestSpec`]s
//! against an [`ApiFamily`](crate::ApiFamily) with retry and backoff, and
//! merges multi-page responses through a [`Paginator`].
//!
//! # Example
//!
//! ```no_run
//! use riksbank_rs::{ApiFamily, ClientConfig, Credentials, RequestSpec, RiksbankClient};
//!
//! # async fn example() -> riksbank_rs::Result<()> {
//! let client = RiksbankClient::new(
//!     Credentials::new("client-id", "client-secret"),
//!     ClientConfig::default(),
//! )?;
//!
//! let spec = RequestSpec::get("/calendar/calendardays").with_query("fromDate", "2023-01-01");
//! let listing = client.fetch_all(&spec, ApiFamily::Swea).await;
//! # let _ = listing;
//! # Ok(())
//! # }
//! ```

mod config;
mod http;
pub mod paginated;
mod request;

pub use config::{ClientConfig, RetryConfig, DEFAULT_TOKEN_URL};
pub use http::RiksbankClient;
pub use paginated::{Page, PageShape, Paginator};
pub(crate) use request::encode_path;
pub use request::{HttpMethod, RequestSpec};
pub(crate) use http::ClientInner;
