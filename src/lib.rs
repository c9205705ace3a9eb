//! # riksbank-rs
//!
//! A resilient async client for the Riksbank SWEA and TORA APIs, with
//! support for the public Kolada municipality statistics API.
//!
//! ## Features
//!
//! - **Authentication**: OAuth2 client credentials shared by SWEA and TORA,
//!   fetched lazily and refreshed five minutes before expiry
//! - **Retries**: bounded exponential backoff on network failures and
//!   429/502/503/504 responses
//! - **Pagination**: next-page pointers are followed and merged into one
//!   result, with a guard against cyclic page chains
//! - **Error values**: every public operation returns either data or an
//!   [`ErrorInfo`]; nothing panics past the client boundary
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use riksbank_rs::api::{CalendarDaysQuery, InterestRatesQuery};
//! use riksbank_rs::RiksbankClient;
//!
//! #[tokio::main]
//! async fn main() -> riksbank_rs::Result<()> {
//!     // Reads RIKSBANK_CLIENT_ID / RIKSBANK_CLIENT_SECRET
//!     let client = RiksbankClient::from_env()?;
//!
//!     let days = client
//!         .calendar()
//!         .calendar_days(&CalendarDaysQuery::new("2023-01-01").to_date("2023-01-07"))
//!         .await;
//!     match days {
//!         Ok(days) => {
//!             for day in days.items {
//!                 println!("{:?} {:?} Q{:?}", day.date, day.weekday, day.quarter);
//!             }
//!         }
//!         Err(info) => eprintln!("calendar lookup failed: {info}"),
//!     }
//!
//!     let rates = client
//!         .interest_rates()
//!         .list(&InterestRatesQuery::new().interest_rate_id("REPO"))
//!         .await;
//!     println!("{}", riksbank_rs::models::response_json(&rates));
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod api;
pub mod auth;
pub mod client;
pub mod error;
pub mod models;

// Re-export primary types at crate root for convenience
pub use auth::{Credentials, TokenProvider};
pub use client::{ClientConfig, HttpMethod, PageShape, Paginator, RequestSpec, RetryConfig, RiksbankClient};
pub use error::{Error, Result};
pub use models::{ApiDate, ApiFamily, ApiResult, ErrorInfo, ErrorKind, Listing};

/// Prelude module for convenient imports.
///
/// ```rust
/// use riksbank_rs::prelude::*;
/// ```
pub mod prelude {
    pub use crate::api::{CalendarDaysQuery, InterestRatesQuery};
    pub use crate::auth::{Credentials, TokenProvider};
    pub use crate::client::{ClientConfig, RequestSpec, RetryConfig, RiksbankClient};
    pub use crate::error::{Error, Result};
    pub use crate::models::{
        // Primitives
        ApiDate, ApiFamily,
        // Results
        ApiResult, ErrorInfo, ErrorKind, Listing,
        // Data
        CalendarDay, InterestRate, InterestRateType, InterestRateTypeFilter, Kpi, Municipality,
        MunicipalityType,
    };
}
