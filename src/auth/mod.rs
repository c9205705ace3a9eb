//! Authentication for the Riksbank APIs.
//!
//! SWEA and TORA share one OAuth2 client-credentials grant. The
//! [`TokenProvider`] owns the only copy of the bearer token, fetches it
//! lazily on first use and replaces it once it comes within five minutes
//! of expiry.
//!
//! ```no_run
//! use std::time::Duration;
//! use riksbank_rs::{Credentials, TokenProvider};
//!
//! # async fn example() -> Result<(), riksbank_rs::Error> {
//! let provider = TokenProvider::new(
//!     Credentials::from_env(),
//!     "https://api.riksbank.se/oauth2/token",
//!     reqwest::Client::new(),
//!     Duration::from_secs(10),
//! );
//! let token = provider.get_valid_token().await?;
//! # let _ = token;
//! # Ok(())
//! # }
//! ```

mod token;

pub use token::{
    Credentials, TokenProvider, CLIENT_ID_ENV, CLIENT_SECRET_ENV, DEFAULT_EXPIRES_IN_SECS,
    TOKEN_SAFETY_MARGIN_SECS,
};
