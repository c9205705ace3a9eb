//! Data models for the Riksbank and Kolada APIs.
//!
//! - [`primitives`] - `ApiFamily`, `ApiDate`
//! - [`outcome`] - `ApiResult`, `ErrorInfo`, `Listing`
//! - [`calendar`] - SWEA calendar days
//! - [`interest_rate`] - TORA interest rates and series metadata
//! - [`kolada`] - KPIs and municipalities

pub mod calendar;
pub mod interest_rate;
pub mod kolada;
pub mod outcome;
pub mod primitives;

pub use calendar::*;
pub use interest_rate::*;
pub use kolada::*;
pub use outcome::*;
pub use primitives::*;
