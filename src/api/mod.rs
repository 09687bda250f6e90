//! Client for the JSON storage service API
//!
//! Only the namespace listing is consumed here. Every failure is
//! normalized into a [`FetchError`] at this boundary so the query cache
//! never sees transport-specific error types.

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::{FetchError, FetchErrorKind};
