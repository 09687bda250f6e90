//! Keyed query cache
//!
//! Tracks the lifecycle of each logical query and keeps network traffic to
//! one outstanding request per key.
//!
//! # Entry States
//!
//! | Status | Data | Error | Next |
//! |--------|------|-------|------|
//! | Idle | - | - | Pending |
//! | Pending | - | - | Success, Error |
//! | Success | yes | - | Pending (forced only) |
//! | Error | - | yes | Pending |
//!
//! Every fetch is tagged with a fresh [`RequestId`]. A result is applied
//! only if its id is still the entry's in-flight id; anything else was
//! superseded by a later fetch and is dropped.

pub mod cache;
pub mod entry;
pub mod key;

#[cfg(test)]
pub(crate) mod testing;

pub use cache::{FetchMode, FetchOutcome, FetchTicket, InFlightFetch, QueryCache, Subscription};
pub use entry::{QueryEntry, QueryStatus, RequestId};
pub use key::QueryKey;

use crate::api::FetchError;
use async_trait::async_trait;

/// The fetch function behind a query key
#[async_trait]
pub trait QueryFn: Send + Sync {
    /// Perform one fetch. Implementations must not retry internally.
    async fn fetch(&self) -> Result<Vec<String>, FetchError>;
}
