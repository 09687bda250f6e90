//! Per-key query state

use crate::api::FetchError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Query status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryStatus {
    #[default]
    Idle,
    Pending,
    Success,
    Error,
}

/// Identity of one fetch attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(Uuid);

impl RequestId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Snapshot of one query.
///
/// `data` is set only in `Success` and `error` only in `Error`. Fields are
/// private so the only way to move between states is through the
/// transitions below, which the cache drives.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QueryEntry {
    status: QueryStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<FetchError>,
    fetched_at: Option<DateTime<Utc>>,
    in_flight: Option<RequestId>,
}

impl QueryEntry {
    pub fn status(&self) -> QueryStatus {
        self.status
    }

    pub fn data(&self) -> Option<&[String]> {
        self.data.as_deref()
    }

    pub fn error(&self) -> Option<&FetchError> {
        self.error.as_ref()
    }

    /// When the last fetch completed, successfully or not
    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.fetched_at
    }

    pub fn in_flight(&self) -> Option<RequestId> {
        self.in_flight
    }

    /// Whether a non-forced fetch should start. Success never goes stale.
    pub fn needs_fetch(&self) -> bool {
        matches!(self.status, QueryStatus::Idle | QueryStatus::Error)
    }

    /// Enter `Pending` for `request`. Prior data and error are dropped;
    /// the completion timestamp survives.
    pub(crate) fn begin(&self, request: RequestId) -> Self {
        Self {
            status: QueryStatus::Pending,
            data: None,
            error: None,
            fetched_at: self.fetched_at,
            in_flight: Some(request),
        }
    }

    /// Leave `Pending` with the fetch result
    pub(crate) fn resolve(result: Result<Vec<String>, FetchError>, at: DateTime<Utc>) -> Self {
        match result {
            Ok(data) => Self {
                status: QueryStatus::Success,
                data: Some(data),
                error: None,
                fetched_at: Some(at),
                in_flight: None,
            },
            Err(error) => Self {
                status: QueryStatus::Error,
                data: None,
                error: Some(error),
                fetched_at: Some(at),
                in_flight: None,
            },
        }
    }
}
