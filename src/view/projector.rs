//! Entry to view-state projection

use crate::query::{QueryEntry, QueryStatus};

/// What the presentation layer should show for a query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    /// Nothing requested yet
    Idle,
    /// A fetch is in flight
    Loading,
    /// The last fetch failed; the message is shown verbatim
    Error(String),
    /// The last fetch succeeded. May be empty.
    Success(Vec<String>),
}

impl ViewState {
    /// Whether a fetch has finished, one way or the other
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Error(_) | Self::Success(_))
    }
}

/// Project an entry. Pure: equal entries give equal states.
pub fn project(entry: &QueryEntry) -> ViewState {
    match entry.status() {
        QueryStatus::Idle => ViewState::Idle,
        QueryStatus::Pending => ViewState::Loading,
        QueryStatus::Success => {
            ViewState::Success(entry.data().map(<[String]>::to_vec).unwrap_or_default())
        }
        QueryStatus::Error => ViewState::Error(
            entry
                .error()
                .map(|e| e.message().to_string())
                .unwrap_or_default(),
        ),
    }
}
