//! Display-ready projection of query entries
//!
//! [`project`] maps a cache entry to one of four [`ViewState`]s.
//! [`QueryView`] keeps one key mounted: it forwards every projected
//! transition to the presentation layer and owns the refresh action.

mod projector;
mod query_view;

pub use projector::{project, ViewState};
pub use query_view::QueryView;
