//! nsadmin - JSON storage admin console
//!
//! Lists the namespaces of a JSON storage service and refreshes them on
//! demand. The listing is driven by a small query cache: one in-flight
//! request per key, superseded responses dropped, observers notified of
//! every transition.

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod query;
pub mod ui;
pub mod view;

pub use error::{NsAdminError, NsAdminResult};
