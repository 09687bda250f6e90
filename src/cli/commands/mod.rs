//! CLI command implementations

pub mod completions;
pub mod config;
pub mod namespaces;

pub use completions::execute as completions;
pub use config::execute as config;
pub use namespaces::execute as namespaces;
