//! Error types for nsadmin
//!
//! Application code returns `NsAdminResult<T>`. Failures scoped to a single
//! query live in [`crate::api::FetchError`] and are only lifted into
//! `NsAdminError` when a command has to give up on them.

use crate::api::{FetchError, FetchErrorKind};
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for nsadmin operations
pub type NsAdminResult<T> = Result<T, NsAdminError>;

/// All errors that can occur in nsadmin
#[derive(Error, Debug)]
pub enum NsAdminError {
    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid API URL '{url}': {reason}")]
    InvalidApiUrl { url: String, reason: String },

    // Query errors
    #[error("No query function registered for key: {0}")]
    QueryNotRegistered(String),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    // General errors
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("{0}")]
    User(String),
}

impl NsAdminError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::Fetch(e) => match e.kind() {
                FetchErrorKind::Transport => {
                    Some("Check api.base_url (nsadmin config show) or pass --api-url, then retry")
                }
                FetchErrorKind::Protocol => Some("Inspect the storage service logs"),
                FetchErrorKind::Decode => {
                    Some("The server does not speak the expected API; check api.namespaces_path")
                }
            },
            Self::InvalidApiUrl { .. } => Some("Run: nsadmin config set api.base_url http://host:port"),
            Self::ConfigInvalid { .. } => Some("Run: nsadmin config init --force"),
            _ => None,
        }
    }
}
