//! Query-scoped fetch failures

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Classification of a failed fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchErrorKind {
    /// Network unreachable, timeout, connection reset
    Transport,
    /// Server answered with a non-2xx status
    Protocol,
    /// Body is not a JSON array of strings
    Decode,
}

impl fmt::Display for FetchErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Transport => "transport",
            Self::Protocol => "protocol",
            Self::Decode => "decode",
        };
        f.write_str(name)
    }
}

/// A failed fetch, as stored in a query entry.
///
/// The message is rendered to the operator verbatim, so each constructor
/// phrases it for that audience.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{message}")]
pub struct FetchError {
    kind: FetchErrorKind,
    status: Option<u16>,
    message: String,
}

impl FetchError {
    /// The request never produced a response
    pub fn transport(detail: impl fmt::Display) -> Self {
        Self {
            kind: FetchErrorKind::Transport,
            status: None,
            message: format!(
                "Could not reach the namespace API ({}). Check the connection and retry.",
                detail
            ),
        }
    }

    /// The server answered with a non-2xx status
    pub fn protocol(status: u16, server_message: Option<String>) -> Self {
        let message = match server_message {
            Some(msg) if !msg.trim().is_empty() => {
                format!("Server returned HTTP {}: {}", status, msg.trim())
            }
            _ => format!("Server returned HTTP {}", status),
        };
        Self {
            kind: FetchErrorKind::Protocol,
            status: Some(status),
            message,
        }
    }

    /// The server answered 2xx but the body breaks the API contract
    pub fn decode(detail: impl fmt::Display) -> Self {
        Self {
            kind: FetchErrorKind::Decode,
            status: None,
            message: format!(
                "Server sent a malformed namespace list (expected a JSON array of strings): {}",
                detail
            ),
        }
    }

    pub fn kind(&self) -> FetchErrorKind {
        self.kind
    }

    /// HTTP status code, for protocol errors
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Only transport failures are worth retrying unchanged
    pub fn is_retryable(&self) -> bool {
        self.kind == FetchErrorKind::Transport
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_suggests_retry() {
        let err = FetchError::transport("connection refused");
        assert_eq!(err.kind(), FetchErrorKind::Transport);
        assert!(err.message().contains("connection refused"));
        assert!(err.message().contains("retry"));
        assert!(err.is_retryable());
    }

    #[test]
    fn protocol_carries_status_and_server_message() {
        let err = FetchError::protocol(503, Some("index unavailable".to_string()));
        assert_eq!(err.status(), Some(503));
        assert_eq!(err.to_string(), "Server returned HTTP 503: index unavailable");
        assert!(!err.is_retryable());
    }

    #[test]
    fn protocol_without_server_message() {
        let err = FetchError::protocol(500, Some("   ".to_string()));
        assert_eq!(err.message(), "Server returned HTTP 500");
    }

    #[test]
    fn decode_does_not_suggest_retry() {
        let err = FetchError::decode("invalid type: map");
        assert_eq!(err.kind(), FetchErrorKind::Decode);
        assert!(!err.message().contains("retry"));
        assert!(!err.is_retryable());
    }

    #[test]
    fn serializes_kind_lowercase() {
        let json = serde_json::to_value(FetchError::protocol(404, None)).unwrap();
        assert_eq!(json["kind"], "protocol");
        assert_eq!(json["status"], 404);
    }
}
