//! Blocking HTTP client for the namespace listing
//!
//! `ureq` does the transport; the async entry point moves each call onto
//! tokio's blocking pool.

use crate::api::error::FetchError;
use crate::config::schema::ApiConfig;
use crate::error::{NsAdminError, NsAdminResult};
use crate::query::QueryFn;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Longest raw error body echoed back to the operator
const MAX_SERVER_MESSAGE_LEN: usize = 200;

/// Client for the storage service's namespace endpoint
#[derive(Clone)]
pub struct ApiClient {
    agent: ureq::Agent,
    namespaces_url: String,
}

impl ApiClient {
    /// Create a client for `base_url` + `namespaces_path`
    pub fn new(base_url: &str, namespaces_path: &str, timeout: Duration) -> NsAdminResult<Self> {
        let namespaces_url = join_url(base_url, namespaces_path)?;

        let config = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build();

        Ok(Self {
            agent: ureq::Agent::new_with_config(config),
            namespaces_url,
        })
    }

    /// Create a client from the `[api]` config section
    pub fn from_config(api: &ApiConfig) -> NsAdminResult<Self> {
        Self::new(
            &api.base_url,
            &api.namespaces_path,
            Duration::from_secs(api.timeout_secs),
        )
    }

    /// Full URL of the namespace listing
    pub fn namespaces_url(&self) -> &str {
        &self.namespaces_url
    }

    /// GET the namespace list. One request, no retry.
    pub fn list_namespaces(&self) -> Result<Vec<String>, FetchError> {
        debug!("GET {}", self.namespaces_url);

        let mut response = self
            .agent
            .get(&self.namespaces_url)
            .header("Accept", "application/json")
            .call()
            .map_err(request_error)?;

        let status = response.status();
        let body = response.body_mut().read_to_string();

        if !status.is_success() {
            let message = body.ok().and_then(|b| server_message(&b));
            debug!("Namespace request failed with HTTP {}", status.as_u16());
            return Err(FetchError::protocol(status.as_u16(), message));
        }

        let body = body.map_err(FetchError::transport)?;
        let namespaces = decode_namespaces(&body)?;
        debug!("Received {} namespace(s)", namespaces.len());
        Ok(namespaces)
    }

    /// Async form of [`list_namespaces`](Self::list_namespaces)
    pub async fn fetch_namespaces(&self) -> Result<Vec<String>, FetchError> {
        let client = self.clone();
        tokio::task::spawn_blocking(move || client.list_namespaces())
            .await
            .map_err(|e| FetchError::transport(format!("request task failed: {}", e)))?
    }
}

#[async_trait]
impl QueryFn for ApiClient {
    async fn fetch(&self) -> Result<Vec<String>, FetchError> {
        self.fetch_namespaces().await
    }
}

/// Join the configured base URL and path, rejecting anything that is not http(s)
fn join_url(base_url: &str, path: &str) -> NsAdminResult<String> {
    let base = base_url.trim().trim_end_matches('/');

    let host = base
        .strip_prefix("http://")
        .or_else(|| base.strip_prefix("https://"))
        .ok_or_else(|| NsAdminError::InvalidApiUrl {
            url: base_url.to_string(),
            reason: "must start with http:// or https://".to_string(),
        })?;

    if host.is_empty() || host.starts_with('/') {
        return Err(NsAdminError::InvalidApiUrl {
            url: base_url.to_string(),
            reason: "missing host".to_string(),
        });
    }

    let path = path.trim();
    if path.is_empty() {
        return Ok(base.to_string());
    }

    Ok(format!("{}/{}", base, path.trim_start_matches('/')))
}

fn request_error(err: ureq::Error) -> FetchError {
    match err {
        ureq::Error::StatusCode(code) => FetchError::protocol(code, None),
        other => FetchError::transport(other),
    }
}

/// Parse a successful body. Order and duplicates are kept as sent.
fn decode_namespaces(body: &str) -> Result<Vec<String>, FetchError> {
    serde_json::from_str::<Vec<String>>(body).map_err(FetchError::decode)
}

/// Error body shapes the storage service may answer with
#[derive(Deserialize)]
struct ErrorBody {
    detail: Option<serde_json::Value>,
    message: Option<String>,
}

/// Extract a human-readable message from a non-2xx body
fn server_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }

    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        let detail = match parsed.detail {
            Some(serde_json::Value::String(s)) => Some(s),
            Some(serde_json::Value::Null) | None => None,
            Some(other) => Some(other.to_string()),
        };
        if let Some(msg) = detail.or(parsed.message) {
            return Some(msg);
        }
    }

    if body.starts_with('{') || body.starts_with('[') {
        return None;
    }

    Some(body.chars().take(MAX_SERVER_MESSAGE_LEN).collect())
}
