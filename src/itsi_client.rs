//! HTTP client for the Splunk ITSI REST API.
//!
//! This module provides the `ItsiClient` struct for making authenticated
//! requests to the itoa_interface and event_management_interface endpoints.
//!
//! The client deliberately carries no retry logic: each module invocation
//! performs at most two sequential calls (a read then an optional write)
//! and any failure is terminal for the invocation.
//!
//! # Not-found signal
//!
//! All verbs return `Ok(None)` on HTTP 404. Callers decide what absence
//! means: the update path treats it as a hard failure, the delete path as
//! an idempotent no-op.
//!
//! # Security
//!
//! The auth token is never logged. All error messages are sanitized before
//! being surfaced.

use std::time::Duration;

use reqwest::{Client, Method, StatusCode};
use serde_json::Value;

use crate::config::Config;
use crate::error::ItsiError;

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Maximum length for HTTP error response bodies to avoid leaking verbose
/// splunkd internals.
const MAX_ERROR_BODY_LEN: usize = 500;

/// REST collection path for ITSI glass tables.
pub const GLASS_TABLE_ENDPOINT: &str = "servicesNS/nobody/SA-ITOA/itoa_interface/glass_table";

/// REST path for ITSI notable event (episode) comments.
pub const NOTABLE_EVENT_COMMENT_ENDPOINT: &str =
    "servicesNS/nobody/SA-ITOA/event_management_interface/notable_event_comment";

/// HTTP client for the Splunk ITSI REST API.
///
/// Handles authentication, request formatting, and response parsing for
/// all ITSI operations. Response bodies are returned as raw
/// [`serde_json::Value`] documents; the modules own their interpretation.
///
/// # Example
///
/// ```ignore
/// let config = Config::from_env()?;
/// let client = ItsiClient::new(&config)?;
///
/// let body = client.get(GLASS_TABLE_ENDPOINT, &[]).await?;
/// ```
#[derive(Clone)]
pub struct ItsiClient {
    /// The underlying HTTP client (cloning is cheap).
    http: Client,

    /// Base URL for the Splunk management endpoint
    /// (e.g., `https://splunk.example.com:8089`).
    base_url: String,

    /// Bearer token for authentication.
    /// SECURITY: Never log this value!
    token: String,
}

impl ItsiClient {
    /// Creates a new ITSI client from configuration.
    ///
    /// # Errors
    ///
    /// Returns `ItsiError::HttpClient` if the HTTP client fails to initialize.
    pub fn new(config: &Config) -> Result<Self, ItsiError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(ItsiError::HttpClient)?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    /// Returns a reference to the token for sanitization purposes.
    ///
    /// This should ONLY be used for sanitizing error messages, never for logging.
    pub fn token_for_sanitization(&self) -> &str {
        &self.token
    }

    /// Makes a GET request.
    ///
    /// # Arguments
    ///
    /// * `path` - API endpoint path relative to the base URL
    /// * `query` - Extra query parameters, forwarded verbatim
    ///
    /// # Returns
    ///
    /// The parsed JSON body, or `None` if the server returned 404.
    pub async fn get(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<Option<Value>, ItsiError> {
        self.request(Method::GET, path, query, None).await
    }

    /// Makes a POST request with a JSON payload.
    ///
    /// # Arguments
    ///
    /// * `path` - API endpoint path relative to the base URL
    /// * `payload` - JSON body to send
    /// * `query` - Extra query parameters (e.g., `is_partial_data=1`)
    ///
    /// # Returns
    ///
    /// The parsed JSON body, or `None` if the server returned 404.
    pub async fn post(
        &self,
        path: &str,
        payload: &Value,
        query: &[(String, String)],
    ) -> Result<Option<Value>, ItsiError> {
        self.request(Method::POST, path, query, Some(payload)).await
    }

    /// Makes a DELETE request.
    ///
    /// # Returns
    ///
    /// The parsed JSON body, or `None` if the server returned 404.
    pub async fn delete(&self, path: &str) -> Result<Option<Value>, ItsiError> {
        self.request(Method::DELETE, path, &[], None).await
    }

    /// Makes a request to the ITSI API.
    ///
    /// Handles authentication, the `output_mode=json` parameter splunkd
    /// expects, and response parsing. HTTP 404 maps to `Ok(None)` so that
    /// callers can implement their own absence semantics.
    async fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        payload: Option<&Value>,
    ) -> Result<Option<Value>, ItsiError> {
        let url = format!("{}/{}", self.base_url, path);

        tracing::debug!(
            method = %method,
            path = %path,
            "Making ITSI API request"
        );

        let mut req = self
            .http
            .request(method.clone(), &url)
            .bearer_auth(&self.token)
            .query(&[("output_mode", "json")])
            .query(query);

        if let Some(body) = payload {
            req = req.json(body);
        }

        let response = req.send().await.map_err(|e| {
            if e.is_timeout() {
                return ItsiError::Timeout {
                    duration: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
                    operation: format!("{} {}", method, path),
                };
            }
            ItsiError::Http(e)
        })?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            tracing::debug!(path = %path, "ITSI API returned 404");
            return Ok(None);
        }

        if !status.is_success() {
            return Err(self.handle_http_error(status, response).await);
        }

        let body = response.text().await.map_err(ItsiError::Http)?;

        tracing::trace!(body = %body, "ITSI API response");

        // Some write endpoints answer with an empty body on success.
        if body.trim().is_empty() {
            return Ok(Some(Value::Object(serde_json::Map::new())));
        }

        let parsed: Value = serde_json::from_str(&body).map_err(ItsiError::Serialization)?;
        Ok(Some(parsed))
    }

    /// Handles HTTP-level errors and converts to ItsiError.
    async fn handle_http_error(&self, status: StatusCode, response: reqwest::Response) -> ItsiError {
        let body = response.text().await.unwrap_or_default();
        // Sanitize the body to ensure no token leakage
        let body = ItsiError::sanitize_message(&body, &self.token);
        let body = truncate_body(body);

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ItsiError::Authentication,
            _ => ItsiError::HttpStatus { status, body },
        }
    }
}

/// Truncates an error body to avoid leaking verbose splunkd internals.
///
/// The cut lands on a char boundary so multibyte text (localized splunkd
/// error messages) never splits a character.
fn truncate_body(body: String) -> String {
    if body.len() <= MAX_ERROR_BODY_LEN {
        return body;
    }
    let mut cut = MAX_ERROR_BODY_LEN;
    while !body.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}...[truncated]", &body[..cut])
}
