//! Error types for itsictl.
//!
//! This module defines `ItsiError`, the unified error type used throughout
//! the crate for consistent error handling and propagation. Every failure
//! is terminal for the invocation: there is no retry layer anywhere.
//!
//! # Security
//!
//! All error messages are sanitized to ensure the auth token is never
//! leaked in logs or result documents. Use `sanitize_message()` when
//! constructing error messages from external sources.

use std::time::Duration;
use thiserror::Error;

/// Unified error type for all itsictl operations.
///
/// Each variant provides specific context about the failure, enabling
/// meaningful error messages without leaking sensitive information
/// like the auth token.
#[derive(Error, Debug)]
pub enum ItsiError {
    /// Configuration error - missing or invalid environment variables.
    #[error("configuration error: {0}")]
    Config(String),

    /// HTTP request failed during transmission.
    #[error("HTTP request failed: {0}")]
    Http(#[source] reqwest::Error),

    /// HTTP client initialization failed.
    #[error("HTTP client error: {0}")]
    HttpClient(#[source] reqwest::Error),

    /// HTTP response returned a non-success status code.
    #[error("HTTP {status}: {body}")]
    HttpStatus {
        /// The HTTP status code returned.
        status: reqwest::StatusCode,
        /// The response body, potentially containing error details.
        body: String,
    },

    /// Request timed out.
    #[error("{operation} timed out after {duration:?} - the server may be slow or unreachable")]
    Timeout {
        /// How long we waited before timing out.
        duration: Duration,
        /// The operation that timed out.
        operation: String,
    },

    /// ITSI API call failed in a way that has no more specific variant.
    #[error("ITSI API error: {message}")]
    Api {
        /// Human-readable description of the failure, including the
        /// targeted identifier where one exists.
        message: String,
    },

    /// JSON serialization or deserialization failed.
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A targeted resource was not found where its existence was required.
    ///
    /// Only raised for targeted updates; deletes treat not-found as a
    /// successful no-op.
    #[error("glass table '{id}' not found")]
    NotFound {
        /// The _key of the resource that was not found.
        id: String,
    },

    /// Authentication failed - likely an invalid or expired token.
    #[error("authentication failed - check ITSI_TOKEN")]
    Authentication,

    /// Input validation failed before any network call was made.
    #[error("validation error: {0}")]
    Validation(String),
}

impl ItsiError {
    /// Creates a configuration error for a missing environment variable.
    pub fn missing_env(var_name: &str) -> Self {
        ItsiError::Config(format!(
            "missing required environment variable: {}",
            var_name
        ))
    }

    /// Creates a configuration error for an invalid value.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        ItsiError::Config(message.into())
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ItsiError::Validation(message.into())
    }

    /// Creates a not found error for a glass table _key.
    pub fn not_found(id: impl Into<String>) -> Self {
        ItsiError::NotFound { id: id.into() }
    }

    /// Creates a timeout error.
    pub fn timeout(duration: Duration, operation: impl Into<String>) -> Self {
        ItsiError::Timeout {
            duration,
            operation: operation.into(),
        }
    }

    /// Creates a generic API error.
    pub fn api(message: impl Into<String>) -> Self {
        ItsiError::Api {
            message: message.into(),
        }
    }

    /// Sanitizes an error message to remove any occurrence of the auth token.
    ///
    /// This is critical for security - tokens must never appear in logs,
    /// error messages, or result documents.
    ///
    /// # Arguments
    ///
    /// * `message` - The message to sanitize
    /// * `token` - The token to strip from the message
    ///
    /// # Returns
    ///
    /// The message with any occurrence of the token replaced with `[REDACTED]`
    #[must_use]
    pub fn sanitize_message(message: &str, token: &str) -> String {
        if token.is_empty() {
            return message.to_string();
        }
        message.replace(token, "[REDACTED]")
    }

    /// Creates a sanitized version of this error's display message.
    ///
    /// Use this when you need to include error details in logs or the
    /// failure document and want to ensure no sensitive data is leaked.
    #[must_use]
    pub fn sanitized_display(&self, token: &str) -> String {
        Self::sanitize_message(&self.to_string(), token)
    }
}
