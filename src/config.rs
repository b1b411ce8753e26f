//! Configuration management for itsictl.
//!
//! This module handles loading configuration from environment variables,
//! with validation to ensure all required values are present.

use crate::error::ItsiError;
use std::env;

/// Configuration for connecting to a Splunk ITSI instance.
///
/// All fields are required and loaded from environment variables.
/// The token is stored but never logged or exposed in error messages.
#[derive(Clone)]
pub struct Config {
    /// Base URL of the Splunk management endpoint
    /// (e.g., `https://splunk.example.com:8089`).
    pub base_url: String,

    /// Bearer token for authentication.
    /// This value must never be logged or included in error messages.
    pub token: String,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// # Required Environment Variables
    ///
    /// - `ITSI_BASE_URL`: Base URL of the Splunk management endpoint
    /// - `ITSI_TOKEN`: Bearer token for authentication
    ///
    /// # Errors
    ///
    /// Returns `ItsiError::Config` if any required variable is missing
    /// or if values fail validation.
    ///
    /// # Example
    ///
    /// ```ignore
    /// dotenvy::dotenv().ok();
    /// let config = Config::from_env()?;
    /// ```
    pub fn from_env() -> Result<Self, ItsiError> {
        let base_url = Self::get_required_env("ITSI_BASE_URL")?;
        let token = Self::get_required_env("ITSI_TOKEN")?;

        let base_url = Self::validate_base_url(base_url)?;
        Self::validate_token(&token)?;

        Ok(Config { base_url, token })
    }

    /// Gets a required environment variable, returning an error if missing or empty.
    fn get_required_env(name: &str) -> Result<String, ItsiError> {
        env::var(name)
            .map_err(|_| ItsiError::missing_env(name))
            .and_then(|value| {
                if value.trim().is_empty() {
                    Err(ItsiError::missing_env(name))
                } else {
                    Ok(value)
                }
            })
    }

    /// Validates and normalizes the base URL.
    fn validate_base_url(url: String) -> Result<String, ItsiError> {
        // Remove trailing slash for consistency
        let url = url.trim().trim_end_matches('/').to_string();

        let parsed = url::Url::parse(&url)
            .map_err(|e| ItsiError::invalid_config(format!("ITSI_BASE_URL is not a valid URL: {}", e)))?;

        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(ItsiError::invalid_config(
                "ITSI_BASE_URL must start with http:// or https://",
            ));
        }

        Ok(url)
    }

    /// Validates the token is not a placeholder value.
    fn validate_token(token: &str) -> Result<(), ItsiError> {
        let token_lower = token.to_lowercase();
        let placeholder_patterns = [
            "your_token",
            "your_key",
            "placeholder",
            "xxx",
            "changeme",
        ];

        for pattern in placeholder_patterns {
            if token_lower.contains(pattern) {
                return Err(ItsiError::invalid_config(
                    "ITSI_TOKEN appears to be a placeholder value",
                ));
            }
        }

        Ok(())
    }
}
