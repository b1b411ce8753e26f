//! # itsictl
//!
//! itsictl is a declarative CLI for Splunk IT Service Intelligence (ITSI).
//!
//! It manages glass tables (visual dashboards) and episode comments
//! (annotations on notable-event groups) through the ITSI REST API. Each
//! invocation is one module run: declarative parameters are reconciled
//! against the remote state, at most one write call is issued, and a
//! structured result document with `changed`/`before`/`after`/`diff` is
//! printed to stdout as JSON.
//!
//! ## Features
//!
//! - **Glass tables**: create, update (partial, diff-driven), delete
//! - **Idempotency**: no write call is made when the remote state already
//!   matches the requested fields
//! - **Check mode**: `--check` reports the predicted diff without mutating
//!   anything
//! - **Queries**: list glass tables with server-side filtering, paging,
//!   and sorting
//! - **Episode comments**: append comments to notable-event groups
//! - **Security**: the auth token is never logged or exposed in error
//!   messages
//!
//! ## Architecture
//!
//! - [`config`] - Configuration loading from environment variables
//! - [`error`] - Error types with token-sanitizing messages
//! - [`itsi_client`] - HTTP client for the ITSI REST API
//! - [`diff`] - Recursive diff and empty-stripping for JSON documents
//! - [`modules`] - The three module implementations and the result contract
//! - [`cli`] - Command-line interface definitions
//!
//! ## Configuration
//!
//! Two environment variables are required:
//!
//! - `ITSI_BASE_URL`: Splunk management URL (e.g., `https://splunk:8089`)
//! - `ITSI_TOKEN`: Bearer token for authentication
//!
//! Optional:
//! - `RUST_LOG`: Log level (e.g., `itsictl=debug`); logs go to stderr
//!
//! ## Example
//!
//! Using the [`ItsiClient`](itsi_client::ItsiClient) and a module directly:
//!
//! ```ignore
//! use itsictl::config::Config;
//! use itsictl::itsi_client::ItsiClient;
//! use itsictl::modules::glass_table::{self, GlassTableParams};
//!
//! async fn example() -> Result<(), itsictl::error::ItsiError> {
//!     let config = Config::from_env()?;
//!     let client = ItsiClient::new(&config)?;
//!
//!     let params = GlassTableParams {
//!         glass_table_id: Some("6992e850280636204503b3f6".to_string()),
//!         description: Some("Updated description".to_string()),
//!         ..Default::default()
//!     };
//!
//!     let result = glass_table::run(&client, &params, false).await?;
//!     println!("changed: {}", result.changed);
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod cli;
pub mod config;
pub mod diff;
pub mod error;
pub mod itsi_client;
pub mod modules;
