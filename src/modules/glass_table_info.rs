//! Read-only queries against ITSI glass tables.
//!
//! Fetches a single glass table by `_key` (returned as a one-element
//! list, empty when missing) or lists glass tables with server-side
//! filtering, field selection, pagination, and sorting. Never changes
//! remote state, so `changed` is always false.

use serde_json::{Value, json};

use crate::error::ItsiError;
use crate::itsi_client::{ItsiClient, GLASS_TABLE_ENDPOINT};
use crate::modules::glass_table::get_glass_table_by_id;
use crate::modules::ModuleResult;

/// Sort direction for list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SortDir {
    /// Ascending.
    Asc,
    /// Descending.
    Desc,
}

impl SortDir {
    /// The wire value the API expects.
    pub fn as_str(self) -> &'static str {
        match self {
            SortDir::Asc => "asc",
            SortDir::Desc => "desc",
        }
    }
}

/// Parameters for one glass-table-info invocation.
///
/// When `glass_table_id` is set, every list parameter is ignored and a
/// single fetch is performed. Each list parameter is forwarded verbatim
/// when present and omitted when absent; a numeric zero is still
/// forwarded, distinguishing "not set" from "set to zero".
#[derive(Debug, Clone, Default)]
pub struct GlassTableInfoParams {
    /// The glass table `_key`; fetches a single glass table.
    pub glass_table_id: Option<String>,

    /// MongoDB-style JSON filter string for listing.
    pub filter: Option<String>,

    /// Comma-separated list of field names to include in the response.
    pub fields: Option<String>,

    /// Maximum number of glass tables to return (page size).
    pub count: Option<u32>,

    /// Number of results to skip from the start.
    pub offset: Option<u32>,

    /// Field name to sort results by.
    pub sort_key: Option<String>,

    /// Sort direction.
    pub sort_dir: Option<SortDir>,
}

/// Builds the query parameters for the list endpoint.
///
/// Only supplied parameters are included.
fn build_list_query(params: &GlassTableInfoParams) -> Vec<(String, String)> {
    let mut query = Vec::new();
    if let Some(ref filter) = params.filter {
        query.push(("filter".to_string(), filter.clone()));
    }
    if let Some(ref fields) = params.fields {
        query.push(("fields".to_string(), fields.clone()));
    }
    if let Some(count) = params.count {
        query.push(("count".to_string(), count.to_string()));
    }
    if let Some(offset) = params.offset {
        query.push(("offset".to_string(), offset.to_string()));
    }
    if let Some(ref sort_key) = params.sort_key {
        query.push(("sort_key".to_string(), sort_key.clone()));
    }
    if let Some(sort_dir) = params.sort_dir {
        query.push(("sort_dir".to_string(), sort_dir.as_str().to_string()));
    }
    query
}

/// Runs one glass-table-info module invocation.
///
/// The result carries the matching documents under the `glass_tables`
/// extra key and is never marked changed.
pub async fn run(
    client: &ItsiClient,
    params: &GlassTableInfoParams,
) -> Result<ModuleResult, ItsiError> {
    let glass_tables = match params.glass_table_id.as_deref() {
        Some(id) => {
            tracing::debug!(glass_table_id = id, "Fetching single glass table");
            match get_glass_table_by_id(client, id).await? {
                Some(doc) => vec![Value::Object(doc)],
                None => Vec::new(),
            }
        }
        None => {
            let query = build_list_query(params);
            tracing::debug!(params = query.len(), "Listing glass tables");
            match client.get(GLASS_TABLE_ENDPOINT, &query).await? {
                Some(Value::Array(docs)) => docs,
                _ => Vec::new(),
            }
        }
    };

    Ok(ModuleResult::new().with_extra("glass_tables", json!(glass_tables)))
}
