//! Declarative management of ITSI glass tables.
//!
//! Glass table titles are NOT unique; the `_key` is the only reliable
//! identifier. With `state=present` and a `glass_table_id`, the module
//! reconciles the existing glass table against the supplied fields and
//! sends a partial update containing only what changed. Without an id it
//! always creates. `state=absent` deletes by id and treats a missing
//! glass table as an idempotent no-op.
//!
//! Check mode runs the full reconcile (fetch, strip, diff, payload
//! construction) and skips only the final write call.

use clap::ValueEnum;
use serde_json::{json, Map, Value};

use crate::diff::{dict_diff, remove_empties};
use crate::error::ItsiError;
use crate::itsi_client::{ItsiClient, GLASS_TABLE_ENDPOINT};
use crate::modules::ModuleResult;

/// Fields managed by this module for diff tracking.
const DIFF_FIELDS: [&str; 4] = ["title", "description", "definition", "sharing"];

/// Sharing level of a glass table, stored at `acl.sharing` by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Sharing {
    /// Private to the owner.
    User,
    /// Available at the app level.
    App,
}

impl Sharing {
    /// The wire value the API stores under `acl.sharing`.
    pub fn as_str(self) -> &'static str {
        match self {
            Sharing::User => "user",
            Sharing::App => "app",
        }
    }
}

/// Desired state of the glass table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum State {
    /// Ensure the glass table exists with the specified configuration.
    #[default]
    Present,
    /// Ensure the glass table is deleted.
    Absent,
}

/// Parameters for one glass-table invocation.
///
/// Every field except `state` is optional; `None` means "leave as
/// remote-current", never "clear".
#[derive(Debug, Clone, Default)]
pub struct GlassTableParams {
    /// The glass table `_key` for update or delete operations.
    pub glass_table_id: Option<String>,

    /// Title of the glass table. Required when creating.
    pub title: Option<String>,

    /// Description text for the glass table.
    pub description: Option<String>,

    /// Raw JSON definition object (layout, visualizations, data sources).
    /// Required when creating. Passed to the API as-is apart from the
    /// title/description sync on create.
    pub definition: Option<Value>,

    /// Sharing level, written to `acl.sharing`.
    pub sharing: Option<Sharing>,

    /// Desired state.
    pub state: State,
}

/// Fetches a single glass table by its `_key`.
///
/// Returns `None` when the API signals 404 or answers with something
/// other than a keyed document.
pub async fn get_glass_table_by_id(
    client: &ItsiClient,
    glass_table_id: &str,
) -> Result<Option<Map<String, Value>>, ItsiError> {
    let path = format!(
        "{}/{}",
        GLASS_TABLE_ENDPOINT,
        urlencoding::encode(glass_table_id)
    );
    match client.get(&path, &[]).await? {
        Some(Value::Object(doc)) => Ok(Some(doc)),
        _ => Ok(None),
    }
}

/// Runs one glass-table module invocation.
pub async fn run(
    client: &ItsiClient,
    params: &GlassTableParams,
    check_mode: bool,
) -> Result<ModuleResult, ItsiError> {
    match params.state {
        State::Absent => handle_absent(client, params.glass_table_id.as_deref(), check_mode).await,
        State::Present => {
            let desired = build_desired(params);
            match params.glass_table_id.as_deref() {
                Some(id) => handle_update(client, id, desired, check_mode).await,
                None => handle_create(client, desired, check_mode).await,
            }
        }
    }
}

/// Builds the desired payload from module parameters.
///
/// Only includes fields explicitly provided by the caller.
fn build_desired(params: &GlassTableParams) -> Map<String, Value> {
    let mut desired = Map::new();
    if let Some(ref title) = params.title {
        desired.insert("title".to_string(), json!(title));
    }
    if let Some(ref description) = params.description {
        desired.insert("description".to_string(), json!(description));
    }
    if let Some(ref definition) = params.definition {
        desired.insert("definition".to_string(), definition.clone());
    }
    if let Some(sharing) = params.sharing {
        desired.insert("sharing".to_string(), json!(sharing.as_str()));
    }
    desired
}

/// Reads the current values of the given fields from a fetched document.
///
/// `sharing` lives under `acl.sharing` in the API, so it is mapped to the
/// flat key; all other fields are read directly by name. Fields the
/// document lacks read as null.
fn have_view<'a>(
    current: &Map<String, Value>,
    fields: impl IntoIterator<Item = &'a str>,
) -> Map<String, Value> {
    let mut have = Map::new();
    for field in fields {
        let value = if field == "sharing" {
            current
                .get("acl")
                .and_then(|acl| acl.get("sharing"))
                .cloned()
                .unwrap_or(Value::Null)
        } else {
            current.get(field).cloned().unwrap_or(Value::Null)
        };
        have.insert(field.to_string(), value);
    }
    have
}

/// Builds the API payload for creating a new glass table.
///
/// Adds the required `gt_version`, `_owner`, and `_user` stamps, maps
/// `sharing` to a nested `acl` object, and syncs top-level
/// title/description into the definition so both levels match (top-level
/// wins).
fn build_create_payload(desired: &Map<String, Value>) -> Map<String, Value> {
    let mut payload = Map::new();
    for field in ["title", "description", "definition"] {
        if let Some(value) = desired.get(field) {
            payload.insert(field.to_string(), value.clone());
        }
    }

    payload.insert("gt_version".to_string(), json!("beta"));
    payload.insert("_owner".to_string(), json!("nobody"));
    payload.insert("_user".to_string(), json!("nobody"));

    if let Some(sharing) = desired.get("sharing") {
        payload.insert("acl".to_string(), json!({ "sharing": sharing }));
    }

    if let Some(Value::Object(definition)) = payload.get("definition") {
        let mut definition = definition.clone();
        for field in ["title", "description"] {
            if let Some(value) = payload.get(field) {
                definition.insert(field.to_string(), value.clone());
            }
        }
        payload.insert("definition".to_string(), Value::Object(definition));
    }

    payload
}

/// Translates a diff into an API-ready partial-update payload.
///
/// Every field maps straight through by name except `sharing`, which is
/// written back as a nested `acl` object merged over the pre-existing
/// `acl` keys so unrelated nested keys are not clobbered. The ownership
/// stamps are always force-set, not subject to diffing.
fn build_update_payload(
    diff: &Map<String, Value>,
    want: &Map<String, Value>,
    current: &Map<String, Value>,
) -> Map<String, Value> {
    let mut payload = Map::new();
    for field in diff.keys() {
        if field == "sharing" {
            let mut acl = match current.get("acl") {
                Some(Value::Object(acl)) => acl.clone(),
                _ => Map::new(),
            };
            acl.insert("sharing".to_string(), want["sharing"].clone());
            payload.insert("acl".to_string(), Value::Object(acl));
        } else {
            payload.insert(field.clone(), want[field].clone());
        }
    }
    payload.insert("_owner".to_string(), json!("nobody"));
    payload.insert("_user".to_string(), json!("nobody"));
    payload
}

/// Handles glass table creation when no `glass_table_id` is provided.
///
/// Both failures here happen before any network call.
async fn handle_create(
    client: &ItsiClient,
    desired: Map<String, Value>,
    check_mode: bool,
) -> Result<ModuleResult, ItsiError> {
    if !desired.contains_key("title") {
        return Err(ItsiError::validation(
            "'title' is required when creating a new glass table",
        ));
    }
    if !desired.contains_key("definition") {
        return Err(ItsiError::validation(
            "'definition' is required when creating a new glass table",
        ));
    }

    let after = desired.clone();

    if check_mode {
        return Ok(ModuleResult::new()
            .changed()
            .with_after(after.clone())
            .with_diff(after));
    }

    let payload = build_create_payload(&desired);
    tracing::debug!("Creating glass table");
    let response = client
        .post(GLASS_TABLE_ENDPOINT, &Value::Object(payload), &[])
        .await?
        .ok_or_else(|| ItsiError::api("failed to create glass table (API returned 404)"))?;

    Ok(ModuleResult::new()
        .changed()
        .with_after(after.clone())
        .with_diff(after)
        .with_response(response))
}

/// Handles glass table update when a `glass_table_id` is provided.
async fn handle_update(
    client: &ItsiClient,
    glass_table_id: &str,
    desired: Map<String, Value>,
    check_mode: bool,
) -> Result<ModuleResult, ItsiError> {
    let current = get_glass_table_by_id(client, glass_table_id)
        .await?
        .ok_or_else(|| ItsiError::not_found(glass_table_id))?;

    // No desired fields at all: nothing to reconcile, no write call.
    if desired.is_empty() {
        return Ok(ModuleResult::new());
    }

    let have = have_view(&current, desired.keys().map(String::as_str));

    // Strip null/empty values so that only real values drive changes.
    let want = remove_empties(&desired);

    // Recursive diff detects changes nested deep inside the definition.
    let diff = dict_diff(&have, &want);

    // "after" is have overlaid with want: shallow merge, changed top-level
    // keys fully replaced. The diff stays deep, the projection does not.
    let mut after = have.clone();
    for (key, value) in &want {
        after.insert(key.clone(), value.clone());
    }

    if diff.is_empty() {
        return Ok(ModuleResult::new()
            .with_before(have.clone())
            .with_after(have));
    }

    if check_mode {
        return Ok(ModuleResult::new()
            .changed()
            .with_before(have)
            .with_after(after)
            .with_diff(diff));
    }

    let payload = build_update_payload(&diff, &want, &current);
    let path = format!(
        "{}/{}",
        GLASS_TABLE_ENDPOINT,
        urlencoding::encode(glass_table_id)
    );
    let query = [("is_partial_data".to_string(), "1".to_string())];

    tracing::debug!(glass_table_id, "Updating glass table");
    let response = client
        .post(&path, &Value::Object(payload), &query)
        .await?
        .ok_or_else(|| ItsiError::not_found(glass_table_id))?;

    Ok(ModuleResult::new()
        .changed()
        .with_before(have)
        .with_after(after)
        .with_diff(diff)
        .with_response(response))
}

/// Handles `state=absent`: delete the glass table if it exists.
async fn handle_absent(
    client: &ItsiClient,
    glass_table_id: Option<&str>,
    check_mode: bool,
) -> Result<ModuleResult, ItsiError> {
    let glass_table_id = glass_table_id.ok_or_else(|| {
        ItsiError::validation("glass_table_id is required for state=absent (titles are not unique)")
    })?;

    let Some(current) = get_glass_table_by_id(client, glass_table_id).await? else {
        // Idempotent delete: already gone means nothing to do.
        return Ok(ModuleResult::new());
    };

    let before = have_view(&current, DIFF_FIELDS);

    if check_mode {
        return Ok(ModuleResult::new()
            .changed()
            .with_before(before.clone())
            .with_diff(before));
    }

    let path = format!(
        "{}/{}",
        GLASS_TABLE_ENDPOINT,
        urlencoding::encode(glass_table_id)
    );
    tracing::debug!(glass_table_id, "Deleting glass table");
    let response = client.delete(&path).await?.unwrap_or(json!({}));

    Ok(ModuleResult::new()
        .changed()
        .with_before(before.clone())
        .with_diff(before)
        .with_response(response))
}
