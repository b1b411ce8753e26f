//! Appending comments to ITSI episodes (notable event groups).
//!
//! Comments cannot be updated or deleted via the API, so every invocation
//! is an unconditional create: there is no lookup, no diff, and no
//! idempotency. `before` is always empty and `after` equals `diff` equals
//! the freshly built payload. The result is always marked changed, in
//! check mode too.

use serde_json::{json, Map, Value};

use crate::error::ItsiError;
use crate::itsi_client::{ItsiClient, NOTABLE_EVENT_COMMENT_ENDPOINT};
use crate::modules::ModuleResult;

/// Parameters for one episode-comment invocation.
#[derive(Debug, Clone)]
pub struct EpisodeCommentParams {
    /// The episode `_key` to comment on.
    pub episode_key: String,

    /// The text content of the comment.
    pub comment: String,

    /// Whether this comment is for an episode group. Should be true for
    /// ITSI episodes.
    pub is_group: bool,
}

/// Builds the comment payload for the ITSI API.
///
/// Maps the user-facing `episode_key` parameter to the `event_id` field
/// the notable_event_comment endpoint expects; a pure renaming.
fn build_comment_payload(params: &EpisodeCommentParams) -> Map<String, Value> {
    let mut payload = Map::new();
    payload.insert("comment".to_string(), json!(params.comment));
    payload.insert("event_id".to_string(), json!(params.episode_key));
    payload.insert("is_group".to_string(), json!(params.is_group));
    payload
}

/// Runs one episode-comment module invocation.
pub async fn run(
    client: &ItsiClient,
    params: &EpisodeCommentParams,
    check_mode: bool,
) -> Result<ModuleResult, ItsiError> {
    let payload = build_comment_payload(params);

    let result = ModuleResult::new()
        .changed()
        .with_after(payload.clone())
        .with_diff(payload.clone())
        .with_extra("episode_key", json!(params.episode_key));

    if check_mode {
        return Ok(result);
    }

    tracing::debug!(episode_key = %params.episode_key, "Adding episode comment");
    let response = client
        .post(NOTABLE_EVENT_COMMENT_ENDPOINT, &Value::Object(payload), &[])
        .await
        .map_err(|e| {
            ItsiError::api(format!(
                "failed to add comment to episode '{}': {}",
                params.episode_key, e
            ))
        })?
        .ok_or_else(|| {
            ItsiError::api(format!(
                "failed to add comment to episode '{}' (no response from API)",
                params.episode_key
            ))
        })?;

    Ok(result.with_response(response))
}
