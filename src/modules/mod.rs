//! Module implementations and the shared result contract.
//!
//! Each submodule is one declarative operation: it maps typed parameters
//! to at most two ITSI API calls and produces a [`ModuleResult`].

pub mod episode_comment;
pub mod glass_table;
pub mod glass_table_info;

use serde::Serialize;
use serde_json::{Map, Value};

/// Structured result of one module invocation.
///
/// Guarantees that `before`, `after`, `diff`, and `response` are always
/// present in the serialized output, defaulting to empty objects when not
/// set. Module-specific extras (e.g., `glass_tables` for the info module)
/// are flattened alongside the standard keys.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct ModuleResult {
    /// Whether the remote resource was (or would be) modified.
    pub changed: bool,

    /// Current values of the targeted fields before the operation.
    pub before: Map<String, Value>,

    /// Desired values of the targeted fields after the operation.
    /// When `changed` is false, `before` and `after` are identical.
    pub after: Map<String, Value>,

    /// Fields that differ between current and desired state.
    pub diff: Map<String, Value>,

    /// Raw JSON body returned by the ITSI API for the write call.
    /// Empty when no write call was made (no changes needed or check mode).
    pub response: Map<String, Value>,

    /// Module-specific extra keys, flattened into the result document.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ModuleResult {
    /// A result with every mapping empty and `changed` false.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the result as changed.
    #[must_use]
    pub fn changed(mut self) -> Self {
        self.changed = true;
        self
    }

    /// Sets the before view.
    #[must_use]
    pub fn with_before(mut self, before: Map<String, Value>) -> Self {
        self.before = before;
        self
    }

    /// Sets the after view.
    #[must_use]
    pub fn with_after(mut self, after: Map<String, Value>) -> Self {
        self.after = after;
        self
    }

    /// Sets the diff view.
    #[must_use]
    pub fn with_diff(mut self, diff: Map<String, Value>) -> Self {
        self.diff = diff;
        self
    }

    /// Stores a raw API response body.
    ///
    /// Non-object bodies are ignored: the result contract promises a
    /// mapping, and every ITSI write endpoint answers with one.
    #[must_use]
    pub fn with_response(mut self, response: Value) -> Self {
        if let Value::Object(map) = response {
            self.response = map;
        }
        self
    }

    /// Adds a module-specific extra key to the result document.
    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}
