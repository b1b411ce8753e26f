//! Recursive diff and empty-stripping for JSON documents.
//!
//! These two operations are the heart of the reconcile step: a "want" view
//! is first stripped of null/empty entries, then structurally diffed
//! against a "have" view so that only the fields that actually changed
//! drive an update.
//!
//! # Semantics
//!
//! - [`remove_empties`] drops entries whose value is null, an empty string,
//!   an empty array, or an object that is empty after recursive stripping.
//!   Only non-empty explicit values drive changes; a caller cannot clear a
//!   field by omission.
//! - [`dict_diff`] emits, for each key in "want", the desired value when
//!   the key is absent from "have" or differs. Nested objects recurse and
//!   emit only the sub-keys that differ, preserving the nested shape.
//!   List-valued leaves are compared as whole values: any element-level
//!   difference replaces the entire list.

use serde_json::{Map, Value};

/// Returns a copy of `map` with null and empty entries removed.
///
/// Objects are stripped recursively; an object whose entries are all empty
/// is itself dropped. Scalars other than the empty string (including
/// `false` and `0`) are kept.
pub fn remove_empties(map: &Map<String, Value>) -> Map<String, Value> {
    let mut out = Map::new();
    for (key, value) in map {
        match value {
            Value::Null => {}
            Value::String(s) if s.is_empty() => {}
            Value::Array(a) if a.is_empty() => {}
            Value::Object(o) => {
                let inner = remove_empties(o);
                if !inner.is_empty() {
                    out.insert(key.clone(), Value::Object(inner));
                }
            }
            _ => {
                out.insert(key.clone(), value.clone());
            }
        }
    }
    out
}

/// Computes the recursive structural diff of `want` against `have`.
///
/// The result maps each changed field to its desired value. Keys present
/// only in `have` are ignored: the diff answers "what must change to reach
/// `want`", not "how do the documents differ".
///
/// An empty result means the two views already agree and no update is
/// needed.
pub fn dict_diff(have: &Map<String, Value>, want: &Map<String, Value>) -> Map<String, Value> {
    let mut diff = Map::new();
    for (key, wanted) in want {
        match (have.get(key), wanted) {
            (Some(Value::Object(have_inner)), Value::Object(want_inner)) => {
                let sub = dict_diff(have_inner, want_inner);
                if !sub.is_empty() {
                    diff.insert(key.clone(), Value::Object(sub));
                }
            }
            (Some(current), _) if current == wanted => {}
            _ => {
                diff.insert(key.clone(), wanted.clone());
            }
        }
    }
    diff
}
