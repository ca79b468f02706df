//! Dotted key-path lookups over JSON values.
//!
//! GraphQL responses are deeply nested; pagination needs to read page-info
//! flags and node arrays at positions that differ per query. Key-paths like
//! `"organization.repositories.pageInfo.hasNextPage"` address those positions
//! without a typed model per query.

use serde_json::Value;

/// Resolve a dotted key-path against a JSON value.
///
/// Each segment indexes an object field. A missing key or a non-object
/// intermediate yields `None`; array elements are not addressable.
#[must_use]
pub fn get_path<'a>(path: &str, value: &'a Value) -> Option<&'a Value> {
    path.split('.').try_fold(value, |node, key| node.get(key))
}

/// Resolve a dotted key-path, falling back to `default` when absent.
#[must_use]
pub fn get_path_or<'a>(path: &str, value: &'a Value, default: &'a Value) -> &'a Value {
    get_path(path, value).unwrap_or(default)
}

/// Whether the value at `path` is boolean `true`.
///
/// Absent paths and non-boolean values read as `false`; pagination treats
/// anything but an explicit `true` as "no more pages".
#[must_use]
pub fn is_true_at(path: &str, value: &Value) -> bool {
    get_path(path, value).and_then(Value::as_bool) == Some(true)
}
