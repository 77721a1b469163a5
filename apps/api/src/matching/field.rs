//! Dotted field-path lookup over JSON records.

use serde_json::Value;

/// Resolves `path` (e.g. `"genre"` or `"artist.tier"`) against `record`.
///
/// Returns `None` when the path is empty, a segment is missing, or an
/// intermediate value is null or not an object. Array indices are not
/// supported. A terminal `null` is returned as `Some(Value::Null)`.
pub fn resolve_field<'a>(record: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return None;
    }
    path.split('.')
        .try_fold(record, |current, segment| current.as_object()?.get(segment))
}
