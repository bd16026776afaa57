use serde_json::Value;

/// True iff every name in `required` is a key of `object`.
///
/// Presence-only: value types, extra fields and nested shapes are not
/// inspected. A non-object never satisfies a non-empty requirement list.
pub fn has_required_fields(required: &[String], object: &Value) -> bool {
    match object.as_object() {
        Some(map) => required.iter().all(|name| map.contains_key(name)),
        None => required.is_empty(),
    }
}

/// The required names absent from `object`, for check diagnostics.
pub fn missing_fields<'a>(required: &'a [String], object: &Value) -> Vec<&'a str> {
    match object.as_object() {
        Some(map) => required
            .iter()
            .filter(|name| !map.contains_key(name.as_str()))
            .map(|name| name.as_str())
            .collect(),
        None => required.iter().map(|name| name.as_str()).collect(),
    }
}
