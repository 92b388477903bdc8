use serde_json::Value;

/// Walks `path` through nested JSON objects and returns the value at the end
/// of the path. Any step that is missing or not an object yields `None`.
pub fn lookup<'a>(root: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut cursor = root;
    for key in path {
        cursor = cursor.as_object()?.get(*key)?;
    }
    Some(cursor)
}

/// String variant of [`lookup`]: returns `default` when the path is missing
/// or does not resolve to a string.
pub fn lookup_str<'a>(root: &'a Value, path: &[&str], default: &'a str) -> &'a str {
    match lookup(root, path) {
        Some(Value::String(text)) => text.as_str(),
        _ => default,
    }
}

/// Boolean variant of [`lookup`]: absent, null, or non-boolean steps read as
/// `false`.
pub fn lookup_bool(root: &Value, path: &[&str]) -> bool {
    matches!(lookup(root, path), Some(Value::Bool(true)))
}
