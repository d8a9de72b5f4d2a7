//! Shared schema utilities: JSON Pointer paths and keyword accessors.
//!
//! Paths are only used to label recursion sites in logs and errors
//! (e.g. `#/properties/contributor/oneOf/1`); they are never resolved.

use std::borrow::Cow;

use serde_json::{Map, Value};

// ---------------------------------------------------------------------------
// JSON Pointer escaping (RFC 6901)
// ---------------------------------------------------------------------------

/// Escape a single path segment per RFC 6901.
///
/// - `~` → `~0`
/// - `/` → `~1`
///
/// Returns `Cow::Borrowed` when no escaping is needed (the common case).
pub fn escape_pointer_segment(segment: &str) -> Cow<'_, str> {
    if segment.contains('~') || segment.contains('/') {
        Cow::Owned(segment.replace('~', "~0").replace('/', "~1"))
    } else {
        Cow::Borrowed(segment)
    }
}

/// Build a JSON Pointer path by appending segments to a parent path.
///
/// # Example
/// ```
/// use jsonschema_form_core::build_path;
/// assert_eq!(build_path("#", &["properties", "a/b"]), "#/properties/a~1b");
/// ```
pub fn build_path(parent: &str, segments: &[&str]) -> String {
    let mut path = parent.to_string();
    for segment in segments {
        path.push('/');
        path.push_str(&escape_pointer_segment(segment));
    }
    path
}

// ---------------------------------------------------------------------------
// Keyword accessors
// ---------------------------------------------------------------------------

/// The `properties` map of a schema node, if it is a map.
pub(crate) fn properties_of(node: &Value) -> Option<&Map<String, Value>> {
    node.get("properties").and_then(Value::as_object)
}

/// The non-empty `title` of a schema node.
pub(crate) fn title_of(node: &Value) -> Option<&str> {
    node.get("title")
        .and_then(Value::as_str)
        .filter(|t| !t.is_empty())
}

/// The `type` keyword as a single label.
///
/// Array-form types are joined with `" | "`; a missing type is `any`.
pub(crate) fn type_label(node: &Value) -> String {
    match node.get("type") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Array(types)) => types
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>()
            .join(" | "),
        _ => "any".to_string(),
    }
}

/// Whether the `type` keyword names `kind` (string or array form).
pub(crate) fn has_type(node: &Value, kind: &str) -> bool {
    match node.get("type") {
        Some(Value::String(s)) => s == kind,
        Some(Value::Array(types)) => types.iter().any(|t| t.as_str() == Some(kind)),
        _ => false,
    }
}

/// Length of an array-of-schemas keyword, or `None` if absent or not an array.
pub(crate) fn composition_len(node: &Value, keyword: &str) -> Option<usize> {
    node.get(keyword).and_then(Value::as_array).map(Vec::len)
}

// ===========================================================================
// Tests
// ===========================================================================
