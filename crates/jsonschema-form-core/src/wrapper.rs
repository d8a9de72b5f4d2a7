//! Lifts primitive union alternatives into object shape.
//!
//! The discriminator field needs a `properties` map to live in, so a bare
//! `{ "type": "string" }` alternative becomes an object whose value field
//! carries the original `type`/`enum`.

use serde_json::{Map, Value};

/// Wraps a basic or enumeration schema into an object with one value field.
///
/// The result keeps the input's `title` and any existing `properties` (such as
/// an injected discriminator). The value field is titled
/// `"<parent_title> Value"`, or `"Value"` without a parent title.
pub fn wrap_basic_schema(schema: &Value, parent_title: Option<&str>, value_key: &str) -> Value {
    let label = match parent_title.filter(|t| !t.is_empty()) {
        Some(parent) => format!("{parent} Value"),
        None => "Value".to_string(),
    };

    let mut value = Map::new();
    value.insert("title".to_string(), Value::String(label));
    if let Some(kind) = schema.get("type") {
        value.insert("type".to_string(), kind.clone());
    }
    if let Some(values) = schema.get("enum") {
        value.insert("enum".to_string(), values.clone());
    }

    let mut properties = schema
        .get("properties")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();
    properties.insert(value_key.to_string(), Value::Object(value));

    let mut wrapped = Map::new();
    wrapped.insert("type".to_string(), Value::String("object".to_string()));
    if let Some(title) = schema.get("title") {
        wrapped.insert("title".to_string(), title.clone());
    }
    wrapped.insert("properties".to_string(), Value::Object(properties));
    Value::Object(wrapped)
}
