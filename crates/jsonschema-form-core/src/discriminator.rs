//! Discriminator injection and variant identifiers.
//!
//! Every union alternative gets a synthetic string field whose `const` is the
//! alternative's identifier. The editor reads that field to know which
//! alternative a data instance currently represents.

use std::collections::HashSet;

use serde_json::{json, Map, Value};

use crate::schema_utils::{title_of, type_label};

/// Returns a copy of `schema` with `properties.<key> = { type: string, const: id }`
/// and `title = id`.
///
/// `properties` is created when absent. Calling again with another `id`
/// overwrites both the constant and the title.
pub fn inject_schema_key(schema: &Value, id: &str, key: &str) -> Value {
    let mut obj = schema.as_object().cloned().unwrap_or_default();

    let mut properties = match obj.remove("properties") {
        Some(Value::Object(props)) => props,
        _ => Map::new(),
    };
    properties.insert(key.to_string(), json!({ "type": "string", "const": id }));

    obj.insert("properties".to_string(), Value::Object(properties));
    obj.insert("title".to_string(), Value::String(id.to_string()));
    Value::Object(obj)
}

/// The discriminator constant carried by an alternative, if any.
pub fn discriminator_of<'a>(alternative: &'a Value, key: &str) -> Option<&'a str> {
    alternative
        .get("properties")?
        .get(key)?
        .get("const")?
        .as_str()
}

/// Hands out variant identifiers that are unique within one union node.
#[derive(Debug, Default)]
pub(crate) struct VariantIds {
    seen: HashSet<String>,
}

impl VariantIds {
    /// Identifier for the alternative at `index` (0-based).
    ///
    /// The alternative's title when present, else `Schema <n> (<type>)`.
    /// A repeated identifier is suffixed with ` #<n>`.
    pub(crate) fn assign(&mut self, alternative: &Value, index: usize) -> String {
        let ordinal = index + 1;
        let base = match title_of(alternative) {
            Some(title) => title.to_string(),
            None => format!("Schema {ordinal} ({})", type_label(alternative)),
        };

        if self.seen.insert(base.clone()) {
            return base;
        }

        let unique = format!("{base} #{ordinal}");
        tracing::warn!(id = %base, renamed = %unique, "duplicate variant identifier");
        self.seen.insert(unique.clone());
        unique
    }
}
