//! Editor-side helpers around the co-transformer.
//!
//! These split a schema into the flat "basic" form and the nested "complex"
//! editor, prepare models for editing, and write a union sub-model back into
//! its parent after the user picks an alternative. None of them recurse.

use serde_json::{Map, Value};

use crate::predicates::{is_array_schema, is_basic_editor_schema, is_complex_editor_schema};
use crate::schema_utils::properties_of;

/// The schema restricted to fields the basic (flat) form can edit.
///
/// `required` is filtered to the kept fields and `description` is dropped.
pub fn compute_basic_schema(schema: &Value) -> Value {
    filter_schema_properties(schema, is_basic_editor_schema)
}

/// The schema restricted to fields that need the complex editor.
pub fn compute_complex_schema(schema: &Value) -> Value {
    filter_schema_properties(schema, is_complex_editor_schema)
}

fn filter_schema_properties(schema: &Value, keep: fn(&Value) -> bool) -> Value {
    let mut obj = schema.as_object().cloned().unwrap_or_default();

    let properties: Map<String, Value> = properties_of(schema)
        .map(|props| {
            props
                .iter()
                .filter(|(_, sub)| keep(sub))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect()
        })
        .unwrap_or_default();

    let required: Vec<Value> = schema
        .get("required")
        .and_then(Value::as_array)
        .map(|req| {
            req.iter()
                .filter(|key| key.as_str().is_some_and(|k| properties.contains_key(k)))
                .cloned()
                .collect()
        })
        .unwrap_or_default();

    obj.insert("properties".to_string(), Value::Object(properties));
    obj.insert("required".to_string(), Value::Array(required));
    obj.remove("description");
    Value::Object(obj)
}

/// Set every array-typed field that is absent or `null` in `model` to `[]`.
pub fn populate_empty_arrays(schema: &Value, model: &mut Map<String, Value>) {
    let Some(props) = properties_of(schema) else {
        return;
    };
    for (key, sub) in props {
        if !is_array_schema(sub) {
            continue;
        }
        if model.get(key).map_or(true, Value::is_null) {
            model.insert(key.clone(), Value::Array(Vec::new()));
        }
    }
}

/// The fields of `model` that `schema` declares.
pub fn filter_model_with_schema(model: &Map<String, Value>, schema: &Value) -> Map<String, Value> {
    let Some(props) = properties_of(schema) else {
        return Map::new();
    };
    model
        .iter()
        .filter(|(key, _)| props.contains_key(*key))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

/// Copy every field `sub_schema` declares from `sub_model` into `master`.
///
/// A declared field missing from `sub_model` is removed from `master`.
/// Fields `sub_schema` does not declare are left untouched, so values from a
/// previously selected alternative may remain; see [`switch_variant`].
pub fn write_sub_model_to_master(
    sub_model: &Map<String, Value>,
    sub_schema: &Value,
    master: &mut Map<String, Value>,
) {
    let Some(props) = properties_of(sub_schema) else {
        return;
    };
    for key in props.keys() {
        match sub_model.get(key) {
            Some(value) => {
                master.insert(key.clone(), value.clone());
            }
            None => {
                master.remove(key);
            }
        }
    }
}

/// Write back after switching from `previous` to `next` alternative.
///
/// Fields only `previous` declares are removed from `master` first, then
/// [`write_sub_model_to_master`] copies the `next` fields.
pub fn switch_variant(
    sub_model: &Map<String, Value>,
    previous: &Value,
    next: &Value,
    master: &mut Map<String, Value>,
) {
    if let Some(stale) = properties_of(previous) {
        let keep = properties_of(next);
        for key in stale.keys() {
            if !keep.is_some_and(|k| k.contains_key(key)) {
                tracing::debug!(field = %key, "removing field of previous variant");
                master.remove(key);
            }
        }
    }
    write_sub_model_to_master(sub_model, next, master);
}
