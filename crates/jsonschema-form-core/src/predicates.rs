//! Schema predicates that drive branching in the co-transformer and the
//! basic/complex schema split.
//!
//! All predicates are pure and accept any `Value`; non-object schemas
//! (`true`, `false`, malformed entries) classify as nothing.

use serde_json::Value;

use crate::schema_utils::{composition_len, has_type, properties_of};

/// Primitive `type` names the editor renders with a single input.
const PRIMITIVE_TYPES: &[&str] = &["string", "number", "integer", "boolean"];

const COMPOSITION_KEYWORDS: &[&str] = &["allOf", "anyOf", "oneOf"];

/// Whether the node describes an array (`type: "array"` or an `items` schema).
pub fn is_array_schema(schema: &Value) -> bool {
    schema.is_object() && (has_type(schema, "array") || schema.get("items").is_some())
}

/// Whether the node is an enumeration: a non-empty `enum` and no nested
/// object structure.
///
/// A node with both `enum` and `type: "object"` or `properties` is complex.
pub fn is_enumeration(schema: &Value) -> bool {
    let has_enum = schema
        .get("enum")
        .and_then(Value::as_array)
        .is_some_and(|values| !values.is_empty());
    has_enum && !has_type(schema, "object") && schema.get("properties").is_none()
}

/// Whether the node carries any composition keyword (`allOf`/`anyOf`/`oneOf`).
pub fn is_composition(schema: &Value) -> bool {
    COMPOSITION_KEYWORDS
        .iter()
        .any(|keyword| schema.get(*keyword).is_some())
}

/// Whether the node is a primitive or enumeration the editor can render
/// directly: string/number/integer/boolean or an enum, without composition.
pub fn is_basic_schema(schema: &Value) -> bool {
    if !schema.is_object() || is_composition(schema) {
        return false;
    }
    if is_enumeration(schema) {
        return true;
    }
    let primitive = match schema.get("type") {
        Some(Value::String(kind)) => PRIMITIVE_TYPES.contains(&kind.as_str()),
        _ => false,
    };
    primitive && schema.get("properties").is_none()
}

/// Whether the node is an array whose items are basic.
pub fn is_basic_array_schema(schema: &Value) -> bool {
    is_array_schema(schema)
        && !is_composition(schema)
        && schema.get("items").is_some_and(is_basic_schema)
}

/// Whether the field belongs on the basic (flat) editor surface.
pub fn is_basic_editor_schema(schema: &Value) -> bool {
    is_basic_schema(schema) || is_basic_array_schema(schema)
}

/// Whether the field needs the complex editor: an object or array shape, or
/// a composition node, that is not already a basic-editor field.
pub fn is_complex_editor_schema(schema: &Value) -> bool {
    if !schema.is_object() || is_basic_editor_schema(schema) {
        return false;
    }
    has_type(schema, "object")
        || schema.get("properties").is_some()
        || is_array_schema(schema)
        || is_composition(schema)
}

/// Whether the node is a union with at least one alternative.
///
/// After normalization every union is a `oneOf`; `anyOf` is accepted so the
/// predicate also answers for raw input.
pub fn is_union_node(schema: &Value) -> bool {
    composition_len(schema, "oneOf").is_some_and(|n| n > 0)
        || composition_len(schema, "anyOf").is_some_and(|n| n > 0)
}

/// Whether the node declares at least one property.
pub fn is_object_with_properties(schema: &Value) -> bool {
    properties_of(schema).is_some()
}

// ===========================================================================
// Tests
// ===========================================================================
