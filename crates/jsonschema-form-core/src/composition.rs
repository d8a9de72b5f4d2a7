//! `allOf` merging.
//!
//! A value must satisfy every `allOf` entry at once, so entries fold into one
//! schema where constraints tighten: `required` unions, `type` and `enum`
//! intersect, `const` must agree, lower bounds take the maximum and upper
//! bounds the minimum, `additionalProperties` and `items` merge as
//! subschemas. Keywords without merge rules are last-wins.

use std::collections::HashSet;

use serde_json::{Map, Value};

use crate::error::TransformError;
use crate::schema_utils::build_path;

/// How two values of one keyword combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rule {
    Properties,
    Required,
    Type,
    Const,
    Enum,
    Description,
    /// Keep the larger bound.
    Lower,
    /// Keep the smaller bound.
    Upper,
    AdditionalProperties,
    Items,
    LastWins,
}

impl Rule {
    fn for_keyword(keyword: &str) -> Self {
        match keyword {
            "properties" => Rule::Properties,
            "required" => Rule::Required,
            "type" => Rule::Type,
            "const" => Rule::Const,
            "enum" => Rule::Enum,
            "description" => Rule::Description,
            "minimum" | "exclusiveMinimum" | "minLength" | "minItems" | "minProperties" => {
                Rule::Lower
            }
            "maximum" | "exclusiveMaximum" | "maxLength" | "maxItems" | "maxProperties" => {
                Rule::Upper
            }
            "additionalProperties" => Rule::AdditionalProperties,
            "items" => Rule::Items,
            _ => Rule::LastWins,
        }
    }
}

/// Fold `schemas` into one via pairwise merge.
pub(crate) fn merge_all_of(schemas: Vec<Value>, path: &str) -> Result<Value, TransformError> {
    let mut iter = schemas.into_iter();
    let mut acc = iter.next().unwrap_or_else(|| Value::Object(Map::new()));
    for overlay in iter {
        acc = merge_two(acc, overlay, path)?;
    }
    Ok(acc)
}

/// Merge two schemas; `overlay` wins on keywords without a merge rule.
pub(crate) fn merge_two(base: Value, overlay: Value, path: &str) -> Result<Value, TransformError> {
    // `false` admits nothing, so it absorbs the other side.
    if base == Value::Bool(false) || overlay == Value::Bool(false) {
        return Ok(Value::Bool(false));
    }
    let mut result = match base {
        Value::Object(m) => m,
        _ => return Ok(overlay),
    };
    let Value::Object(overlay) = overlay else {
        return Ok(Value::Object(result));
    };

    for (keyword, value) in overlay {
        let rule = Rule::for_keyword(&keyword);
        let Some(existing) = result.remove(&keyword) else {
            result.insert(keyword, value);
            continue;
        };
        let merged = match rule {
            Rule::Properties => merge_property_maps(existing, value, path)?,
            Rule::Required => union_required(existing, value),
            Rule::Type => intersect_type(&existing, &value, path)?,
            Rule::Const if existing != value => {
                return Err(TransformError::SchemaConflict {
                    path: path.to_string(),
                    message: format!("allOf const conflict: {existing} vs {value}"),
                })
            }
            Rule::Enum => intersect_enum(existing, value),
            Rule::Description => join_descriptions(existing, value),
            Rule::Lower => tighten(existing, value, |base, next| next > base),
            Rule::Upper => tighten(existing, value, |base, next| next < base),
            Rule::AdditionalProperties => {
                merge_additional(existing, value, &build_path(path, &["additionalProperties"]))?
            }
            Rule::Items if existing.is_object() && value.is_object() => {
                merge_two(existing, value, &build_path(path, &["items"]))?
            }
            Rule::Const | Rule::Items | Rule::LastWins => value,
        };
        result.insert(keyword, merged);
    }

    Ok(Value::Object(result))
}

/// Per-field merge of two `properties` maps; fields on one side only are kept.
fn merge_property_maps(base: Value, overlay: Value, path: &str) -> Result<Value, TransformError> {
    let (mut fields, overlay) = match (base, overlay) {
        (Value::Object(fields), Value::Object(overlay)) => (fields, overlay),
        (_, overlay) => return Ok(overlay),
    };
    for (name, schema) in overlay {
        let schema = match fields.remove(&name) {
            Some(prior) => merge_two(prior, schema, &build_path(path, &["properties", &name]))?,
            None => schema,
        };
        fields.insert(name, schema);
    }
    Ok(Value::Object(fields))
}

/// Every name required by either side, first-seen order.
fn union_required(base: Value, overlay: Value) -> Value {
    let names = base
        .as_array()
        .into_iter()
        .chain(overlay.as_array())
        .flatten()
        .filter_map(Value::as_str);
    let mut seen = HashSet::new();
    Value::Array(
        names
            .filter(|name| seen.insert(*name))
            .map(|name| Value::String(name.to_string()))
            .collect(),
    )
}

/// Keep `next` over `base` when `stricter` says so; non-numeric bounds are
/// last-wins.
fn tighten(base: Value, next: Value, stricter: fn(f64, f64) -> bool) -> Value {
    match (base.as_f64(), next.as_f64()) {
        (Some(b), Some(n)) if !stricter(b, n) => base,
        _ => next,
    }
}

/// `false` beats everything, `true` yields to a schema, two schemas merge.
fn merge_additional(base: Value, overlay: Value, path: &str) -> Result<Value, TransformError> {
    Ok(match (base, overlay) {
        (Value::Bool(false), _) | (_, Value::Bool(false)) => Value::Bool(false),
        (schema @ Value::Object(_), Value::Bool(true))
        | (Value::Bool(true), schema @ Value::Object(_)) => schema,
        (base @ Value::Object(_), overlay @ Value::Object(_)) => merge_two(base, overlay, path)?,
        (_, overlay) => overlay,
    })
}

fn type_set(val: &Value) -> Vec<String> {
    match val {
        Value::String(s) => vec![s.clone()],
        Value::Array(arr) => arr.iter().filter_map(|v| v.as_str().map(String::from)).collect(),
        _ => Vec::new(),
    }
}

/// Intersect `type`, treating `integer` as a subtype of `number`.
fn intersect_type(existing: &Value, overlay: &Value, path: &str) -> Result<Value, TransformError> {
    let base = type_set(existing);
    let mut common: Vec<String> = Vec::new();
    for o in type_set(overlay) {
        for b in &base {
            let hit = match (b.as_str(), o.as_str()) {
                (x, y) if x == y => x,
                ("number", "integer") | ("integer", "number") => "integer",
                _ => continue,
            };
            if !common.iter().any(|c| c == hit) {
                common.push(hit.to_string());
            }
        }
    }

    match common.len() {
        0 => Err(TransformError::SchemaConflict {
            path: path.to_string(),
            message: format!("allOf type conflict: {existing} vs {overlay}"),
        }),
        1 => Ok(Value::String(common.remove(0))),
        _ => Ok(Value::Array(common.into_iter().map(Value::String).collect())),
    }
}

fn intersect_enum(existing: Value, overlay: Value) -> Value {
    match (existing, overlay) {
        (Value::Array(mut values), Value::Array(allowed)) => {
            values.retain(|v| allowed.contains(v));
            Value::Array(values)
        }
        (_, overlay) => overlay,
    }
}

fn join_descriptions(existing: Value, overlay: Value) -> Value {
    match (existing, overlay) {
        (Value::String(a), Value::String(b)) if a.split("\n\n").any(|p| p == b) => {
            Value::String(a)
        }
        (Value::String(a), Value::String(b)) => Value::String(format!("{a}\n\n{b}")),
        (_, overlay) => overlay,
    }
}
