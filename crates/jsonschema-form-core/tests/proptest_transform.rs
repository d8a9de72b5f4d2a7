//! Property-based tests for the co-transformer.
//!
//! Generates schemas with primitives, one level of nesting, arrays of
//! primitives, and unions of those, coupled with conforming data via
//! `prop_map`.
//!
//! Invariants:
//! - union-free schemas come back unchanged, and so does their data;
//! - transforming a transformed schema again is a no-op;
//! - array elements transform exactly like standalone items.

use jsonschema_form_core::{transform, Transformer};
use proptest::prelude::*;
use serde_json::{json, Map, Value};

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
enum LeafType {
    String,
    Integer,
    Number,
    Boolean,
}

fn arb_leaf_type() -> impl Strategy<Value = LeafType> {
    prop_oneof![
        Just(LeafType::String),
        Just(LeafType::Integer),
        Just(LeafType::Number),
        Just(LeafType::Boolean),
    ]
}

#[derive(Debug, Clone)]
enum PropType {
    Leaf(LeafType),
    ArrayOf(LeafType),
    NestedObject(Vec<(String, LeafType)>),
}

fn arb_prop_name() -> impl Strategy<Value = String> {
    // Lowercase only: keeps generated names clear of `anyOf` and `schemaKey`.
    "[a-z_][a-z0-9_]{0,10}"
}

fn arb_prop_type() -> impl Strategy<Value = PropType> {
    prop_oneof![
        arb_leaf_type().prop_map(PropType::Leaf),
        arb_leaf_type().prop_map(PropType::ArrayOf),
        prop::collection::vec((arb_prop_name(), arb_leaf_type()), 1..4)
            .prop_map(PropType::NestedObject),
    ]
}

fn leaf_schema(leaf: &LeafType) -> Value {
    match leaf {
        LeafType::String => json!({ "type": "string" }),
        LeafType::Integer => json!({ "type": "integer" }),
        LeafType::Number => json!({ "type": "number" }),
        LeafType::Boolean => json!({ "type": "boolean" }),
    }
}

fn leaf_data(leaf: &LeafType) -> Value {
    match leaf {
        LeafType::String => json!("test_value"),
        LeafType::Integer => json!(42),
        LeafType::Number => json!(1.5),
        LeafType::Boolean => json!(true),
    }
}

fn prop_schema(prop: &PropType) -> Value {
    match prop {
        PropType::Leaf(leaf) => leaf_schema(leaf),
        PropType::ArrayOf(leaf) => json!({ "type": "array", "items": leaf_schema(leaf) }),
        PropType::NestedObject(fields) => {
            let props: Map<String, Value> = fields
                .iter()
                .map(|(name, leaf)| (name.clone(), leaf_schema(leaf)))
                .collect();
            json!({ "type": "object", "properties": props })
        }
    }
}

fn prop_data(prop: &PropType) -> Value {
    match prop {
        PropType::Leaf(leaf) => leaf_data(leaf),
        PropType::ArrayOf(leaf) => json!([leaf_data(leaf), leaf_data(leaf)]),
        PropType::NestedObject(fields) => {
            let data: Map<String, Value> = fields
                .iter()
                .map(|(name, leaf)| (name.clone(), leaf_data(leaf)))
                .collect();
            Value::Object(data)
        }
    }
}

/// A union-free object schema and conforming data.
fn arb_plain_schema_and_data() -> impl Strategy<Value = (Value, Value)> {
    prop::collection::vec((arb_prop_name(), arb_prop_type()), 1..6).prop_map(|props| {
        let mut schema_props = Map::new();
        let mut data = Map::new();
        for (name, prop) in &props {
            schema_props.insert(name.clone(), prop_schema(prop));
            data.insert(name.clone(), prop_data(prop));
        }
        (
            json!({ "type": "object", "properties": schema_props }),
            Value::Object(data),
        )
    })
}

/// A schema whose fields may be unions of primitive and object alternatives.
fn arb_union_schema() -> impl Strategy<Value = Value> {
    let alternative = prop_oneof![
        arb_prop_type().prop_map(|p| prop_schema(&p)),
        (arb_prop_name(), arb_prop_type()).prop_map(|(title, p)| {
            let mut schema = prop_schema(&p);
            schema["title"] = json!(title);
            schema
        }),
    ];
    let field = prop_oneof![
        arb_prop_type().prop_map(|p| prop_schema(&p)),
        (prop::bool::ANY, prop::collection::vec(alternative, 1..4)).prop_map(|(any, alts)| {
            let keyword = if any { "anyOf" } else { "oneOf" };
            json!({ keyword: alts })
        }),
    ];
    prop::collection::vec((arb_prop_name(), field), 1..5).prop_map(|fields| {
        let props: Map<String, Value> = fields.into_iter().collect();
        json!({ "type": "object", "properties": props })
    })
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn union_free_schema_and_data_are_unchanged((schema, data) in arb_plain_schema_and_data()) {
        let result = transform(&schema, Some(&data)).unwrap();
        prop_assert_eq!(result.schema, schema);
        prop_assert_eq!(result.instance, Some(data));
    }

    #[test]
    fn schema_normalization_is_idempotent(schema in arb_union_schema()) {
        let transformer = Transformer::default();
        let once = transformer.transform(&schema, None).unwrap().schema;
        let twice = transformer.transform(&once, None).unwrap().schema;
        prop_assert_eq!(twice, once);
    }

    #[test]
    fn no_any_of_survives(schema in arb_union_schema()) {
        let result = transform(&schema, None).unwrap();
        prop_assert!(!result.schema.to_string().contains("\"anyOf\""));
    }

    #[test]
    fn array_elements_transform_like_items(prop in arb_prop_type()) {
        let item = json!({ "anyOf": [prop_schema(&prop), { "type": "object", "title": "Other" }] });
        let x = prop_data(&prop);
        let y = json!({ "unrelated": true });
        let schema = json!({ "type": "array", "items": item });
        let result = transform(&schema, Some(&json!([x, y]))).unwrap();

        prop_assert_eq!(&result.schema["items"], &transform(&item, None).unwrap().schema);
        let expected = json!([
            transform(&item, Some(&x)).unwrap().instance.unwrap(),
            transform(&item, Some(&y)).unwrap().instance.unwrap(),
        ]);
        prop_assert_eq!(result.instance, Some(expected));
    }
}
