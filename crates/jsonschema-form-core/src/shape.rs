//! Closed classifications of schema nodes and data instances.
//!
//! Both are computed once per recursion step so the co-transformer can
//! pattern-match instead of probing keywords at every branch.

use serde_json::{Map, Value};

use crate::predicates::is_object_with_properties;
use crate::schema_utils::composition_len;

/// Shape of a data instance at one recursion step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InstanceShape<'a> {
    Object(&'a Map<String, Value>),
    Array(&'a [Value]),
    Scalar(&'a Value),
}

impl<'a> InstanceShape<'a> {
    pub fn of(value: &'a Value) -> Self {
        match value {
            Value::Object(map) => InstanceShape::Object(map),
            Value::Array(items) => InstanceShape::Array(items),
            other => InstanceShape::Scalar(other),
        }
    }

    pub fn as_object(self) -> Option<&'a Map<String, Value>> {
        match self {
            InstanceShape::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_array(self) -> Option<&'a [Value]> {
        match self {
            InstanceShape::Array(items) => Some(items),
            _ => None,
        }
    }
}

/// The primary kind of a schema node, by handler precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Object,
    Array,
    AllOf,
    Union,
    Leaf,
}

/// Which co-transformer handlers apply to a schema node.
///
/// A node may need several handlers (an object with properties that is also
/// a union); they run in field order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NodeShape {
    pub properties: bool,
    pub items: bool,
    pub single_all_of: bool,
    pub multi_all_of: bool,
    pub any_of: bool,
    pub one_of: bool,
}

impl NodeShape {
    pub fn of(node: &Value) -> Self {
        if !node.is_object() {
            return Self::default();
        }
        let all_of = composition_len(node, "allOf");
        Self {
            properties: is_object_with_properties(node),
            items: node.get("items").is_some_and(Value::is_object),
            single_all_of: all_of == Some(1)
                && node
                    .get("allOf")
                    .and_then(|v| v.get(0))
                    .is_some_and(Value::is_object),
            multi_all_of: all_of.is_some_and(|n| n > 1),
            any_of: composition_len(node, "anyOf").is_some(),
            one_of: composition_len(node, "oneOf").is_some(),
        }
    }

    pub fn kind(&self) -> NodeKind {
        if self.properties {
            NodeKind::Object
        } else if self.items {
            NodeKind::Array
        } else if self.single_all_of || self.multi_all_of {
            NodeKind::AllOf
        } else if self.any_of || self.one_of {
            NodeKind::Union
        } else {
            NodeKind::Leaf
        }
    }
}
