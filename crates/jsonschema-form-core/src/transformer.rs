//! The co-transformer: walks a schema and its data instance in lockstep.
//!
//! Per schema node, in order:
//!
//! 1. `properties` — recurse per field with the matching instance field.
//! 2. `items` — recurse once without an instance (the item template), then
//!    once per existing array element.
//! 3. `allOf` — a single entry (or, with [`AllOfStrategy::Merge`], the merge
//!    of all entries) is transformed with the current instance and spliced
//!    into the node.
//! 4. `anyOf` is renamed to `oneOf`.
//! 5. `oneOf` — every alternative becomes a discriminator-tagged,
//!    object-shaped template; an object instance is matched against the
//!    original alternatives and stamped with the winner's identifier.
//!
//! A node none of these apply to is a leaf and passes through unchanged,
//! together with its instance. Inputs are never mutated.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::composition::merge_all_of;
use crate::config::{AllOfStrategy, TransformOptions};
use crate::discriminator::{discriminator_of, inject_schema_key, VariantIds};
use crate::error::TransformError;
use crate::matcher::{CachingCompiler, DraftCompiler, ValidatorCompiler, VariantMatcher};
use crate::predicates::{is_basic_schema, is_enumeration};
use crate::schema_utils::{build_path, title_of};
use crate::shape::{InstanceShape, NodeKind, NodeShape};
use crate::wrapper::wrap_basic_schema;

/// A transformed schema and the instance that goes with it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transformed {
    /// The editor-ready schema.
    pub schema: Value,
    /// The instance with discriminators assigned; `None` when no instance
    /// was supplied.
    pub instance: Option<Value>,
}

impl Transformed {
    fn passthrough(schema: &Value, instance: Option<&Value>) -> Self {
        Self {
            schema: schema.clone(),
            instance: instance.cloned(),
        }
    }
}

/// Co-transform `schema` and `instance` with default options.
///
/// Validators are compiled per call; hosts that transform repeatedly should
/// keep a [`Transformer`] instead.
///
/// # Errors
///
/// [`TransformError::InvalidSchema`] if a union alternative cannot be
/// compiled, [`TransformError::SchemaConflict`] if `allOf` entries cannot be
/// merged.
pub fn transform(schema: &Value, instance: Option<&Value>) -> Result<Transformed, TransformError> {
    Transformer::with_compiler(TransformOptions::default(), DraftCompiler::default())
        .transform(schema, instance)
}

/// String-in, string-out variant of [`transform`] for hosts that hold JSON
/// text. Returns the serialized [`Transformed`] document.
///
/// # Errors
///
/// [`TransformError::JsonError`] if either input is not valid JSON, plus
/// everything [`transform`] reports.
pub fn transform_json(
    schema_json: &str,
    instance_json: Option<&str>,
) -> Result<String, TransformError> {
    let schema: Value = serde_json::from_str(schema_json)?;
    let instance: Option<Value> = instance_json
        .map(|text| serde_json::from_str(text))
        .transpose()?;
    let result = transform(&schema, instance.as_ref())?;
    Ok(serde_json::to_string(&result)?)
}

/// Reusable co-transformer holding options and a validator compiler.
pub struct Transformer<C = CachingCompiler<DraftCompiler>> {
    options: TransformOptions,
    compiler: C,
}

impl Transformer {
    /// A transformer that caches compiled validators across calls.
    pub fn new(options: TransformOptions) -> Self {
        let compiler = CachingCompiler::new(DraftCompiler::new(options.draft));
        Self { options, compiler }
    }
}

impl Default for Transformer {
    fn default() -> Self {
        Self::new(TransformOptions::default())
    }
}

impl<C: ValidatorCompiler> Transformer<C> {
    pub fn with_compiler(options: TransformOptions, compiler: C) -> Self {
        Self { options, compiler }
    }

    pub fn options(&self) -> &TransformOptions {
        &self.options
    }

    pub fn compiler(&self) -> &C {
        &self.compiler
    }

    /// Co-transform `schema` and `instance`. See the module docs for the
    /// per-node rules.
    ///
    /// # Errors
    ///
    /// [`TransformError::InvalidOptions`] if the options fail
    /// [`TransformOptions::validate`], before any node is visited.
    pub fn transform(
        &self,
        schema: &Value,
        instance: Option<&Value>,
    ) -> Result<Transformed, TransformError> {
        self.options.validate()?;
        let walker = Walker {
            options: &self.options,
            matcher: VariantMatcher::new(&self.compiler),
        };
        walker.walk(schema, instance, "#")
    }
}

// ---------------------------------------------------------------------------
// Recursive walker
// ---------------------------------------------------------------------------

struct Walker<'a> {
    options: &'a TransformOptions,
    matcher: VariantMatcher<'a>,
}

impl Walker<'_> {
    fn walk(
        &self,
        schema: &Value,
        instance: Option<&Value>,
        path: &str,
    ) -> Result<Transformed, TransformError> {
        let shape = NodeShape::of(schema);
        let kind = shape.kind();
        tracing::trace!(path, ?kind, "visiting schema node");

        let Value::Object(node) = schema else {
            return Ok(Transformed::passthrough(schema, instance));
        };
        if kind == NodeKind::Leaf {
            return Ok(Transformed::passthrough(schema, instance));
        }

        let mut out = node.clone();
        let mut new_instance = instance.cloned();

        // --- 1. properties ---
        if let (true, Some(Value::Object(props))) = (shape.properties, node.get("properties")) {
            let fields = instance.and_then(|v| InstanceShape::of(v).as_object());
            let mut new_props = Map::new();
            let mut new_fields = fields.cloned();
            for (key, subschema) in props {
                let child_path = build_path(path, &["properties", key]);
                let child = self.walk(subschema, fields.and_then(|f| f.get(key)), &child_path)?;
                new_props.insert(key.clone(), child.schema);
                if let (Some(target), Some(value)) = (new_fields.as_mut(), child.instance) {
                    target.insert(key.clone(), value);
                }
            }
            out.insert("properties".to_string(), Value::Object(new_props));
            if let Some(fields) = new_fields {
                new_instance = Some(Value::Object(fields));
            }
        }

        // --- 2. items ---
        if let (true, Some(items)) = (shape.items, node.get("items")) {
            let items_path = build_path(path, &["items"]);
            let template = self.walk(items, None, &items_path)?;
            out.insert("items".to_string(), template.schema);

            if let Some(elements) = instance.and_then(|v| InstanceShape::of(v).as_array()) {
                let mut new_elements = Vec::with_capacity(elements.len());
                for (i, element) in elements.iter().enumerate() {
                    let element_path = build_path(&items_path, &[&i.to_string()]);
                    let transformed = self.walk(items, Some(element), &element_path)?;
                    new_elements.push(transformed.instance.unwrap_or_else(|| element.clone()));
                }
                new_instance = Some(Value::Array(new_elements));
            }
        }

        // --- 3. allOf ---
        if let Some(Value::Array(entries)) = node.get("allOf") {
            let all_of_path = build_path(path, &["allOf"]);
            let effective = if shape.single_all_of {
                Some(entries[0].clone())
            } else if shape.multi_all_of && self.options.all_of == AllOfStrategy::Merge {
                Some(merge_all_of(entries.clone(), &all_of_path)?)
            } else {
                None
            };

            match effective {
                Some(inner_schema) => {
                    // Continue from the partly transformed instance so fields
                    // stamped by step 1 survive the overlay.
                    let inner = self.walk(&inner_schema, new_instance.as_ref(), &all_of_path)?;
                    out.remove("allOf");
                    splice_schema(&mut out, inner.schema);
                    new_instance = overlay_instance(new_instance, inner.instance);
                }
                None if shape.multi_all_of => {
                    let mut templates = Vec::with_capacity(entries.len());
                    for (i, entry) in entries.iter().enumerate() {
                        let entry_path = build_path(&all_of_path, &[&i.to_string()]);
                        templates.push(self.walk(entry, None, &entry_path)?.schema);
                    }
                    out.insert("allOf".to_string(), Value::Array(templates));
                }
                None => {}
            }
        }

        // --- 4. anyOf → oneOf, 5. oneOf ---
        let own_union = if shape.any_of {
            if shape.one_of {
                tracing::warn!(path, "node has both anyOf and oneOf; anyOf replaces oneOf");
            }
            Some("anyOf")
        } else if shape.one_of {
            Some("oneOf")
        } else {
            None
        };

        if let Some(keyword) = own_union {
            let alternatives = node
                .get(keyword)
                .and_then(Value::as_array)
                .map(Vec::as_slice)
                .unwrap_or_default();
            out.remove("anyOf");
            out.entry("type")
                .or_insert_with(|| Value::String("object".to_string()));

            let normalized = self.normalize_union(alternatives, title_of(schema), path)?;
            tracing::debug!(path, alternatives = normalized.len(), "normalized union");

            if let Some(original) = instance.filter(|v| v.is_object()) {
                let union_path = build_path(path, &[keyword]);
                let id = self.match_variant(original, alternatives, &normalized, &union_path)?;
                match (id, new_instance.as_mut()) {
                    (Some(id), Some(Value::Object(fields))) => {
                        tracing::debug!(path, id, "assigned variant");
                        fields.insert(
                            self.options.discriminator_key.clone(),
                            Value::String(id.to_string()),
                        );
                    }
                    _ => tracing::debug!(path, "no variant matched instance"),
                }
            }

            out.insert("oneOf".to_string(), Value::Array(normalized));
        }

        Ok(Transformed {
            schema: Value::Object(out),
            instance: new_instance,
        })
    }

    /// Turn each alternative into a tagged, object-shaped template.
    ///
    /// Alternatives never see an instance here. Non-object entries are kept
    /// as they are.
    fn normalize_union(
        &self,
        alternatives: &[Value],
        parent_title: Option<&str>,
        path: &str,
    ) -> Result<Vec<Value>, TransformError> {
        let mut ids = VariantIds::default();
        let mut normalized = Vec::with_capacity(alternatives.len());

        for (i, alternative) in alternatives.iter().enumerate() {
            if !alternative.is_object() {
                normalized.push(alternative.clone());
                continue;
            }

            let alt_path = build_path(path, &["oneOf", &i.to_string()]);
            let template = self.walk(alternative, None, &alt_path)?.schema;
            let id = ids.assign(&template, i);
            // Classify before injection: the discriminator adds `properties`.
            let primitive = is_enumeration(&template) || is_basic_schema(&template);
            let tagged = inject_schema_key(&template, &id, &self.options.discriminator_key);

            normalized.push(if primitive {
                wrap_basic_schema(&tagged, parent_title, &self.options.value_key)
            } else {
                tagged
            });
        }

        Ok(normalized)
    }

    /// Identifier of the first original alternative `instance` satisfies.
    ///
    /// A discriminator already present on the instance is ignored while
    /// validating so re-running on transformed output matches the same way.
    fn match_variant<'n>(
        &self,
        instance: &Value,
        alternatives: &[Value],
        normalized: &'n [Value],
        path: &str,
    ) -> Result<Option<&'n str>, TransformError> {
        let key = &self.options.discriminator_key;
        let stripped;
        let candidate = match instance {
            Value::Object(fields) if fields.contains_key(key) => {
                let mut fields = fields.clone();
                fields.remove(key);
                stripped = Value::Object(fields);
                &stripped
            }
            other => other,
        };

        let matched = self.matcher.find_match(candidate, alternatives, path)?;
        Ok(matched.and_then(|i| discriminator_of(&normalized[i], key)))
    }
}

/// Copy `inner`'s keywords over `out`; `properties` maps merge, inner wins.
fn splice_schema(out: &mut Map<String, Value>, inner: Value) {
    let Value::Object(inner) = inner else {
        return;
    };
    for (key, value) in inner {
        let value = match (key.as_str(), value) {
            ("properties", Value::Object(props)) => match out.get_mut("properties") {
                Some(Value::Object(existing)) => {
                    existing.extend(props);
                    continue;
                }
                _ => Value::Object(props),
            },
            (_, value) => value,
        };
        out.insert(key, value);
    }
}

fn overlay_instance(base: Option<Value>, inner: Option<Value>) -> Option<Value> {
    match (base, inner) {
        (Some(Value::Object(mut fields)), Some(Value::Object(inner_fields))) => {
            fields.extend(inner_fields);
            Some(Value::Object(fields))
        }
        (base, None) => base,
        (_, inner) => inner,
    }
}

// ===========================================================================
// Tests
// ===========================================================================
