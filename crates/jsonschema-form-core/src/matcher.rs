//! Variant matching: which union alternative does a data instance satisfy?
//!
//! Matching is full schema validation (types, shapes and constraints), not a
//! key-presence heuristic. Validators come from a [`ValidatorCompiler`] so the
//! host decides whether compiled alternatives are cached across passes.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use jsonschema::Draft;
use serde_json::Value;

use crate::config::SchemaDraft;
use crate::error::TransformError;
use crate::schema_utils::build_path;

/// A compiled schema that can test instances.
pub trait InstanceValidator: Send + Sync {
    fn test(&self, instance: &Value) -> bool;
}

impl InstanceValidator for jsonschema::Validator {
    fn test(&self, instance: &Value) -> bool {
        self.is_valid(instance)
    }
}

/// Compiles schema nodes into validators.
///
/// An `Err` carries the engine's message; callers attach the schema path.
pub trait ValidatorCompiler {
    fn compile(&self, schema: &Value) -> Result<Arc<dyn InstanceValidator>, String>;
}

/// Compiles every request afresh with the `jsonschema` engine.
#[derive(Debug, Clone, Copy)]
pub struct DraftCompiler {
    draft: Draft,
}

impl DraftCompiler {
    pub fn new(draft: SchemaDraft) -> Self {
        Self {
            draft: draft.into(),
        }
    }
}

impl Default for DraftCompiler {
    fn default() -> Self {
        Self::new(SchemaDraft::Draft7)
    }
}

impl ValidatorCompiler for DraftCompiler {
    fn compile(&self, schema: &Value) -> Result<Arc<dyn InstanceValidator>, String> {
        let validator = jsonschema::options()
            .with_draft(self.draft)
            .build(schema)
            .map_err(|err| err.to_string())?;
        Ok(Arc::new(validator))
    }
}

/// Memoizes successful compilations of an inner compiler.
///
/// Keys are the schema's serialized JSON, so structurally equal alternatives
/// share one validator. Failures are not cached.
pub struct CachingCompiler<C> {
    inner: C,
    cache: Mutex<HashMap<String, Arc<dyn InstanceValidator>>>,
}

impl<C: ValidatorCompiler> CachingCompiler<C> {
    pub fn new(inner: C) -> Self {
        Self {
            inner,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Number of cached validators.
    pub fn len(&self) -> usize {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<C: ValidatorCompiler> ValidatorCompiler for CachingCompiler<C> {
    fn compile(&self, schema: &Value) -> Result<Arc<dyn InstanceValidator>, String> {
        let key = schema.to_string();
        if let Some(hit) = self
            .cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            tracing::trace!("validator cache hit");
            return Ok(Arc::clone(hit));
        }

        let compiled = self.inner.compile(schema)?;
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, Arc::clone(&compiled));
        Ok(compiled)
    }
}

/// Finds the first union alternative an instance validates against.
pub struct VariantMatcher<'a> {
    compiler: &'a dyn ValidatorCompiler,
}

impl<'a> VariantMatcher<'a> {
    pub fn new(compiler: &'a dyn ValidatorCompiler) -> Self {
        Self { compiler }
    }

    /// Index of the first alternative, in list order, that `instance`
    /// satisfies.
    ///
    /// Entries that are not schemas (neither object nor boolean) are skipped.
    /// A compilation failure is returned as [`TransformError::InvalidSchema`]
    /// labelled with `path/<index>`.
    pub fn find_match(
        &self,
        instance: &Value,
        alternatives: &[Value],
        path: &str,
    ) -> Result<Option<usize>, TransformError> {
        for (i, alternative) in alternatives.iter().enumerate() {
            if !(alternative.is_object() || alternative.is_boolean()) {
                continue;
            }
            let alt_path = build_path(path, &[&i.to_string()]);
            if self.test(alternative, instance, &alt_path)? {
                return Ok(Some(i));
            }
        }
        Ok(None)
    }

    fn test(&self, schema: &Value, instance: &Value, path: &str) -> Result<bool, TransformError> {
        let validator =
            self.compiler
                .compile(schema)
                .map_err(|message| TransformError::InvalidSchema {
                    path: path.to_string(),
                    message,
                })?;
        Ok(validator.test(instance))
    }
}

/// The schema `instance` conforms to, taking `anyOf`/`oneOf` into account.
///
/// With a union list, returns the first matching alternative. Without one,
/// the node itself is tested and returned iff the instance validates.
/// `None` means nothing matched.
pub fn find_matching_schema<'s>(
    instance: &Value,
    schema: &'s Value,
    compiler: &dyn ValidatorCompiler,
) -> Result<Option<&'s Value>, TransformError> {
    let matcher = VariantMatcher::new(compiler);
    for keyword in ["anyOf", "oneOf"] {
        if let Some(alternatives) = schema.get(keyword).and_then(Value::as_array) {
            let path = build_path("#", &[keyword]);
            return Ok(matcher
                .find_match(instance, alternatives, &path)?
                .map(|i| &alternatives[i]));
        }
    }
    Ok(matcher.test(schema, instance, "#")?.then_some(schema))
}

// ===========================================================================
// Tests
// ===========================================================================
