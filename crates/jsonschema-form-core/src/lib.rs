//! # jsonschema-form-core
//!
//! Co-transforms a JSON Schema and a data instance for a generic form editor.
//!
//! The schema comes back with every `anyOf` turned into `oneOf`, singleton
//! `allOf` flattened, and each union alternative tagged with a synthetic
//! discriminator field (`schemaKey` by default) and lifted into object shape.
//! The instance comes back with the discriminator of the alternative it
//! validates against.
//!
//! ```
//! use jsonschema_form_core::transform;
//! use serde_json::json;
//!
//! let schema = json!({
//!     "anyOf": [
//!         { "title": "Person", "type": "object", "required": ["name"] },
//!         { "title": "Organization", "type": "object", "required": ["url"] }
//!     ]
//! });
//! let result = transform(&schema, Some(&json!({ "url": "https://dandiarchive.org" }))).unwrap();
//!
//! assert_eq!(result.schema["oneOf"][1]["properties"]["schemaKey"]["const"], "Organization");
//! assert_eq!(result.instance.unwrap()["schemaKey"], "Organization");
//! ```

mod composition;
pub mod config;
pub mod discriminator;
pub mod editor;
pub mod error;
pub mod matcher;
pub mod predicates;
pub mod schema_utils;
pub mod shape;
pub mod transformer;
pub mod wrapper;

pub use config::{AllOfStrategy, SchemaDraft, TransformOptions};
pub use discriminator::{discriminator_of, inject_schema_key};
pub use editor::{
    compute_basic_schema, compute_complex_schema, filter_model_with_schema,
    populate_empty_arrays, switch_variant, write_sub_model_to_master,
};
pub use error::{ErrorCode, TransformError};
pub use matcher::{
    find_matching_schema, CachingCompiler, DraftCompiler, InstanceValidator, ValidatorCompiler,
    VariantMatcher,
};
pub use predicates::{
    is_array_schema, is_basic_array_schema, is_basic_editor_schema, is_basic_schema,
    is_complex_editor_schema, is_enumeration, is_union_node,
};
pub use schema_utils::{build_path, escape_pointer_segment};
pub use shape::{InstanceShape, NodeKind, NodeShape};
pub use transformer::{transform, transform_json, Transformed, Transformer};
pub use wrapper::wrap_basic_schema;
