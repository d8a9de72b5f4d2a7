//! Configuration for schema/instance co-transformation.

use serde::{Deserialize, Serialize};

use crate::error::TransformError;

/// Default name of the synthetic discriminator field.
pub const DEFAULT_DISCRIMINATOR_KEY: &str = "schemaKey";

/// Default name of the field that carries a wrapped primitive.
pub const DEFAULT_VALUE_KEY: &str = "value";

/// JSON Schema draft used to compile union alternatives for matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SchemaDraft {
    Draft4,
    Draft6,
    Draft7,
    Draft201909,
    Draft202012,
}

impl From<SchemaDraft> for jsonschema::Draft {
    fn from(val: SchemaDraft) -> Self {
        match val {
            SchemaDraft::Draft4 => jsonschema::Draft::Draft4,
            SchemaDraft::Draft6 => jsonschema::Draft::Draft6,
            SchemaDraft::Draft7 => jsonschema::Draft::Draft7,
            SchemaDraft::Draft201909 => jsonschema::Draft::Draft201909,
            SchemaDraft::Draft202012 => jsonschema::Draft::Draft202012,
        }
    }
}

/// Strategy for `allOf` nodes with more than one entry.
///
/// Single-entry `allOf` is always flattened into its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AllOfStrategy {
    /// Fold the raw entries into one schema, then transform the merged node
    /// once with the instance (default).
    Merge,
    /// Keep the `allOf` list; each entry is normalized as a template.
    Preserve,
}

/// Options for co-transformation.
///
/// ## Serialization Format
///
/// Fields are serialized in `kebab-case` (e.g., `discriminator-key`, `all-of`).
/// The CLI reads this format from `--config` files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct TransformOptions {
    /// Name of the synthetic field tagging union alternatives. Default: `schemaKey`.
    pub discriminator_key: String,
    /// Name of the field a primitive alternative is wrapped into. Default: `value`.
    pub value_key: String,
    /// Draft used when compiling alternatives for matching. Default: Draft 7.
    pub draft: SchemaDraft,
    /// Handling of multi-entry `allOf`.
    pub all_of: AllOfStrategy,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            discriminator_key: DEFAULT_DISCRIMINATOR_KEY.to_string(),
            value_key: DEFAULT_VALUE_KEY.to_string(),
            draft: SchemaDraft::Draft7,
            all_of: AllOfStrategy::Merge,
        }
    }
}

impl TransformOptions {
    /// Reject option combinations the transformer cannot honour.
    ///
    /// The two synthetic field names must be non-empty and distinct: a wrapped
    /// primitive stores its value under `value_key` next to the discriminator,
    /// so equal keys would overwrite the discriminator.
    pub fn validate(&self) -> Result<(), TransformError> {
        if self.discriminator_key.is_empty() || self.value_key.is_empty() {
            return Err(TransformError::InvalidOptions(
                "discriminator key and value key must not be empty".to_string(),
            ));
        }
        if self.discriminator_key == self.value_key {
            return Err(TransformError::InvalidOptions(format!(
                "discriminator key and value key must differ (both are \"{}\")",
                self.value_key
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_options_serde_round_trip() {
        let opts = TransformOptions {
            discriminator_key: "kind".to_string(),
            value_key: "inner".to_string(),
            draft: SchemaDraft::Draft202012,
            all_of: AllOfStrategy::Preserve,
        };

        let json = serde_json::to_string(&opts).unwrap();

        // Verify kebab-case field names are in the JSON
        assert!(json.contains("\"discriminator-key\""));
        assert!(json.contains("\"value-key\""));
        assert!(json.contains("\"all-of\""));
        assert!(json.contains("\"draft202012\""));
        assert!(json.contains("\"preserve\""));

        let deserialized: TransformOptions = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, opts);
    }

    #[test]
    fn test_validate_rejects_clashing_keys() {
        assert!(TransformOptions::default().validate().is_ok());

        let clash = TransformOptions {
            value_key: DEFAULT_DISCRIMINATOR_KEY.to_string(),
            ..TransformOptions::default()
        };
        let err = clash.validate().unwrap_err();
        assert!(matches!(err, TransformError::InvalidOptions(_)));
        assert!(err.to_string().contains("must differ"));

        let empty = TransformOptions {
            discriminator_key: String::new(),
            ..TransformOptions::default()
        };
        assert!(empty.validate().is_err());
    }

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        let opts: TransformOptions = serde_json::from_str(r#"{"value-key": "v"}"#).unwrap();
        assert_eq!(opts.value_key, "v");
        assert_eq!(opts.discriminator_key, DEFAULT_DISCRIMINATOR_KEY);
        assert_eq!(opts.draft, SchemaDraft::Draft7);
        assert_eq!(opts.all_of, AllOfStrategy::Merge);
    }
}
