//! Error types for schema/instance co-transformation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stable, machine-readable error codes.
///
/// Serialized as `snake_case`; host applications map these to their own
/// error surfaces, so variant names must not change once published.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum ErrorCode {
    /// JSON (de)serialization failure.
    JsonParseError,
    /// A union alternative could not be compiled by the validation engine.
    InvalidSchema,
    /// Multi-entry `allOf` members that cannot be merged.
    SchemaConflict,
    /// Transform options that contradict each other.
    InvalidOptions,
}

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Compilation of a schema node failed. This is a caller programming
    /// error: the crate never catches or retries it.
    #[error("Invalid schema at {path}: {message}")]
    InvalidSchema { path: String, message: String },

    #[error("Schema conflict at {path}: {message}")]
    SchemaConflict { path: String, message: String },

    #[error("Invalid options: {0}")]
    InvalidOptions(String),
}

impl TransformError {
    /// The stable code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            TransformError::JsonError(_) => ErrorCode::JsonParseError,
            TransformError::InvalidSchema { .. } => ErrorCode::InvalidSchema,
            TransformError::SchemaConflict { .. } => ErrorCode::SchemaConflict,
            TransformError::InvalidOptions(_) => ErrorCode::InvalidOptions,
        }
    }
}
