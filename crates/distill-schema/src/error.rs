//! Error types for schema loading and translation

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading or validating a schema document
#[derive(Error, Debug)]
pub enum SchemaError {
    /// Node kind outside the supported {object, string, array} set
    #[error("unsupported schema type: {0:?}")]
    UnsupportedKind(String),

    /// Node without a "type" tag
    #[error("schema node is missing a \"type\" tag")]
    MissingKind,

    /// Object node without a "properties" mapping
    #[error("object node is missing a \"properties\" mapping")]
    MissingProperties,

    /// Array node without an "items" node
    #[error("array node is missing an \"items\" node")]
    MissingItems,

    /// "required" present but not an array of strings
    #[error("\"required\" must be an array of property names")]
    InvalidRequired,

    /// Required name that is not among the declared properties
    #[error("required property {0:?} is not declared in \"properties\"")]
    RequiredNotDeclared(String),

    /// Schema file could not be read
    #[error("failed to read schema file {path}: {source}")]
    Io {
        /// Path of the schema file
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Schema file is not valid JSON
    #[error("schema file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
