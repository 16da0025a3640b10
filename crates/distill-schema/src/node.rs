//! Parsed schema node tree

use crate::error::SchemaError;
use indexmap::IndexMap;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// One node of the expected output shape.
///
/// Only the three kinds the generation service accepts as a response
/// constraint are supported; anything else in the schema document is
/// rejected at load time.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaNode {
    /// JSON object with named, ordered properties
    Object {
        /// Property name to child node, in document order
        properties: IndexMap<String, SchemaNode>,
        /// Names of properties the service must always emit
        required: Vec<String>,
    },
    /// JSON string leaf
    String {
        /// Human-readable hint passed through to the service
        description: String,
    },
    /// JSON array of homogeneous elements
    Array {
        /// Human-readable hint passed through to the service
        description: String,
        /// Shape of each element
        items: Box<SchemaNode>,
    },
}

impl SchemaNode {
    /// Load and parse a schema document from a file.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] if the file cannot be read, is not valid
    /// JSON, or contains an unsupported or malformed node.
    pub fn from_file(path: &Path) -> Result<Self, SchemaError> {
        let contents = fs::read_to_string(path).map_err(|source| SchemaError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let value: Value = serde_json::from_str(&contents)?;
        Self::from_value(&value)
    }

    /// Build a node tree from a parsed JSON Schema value.
    ///
    /// Structural recursion over the document: `object` nodes require a
    /// `properties` mapping, `array` nodes require an `items` node, and
    /// every name in `required` must be a declared property.
    pub fn from_value(value: &Value) -> Result<Self, SchemaError> {
        let kind = value
            .get("type")
            .and_then(Value::as_str)
            .ok_or(SchemaError::MissingKind)?;

        match kind {
            "object" => {
                let declared = value
                    .get("properties")
                    .and_then(Value::as_object)
                    .ok_or(SchemaError::MissingProperties)?;

                let mut properties = IndexMap::with_capacity(declared.len());
                for (name, child) in declared {
                    properties.insert(name.clone(), Self::from_value(child)?);
                }

                let required = parse_required(value)?;
                for name in &required {
                    if !properties.contains_key(name) {
                        return Err(SchemaError::RequiredNotDeclared(name.clone()));
                    }
                }

                Ok(SchemaNode::Object {
                    properties,
                    required,
                })
            }
            "string" => Ok(SchemaNode::String {
                description: description_of(value),
            }),
            "array" => {
                let items = value.get("items").ok_or(SchemaError::MissingItems)?;
                Ok(SchemaNode::Array {
                    description: description_of(value),
                    items: Box::new(Self::from_value(items)?),
                })
            }
            other => Err(SchemaError::UnsupportedKind(other.to_string())),
        }
    }
}

/// Extract the optional "description" field, defaulting to empty.
fn description_of(value: &Value) -> String {
    value
        .get("description")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Extract the optional "required" list as owned strings.
fn parse_required(value: &Value) -> Result<Vec<String>, SchemaError> {
    match value.get("required") {
        None => Ok(Vec::new()),
        Some(required) => required
            .as_array()
            .ok_or(SchemaError::InvalidRequired)?
            .iter()
            .map(|name| {
                name.as_str()
                    .map(str::to_string)
                    .ok_or(SchemaError::InvalidRequired)
            })
            .collect(),
    }
}
