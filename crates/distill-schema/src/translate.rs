//! Translation into the service's native schema representation

use crate::node::SchemaNode;
use indexmap::IndexMap;
use serde::Serialize;

/// Node kind tag in the service's wire format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SchemaKind {
    /// JSON object
    Object,
    /// JSON string
    String,
    /// JSON array
    Array,
}

/// Response-shape constraint in the generation service's wire format.
///
/// Serialized as part of every generation request's `generationConfig`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceSchema {
    /// Node kind tag
    #[serde(rename = "type")]
    pub kind: SchemaKind,

    /// Human-readable hint for the model
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Object property shapes, in declaration order
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<IndexMap<String, ServiceSchema>>,

    /// Object property names the model must always emit
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,

    /// Array element shape
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<ServiceSchema>>,
}

/// Translate a parsed schema node into the service's representation.
///
/// Pure and total over well-formed nodes; unsupported kinds have already
/// been rejected by [`SchemaNode::from_value`].
pub fn translate(node: &SchemaNode) -> ServiceSchema {
    match node {
        SchemaNode::Object {
            properties,
            required,
        } => ServiceSchema {
            kind: SchemaKind::Object,
            description: None,
            properties: Some(
                properties
                    .iter()
                    .map(|(name, child)| (name.clone(), translate(child)))
                    .collect(),
            ),
            required: Some(required.clone()),
            items: None,
        },
        SchemaNode::String { description } => ServiceSchema {
            kind: SchemaKind::String,
            description: Some(description.clone()),
            properties: None,
            required: None,
            items: None,
        },
        SchemaNode::Array { description, items } => ServiceSchema {
            kind: SchemaKind::Array,
            description: Some(description.clone()),
            properties: None,
            required: None,
            items: Some(Box::new(translate(items))),
        },
    }
}
