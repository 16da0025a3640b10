//! Distill Schema Layer
//!
//! Loads the JSON Schema document that describes the desired output shape
//! and translates it into the generation service's native schema
//! representation.
//!
//! # Overview
//!
//! The batch pipeline is configured with a single JSON Schema file on disk.
//! At startup that document is parsed into a [`SchemaNode`] tree (the three
//! supported node kinds are `object`, `string` and `array`), validated, and
//! translated once into a [`ServiceSchema`] that is attached to every
//! generation request as a response-shape constraint.
//!
//! Any malformed or unsupported schema document is a fatal configuration
//! error surfaced before any network activity begins.
//!
//! # Examples
//!
//! ```
//! use distill_schema::{translate, SchemaNode};
//!
//! let doc = serde_json::json!({
//!     "type": "object",
//!     "properties": {
//!         "title": { "type": "string", "description": "Document title" }
//!     },
//!     "required": ["title"]
//! });
//!
//! let node = SchemaNode::from_value(&doc).unwrap();
//! let service_schema = translate(&node);
//! ```

#![warn(missing_docs)]

mod error;
mod node;
mod translate;

pub use error::SchemaError;
pub use node::SchemaNode;
pub use translate::{translate, SchemaKind, ServiceSchema};
