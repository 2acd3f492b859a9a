//! JSON Schema (draft-07) projection.
//!
//! The projection is the client-facing half of the schema contract: it
//! is attached to route metadata at registration time and evaluated by
//! a generic JSON Schema validator on the client, so the client never
//! depends on this crate's validation walk.
//!
//! The conversion is pure and deterministic. Object properties and
//! `required` entries appear in declaration order, so projecting the
//! same schema twice yields byte-identical documents and client bundles
//! can be cached and diffed.

use serde_json::{Map, Value};

use crate::schema::{Schema, SchemaKind};

/// The `$schema` marker stamped on every projected document root.
pub const DRAFT_07: &str = "http://json-schema.org/draft-07/schema#";

/// Projects a [`Schema`] into a self-contained draft-07 document.
#[must_use]
pub fn to_json_schema(schema: &Schema) -> Value {
    let mut root = Map::new();
    root.insert("$schema".to_string(), Value::String(DRAFT_07.to_string()));
    if let Value::Object(body) = project(schema) {
        for (key, value) in body {
            root.insert(key, value);
        }
    }
    Value::Object(root)
}

/// Projects a schema node without the root `$schema` marker.
fn project(schema: &Schema) -> Value {
    let mut doc = Map::new();
    match schema.kind() {
        SchemaKind::String {
            min_length,
            max_length,
            pattern,
        } => {
            doc.insert("type".to_string(), Value::from("string"));
            if let Some(min) = min_length {
                doc.insert("minLength".to_string(), Value::from(*min));
            }
            if let Some(max) = max_length {
                doc.insert("maxLength".to_string(), Value::from(*max));
            }
            if let Some(p) = pattern {
                doc.insert("pattern".to_string(), Value::from(p.as_str()));
            }
        }

        SchemaKind::Integer { minimum, maximum } => {
            doc.insert("type".to_string(), Value::from("integer"));
            if let Some(min) = minimum {
                doc.insert("minimum".to_string(), Value::from(*min));
            }
            if let Some(max) = maximum {
                doc.insert("maximum".to_string(), Value::from(*max));
            }
        }

        SchemaKind::Number { minimum, maximum } => {
            doc.insert("type".to_string(), Value::from("number"));
            if let Some(min) = minimum {
                doc.insert("minimum".to_string(), Value::from(*min));
            }
            if let Some(max) = maximum {
                doc.insert("maximum".to_string(), Value::from(*max));
            }
        }

        SchemaKind::Boolean => {
            doc.insert("type".to_string(), Value::from("boolean"));
        }

        SchemaKind::Array {
            items,
            min_items,
            max_items,
        } => {
            doc.insert("type".to_string(), Value::from("array"));
            doc.insert("items".to_string(), project(items));
            if let Some(min) = min_items {
                doc.insert("minItems".to_string(), Value::from(*min));
            }
            if let Some(max) = max_items {
                doc.insert("maxItems".to_string(), Value::from(*max));
            }
        }

        SchemaKind::Object {
            properties,
            additional_properties,
        } => {
            doc.insert("type".to_string(), Value::from("object"));
            let mut props = Map::new();
            let mut required = Vec::new();
            for (name, prop) in properties {
                props.insert(name.clone(), project(prop));
                if prop.is_required() {
                    required.push(Value::from(name.as_str()));
                }
            }
            doc.insert("properties".to_string(), Value::Object(props));
            if !required.is_empty() {
                doc.insert("required".to_string(), Value::Array(required));
            }
            if !additional_properties {
                doc.insert("additionalProperties".to_string(), Value::from(false));
            }
        }

        SchemaKind::Record { values } => {
            doc.insert("type".to_string(), Value::from("object"));
            doc.insert("additionalProperties".to_string(), project(values));
        }

        // The empty schema accepts everything.
        SchemaKind::Any => {}

        SchemaKind::Null => {
            doc.insert("type".to_string(), Value::from("null"));
        }
    }
    Value::Object(doc)
}
