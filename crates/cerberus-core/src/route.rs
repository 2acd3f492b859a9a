//! Client-visible route metadata.
//!
//! When a route is registered with a schema guard, the guard's
//! `describe` capability produces a [`RouteMetadata`] that the host
//! framework's route-compilation step embeds into the client bundle.
//! The metadata carries only JSON Schema projections, never the native
//! schema values, so clients validate with a generic evaluator instead
//! of depending on server-side schema code.
//!
//! Metadata is created once at registration time and never mutated;
//! its serialization is deterministic so bundles can be cached and
//! diffed.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The `{body, query}` pair of JSON Schema projections for one route.
///
/// Absent schemas serialize as explicit `null`, which is the wire
/// contract client bundles expect.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientValidators {
    /// JSON Schema for the request body, or `null`.
    pub body: Option<Value>,
    /// JSON Schema for the query parameters, or `null`.
    pub query: Option<Value>,
}

impl ClientValidators {
    /// Creates a validators bundle from optional projections.
    #[must_use]
    pub fn new(body: Option<Value>, query: Option<Value>) -> Self {
        Self { body, query }
    }

    /// Returns `true` if neither a body nor a query schema is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.is_none() && self.query.is_none()
    }
}

/// Metadata contributed to a route at registration time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteMetadata {
    /// The validators bundle shipped to client bundles.
    pub client_validators: ClientValidators,
}

impl RouteMetadata {
    /// Creates route metadata from a validators bundle.
    #[must_use]
    pub fn new(client_validators: ClientValidators) -> Self {
        Self { client_validators }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_absent_schemas_serialize_as_null() {
        let metadata = RouteMetadata::new(ClientValidators::new(
            Some(json!({"type": "object"})),
            None,
        ));
        let serialized = serde_json::to_value(&metadata).unwrap();
        assert_eq!(
            serialized,
            json!({
                "clientValidators": {
                    "body": {"type": "object"},
                    "query": null,
                }
            })
        );
    }

    #[test]
    fn test_round_trip() {
        let metadata = RouteMetadata::new(ClientValidators::new(
            Some(json!({"type": "object", "required": ["name"]})),
            Some(json!({"type": "object"})),
        ));
        let serialized = serde_json::to_string(&metadata).unwrap();
        let deserialized: RouteMetadata = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, metadata);
    }

    #[test]
    fn test_empty_bundle() {
        assert!(ClientValidators::default().is_empty());
        assert!(!ClientValidators::new(Some(json!({})), None).is_empty());
    }
}
