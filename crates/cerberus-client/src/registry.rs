//! Endpoint-keyed registry of compiled pre-flight validators.
//!
//! The client bundle carries one [`RouteMetadata`] per endpoint; the
//! registry compiles them all at load time and is then shared,
//! read-only, for the process lifetime.

use std::collections::HashMap;

use cerberus_core::{GateResult, RouteMetadata};

use crate::preflight::{OutgoingCall, PreflightValidator};

/// Registry of compiled validators, keyed by endpoint identifier.
#[derive(Debug, Default)]
pub struct PreflightRegistry {
    routes: HashMap<String, PreflightValidator>,
}

impl PreflightRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Compiles and registers an endpoint's exported metadata.
    ///
    /// Re-registering an endpoint replaces its validators.
    pub fn register(&mut self, endpoint: impl Into<String>, metadata: &RouteMetadata) -> GateResult<()> {
        let validator = PreflightValidator::compile(&metadata.client_validators)?;
        self.routes.insert(endpoint.into(), validator);
        Ok(())
    }

    /// Returns the compiled validator for an endpoint, if registered.
    #[must_use]
    pub fn get(&self, endpoint: &str) -> Option<&PreflightValidator> {
        self.routes.get(endpoint)
    }

    /// Checks an outgoing call against its endpoint's validators.
    ///
    /// An endpoint without metadata passes silently: the pre-flight is
    /// best-effort, and the server remains the arbiter when metadata is
    /// stale or absent.
    pub fn check(&self, call: &OutgoingCall) -> GateResult<()> {
        match self.routes.get(&call.endpoint) {
            Some(validator) => validator.check(call),
            None => Ok(()),
        }
    }

    /// Returns the number of registered endpoints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns `true` if no endpoint is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cerberus_core::ClientValidators;
    use serde_json::json;

    fn age_metadata() -> RouteMetadata {
        RouteMetadata::new(ClientValidators::new(
            Some(json!({
                "type": "object",
                "properties": {"age": {"type": "number"}},
                "required": ["age"],
            })),
            None,
        ))
    }

    #[test]
    fn test_registered_endpoint_is_checked() {
        let mut registry = PreflightRegistry::new();
        registry.register("createUser", &age_metadata()).unwrap();

        let bad = OutgoingCall::new("createUser", json!({"age": "x"}), json!({}));
        assert!(registry.check(&bad).is_err());

        let good = OutgoingCall::new("createUser", json!({"age": 3}), json!({}));
        assert!(registry.check(&good).is_ok());
    }

    #[test]
    fn test_unknown_endpoint_passes_silently() {
        let registry = PreflightRegistry::new();
        let call = OutgoingCall::new("unknownOp", json!({"anything": true}), json!({}));
        assert!(registry.check(&call).is_ok());
    }

    #[test]
    fn test_reregistration_replaces_validators() {
        let mut registry = PreflightRegistry::new();
        registry.register("op", &age_metadata()).unwrap();
        registry
            .register("op", &RouteMetadata::default())
            .unwrap();

        let call = OutgoingCall::new("op", json!({"age": "x"}), json!({}));
        assert!(registry.check(&call).is_ok(), "metadata was replaced");
        assert_eq!(registry.len(), 1);
    }
}
