//! Pre-flight validation of outgoing calls.

use cerberus_core::{ClientValidators, GateError, GateResult};
use jsonschema::Validator;
use serde_json::Value;

/// Environment variable enabling payload diagnostics on rejection.
///
/// When set (to anything other than `0` or empty), the raw offending
/// payload is emitted on the `tracing` debug channel alongside the
/// rejection. Intended for development and test runs only.
pub const PAYLOAD_LOG_ENV: &str = "CERBERUS_CLIENT_DEBUG";

/// An in-flight outgoing call, matched against its route's validators
/// before transmission.
#[derive(Debug, Clone)]
pub struct OutgoingCall {
    /// The target endpoint identifier.
    pub endpoint: String,
    /// The candidate request body.
    pub body: Value,
    /// The candidate query payload.
    pub query: Value,
}

impl OutgoingCall {
    /// Creates an outgoing call payload.
    #[must_use]
    pub fn new(endpoint: impl Into<String>, body: Value, query: Value) -> Self {
        Self {
            endpoint: endpoint.into(),
            body,
            query,
        }
    }
}

/// Compiled validators for one route.
///
/// Compilation happens once, when the client bundle is loaded; the
/// compiled pair is read-only and safe to share across concurrent
/// calls.
pub struct PreflightValidator {
    body: Option<Validator>,
    query: Option<Validator>,
    log_payloads: bool,
}

impl std::fmt::Debug for PreflightValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreflightValidator")
            .field("has_body", &self.body.is_some())
            .field("has_query", &self.query.is_some())
            .field("log_payloads", &self.log_payloads)
            .finish()
    }
}

impl PreflightValidator {
    /// Compiles a route's validators bundle.
    ///
    /// Payload logging defaults to the [`PAYLOAD_LOG_ENV`] environment
    /// flag; override with [`PreflightValidator::with_payload_logging`].
    pub fn compile(validators: &ClientValidators) -> GateResult<Self> {
        Ok(Self {
            body: validators.body.as_ref().map(compile_schema).transpose()?,
            query: validators.query.as_ref().map(compile_schema).transpose()?,
            log_payloads: payload_logging_from_env(),
        })
    }

    /// Enables or disables payload diagnostics on rejection.
    #[must_use]
    pub fn with_payload_logging(mut self, enabled: bool) -> Self {
        self.log_payloads = enabled;
        self
    }

    /// Validates an outgoing call against this route's bundle.
    ///
    /// Body first, then query, mirroring the server's order. Performs
    /// no transport; on success the calling layer proceeds to transmit,
    /// on failure nothing is sent.
    pub fn check(&self, call: &OutgoingCall) -> GateResult<()> {
        if let Some(validator) = &self.body {
            if let Some(errors) = aggregate_errors(validator, &call.body) {
                if self.log_payloads {
                    tracing::debug!(
                        endpoint = %call.endpoint,
                        payload = %call.body,
                        "outgoing body failed pre-flight validation"
                    );
                }
                return Err(GateError::client_validation(
                    &call.endpoint,
                    format!("invalid body: {errors}"),
                ));
            }
        }

        if let Some(validator) = &self.query {
            if let Some(errors) = aggregate_errors(validator, &call.query) {
                if self.log_payloads {
                    tracing::debug!(
                        endpoint = %call.endpoint,
                        payload = %call.query,
                        "outgoing query failed pre-flight validation"
                    );
                }
                return Err(GateError::client_validation(
                    &call.endpoint,
                    format!("invalid query: {errors}"),
                ));
            }
        }

        Ok(())
    }

    /// Returns whether this route has any validator at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.is_none() && self.query.is_none()
    }

    /// Interprets the payload-logging flag value: set and neither empty
    /// nor `0` means enabled.
    pub(crate) fn payload_logging_enabled(value: Option<&str>) -> bool {
        value.is_some_and(|v| !v.is_empty() && v != "0")
    }
}

fn compile_schema(schema: &Value) -> GateResult<Validator> {
    jsonschema::validator_for(schema)
        .map_err(|err| GateError::internal(format!("schema compilation failed: {err}")))
}

/// Runs a compiled validator and joins every error into the
/// library-native aggregated text, or `None` when the value is valid.
fn aggregate_errors(validator: &Validator, value: &Value) -> Option<String> {
    let mut errors = validator.iter_errors(value);
    let first = errors.next()?;
    let mut message = first.to_string();
    for err in errors {
        message.push_str("; ");
        message.push_str(&err.to_string());
    }
    Some(message)
}

fn payload_logging_from_env() -> bool {
    let value = std::env::var(PAYLOAD_LOG_ENV).ok();
    PreflightValidator::payload_logging_enabled(value.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cerberus_core::ErrorKind;
    use serde_json::json;

    fn age_bundle() -> ClientValidators {
        ClientValidators::new(
            Some(json!({
                "type": "object",
                "properties": {"age": {"type": "number"}},
                "required": ["age"],
            })),
            None,
        )
    }

    #[test]
    fn test_valid_body_passes() {
        let validator = PreflightValidator::compile(&age_bundle()).unwrap();
        let call = OutgoingCall::new("createUser", json!({"age": 30}), json!({}));
        assert!(validator.check(&call).is_ok());
    }

    #[test]
    fn test_invalid_body_is_a_client_validation_error() {
        let validator = PreflightValidator::compile(&age_bundle()).unwrap();
        let call = OutgoingCall::new("createUser", json!({"age": "x"}), json!({}));

        let err = validator.check(&call).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ClientValidation);
        let text = err.to_string();
        assert!(text.contains("createUser"), "missing endpoint: {text}");
        assert!(text.contains("invalid body"), "missing detail: {text}");
    }

    #[test]
    fn test_query_validator_checked_after_body() {
        let bundle = ClientValidators::new(
            None,
            Some(json!({
                "type": "object",
                "additionalProperties": {"type": "string"},
            })),
        );
        let validator = PreflightValidator::compile(&bundle).unwrap();

        let ok = OutgoingCall::new("search", json!(null), json!({"q": "rust"}));
        assert!(validator.check(&ok).is_ok());

        let bad = OutgoingCall::new("search", json!(null), json!({"q": 1}));
        let err = validator.check(&bad).unwrap_err();
        assert!(err.to_string().contains("invalid query"));
    }

    #[test]
    fn test_empty_bundle_accepts_everything() {
        let validator = PreflightValidator::compile(&ClientValidators::default()).unwrap();
        assert!(validator.is_empty());
        let call = OutgoingCall::new("anything", json!([1, 2]), json!("junk"));
        assert!(validator.check(&call).is_ok());
    }

    #[test]
    fn test_aggregated_text_reports_every_error() {
        let bundle = ClientValidators::new(
            Some(json!({
                "type": "object",
                "properties": {
                    "name": {"type": "string"},
                    "age": {"type": "number"},
                },
                "required": ["name", "age"],
            })),
            None,
        );
        let validator = PreflightValidator::compile(&bundle).unwrap();
        let call = OutgoingCall::new("createUser", json!({"name": 1}), json!({}));

        let message = validator.check(&call).unwrap_err().to_string();
        // Both the type failure and the missing property surface.
        assert!(message.contains("; "), "expected aggregation: {message}");
    }

    #[test]
    fn test_malformed_schema_fails_compilation() {
        let bundle = ClientValidators::new(Some(json!({"type": "not-a-type"})), None);
        let err = PreflightValidator::compile(&bundle).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Internal);
    }

    #[test]
    fn test_payload_logging_emits_rejected_payload() {
        use std::io::Write;
        use std::sync::{Arc, Mutex};

        struct Capture(Arc<Mutex<Vec<u8>>>);

        impl Write for Capture {
            fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
                self.0.lock().unwrap().extend_from_slice(buf);
                Ok(buf.len())
            }

            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let captured = Arc::new(Mutex::new(Vec::new()));
        let sink = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(move || Capture(sink.clone()))
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            let validator = PreflightValidator::compile(&age_bundle())
                .unwrap()
                .with_payload_logging(true);
            let call = OutgoingCall::new("createUser", json!({"age": "x"}), json!({}));
            assert!(validator.check(&call).is_err());
        });

        let logs = String::from_utf8(captured.lock().unwrap().clone()).unwrap();
        assert!(logs.contains("createUser"), "missing endpoint: {logs}");
        assert!(logs.contains(r#"{"age":"x"}"#), "missing payload: {logs}");
    }

    #[test]
    fn test_payload_logging_disabled_stays_silent() {
        use std::io::Write;
        use std::sync::{Arc, Mutex};

        struct Capture(Arc<Mutex<Vec<u8>>>);

        impl Write for Capture {
            fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
                self.0.lock().unwrap().extend_from_slice(buf);
                Ok(buf.len())
            }

            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let captured = Arc::new(Mutex::new(Vec::new()));
        let sink = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(move || Capture(sink.clone()))
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            let validator = PreflightValidator::compile(&age_bundle())
                .unwrap()
                .with_payload_logging(false);
            let call = OutgoingCall::new("createUser", json!({"age": "x"}), json!({}));
            assert!(validator.check(&call).is_err());
        });

        let logs = String::from_utf8(captured.lock().unwrap().clone()).unwrap();
        assert!(
            !logs.contains(r#"{"age":"x"}"#),
            "payload leaked while disabled: {logs}"
        );
    }

    #[test]
    fn test_env_flag_parsing() {
        assert!(!PreflightValidator::payload_logging_enabled(None));
        assert!(!PreflightValidator::payload_logging_enabled(Some("")));
        assert!(!PreflightValidator::payload_logging_enabled(Some("0")));
        assert!(PreflightValidator::payload_logging_enabled(Some("1")));
        assert!(PreflightValidator::payload_logging_enabled(Some("true")));
    }
}
