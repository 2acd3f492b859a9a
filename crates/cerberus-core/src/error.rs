//! Error types for the Cerberus validation gate.
//!
//! [`GateError`] is the single error type both halves of the gate
//! produce. Server-side rejections (`InvalidBody`, `InvalidQuery`) map
//! to HTTP 400 and short-circuit the handler pipeline; client-side
//! rejections (`ClientValidation`) happen before any transmission and
//! map to 422, a deliberate convention distinguishing pre-flight
//! failures from the server's 400s.

use http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using [`GateError`].
pub type GateResult<T> = Result<T, GateError>;

/// Classification of gate errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The request body failed schema validation on the server.
    InvalidBody,
    /// The query parameters failed schema validation on the server.
    InvalidQuery,
    /// An outgoing call failed pre-flight validation on the client.
    ClientValidation,
    /// An internal failure (body read, schema compilation).
    Internal,
}

impl ErrorKind {
    /// Returns the HTTP status code for this error kind.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidBody | Self::InvalidQuery => StatusCode::BAD_REQUEST,
            Self::ClientValidation => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Standard error type for the validation gate.
///
/// # Example
///
/// ```
/// use cerberus_core::{ErrorKind, GateError};
///
/// let error = GateError::invalid_body("Required (age)");
/// assert_eq!(error.kind(), ErrorKind::InvalidBody);
/// assert_eq!(error.status_code().as_u16(), 400);
/// ```
#[derive(Error, Debug)]
pub enum GateError {
    /// The request body failed schema validation.
    #[error("Invalid request body: {message}")]
    InvalidBody {
        /// Joined per-field violations, in reporting order.
        message: String,
    },

    /// The query parameters failed schema validation.
    #[error("Invalid request query: {message}")]
    InvalidQuery {
        /// Joined per-field violations, in reporting order.
        message: String,
    },

    /// An outgoing call failed client-side pre-flight validation.
    #[error("Client validation failed for '{endpoint}': {message}")]
    ClientValidation {
        /// The endpoint the call targeted.
        endpoint: String,
        /// The evaluator's aggregated error text.
        message: String,
    },

    /// Internal failure while reading or decoding a payload.
    #[error("Internal error: {message}")]
    Internal {
        /// Human-readable error message.
        message: String,
        /// The underlying error (not exposed to clients).
        #[source]
        source: Option<anyhow::Error>,
    },
}

impl GateError {
    /// Creates an invalid-body error from joined violation text.
    #[must_use]
    pub fn invalid_body(message: impl Into<String>) -> Self {
        Self::InvalidBody {
            message: message.into(),
        }
    }

    /// Creates an invalid-query error from joined violation text.
    #[must_use]
    pub fn invalid_query(message: impl Into<String>) -> Self {
        Self::InvalidQuery {
            message: message.into(),
        }
    }

    /// Creates a client-side pre-flight validation error.
    #[must_use]
    pub fn client_validation(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ClientValidation {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an internal error with a source error.
    pub fn internal_with_source(
        message: impl Into<String>,
        source: impl Into<anyhow::Error>,
    ) -> Self {
        Self::Internal {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Returns the error kind.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidBody { .. } => ErrorKind::InvalidBody,
            Self::InvalidQuery { .. } => ErrorKind::InvalidQuery,
            Self::ClientValidation { .. } => ErrorKind::ClientValidation,
            Self::Internal { .. } => ErrorKind::Internal,
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        self.kind().status_code()
    }

    /// Converts this error to a serializable envelope for responses.
    #[must_use]
    pub fn to_envelope(&self) -> ErrorEnvelope {
        ErrorEnvelope {
            error: ErrorDetail {
                code: self.error_code().to_string(),
                message: self.to_string(),
                kind: self.kind(),
            },
        }
    }

    /// Returns a machine-readable error code.
    #[must_use]
    const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidBody { .. } => "INVALID_REQUEST_BODY",
            Self::InvalidQuery { .. } => "INVALID_REQUEST_QUERY",
            Self::ClientValidation { .. } => "CLIENT_VALIDATION_FAILED",
            Self::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

/// Serializable error envelope for HTTP responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    /// The error details.
    pub error: ErrorDetail,
}

/// Error detail within an envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Machine-readable error code.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Error classification.
    pub kind: ErrorKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_body_maps_to_400() {
        let error = GateError::invalid_body("Required (age)");
        assert_eq!(error.kind(), ErrorKind::InvalidBody);
        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(error.to_string(), "Invalid request body: Required (age)");
    }

    #[test]
    fn test_invalid_query_maps_to_400() {
        let error = GateError::invalid_query("Expected string, received number (limit)");
        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
        assert!(error.to_string().starts_with("Invalid request query:"));
    }

    #[test]
    fn test_client_validation_maps_to_422() {
        let error = GateError::client_validation("createUser", "\"x\" is not of type \"number\"");
        assert_eq!(error.kind(), ErrorKind::ClientValidation);
        assert_eq!(error.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(error.to_string().contains("createUser"));
    }

    #[test]
    fn test_internal_with_source() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error = GateError::internal_with_source("body is not valid JSON", parse_err);
        assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(std::error::Error::source(&error).is_some());
    }

    #[test]
    fn test_envelope_serialization() {
        let envelope = GateError::invalid_body("Required (age)").to_envelope();
        let json = serde_json::to_string(&envelope).expect("serialization should work");
        assert!(json.contains("\"code\":\"INVALID_REQUEST_BODY\""));
        assert!(json.contains("\"kind\":\"invalid_body\""));
    }
}
