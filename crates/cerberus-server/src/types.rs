//! HTTP request and response types used at the pipeline boundary.

use bytes::Bytes;
use cerberus_core::GateError;
use http_body_util::Full;

/// The HTTP request type handed to the gate by the host framework.
///
/// A standard `http::Request` with a fully-buffered body.
pub type Request = http::Request<Full<Bytes>>;

/// The HTTP response type produced by handlers.
pub type Response = http::Response<Full<Bytes>>;

/// Extension trait for building responses from gate errors.
pub trait ResponseExt {
    /// Renders a [`GateError`] as a JSON error-envelope response with
    /// the error's mapped status code.
    fn from_gate_error(error: &GateError) -> Response;
}

impl ResponseExt for Response {
    fn from_gate_error(error: &GateError) -> Response {
        let envelope = error.to_envelope();
        let body = serde_json::to_string(&envelope)
            .unwrap_or_else(|_| r#"{"error":{"code":"INTERNAL_ERROR"}}"#.to_string());

        http::Response::builder()
            .status(error.status_code())
            .header(http::header::CONTENT_TYPE, "application/json")
            .body(Full::new(Bytes::from(body)))
            .expect("failed to build error response")
    }
}
