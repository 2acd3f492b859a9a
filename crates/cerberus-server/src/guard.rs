//! The schema-validation interceptor and route-registration record.
//!
//! [`SchemaGuard`] carries the two capabilities a route registration
//! needs from the gate:
//!
//! - **validate**: [`SchemaGuard::intercept`] runs before the handler,
//!   validating body then query and short-circuiting on failure;
//! - **describe**: [`SchemaGuard::describe`] runs once at registration
//!   time, producing the client-facing [`RouteMetadata`].
//!
//! [`RouteRegistration`] ties a guard to an endpoint identifier and
//! caches the metadata at construction, so the route-compilation step
//! reads a write-once value.

use cerberus_core::{ClientValidators, GateError, GateResult, RouteMetadata};
use cerberus_schema::Schema;

use crate::middleware::{BoxFuture, Middleware, Next};
use crate::request::ServerRequest;
use crate::types::Response;

/// Request-validation interceptor for one route.
///
/// Validation order is body first, then query; when both are invalid
/// the body error surfaces. Routes without schemas pass every request
/// through untouched.
#[derive(Debug, Clone, Default)]
pub struct SchemaGuard {
    body: Option<Schema>,
    query: Option<Schema>,
}

impl SchemaGuard {
    /// Creates a guard with no schemas; every request passes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the body schema.
    #[must_use]
    pub fn body(mut self, schema: Schema) -> Self {
        self.body = Some(schema);
        self
    }

    /// Sets the query schema.
    #[must_use]
    pub fn query(mut self, schema: Schema) -> Self {
        self.query = Some(schema);
        self
    }

    /// Returns the body schema, if any.
    #[must_use]
    pub fn body_schema(&self) -> Option<&Schema> {
        self.body.as_ref()
    }

    /// Returns the query schema, if any.
    #[must_use]
    pub fn query_schema(&self) -> Option<&Schema> {
        self.query.as_ref()
    }

    /// Validates the request and, on success, forwards it to `next`.
    ///
    /// 1. If a body schema is present, the body is read (this may
    ///    suspend while the transport decodes) and validated. Failure
    ///    aborts with [`GateError::InvalidBody`]; the handler is never
    ///    invoked. Success leaves the parsed value memoized on the
    ///    request, so downstream readers get it without another
    ///    transport read.
    /// 2. If a query schema is present, the query map (route-match
    ///    parameter already stripped) is validated; failure aborts with
    ///    [`GateError::InvalidQuery`].
    /// 3. Otherwise the continuation's result is returned unchanged.
    pub async fn intercept(&self, request: ServerRequest, next: Next<'_>) -> GateResult<Response> {
        if let Some(schema) = &self.body {
            let body = request.json().await?;
            if let Err(violations) = schema.validate(body) {
                tracing::debug!(%violations, "request body rejected");
                return Err(GateError::invalid_body(violations.to_string()));
            }
        }

        if let Some(schema) = &self.query {
            let query = request.query_map()?;
            if let Err(violations) = schema.validate(&query) {
                tracing::debug!(%violations, "request query rejected");
                return Err(GateError::invalid_query(violations.to_string()));
            }
        }

        next.run(request).await
    }

    /// Produces the metadata contributed to the route at registration
    /// time: the JSON Schema projection of each present schema.
    ///
    /// Deterministic: the same schemas always yield byte-identical
    /// projections, so client bundles can be cached and diffed.
    #[must_use]
    pub fn describe(&self) -> RouteMetadata {
        RouteMetadata::new(ClientValidators::new(
            self.body.as_ref().map(Schema::to_json_schema),
            self.query.as_ref().map(Schema::to_json_schema),
        ))
    }
}

impl Middleware for SchemaGuard {
    fn name(&self) -> &'static str {
        "schema_guard"
    }

    fn process<'a>(
        &'a self,
        request: ServerRequest,
        next: Next<'a>,
    ) -> BoxFuture<'a, GateResult<Response>> {
        Box::pin(self.intercept(request, next))
    }
}

/// A registered route: an endpoint identifier, its guard, and the
/// metadata cache written once at registration.
#[derive(Debug, Clone)]
pub struct RouteRegistration {
    endpoint: String,
    guard: SchemaGuard,
    metadata: RouteMetadata,
}

impl RouteRegistration {
    /// Registers a guard for an endpoint, computing the client-facing
    /// metadata immediately.
    #[must_use]
    pub fn new(endpoint: impl Into<String>, guard: SchemaGuard) -> Self {
        let metadata = guard.describe();
        Self {
            endpoint: endpoint.into(),
            guard,
            metadata,
        }
    }

    /// Returns the endpoint identifier.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Returns the guard (the route's validate capability).
    #[must_use]
    pub fn guard(&self) -> &SchemaGuard {
        &self.guard
    }

    /// Returns the cached registration-time metadata.
    #[must_use]
    pub fn metadata(&self) -> &RouteMetadata {
        &self.metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use http::{HeaderMap, Method, StatusCode, Uri};
    use http_body_util::Full;
    use serde_json::json;

    fn user_guard() -> SchemaGuard {
        SchemaGuard::new().body(Schema::object(vec![
            ("name", Schema::string().required()),
            ("age", Schema::number().required()),
        ]))
    }

    fn make_request(uri: &'static str, body: &'static [u8]) -> ServerRequest {
        ServerRequest::from_parts(
            Method::POST,
            Uri::from_static(uri),
            HeaderMap::new(),
            Bytes::from_static(body),
        )
    }

    fn ok_handler<'a>() -> Next<'a> {
        Next::handler(|_req| {
            Box::pin(async {
                Ok(http::Response::builder()
                    .status(StatusCode::OK)
                    .body(Full::new(Bytes::new()))
                    .unwrap())
            })
        })
    }

    #[tokio::test]
    async fn test_valid_body_reaches_handler() {
        let guard = user_guard();
        let request = make_request("/users", br#"{"name": "a", "age": 2}"#);
        let response = guard.intercept(request, ok_handler()).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_invalid_body_message_joins_violations() {
        let guard = user_guard();
        let request = make_request("/users", br#"{"name": 1}"#);
        let err = guard.intercept(request, ok_handler()).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid request body: Expected string, received number (name), Required (age)"
        );
    }

    #[tokio::test]
    async fn test_body_error_wins_when_both_invalid() {
        let guard = user_guard().query(Schema::object(vec![(
            "limit",
            Schema::string().required(),
        )]));
        let request = make_request("/users?other=1", br#"{"name": 1}"#);
        let err = guard.intercept(request, ok_handler()).await.unwrap_err();
        assert_eq!(err.kind(), cerberus_core::ErrorKind::InvalidBody);
    }

    #[tokio::test]
    async fn test_invalid_query() {
        let guard = SchemaGuard::new().query(Schema::object(vec![(
            "limit",
            Schema::string().required(),
        )]));
        let request = make_request("/users?other=1", b"{}");
        let err = guard.intercept(request, ok_handler()).await.unwrap_err();
        assert_eq!(err.kind(), cerberus_core::ErrorKind::InvalidQuery);
        assert_eq!(
            err.to_string(),
            "Invalid request query: Required (limit)"
        );
    }

    #[tokio::test]
    async fn test_no_schemas_pass_anything_through() {
        let guard = SchemaGuard::new();
        let request = make_request("/users?whatever=1", b"not even json");
        let response = guard.intercept(request, ok_handler()).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_describe_projects_both_schemas() {
        let guard = SchemaGuard::new()
            .body(Schema::object(vec![("name", Schema::string().required())]))
            .query(Schema::record(Schema::string()));
        let metadata = guard.describe();
        assert_eq!(
            metadata.client_validators.body.as_ref().unwrap()["required"],
            json!(["name"])
        );
        assert_eq!(
            metadata.client_validators.query.as_ref().unwrap()["additionalProperties"],
            json!({"type": "string"})
        );
    }

    #[test]
    fn test_describe_without_schemas_is_null_pair() {
        let metadata = SchemaGuard::new().describe();
        assert!(metadata.client_validators.is_empty());
    }

    #[test]
    fn test_registration_caches_deterministic_metadata() {
        let first = RouteRegistration::new("createUser", user_guard());
        let second = RouteRegistration::new("createUser", user_guard());
        assert_eq!(
            serde_json::to_string(first.metadata()).unwrap(),
            serde_json::to_string(second.metadata()).unwrap()
        );
        assert_eq!(first.endpoint(), "createUser");
    }
}
