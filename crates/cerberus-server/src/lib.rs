//! # Cerberus Server
//!
//! The server-side half of the Cerberus validation gate.
//!
//! The centerpiece is [`SchemaGuard`], an interceptor that sits between
//! the host framework and a route handler. Given optional body and
//! query schemas it:
//!
//! 1. reads and validates the request body, then the query (when both
//!    are invalid, the body error surfaces);
//! 2. memoizes the parsed body so downstream readers never touch the
//!    transport again;
//! 3. short-circuits with a 400-mapped [`GateError`] on failure, so the
//!    handler body is never reached;
//! 4. exposes a `describe` capability producing the route's
//!    client-facing [`RouteMetadata`] at registration time.
//!
//! ```
//! use cerberus_schema::Schema;
//! use cerberus_server::{Next, SchemaGuard, ServerRequest};
//! use http_body_util::Full;
//! use bytes::Bytes;
//!
//! # #[tokio::main(flavor = "current_thread")] async fn main() {
//! let guard = SchemaGuard::new()
//!     .body(Schema::object(vec![("name", Schema::string().required())]));
//!
//! let request = ServerRequest::from_parts(
//!     http::Method::POST,
//!     "/users".parse().unwrap(),
//!     http::HeaderMap::new(),
//!     Bytes::from_static(br#"{"name": "Alice"}"#),
//! );
//!
//! let next = Next::handler(|_req| {
//!     Box::pin(async {
//!         Ok(http::Response::builder()
//!             .status(http::StatusCode::OK)
//!             .body(Full::new(Bytes::new()))
//!             .unwrap())
//!     })
//! });
//!
//! let response = guard.intercept(request, next).await.unwrap();
//! assert_eq!(response.status(), http::StatusCode::OK);
//! # }
//! ```
//!
//! [`GateError`]: cerberus_core::GateError
//! [`RouteMetadata`]: cerberus_core::RouteMetadata

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod guard;
pub mod middleware;
pub mod request;
pub mod types;

pub use guard::{RouteRegistration, SchemaGuard};
pub use middleware::{BoxFuture, Middleware, Next};
pub use request::{BodyFuture, ServerRequest};
pub use types::{Request, Response, ResponseExt};
