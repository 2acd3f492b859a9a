//! The server-side request abstraction.
//!
//! [`ServerRequest`] is what the gate sees of an incoming request: the
//! URI and headers, a set of query parameters, and a one-shot
//! asynchronous JSON body read. The body read is memoized: the first
//! `json()` call awaits the underlying source (which may suspend while
//! the transport streams and decodes), and every later call returns the
//! same parsed value without touching the transport again. Successful
//! validation therefore leaves the already-validated value behind for
//! the handler.

use bytes::Bytes;
use cerberus_core::{GateError, GateResult};
use http::{HeaderMap, Method, Uri};
use http_body_util::BodyExt;
use serde_json::Value;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use tokio::sync::OnceCell;

use crate::types::Request;

/// Router-injected query parameter used for route matching.
///
/// This is a framework artifact, never user data, and is stripped from
/// the query map before validation in every code path.
pub(crate) const ROUTE_MATCH_PARAM: &str = "nxtP";

/// A boxed future yielding a parsed JSON body.
pub type BodyFuture = Pin<Box<dyn Future<Output = GateResult<Value>> + Send>>;

type BodySource = Box<dyn Fn() -> BodyFuture + Send + Sync>;

/// An incoming request as seen by the validation gate.
pub struct ServerRequest {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: OnceCell<Value>,
    source: BodySource,
}

impl fmt::Debug for ServerRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerRequest")
            .field("method", &self.method)
            .field("uri", &self.uri)
            .field("body_read", &self.body.initialized())
            .finish_non_exhaustive()
    }
}

impl ServerRequest {
    /// Creates a request from already-buffered body bytes.
    ///
    /// The bytes are parsed as JSON on the first `json()` call, not
    /// eagerly; a request whose body is never read never pays for the
    /// parse.
    #[must_use]
    pub fn from_parts(method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> Self {
        Self::with_body_source(method, uri, headers, move || {
            let bytes = body.clone();
            Box::pin(async move { parse_body(&bytes) })
        })
    }

    /// Creates a request with a custom body source.
    ///
    /// The source is invoked at most once; the parsed value is memoized
    /// for every later read.
    #[must_use]
    pub fn with_body_source<F>(method: Method, uri: Uri, headers: HeaderMap, source: F) -> Self
    where
        F: Fn() -> BodyFuture + Send + Sync + 'static,
    {
        Self {
            method,
            uri,
            headers,
            body: OnceCell::new(),
            source: Box::new(source),
        }
    }

    /// Creates a request by collecting an `http` request's body.
    pub async fn from_http(request: Request) -> Self {
        let (parts, body) = request.into_parts();
        let bytes = match body.collect().await {
            Ok(collected) => collected.to_bytes(),
            Err(err) => match err {},
        };
        Self::from_parts(parts.method, parts.uri, parts.headers, bytes)
    }

    /// Returns the HTTP method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the request URI.
    #[must_use]
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Returns the request headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Reads the request body as parsed JSON.
    ///
    /// The first call awaits the body source and may suspend; every
    /// later call returns the memoized value without re-reading.
    pub async fn json(&self) -> GateResult<&Value> {
        self.body.get_or_try_init(|| (self.source)()).await
    }

    /// Installs an already-parsed body value, so later `json()` calls
    /// return it without invoking the body source.
    ///
    /// Returns `false` if the body was already read (the memoized value
    /// stays in place).
    pub fn set_json(&self, value: Value) -> bool {
        self.body.set(value).is_ok()
    }

    /// Returns the decoded query parameters in URL order.
    pub fn query_pairs(&self) -> GateResult<Vec<(String, String)>> {
        let Some(query) = self.uri.query() else {
            return Ok(Vec::new());
        };
        serde_urlencoded::from_str(query)
            .map_err(|err| GateError::invalid_query(format!("Malformed query string: {err}")))
    }

    /// Returns the query parameters as a JSON object of strings,
    /// suitable for schema validation.
    ///
    /// Duplicate keys keep the last value. The router-injected
    /// route-match parameter (`nxtP`) is always excluded: it must never
    /// reach user-supplied schemas, and its presence cannot change the
    /// validation outcome.
    pub fn query_map(&self) -> GateResult<Value> {
        let mut map = serde_json::Map::new();
        for (key, value) in self.query_pairs()? {
            if key == ROUTE_MATCH_PARAM {
                continue;
            }
            map.insert(key, Value::String(value));
        }
        Ok(Value::Object(map))
    }
}

fn parse_body(bytes: &Bytes) -> GateResult<Value> {
    serde_json::from_slice(bytes)
        .map_err(|err| GateError::invalid_body(format!("Malformed JSON: {err}")))
}
