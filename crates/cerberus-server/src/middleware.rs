//! The middleware trait and continuation chain.
//!
//! A [`Middleware`] receives the request and a [`Next`] continuation;
//! calling `next.run(request)` hands the request to the rest of the
//! chain and ultimately the handler. Returning an `Err` short-circuits:
//! downstream middleware and the handler are never invoked.
//!
//! # Example
//!
//! ```ignore
//! struct LoggingMiddleware;
//!
//! impl Middleware for LoggingMiddleware {
//!     fn name(&self) -> &'static str {
//!         "logging"
//!     }
//!
//!     fn process<'a>(
//!         &'a self,
//!         request: ServerRequest,
//!         next: Next<'a>,
//!     ) -> BoxFuture<'a, GateResult<Response>> {
//!         Box::pin(async move {
//!             tracing::debug!(uri = %request.uri(), "request received");
//!             next.run(request).await
//!         })
//!     }
//! }
//! ```

use crate::request::ServerRequest;
use crate::types::Response;
use cerberus_core::GateResult;
use std::future::Future;
use std::pin::Pin;

/// A boxed future.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A stage in the request pipeline.
///
/// # Invariants
///
/// - A middleware MUST call `next.run()` exactly once, unless it
///   short-circuits by returning early.
/// - A middleware MUST NOT swallow errors from downstream stages.
pub trait Middleware: Send + Sync + 'static {
    /// Returns the unique name of this stage, used in logs.
    fn name(&self) -> &'static str;

    /// Processes the request through this stage.
    fn process<'a>(
        &'a self,
        request: ServerRequest,
        next: Next<'a>,
    ) -> BoxFuture<'a, GateResult<Response>>;
}

/// The continuation handed to each middleware.
///
/// Consumed by [`Next::run`], so it can only be invoked once.
pub struct Next<'a> {
    inner: NextInner<'a>,
}

enum NextInner<'a> {
    /// More middleware to process.
    Chain {
        middleware: &'a dyn Middleware,
        next: Box<Next<'a>>,
    },
    /// End of chain: invoke the handler.
    Handler(Box<dyn FnOnce(ServerRequest) -> BoxFuture<'static, GateResult<Response>> + Send + 'a>),
}

impl<'a> Next<'a> {
    /// Creates a `Next` that will invoke the given middleware, then `next`.
    #[must_use]
    pub fn new(middleware: &'a dyn Middleware, next: Next<'a>) -> Self {
        Self {
            inner: NextInner::Chain {
                middleware,
                next: Box::new(next),
            },
        }
    }

    /// Creates a terminal `Next` that invokes the handler.
    #[must_use]
    pub fn handler<F>(f: F) -> Self
    where
        F: FnOnce(ServerRequest) -> BoxFuture<'static, GateResult<Response>> + Send + 'a,
    {
        Self {
            inner: NextInner::Handler(Box::new(f)),
        }
    }

    /// Invokes the next middleware or handler in the chain.
    pub async fn run(self, request: ServerRequest) -> GateResult<Response> {
        match self.inner {
            NextInner::Chain { middleware, next } => middleware.process(request, *next).await,
            NextInner::Handler(handler) => handler(request).await,
        }
    }
}
