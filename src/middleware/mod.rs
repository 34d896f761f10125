//! Middleware layer.
//!
//! Middleware intercepts requests and responses and is the right place for
//! cross-cutting concerns: structured tracing, metrics, request-id injection,
//! and authentication-header inspection.
//!
//! Units are listed on a route in the order they should run: the first is
//! outermost, the terminal action innermost. Each unit receives the request
//! and a [`Next`] continuation and may
//!
//! - delegate onward with `next.run(request)` (optionally after rewriting
//!   the request — the rewritten copy is what the rest of the chain, and
//!   argument binding, sees),
//! - short-circuit by returning its own response without calling `next`,
//! - fail with an [`Error`], which propagates out of the chain unhandled.
//!
//! ```rust
//! use ruta::{middleware, Next, Request, Response};
//!
//! async fn require_auth(request: Request, next: Next) -> Result<Response, ruta::Error> {
//!     if request.header("authorization").is_none() {
//!         return Ok(Response::status(401)); // short-circuit
//!     }
//!     next.run(request).await
//! }
//!
//! let unit = middleware::from_fn(require_auth);
//! ```

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Instant;

use crate::error::Error;
use crate::request::Request;
use crate::response::Response;
use crate::route::{PathParams, Route};

/// A heap-allocated, type-erased future resolving to the chain outcome.
pub type ChainFuture = Pin<Box<dyn Future<Output = Result<Response, Error>> + Send + 'static>>;

/// A middleware unit.
///
/// Any `async fn(Request, Next) -> Result<Response, Error>` qualifies via
/// the blanket impl; implementing the trait by hand is only needed for
/// stateful units.
pub trait Middleware: Send + Sync + 'static {
    fn handle(&self, request: Request, next: Next) -> ChainFuture;
}

/// A shared, type-erased middleware unit as stored on a route.
///
/// `Arc` because group registration shares one unit across many routes.
pub type MiddlewareUnit = Arc<dyn Middleware>;

impl<F, Fut> Middleware for F
where
    F: Fn(Request, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Response, Error>> + Send + 'static,
{
    fn handle(&self, request: Request, next: Next) -> ChainFuture {
        Box::pin(self(request, next))
    }
}

/// Wraps a function or closure as a sharable [`MiddlewareUnit`].
pub fn from_fn(middleware: impl Middleware) -> MiddlewareUnit {
    Arc::new(middleware)
}

// ── Next ──────────────────────────────────────────────────────────────────────

/// The continuation handed to each middleware unit.
///
/// `run` resumes the chain with a request — the one received, or a rewritten
/// copy. Past the last unit it binds the terminal action's arguments against
/// the request as it arrived there and invokes the action. Returning without
/// calling `run` short-circuits: no inner unit and no action executes.
pub struct Next {
    route: Route,
    params: Arc<PathParams>,
    index: usize,
}

impl Next {
    pub(crate) fn new(route: Route, params: PathParams) -> Self {
        Self { route, params: Arc::new(params), index: 0 }
    }

    /// Resumes the chain with `request`.
    pub fn run(self, request: Request) -> ChainFuture {
        let Self { route, params, index } = self;
        match route.middleware().get(index).cloned() {
            Some(unit) => unit.handle(request, Self { route, params, index: index + 1 }),
            None => Box::pin(async move {
                let args = route.action().bind(&params, &request, Some(&route))?;
                Ok(route.action().call(args).await)
            }),
        }
    }
}

// ── Built-in units ────────────────────────────────────────────────────────────

/// Per-request tracing: one event with method, path, status and latency.
///
/// ```rust
/// use ruta::{middleware, Action, Args, Response, Router};
///
/// # async fn ping(_args: Args) -> Response { Response::text("pong") }
/// let mut router = Router::new();
/// router.get("/ping", Action::new(ping)).attach(middleware::trace);
/// ```
pub fn trace(request: Request, next: Next) -> ChainFuture {
    let method = request.method();
    let path = request.path().to_owned();
    let start = Instant::now();
    Box::pin(async move {
        let response = next.run(request).await?;
        tracing::info!(
            %method,
            path,
            status = response.status_code(),
            elapsed_us = start.elapsed().as_micros() as u64,
            "request served"
        );
        Ok(response)
    })
}
