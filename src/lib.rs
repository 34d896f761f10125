//! # ruta
//!
//! A declarative HTTP router for Rust services. Routes, middleware, and
//! named-argument binding. Nothing more. Nothing less.
//!
//! ## The contract
//!
//! ruta sits above the transport layer. Whatever speaks the wire — hyper, a
//! serverless shim, a test harness — builds a [`Request`] and calls
//! [`Router::run`]; ruta picks the route, runs its middleware onion around
//! the terminal action, binds the action's declared parameters by name, and
//! hands back the [`Response`]. It never opens a socket and never inspects
//! what your handlers produce.
//!
//! What ruta does:
//!
//! - **Template matching** — `/users/{id}` captures segments; first
//!   registered match wins, declaration order is the only tie-break
//! - **Onion middleware** — per-route chains that rewrite, short-circuit,
//!   or delegate via [`Next`]
//! - **Named-argument binding** — each action declares the parameters it
//!   expects; values resolve from path captures, dispatch context, and
//!   declared defaults, in that order
//! - **Prefixes, groups, fallback** — the bookkeeping a route table needs
//!
//! ## Quick start
//!
//! ```rust
//! use ruta::{middleware, Action, Args, Method, Request, Response, Router};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), ruta::Error> {
//!     let mut router = Router::new();
//!     router
//!         .get("/users/{id}", Action::new(get_user).param("id"))
//!         .attach(middleware::trace);
//!     router.set_fallback(Action::new(not_found));
//!
//!     let response = router.run(Request::new(Method::Get, "/users/42")).await?;
//!     assert_eq!(response.map(|r| r.status_code()), Some(200));
//!     Ok(())
//! }
//!
//! async fn get_user(args: Args) -> Response {
//!     let id = args.text("id").unwrap_or("unknown");
//!     Response::json(format!(r#"{{"id":"{id}","name":"alice"}}"#).into_bytes())
//! }
//!
//! async fn not_found(_args: Args) -> Response {
//!     Response::status(404)
//! }
//! ```

mod action;
mod error;
mod method;
mod request;
mod response;
mod route;
mod router;

pub mod health;
pub mod middleware;

pub use action::{Action, Args, Handler, Value};
pub use error::Error;
pub use method::Method;
pub use middleware::{ChainFuture, Middleware, MiddlewareUnit, Next};
pub use request::Request;
pub use response::{ContentType, IntoResponse, Response, ResponseBuilder};
pub use route::{PathParams, Route};
pub use router::Router;
