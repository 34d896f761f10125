//! Actions: type-erased async handlers plus named-argument binding.
//!
//! # How actions are stored
//!
//! The route table needs to hold handlers of *different* types in one
//! `Vec<Route>`. Rust collections can only hold one concrete type, so we use
//! **trait objects** (`dyn ErasedAction`) to hide the concrete handler type
//! behind a common interface and store everything uniformly.
//!
//! The chain from user code to vtable call is:
//!
//! ```text
//! async fn get_user(args: Args) -> Response { … }   ← user writes this
//!        ↓ Action::new(get_user).param("id")
//! Arc::new(FnAction(get_user))                      ← heap-allocated wrapper
//!        ↓  stored as BoxedAction = Arc<dyn ErasedAction>
//! action.bind(…) then action.call(args)  at dispatch time
//!        ↓
//! Box::pin(async { get_user(args).await.into_response() })  ← BoxFuture
//! ```
//!
//! # How arguments are bound
//!
//! There is no reflection in Rust, so an [`Action`] carries an explicit
//! ordered manifest of the named parameters its handler expects. At dispatch
//! time each slot resolves, in order of preference, to:
//!
//! 1. the path capture of the same name (`{id}` → slot `id`),
//! 2. a dispatch context value — `request` always, `route` when a route
//!    matched, then any value deposited in the request bag,
//! 3. the slot's declared default.
//!
//! A slot that resolves nowhere is a configuration error surfaced as
//! [`Error::UnboundParameter`], never a silent null.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::error::Error;
use crate::request::Request;
use crate::response::{IntoResponse, Response};
use crate::route::{PathParams, Route};

// ── Internal types ────────────────────────────────────────────────────────────

/// A heap-allocated, type-erased future that resolves to a [`Response`].
///
/// `Pin<Box<…>>` is required because the async runtime must be able to poll
/// the future in-place — it cannot move it in memory after the first poll.
pub(crate) type BoxFuture = Pin<Box<dyn Future<Output = Response> + Send + 'static>>;

/// Internal dispatch interface.
///
/// `#[doc(hidden)] pub` rather than `pub(crate)` because it appears in the
/// return type of the public `Handler` trait's `into_boxed_action` method.
/// External crates cannot usefully interact with this trait.
#[doc(hidden)]
pub trait ErasedAction {
    fn call(&self, args: Args) -> BoxFuture;
}

/// A heap-allocated, type-erased handler shared across concurrent dispatches.
///
/// `#[doc(hidden)] pub` for the same reason as `ErasedAction`.
#[doc(hidden)]
pub type BoxedAction = Arc<dyn ErasedAction + Send + Sync + 'static>;

// ── Value ─────────────────────────────────────────────────────────────────────

/// A bindable argument value.
#[derive(Clone, Debug)]
pub enum Value {
    /// A path capture, request-bag scalar, or declared default.
    Text(String),
    /// The request being dispatched.
    Request(Request),
    /// The route that matched.
    Route(Route),
}

impl Value {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_request(&self) -> Option<&Request> {
        match self {
            Self::Request(request) => Some(request),
            _ => None,
        }
    }

    pub fn as_route(&self) -> Option<&Route> {
        match self {
            Self::Route(route) => Some(route),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self { Self::Text(text.to_owned()) }
}

impl From<String> for Value {
    fn from(text: String) -> Self { Self::Text(text) }
}

impl From<Request> for Value {
    fn from(request: Request) -> Self { Self::Request(request) }
}

impl From<Route> for Value {
    fn from(route: Route) -> Self { Self::Route(route) }
}

// ── Args ──────────────────────────────────────────────────────────────────────

/// The resolved arguments an action is invoked with.
///
/// Values appear in the action's declared slot order and are addressable by
/// slot name.
#[derive(Debug)]
pub struct Args {
    values: Vec<(String, Value)>,
}

impl Args {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Text shortcut: `args.text("id")` for a captured `{id}`.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_text)
    }

    /// The dispatched request, when the action declared a `request` slot.
    pub fn request(&self) -> Option<&Request> {
        self.get("request").and_then(Value::as_request)
    }

    /// The matched route, when the action declared a `route` slot.
    pub fn route(&self) -> Option<&Route> {
        self.get("route").and_then(Value::as_route)
    }

    /// Slot name/value pairs in declared order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize { self.values.len() }
    pub fn is_empty(&self) -> bool { self.values.is_empty() }
}

// ── Public Handler trait ──────────────────────────────────────────────────────

/// Implemented for every valid action handler.
///
/// You never implement this yourself. It is automatically satisfied for any
/// `async fn` with the signature:
///
/// ```text
/// async fn name(args: Args) -> impl IntoResponse
/// ```
///
/// The trait is **sealed** (via the private `Sealed` supertrait): only the
/// blanket impl below can satisfy it. This prevents accidental misuse and
/// keeps the API surface stable across versions.
pub trait Handler: private::Sealed + Send + Sync + 'static {
    #[doc(hidden)]
    fn into_boxed_action(self) -> BoxedAction;
}

/// The sealing module. Because `Sealed` is private, external crates cannot
/// name it and therefore cannot implement `Handler` on their own types.
mod private {
    pub trait Sealed {}
}

// ── Blanket implementations ───────────────────────────────────────────────────

impl<F, Fut, R> private::Sealed for F
where
    F: Fn(Args) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
}

/// Implement `Handler` for any function with the right signature.
///
/// `Fn(Args) -> Fut` covers named `async fn` items, closures returning
/// async blocks, and any struct that implements `Fn`.
impl<F, Fut, R> Handler for F
where
    F: Fn(Args) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn into_boxed_action(self) -> BoxedAction {
        Arc::new(FnAction(self))
    }
}

// ── Concrete wrapper ──────────────────────────────────────────────────────────

/// Newtype wrapper that holds a concrete handler `F` and implements
/// [`ErasedAction`], bridging the typed world to the trait-object world.
struct FnAction<F>(F);

impl<F, Fut, R> ErasedAction for FnAction<F>
where
    F: Fn(Args) -> Fut + Send + Sync,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn call(&self, args: Args) -> BoxFuture {
        let fut = (self.0)(args);
        Box::pin(async move { fut.await.into_response() })
    }
}

// ── Action ────────────────────────────────────────────────────────────────────

/// A terminal handler paired with the ordered manifest of named parameters
/// it expects.
///
/// ```rust
/// use ruta::{Action, Args, Response};
///
/// async fn get_user(args: Args) -> Response {
///     let id = args.text("id").unwrap_or("unknown");
///     let page = args.text("page").unwrap_or("0");
///     Response::json(format!(r#"{{"id":"{id}","page":{page}}}"#).into_bytes())
/// }
///
/// let action = Action::new(get_user)
///     .param("id")
///     .param_default("page", "1");
/// ```
#[derive(Clone)]
pub struct Action {
    slots: Vec<Slot>,
    inner: BoxedAction,
}

#[derive(Clone)]
struct Slot {
    name: String,
    default: Option<Value>,
}

impl Action {
    /// Wraps a handler expecting no arguments. Declare what it needs with
    /// [`param`](Action::param) / [`param_default`](Action::param_default).
    pub fn new(handler: impl Handler) -> Self {
        Self { slots: Vec::new(), inner: handler.into_boxed_action() }
    }

    /// Declares a required named parameter. Declaration order is the order
    /// values appear in [`Args`].
    pub fn param(mut self, name: &str) -> Self {
        self.slots.push(Slot { name: name.to_owned(), default: None });
        self
    }

    /// Declares a named parameter with a default, used when neither a path
    /// capture nor a context value resolves it.
    pub fn param_default(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.slots.push(Slot { name: name.to_owned(), default: Some(value.into()) });
        self
    }

    pub(crate) fn call(&self, args: Args) -> BoxFuture {
        self.inner.call(args)
    }

    /// Resolves every declared slot against the dispatch state.
    ///
    /// Preference per slot: path capture, then `request` / `route` /
    /// request-bag context, then the declared default. `route` is absent
    /// for fallback dispatches.
    pub(crate) fn bind(
        &self,
        params: &PathParams,
        request: &Request,
        route: Option<&Route>,
    ) -> Result<Args, Error> {
        let mut values = Vec::with_capacity(self.slots.len());
        for slot in &self.slots {
            let resolved = params
                .get(&slot.name)
                .cloned()
                .map(Value::Text)
                .or_else(|| match slot.name.as_str() {
                    "request" => Some(Value::Request(request.clone())),
                    "route" => route.cloned().map(Value::Route),
                    _ => None,
                })
                .or_else(|| request.value(&slot.name).cloned())
                .or_else(|| slot.default.clone());

            let Some(value) = resolved else {
                return Err(Error::UnboundParameter { name: slot.name.clone() });
            };
            values.push((slot.name.clone(), value));
        }
        Ok(Args { values })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::method::Method;

    async fn noop(_args: Args) -> Response {
        Response::status(204)
    }

    fn params(entries: &[(&str, &str)]) -> PathParams {
        entries.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn path_captures_win_over_context_and_defaults() {
        let action = Action::new(noop).param_default("id", "fallback");
        let request = Request::new(Method::Get, "/").with_value("id", "from-bag");

        let args = action.bind(&params(&[("id", "42")]), &request, None).unwrap();
        assert_eq!(args.text("id"), Some("42"));
    }

    #[test]
    fn context_wins_over_defaults() {
        let action = Action::new(noop).param_default("tenant", "default-tenant");
        let request = Request::new(Method::Get, "/").with_value("tenant", "acme");

        let args = action.bind(&params(&[]), &request, None).unwrap();
        assert_eq!(args.text("tenant"), Some("acme"));
    }

    #[test]
    fn defaults_fill_the_gaps() {
        let action = Action::new(noop).param_default("page", "1");
        let request = Request::new(Method::Get, "/");

        let args = action.bind(&params(&[]), &request, None).unwrap();
        assert_eq!(args.text("page"), Some("1"));
    }

    #[test]
    fn request_slot_resolves_to_the_dispatched_request() {
        let action = Action::new(noop).param("request");
        let request = Request::new(Method::Post, "/users");

        let args = action.bind(&params(&[]), &request, None).unwrap();
        let bound = args.request().expect("request slot");
        assert_eq!(bound.path(), "/users");
        assert_eq!(bound.method(), Method::Post);
    }

    #[test]
    fn route_slot_is_absent_without_a_match() {
        let action = Action::new(noop).param("route");
        let request = Request::new(Method::Get, "/");

        let err = action.bind(&params(&[]), &request, None).unwrap_err();
        assert!(matches!(err, Error::UnboundParameter { name } if name == "route"));
    }

    #[test]
    fn unresolvable_slot_is_fatal() {
        let action = Action::new(noop).param("id");
        let request = Request::new(Method::Get, "/");

        let err = action.bind(&params(&[]), &request, None).unwrap_err();
        assert!(matches!(err, Error::UnboundParameter { name } if name == "id"));
    }

    #[test]
    fn args_preserve_declaration_order() {
        let action = Action::new(noop).param("a").param("b");
        let request = Request::new(Method::Get, "/");

        let args = action
            .bind(&params(&[("a", "1"), ("b", "2")]), &request, None)
            .unwrap();
        let names: Vec<&str> = args.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["a", "b"]);
        assert_eq!(args.len(), 2);
    }
}
