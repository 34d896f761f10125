//! Route values: path template, method filter, middleware, terminal action.
//!
//! A [`Route`] pairs a compiled path template with the action that serves it.
//! Templates are `/`-delimited; a `{name}` segment captures the matching
//! request segment under `name`:
//!
//! ```text
//! /users/{id}/posts/{post}    matches    /users/42/posts/7
//!                             captures   id = "42", post = "7"
//! ```
//!
//! Matching is strictly per-segment — no wildcards, no optional or catch-all
//! segments, no regex constraints. Literal segments compare case-sensitively.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::action::Action;
use crate::error::Error;
use crate::method::Method;
use crate::middleware::{Middleware, MiddlewareUnit};
use crate::request::Request;

/// Path parameters captured by a successful match.
pub type PathParams = HashMap<String, String>;

/// One matchable endpoint.
///
/// Routes are values: the `with_*` mutators consume and return a new
/// `Route`, so a route held elsewhere is never altered behind its back.
/// Clone first when the original must survive.
#[derive(Clone)]
pub struct Route {
    path: String,
    segments: Vec<Segment>,
    methods: HashSet<Method>,
    middleware: Vec<MiddlewareUnit>,
    action: Action,
    name: Option<String>,
}

impl std::fmt::Debug for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Route")
            .field("path", &self.path)
            .field("segments", &self.segments)
            .field("methods", &self.methods)
            .field("middleware", &self.middleware.len())
            .field("name", &self.name)
            .finish()
    }
}

#[derive(Clone, Debug, PartialEq)]
enum Segment {
    Literal(String),
    Capture(String),
}

impl Route {
    /// Compiles `path` into a route serving any method.
    ///
    /// Fails on malformed templates — braces outside a well-formed `{name}`
    /// placeholder, an empty placeholder, or the same name captured twice.
    /// Template mistakes surface here, during setup, not under traffic.
    pub fn new(path: impl Into<String>, action: Action) -> Result<Self, Error> {
        let path = path.into();
        let segments = compile(&path)?;
        Ok(Self {
            path,
            segments,
            methods: HashSet::new(),
            middleware: Vec::new(),
            action,
            name: None,
        })
    }

    /// [`Route::new`] restricted to `GET`.
    pub fn get(path: impl Into<String>, action: Action) -> Result<Self, Error> {
        Ok(Self::new(path, action)?.with_methods([Method::Get]))
    }

    /// [`Route::new`] restricted to `POST`.
    pub fn post(path: impl Into<String>, action: Action) -> Result<Self, Error> {
        Ok(Self::new(path, action)?.with_methods([Method::Post]))
    }

    /// [`Route::new`] restricted to `PUT`.
    pub fn put(path: impl Into<String>, action: Action) -> Result<Self, Error> {
        Ok(Self::new(path, action)?.with_methods([Method::Put]))
    }

    /// [`Route::new`] restricted to `PATCH`.
    pub fn patch(path: impl Into<String>, action: Action) -> Result<Self, Error> {
        Ok(Self::new(path, action)?.with_methods([Method::Patch]))
    }

    /// [`Route::new`] restricted to `DELETE`.
    pub fn delete(path: impl Into<String>, action: Action) -> Result<Self, Error> {
        Ok(Self::new(path, action)?.with_methods([Method::Delete]))
    }

    // ── Copy-returning mutators ───────────────────────────────────────────────

    /// Returns this route under a new path. The template is re-compiled, so
    /// the same malformed-template errors as [`Route::new`] apply.
    pub fn with_path(mut self, path: impl Into<String>) -> Result<Self, Error> {
        let path = path.into();
        self.segments = compile(&path)?;
        self.path = path;
        Ok(self)
    }

    /// Returns this route under a new name.
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_owned());
        self
    }

    /// Returns this route restricted to `methods`. Empty means any method.
    pub fn with_methods(mut self, methods: impl IntoIterator<Item = Method>) -> Self {
        self.methods = methods.into_iter().collect();
        self
    }

    /// Returns this route with its middleware list replaced.
    pub fn with_middleware(mut self, middleware: Vec<MiddlewareUnit>) -> Self {
        self.middleware = middleware;
        self
    }

    /// Appends one middleware unit in place.
    ///
    /// This is the post-registration hook: [`Router::set_route`](crate::Router::set_route)
    /// returns `&mut Route` precisely so middleware can be attached after
    /// the route is stored.
    pub fn attach(&mut self, middleware: impl Middleware) -> &mut Self {
        self.middleware.push(Arc::new(middleware));
        self
    }

    // ── Accessors ─────────────────────────────────────────────────────────────

    pub fn path(&self) -> &str { &self.path }
    pub fn name(&self) -> Option<&str> { self.name.as_deref() }
    /// Allowed methods; empty means the route matches any method.
    pub fn methods(&self) -> &HashSet<Method> { &self.methods }
    pub fn middleware(&self) -> &[MiddlewareUnit] { &self.middleware }
    pub fn action(&self) -> &Action { &self.action }

    // ── Matching ──────────────────────────────────────────────────────────────

    /// Tests this route against `request`.
    ///
    /// Returns the captured path parameters on a match — empty for a purely
    /// literal template — and `None` otherwise. A failed attempt leaves
    /// nothing behind: captures from partial matches never escape.
    pub fn matches(&self, request: &Request) -> Option<PathParams> {
        let given: Vec<&str> = request.path().split('/').collect();
        // Counts must line up exactly: no variadic segments.
        if given.len() != self.segments.len() {
            return None;
        }

        let mut params = PathParams::new();
        for (pattern, segment) in self.segments.iter().zip(&given) {
            match pattern {
                Segment::Literal(text) => {
                    if text.as_str() != *segment {
                        return None;
                    }
                }
                Segment::Capture(name) => {
                    params.insert(name.clone(), (*segment).to_owned());
                }
            }
        }

        if !self.methods.is_empty() && !self.methods.contains(&request.method()) {
            return None;
        }

        Some(params)
    }
}

/// Splits a template into literal and capture segments, validating as it
/// goes. A capture is a segment enclosed in exactly one pair of braces.
fn compile(path: &str) -> Result<Vec<Segment>, Error> {
    let mut segments = Vec::new();
    let mut seen = HashSet::new();

    for segment in path.split('/') {
        if let Some(name) = segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
            if name.is_empty() {
                return Err(Error::EmptyPlaceholder { path: path.to_owned() });
            }
            if name.contains(['{', '}']) {
                return Err(Error::UnbalancedBraces {
                    path: path.to_owned(),
                    segment: segment.to_owned(),
                });
            }
            if !seen.insert(name.to_owned()) {
                return Err(Error::DuplicatePlaceholder {
                    path: path.to_owned(),
                    name: name.to_owned(),
                });
            }
            segments.push(Segment::Capture(name.to_owned()));
        } else if segment.contains(['{', '}']) {
            return Err(Error::UnbalancedBraces {
                path: path.to_owned(),
                segment: segment.to_owned(),
            });
        } else {
            segments.push(Segment::Literal(segment.to_owned()));
        }
    }

    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Args;
    use crate::response::Response;

    async fn noop(_args: Args) -> Response {
        Response::status(204)
    }

    fn route(path: &str) -> Route {
        Route::new(path, Action::new(noop)).unwrap()
    }

    #[test]
    fn literal_paths_match_exactly() {
        let route = route("/users/all");
        assert!(route.matches(&Request::new(Method::Get, "/users/all")).is_some());
        assert!(route.matches(&Request::new(Method::Get, "/users/ALL")).is_none());
        assert!(route.matches(&Request::new(Method::Get, "/users")).is_none());
        assert!(route.matches(&Request::new(Method::Get, "/users/all/x")).is_none());
    }

    #[test]
    fn captures_bind_segment_values() {
        let route = route("/users/{id}/posts/{post}");
        let params = route
            .matches(&Request::new(Method::Get, "/users/42/posts/7"))
            .unwrap();
        assert_eq!(params.get("id").map(String::as_str), Some("42"));
        assert_eq!(params.get("post").map(String::as_str), Some("7"));
    }

    #[test]
    fn empty_and_root_paths_are_distinct() {
        assert!(route("").matches(&Request::new(Method::Get, "")).is_some());
        assert!(route("").matches(&Request::new(Method::Get, "/")).is_none());
        assert!(route("/").matches(&Request::new(Method::Get, "/")).is_some());
        assert!(route("/").matches(&Request::new(Method::Get, "")).is_none());
    }

    #[test]
    fn empty_method_set_matches_any_method() {
        let route = route("/ping");
        assert!(route.matches(&Request::new(Method::Get, "/ping")).is_some());
        assert!(route.matches(&Request::new(Method::Delete, "/ping")).is_some());
    }

    #[test]
    fn method_filter_rejects_others() {
        let route = route("/ping").with_methods([Method::Get, Method::Head]);
        assert!(route.matches(&Request::new(Method::Get, "/ping")).is_some());
        assert!(route.matches(&Request::new(Method::Head, "/ping")).is_some());
        assert!(route.matches(&Request::new(Method::Post, "/ping")).is_none());
    }

    #[test]
    fn malformed_templates_are_rejected_at_compile_time() {
        let unbalanced = Route::new("/users/{id", Action::new(noop)).unwrap_err();
        assert!(matches!(unbalanced, Error::UnbalancedBraces { .. }));

        let nested = Route::new("/users/{{id}}", Action::new(noop)).unwrap_err();
        assert!(matches!(nested, Error::UnbalancedBraces { .. }));

        let trailing = Route::new("/users/{id}x", Action::new(noop)).unwrap_err();
        assert!(matches!(trailing, Error::UnbalancedBraces { .. }));

        let empty = Route::new("/users/{}", Action::new(noop)).unwrap_err();
        assert!(matches!(empty, Error::EmptyPlaceholder { .. }));

        let duplicate = Route::new("/users/{id}/friends/{id}", Action::new(noop)).unwrap_err();
        assert!(matches!(duplicate, Error::DuplicatePlaceholder { name, .. } if name == "id"));
    }

    #[test]
    fn with_path_recompiles() {
        let moved = route("/users/{id}").with_path("/accounts/{id}").unwrap();
        assert_eq!(moved.path(), "/accounts/{id}");
        assert!(moved.matches(&Request::new(Method::Get, "/accounts/9")).is_some());
        assert!(moved.matches(&Request::new(Method::Get, "/users/9")).is_none());

        assert!(route("/ok").with_path("/bad/{").is_err());
    }

    #[test]
    fn with_name_and_with_methods_leave_the_rest_alone() {
        let named = route("/users/{id}")
            .with_methods([Method::Get])
            .with_name("users.show");
        assert_eq!(named.name(), Some("users.show"));
        assert_eq!(named.path(), "/users/{id}");
        assert!(named.methods().contains(&Method::Get));
    }
}
