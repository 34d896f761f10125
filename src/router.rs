//! Declaration-ordered request router.
//!
//! Routes are scanned in the order they were registered and the first match
//! wins — no specificity scoring, no conflict detection between overlapping
//! templates. Declaration order is the only tie-break, so register the more
//! specific route first.
//!
//! Build the table once at startup, then call [`Router::run`] once per
//! incoming request; dispatch never writes to the table.

use std::collections::HashMap;

use tracing::debug;

use crate::action::Action;
use crate::error::Error;
use crate::method::Method;
use crate::middleware::{MiddlewareUnit, Next};
use crate::request::Request;
use crate::response::Response;
use crate::route::{PathParams, Route};

/// The application router.
///
/// Holds the ordered route table, an optional fallback action, and the
/// prefix applied to every route registered through this instance.
/// Registration methods chain; [`run`](Router::run) is read-only.
pub struct Router {
    routes: Vec<Route>,
    names: HashMap<String, usize>,
    fallback: Option<Action>,
    prefix: String,
}

impl Router {
    pub fn new() -> Self {
        Self {
            routes: Vec::new(),
            names: HashMap::new(),
            fallback: None,
            prefix: String::new(),
        }
    }

    // ── Configuration ─────────────────────────────────────────────────────────

    /// Sets the prefix prepended to every route registered afterwards.
    ///
    /// Normalized to a leading slash and no trailing slash; `""` and `"/"`
    /// both mean no prefix. Routes already in the table are left as they
    /// are.
    pub fn set_prefix(&mut self, prefix: &str) -> &mut Self {
        self.prefix = normalize_prefix(prefix);
        self
    }

    /// Sets the action dispatched when no route matches.
    pub fn set_fallback(&mut self, action: Action) -> &mut Self {
        self.fallback = Some(action);
        self
    }

    // ── Lookup ────────────────────────────────────────────────────────────────

    /// Retrieves a named route.
    ///
    /// Only names count here: a route registered without a name is reachable
    /// through [`get_routes`](Router::get_routes) iteration order, never by
    /// lookup.
    pub fn get_route(&self, name: &str) -> Option<&Route> {
        self.names.get(name).map(|&index| &self.routes[index])
    }

    /// All routes in declaration order.
    pub fn get_routes(&self) -> &[Route] {
        &self.routes
    }

    // ── Registration ──────────────────────────────────────────────────────────

    /// Adds a route, prepending the configured prefix to its path.
    ///
    /// A route carrying a name already present in the table replaces the
    /// earlier registration in place, keeping its position.
    ///
    /// # Panics
    ///
    /// Panics if prefixing produces an invalid template (a prefix containing
    /// braces).
    pub fn add_route(&mut self, route: Route) -> &mut Self {
        let route = self.prefixed(route);
        self.store(route);
        self
    }

    /// Builds a route from `path` (prefix applied), registers it, and
    /// returns the stored route so middleware can be attached after
    /// creation.
    ///
    /// An empty `methods` slice means the route matches any method.
    ///
    /// # Panics
    ///
    /// Panics if the template is malformed — bad templates should not
    /// survive setup.
    pub fn set_route(
        &mut self,
        path: &str,
        action: Action,
        methods: &[Method],
        name: Option<&str>,
    ) -> &mut Route {
        let full = format!("{}{}", self.prefix, path);
        let mut route = Route::new(full.as_str(), action)
            .unwrap_or_else(|e| panic!("invalid route `{full}`: {e}"))
            .with_methods(methods.iter().copied());
        if let Some(name) = name {
            route = route.with_name(name);
        }
        let index = self.store(route);
        &mut self.routes[index]
    }

    /// [`set_route`](Router::set_route) for `GET`, unnamed.
    pub fn get(&mut self, path: &str, action: Action) -> &mut Route {
        self.set_route(path, action, &[Method::Get], None)
    }

    /// [`set_route`](Router::set_route) for `POST`, unnamed.
    pub fn post(&mut self, path: &str, action: Action) -> &mut Route {
        self.set_route(path, action, &[Method::Post], None)
    }

    /// [`set_route`](Router::set_route) for `PUT`, unnamed.
    pub fn put(&mut self, path: &str, action: Action) -> &mut Route {
        self.set_route(path, action, &[Method::Put], None)
    }

    /// [`set_route`](Router::set_route) for `PATCH`, unnamed.
    pub fn patch(&mut self, path: &str, action: Action) -> &mut Route {
        self.set_route(path, action, &[Method::Patch], None)
    }

    /// [`set_route`](Router::set_route) for `DELETE`, unnamed.
    pub fn delete(&mut self, path: &str, action: Action) -> &mut Route {
        self.set_route(path, action, &[Method::Delete], None)
    }

    /// Adds routes under a shared group prefix.
    ///
    /// The group prefix is normalized like [`set_prefix`](Router::set_prefix)
    /// and applied before the router's own prefix, so the final path is
    /// `router_prefix + group_prefix + route_path`. A non-empty `middleware`
    /// list replaces each grouped route's own list — the group shares one
    /// stack. Name grouped routes with [`Route::with_name`] before adding.
    ///
    /// # Panics
    ///
    /// Panics if prefixing produces an invalid template.
    pub fn add_route_group(
        &mut self,
        prefix: &str,
        routes: Vec<Route>,
        middleware: Vec<MiddlewareUnit>,
    ) -> &mut Self {
        let prefix = normalize_prefix(prefix);
        for mut route in routes {
            if !prefix.is_empty() {
                let path = format!("{prefix}{}", route.path());
                route = route
                    .with_path(path.as_str())
                    .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
            }
            if !middleware.is_empty() {
                route = route.with_middleware(middleware.clone());
            }
            self.add_route(route);
        }
        self
    }

    // ── Dispatch ──────────────────────────────────────────────────────────────

    /// Dispatches one request.
    ///
    /// Scans routes in declaration order and takes the first match, running
    /// its middleware chain around the terminal action; falls back to the
    /// fallback action when nothing matches. `Ok(None)` — no match, no
    /// fallback — is a valid "nothing to serve" outcome, not an error.
    /// `Err` surfaces configuration mistakes: a handler parameter that
    /// resolves to no value.
    pub async fn run(&self, request: Request) -> Result<Option<Response>, Error> {
        let mut matched = None;
        for route in &self.routes {
            if let Some(params) = route.matches(&request) {
                matched = Some((route, params));
                break;
            }
        }

        match matched {
            Some((route, params)) => {
                debug!(path = request.path(), route = route.path(), "route matched");
                if route.middleware().is_empty() {
                    let args = route.action().bind(&params, &request, Some(route))?;
                    Ok(Some(route.action().call(args).await))
                } else {
                    let chain = Next::new(route.clone(), params);
                    Ok(Some(chain.run(request).await?))
                }
            }
            None => match &self.fallback {
                Some(fallback) => {
                    debug!(path = request.path(), "no route matched, running fallback");
                    let args = fallback.bind(&PathParams::new(), &request, None)?;
                    Ok(Some(fallback.call(args).await))
                }
                None => {
                    debug!(path = request.path(), "no route matched");
                    Ok(None)
                }
            },
        }
    }

    // ── Internals ─────────────────────────────────────────────────────────────

    fn prefixed(&self, route: Route) -> Route {
        if self.prefix.is_empty() {
            return route;
        }
        let path = format!("{}{}", self.prefix, route.path());
        route
            .with_path(path.as_str())
            .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"))
    }

    fn store(&mut self, route: Route) -> usize {
        match route.name().and_then(|name| self.names.get(name).copied()) {
            Some(index) => {
                self.routes[index] = route;
                index
            }
            None => {
                let index = self.routes.len();
                if let Some(name) = route.name() {
                    self.names.insert(name.to_owned(), index);
                }
                self.routes.push(route);
                index
            }
        }
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

/// `"api/"` → `"/api"`; `""` and `"/"` → `""` (no prefix).
fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}
