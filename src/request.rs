//! Incoming HTTP request type.

use std::collections::HashMap;

use crate::action::Value;
use crate::method::Method;

/// An incoming HTTP request as the router sees it.
///
/// ruta sits above the transport layer: whatever parsed the wire builds a
/// `Request` and hands it to [`Router::run`](crate::Router::run). Besides
/// method, path, headers and body it carries a named [`Value`] bag —
/// middleware deposits request-scoped data there for the handlers further
/// down the chain, and argument binding consults it by name.
#[derive(Clone, Debug)]
pub struct Request {
    method: Method,
    path: String,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
    values: HashMap<String, Value>,
}

impl Request {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: Vec::new(),
            body: Vec::new(),
            values: HashMap::new(),
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_owned(), value.to_owned()));
        self
    }

    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    /// Replaces the request path. Middleware uses this to rewrite the
    /// request it passes downstream.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Deposits a named value in the request bag.
    pub fn with_value(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.values.insert(name.to_owned(), value.into());
        self
    }

    pub fn method(&self) -> Method { self.method }
    pub fn path(&self) -> &str { &self.path }
    pub fn headers(&self) -> &[(String, String)] { &self.headers }
    pub fn body(&self) -> &[u8] { &self.body }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns a value deposited with [`with_value`](Self::with_value).
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }
}
