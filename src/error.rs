//! Unified error type.

/// The error type returned by ruta's fallible operations.
///
/// Application-level outcomes (404, 422, etc.) are expressed as HTTP
/// [`Response`](crate::Response) values, not as `Error`s. This type surfaces
/// configuration mistakes: malformed path templates at registration time and
/// unresolvable handler parameters at dispatch time.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A template segment uses `{` or `}` outside a well-formed `{name}`
    /// placeholder.
    #[error("unbalanced braces in segment `{segment}` of `{path}`")]
    UnbalancedBraces { path: String, segment: String },

    /// A placeholder segment has no name (`{}`).
    #[error("empty placeholder in `{path}`")]
    EmptyPlaceholder { path: String },

    /// The same placeholder name appears twice in one template.
    #[error("duplicate placeholder `{{{name}}}` in `{path}`")]
    DuplicatePlaceholder { path: String, name: String },

    /// A declared handler parameter resolved to no path capture, no context
    /// value, and no default.
    #[error("no value for handler parameter `{name}`")]
    UnboundParameter { name: String },
}
