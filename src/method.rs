//! HTTP method as a typed enum.
//!
//! Covers the RFC 9110 standard methods. Parsing is case-insensitive and
//! normalizes to the uppercase wire form, so a route's method filter never
//! has to care how the transport layer spelled the token.

use std::fmt;
use std::str::FromStr;

/// A known HTTP method.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Method {
    Connect,
    Delete,
    Get,
    Head,
    Options,
    Patch,
    Post,
    Put,
    Trace,
}

impl Method {
    /// Returns the uppercase wire representation (e.g. `"GET"`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Connect => "CONNECT",
            Self::Delete  => "DELETE",
            Self::Get     => "GET",
            Self::Head    => "HEAD",
            Self::Options => "OPTIONS",
            Self::Patch   => "PATCH",
            Self::Post    => "POST",
            Self::Put     => "PUT",
            Self::Trace   => "TRACE",
        }
    }
}

/// Parses a method token in any casing: `"get"`, `"Get"` and `"GET"` all
/// yield `Method::Get`.
impl FromStr for Method {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "CONNECT" => Ok(Self::Connect),
            "DELETE"  => Ok(Self::Delete),
            "GET"     => Ok(Self::Get),
            "HEAD"    => Ok(Self::Head),
            "OPTIONS" => Ok(Self::Options),
            "PATCH"   => Ok(Self::Patch),
            "POST"    => Ok(Self::Post),
            "PUT"     => Ok(Self::Put),
            "TRACE"   => Ok(Self::Trace),
            _         => Err(()),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_any_casing() {
        assert_eq!("get".parse::<Method>(), Ok(Method::Get));
        assert_eq!("Post".parse::<Method>(), Ok(Method::Post));
        assert_eq!("DELETE".parse::<Method>(), Ok(Method::Delete));
        assert!("YEET".parse::<Method>().is_err());
    }

    #[test]
    fn displays_wire_form() {
        assert_eq!(Method::Patch.to_string(), "PATCH");
    }
}
