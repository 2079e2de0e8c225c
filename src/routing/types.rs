//! Request context and error definitions shared by the routing engine.

use axum::http::{HeaderMap, Method};
use thiserror::Error;
use url::form_urlencoded;

/// Errors that abort routing of the current request.
///
/// A path that simply does not match is never an error; matchers and
/// [`Routing::try_match`](crate::routing::Routing::try_match) report that as
/// `false`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoutingError {
    /// A matcher could not be classified in the position it was used.
    #[error("unsupported matcher: {0}")]
    UnsupportedMatcher(String),

    /// A pattern source failed to compile.
    #[error("invalid pattern `{source_text}`: {message}")]
    PatternCompilation { source_text: String, message: String },

    /// A handler asked for a different number of captures than were matched.
    #[error("handler expects {expected} captures, matched {actual}")]
    CaptureArity { expected: usize, actual: usize },

    /// A capture could not be converted to the type a handler asked for.
    #[error("capture {index} is not a valid {expected}")]
    CaptureType { index: usize, expected: &'static str },
}

/// Result type for routing operations.
pub type RoutingResult<T> = Result<T, RoutingError>;

/// The parts of an incoming request the routing engine reads.
///
/// Only the path is consumed; method, query and headers are opaque inputs
/// to method checks, predicates and the conjunction keys.
#[derive(Debug, Clone)]
pub struct RequestInfo {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: HeaderMap,
}

impl RequestInfo {
    /// Create a request with no query string and no headers.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            headers: HeaderMap::new(),
        }
    }

    /// Replace the query parameters by parsing a raw `a=b&c=d` string.
    pub fn with_query(mut self, raw: &str) -> Self {
        self.query = parse_query(raw);
        self
    }

    /// Add a header. Invalid names or values are ignored.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (
            axum::http::HeaderName::from_bytes(name.as_bytes()),
            axum::http::HeaderValue::from_str(value),
        ) {
            self.headers.append(name, value);
        }
        self
    }

    /// First value of a query parameter.
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// A header value, if present and valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// The Host header without a port. Bracketed IPv6 hosts keep their brackets.
    pub fn host(&self) -> Option<&str> {
        self.header("host").map(strip_port)
    }
}

fn strip_port(host: &str) -> &str {
    if let Some(inner) = host.strip_prefix('[') {
        return match inner.find(']') {
            Some(end) => &host[..end + 2],
            None => host,
        };
    }
    match host.split_once(':') {
        Some((name, port)) if !port.contains(':') => name,
        _ => host,
    }
}

/// Split a raw query string into decoded key/value pairs.
pub fn parse_query(raw: &str) -> Vec<(String, String)> {
    form_urlencoded::parse(raw.as_bytes()).into_owned().collect()
}
