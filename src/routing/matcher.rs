//! Matcher variants.
//!
//! # Responsibilities
//! - Define the closed set of matching strategies
//! - Provide constructors for building routing trees in code
//! - Parse the compact token syntax used by route files
//!
//! # Design Decisions
//! - A sum type with one exhaustive dispatch function (see `dispatcher.rs`)
//! - `Predicate` is the only escape hatch for custom logic
//! - Patterns are stored as source text and compiled through the owner's `PatternCache`

use std::fmt;
use std::sync::Arc;

use crate::routing::captures::Capture;
use crate::routing::types::{RequestInfo, RoutingError, RoutingResult};

/// External boolean test on the request.
pub type PredicateFn = Arc<dyn Fn(&RequestInfo) -> bool + Send + Sync>;

/// Converts a raw pattern group into a capture. `None` rejects the match.
pub type DecodeFn = Arc<dyn Fn(&str) -> Option<Capture> + Send + Sync>;

/// The shape a typed wildcard accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    /// Any non-empty segment, captured as a string.
    Str,
    /// One or more ASCII digits, captured as an integer.
    Integer,
}

/// A compiled-pattern matcher: the pattern source plus an optional decoder.
#[derive(Clone)]
pub struct PatternMatcher {
    pub source: Arc<str>,
    pub decode: Option<DecodeFn>,
}

/// One matching strategy.
#[derive(Clone)]
pub enum Matcher {
    /// Exact text ending on a segment boundary.
    Literal(String),
    /// One non-empty segment, captured as a string.
    Wildcard,
    /// One segment of a given shape.
    Typed(SegmentKind),
    /// A cached, segment-anchored regular expression.
    Pattern(PatternMatcher),
    /// First matching element wins.
    Alternation(Vec<Matcher>),
    /// Every keyed entry must match, in order.
    Conjunction(Vec<(String, Matcher)>),
    /// Always or never matches.
    Bool(bool),
    /// Caller-supplied request test.
    Predicate(PredicateFn),
    /// The path is fully consumed.
    Terminal,
}

impl Matcher {
    pub fn lit(text: impl Into<String>) -> Self {
        Matcher::Literal(text.into())
    }

    pub fn segment() -> Self {
        Matcher::Wildcard
    }

    pub fn integer() -> Self {
        Matcher::Typed(SegmentKind::Integer)
    }

    pub fn pattern(source: &str) -> Self {
        Matcher::Pattern(PatternMatcher {
            source: Arc::from(source),
            decode: None,
        })
    }

    /// A pattern whose groups are converted by `decode`.
    pub fn pattern_with<F>(source: &str, decode: F) -> Self
    where
        F: Fn(&str) -> Option<Capture> + Send + Sync + 'static,
    {
        Matcher::Pattern(PatternMatcher {
            source: Arc::from(source),
            decode: Some(Arc::new(decode)),
        })
    }

    pub fn any_of(matchers: impl IntoIterator<Item = Matcher>) -> Self {
        Matcher::Alternation(matchers.into_iter().collect())
    }

    pub fn all_of<K: Into<String>>(entries: impl IntoIterator<Item = (K, Matcher)>) -> Self {
        Matcher::Conjunction(entries.into_iter().map(|(k, m)| (k.into(), m)).collect())
    }

    /// Request method check, e.g. `Matcher::method("GET")`.
    pub fn method(method: &str) -> Self {
        Matcher::all_of([("method", Matcher::lit(method))])
    }

    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&RequestInfo) -> bool + Send + Sync + 'static,
    {
        Matcher::Predicate(Arc::new(f))
    }

    /// Parse a route-file token.
    ///
    /// | token          | matcher                         |
    /// |----------------|---------------------------------|
    /// | `$`            | `Terminal`                      |
    /// | `true`/`false` | `Bool`                          |
    /// | `re:<src>`     | `Pattern(src)`                  |
    /// | `:name`        | `Wildcard`                      |
    /// | `:name:str`    | `Typed(Str)`                    |
    /// | `:name:int`    | `Typed(Integer)`                |
    /// | `a\|b`         | `Alternation` of literals       |
    /// | anything else  | `Literal` (including `""`)      |
    pub fn parse(token: &str) -> RoutingResult<Self> {
        match token {
            "$" => return Ok(Matcher::Terminal),
            "true" => return Ok(Matcher::Bool(true)),
            "false" => return Ok(Matcher::Bool(false)),
            _ => {}
        }

        if let Some(source) = token.strip_prefix("re:") {
            if source.is_empty() {
                return Err(RoutingError::UnsupportedMatcher(format!(
                    "empty pattern in `{}`",
                    token
                )));
            }
            return Ok(Matcher::pattern(source));
        }

        if let Some(spec) = token.strip_prefix(':') {
            let (name, kind) = spec.split_once(':').unwrap_or((spec, ""));
            if name.is_empty() {
                return Err(RoutingError::UnsupportedMatcher(format!(
                    "unnamed wildcard `{}`",
                    token
                )));
            }
            return match kind {
                "" => Ok(Matcher::Wildcard),
                "str" | "string" => Ok(Matcher::Typed(SegmentKind::Str)),
                "int" | "integer" => Ok(Matcher::Typed(SegmentKind::Integer)),
                other => Err(RoutingError::UnsupportedMatcher(format!(
                    "segment kind `{}` in `{}`",
                    other, token
                ))),
            };
        }

        if token.contains('|') {
            return Ok(Matcher::any_of(token.split('|').map(Matcher::lit)));
        }

        Ok(Matcher::lit(token))
    }
}

impl From<&str> for Matcher {
    fn from(text: &str) -> Self {
        Matcher::lit(text)
    }
}

impl From<bool> for Matcher {
    fn from(value: bool) -> Self {
        Matcher::Bool(value)
    }
}

impl fmt::Debug for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Matcher::Literal(text) => f.debug_tuple("Literal").field(text).finish(),
            Matcher::Wildcard => f.write_str("Wildcard"),
            Matcher::Typed(kind) => f.debug_tuple("Typed").field(kind).finish(),
            Matcher::Pattern(p) => f
                .debug_struct("Pattern")
                .field("source", &p.source)
                .field("decode", &p.decode.is_some())
                .finish(),
            Matcher::Alternation(list) => f.debug_tuple("Alternation").field(list).finish(),
            Matcher::Conjunction(entries) => f.debug_tuple("Conjunction").field(entries).finish(),
            Matcher::Bool(value) => f.debug_tuple("Bool").field(value).finish(),
            Matcher::Predicate(_) => f.write_str("Predicate(..)"),
            Matcher::Terminal => f.write_str("Terminal"),
        }
    }
}
