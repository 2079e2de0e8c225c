//! Matcher evaluation.
//!
//! # Responsibilities
//! - Evaluate one [`Matcher`] against the cursor
//! - Push captures produced by a successful match
//! - Interpret conjunction keys (`method`, `param`, `header`, `host`, `extension`)
//!
//! # Design Decisions
//! - A successful match advances the cursor by exactly what it matched
//! - A failed match leaves cursor and captures as they were, so callers
//!   only need one snapshot per matcher list
//! - Misplaced or unknown matchers are `UnsupportedMatcher` errors, never a silent `false`

use crate::routing::cache::PatternCache;
use crate::routing::captures::{Capture, Captures};
use crate::routing::cursor::PathCursor;
use crate::routing::matcher::{Matcher, PatternMatcher, SegmentKind};
use crate::routing::types::{RequestInfo, RoutingError, RoutingResult};

/// Read-only inputs to evaluation.
#[derive(Clone, Copy)]
pub struct MatchEnv<'a> {
    pub request: &'a RequestInfo,
    pub cache: &'a PatternCache,
}

/// Evaluate `matcher` at the cursor's current position.
pub fn evaluate<'p>(
    matcher: &Matcher,
    cursor: &mut PathCursor<'p>,
    captures: &mut Captures,
    env: MatchEnv<'_>,
) -> RoutingResult<bool> {
    match matcher {
        Matcher::Literal(text) => Ok(cursor.consume_literal(text)),

        Matcher::Wildcard | Matcher::Typed(SegmentKind::Str) => Ok(push_some(
            captures,
            cursor.consume_segment().map(Capture::from),
        )),

        Matcher::Typed(SegmentKind::Integer) => {
            let value = cursor.consume_segment_if(|segment| {
                if segment.bytes().all(|b| b.is_ascii_digit()) {
                    segment.parse::<i64>().ok()
                } else {
                    None
                }
            });
            Ok(push_some(captures, value.map(Capture::Int)))
        }

        Matcher::Pattern(pattern) => evaluate_pattern(pattern, cursor, captures, env),

        Matcher::Alternation(options) => {
            for option in options {
                if evaluate(option, cursor, captures, env)? {
                    if let Matcher::Literal(text) = option {
                        captures.push(text.as_str());
                    }
                    return Ok(true);
                }
            }
            Ok(false)
        }

        Matcher::Conjunction(entries) => {
            // Earlier entries may have consumed; undo them if a later one fails.
            let snapshot = cursor.snapshot();
            let pushed = captures.len();
            for (key, value) in entries {
                if !evaluate_entry(key, value, cursor, captures, env)? {
                    cursor.restore(snapshot);
                    captures.truncate(pushed);
                    return Ok(false);
                }
            }
            Ok(true)
        }

        Matcher::Bool(value) => Ok(*value),

        Matcher::Predicate(test) => Ok(test(env.request)),

        Matcher::Terminal => Ok(cursor.is_empty()),
    }
}

fn push_some(captures: &mut Captures, value: Option<Capture>) -> bool {
    match value {
        Some(capture) => {
            captures.push(capture);
            true
        }
        None => false,
    }
}

fn evaluate_pattern<'p>(
    pattern: &PatternMatcher,
    cursor: &mut PathCursor<'p>,
    captures: &mut Captures,
    env: MatchEnv<'_>,
) -> RoutingResult<bool> {
    let compiled = env.cache.compile(&pattern.source)?;

    let decoded = cursor.consume_pattern_if(&compiled, |groups| match &pattern.decode {
        Some(decode) => groups.into_iter().map(|g| decode(g)).collect::<Option<Vec<_>>>(),
        None => Some(groups.into_iter().map(Capture::from).collect()),
    });

    match decoded {
        Some(values) => {
            captures.extend(values);
            Ok(true)
        }
        None => Ok(false),
    }
}

fn evaluate_entry<'p>(
    key: &str,
    value: &Matcher,
    cursor: &mut PathCursor<'p>,
    captures: &mut Captures,
    env: MatchEnv<'_>,
) -> RoutingResult<bool> {
    match key {
        "path" | "all" => evaluate(value, cursor, captures, env),

        "method" => method_matches(value, env.request),

        "param" => {
            let name = literal_value(key, value)?;
            Ok(push_some(
                captures,
                env.request.query_param(name).map(Capture::from),
            ))
        }

        "header" => {
            let name = literal_value(key, value)?;
            Ok(push_some(captures, env.request.header(name).map(Capture::from)))
        }

        "host" => {
            let host = env.request.host();
            match value {
                Matcher::Literal(expected) => {
                    Ok(host.is_some_and(|h| h.eq_ignore_ascii_case(expected)))
                }
                Matcher::Alternation(options) => {
                    for option in options {
                        let expected = literal_value(key, option)?;
                        if host.is_some_and(|h| h.eq_ignore_ascii_case(expected)) {
                            captures.push(expected);
                            return Ok(true);
                        }
                    }
                    Ok(false)
                }
                other => Err(unsupported_value(key, other)),
            }
        }

        "extension" => {
            let ext = literal_value(key, value)?;
            let stem = cursor.consume_segment_if(|segment| {
                segment
                    .strip_suffix(ext)
                    .and_then(|s| s.strip_suffix('.'))
                    .filter(|s| !s.is_empty())
            });
            Ok(push_some(captures, stem.map(Capture::from)))
        }

        other => {
            tracing::warn!(key = %other, "Unknown conjunction key");
            Err(RoutingError::UnsupportedMatcher(format!(
                "conjunction key `{}`",
                other
            )))
        }
    }
}

fn method_matches(value: &Matcher, request: &RequestInfo) -> RoutingResult<bool> {
    let actual = request.method.as_str();
    match value {
        Matcher::Literal(expected) => Ok(actual.eq_ignore_ascii_case(expected)),
        Matcher::Alternation(options) => {
            for option in options {
                if actual.eq_ignore_ascii_case(literal_value("method", option)?) {
                    return Ok(true);
                }
            }
            Ok(false)
        }
        other => Err(unsupported_value("method", other)),
    }
}

fn literal_value<'m>(key: &str, value: &'m Matcher) -> RoutingResult<&'m str> {
    match value {
        Matcher::Literal(text) => Ok(text),
        other => Err(unsupported_value(key, other)),
    }
}

fn unsupported_value(key: &str, value: &Matcher) -> RoutingError {
    tracing::warn!(key = %key, matcher = ?value, "Matcher not valid for conjunction key");
    RoutingError::UnsupportedMatcher(format!("{:?} as `{}` value", value, key))
}
