//! Segment-anchored pattern compilation.
//!
//! A user pattern `P` compiles to `\A/(?:P)(/|\z)`: it must start right after
//! a segment separator and end on a segment boundary. The boundary group is
//! the last group; its start is where the unconsumed tail begins, so the
//! tail keeps its leading `/`.

use regex::Regex;

use crate::routing::types::{RoutingError, RoutingResult};

/// A compiled pattern that only matches whole path segments.
#[derive(Debug, Clone)]
pub struct AnchoredPattern {
    source: String,
    regex: Regex,
    groups: usize,
}

/// A successful prefix match.
#[derive(Debug, PartialEq, Eq)]
pub struct PatternMatch<'p> {
    pub groups: Vec<&'p str>,
    pub tail: &'p str,
}

impl AnchoredPattern {
    /// Compile a pattern source.
    ///
    /// Leading `^` / `\A` and trailing `$` / `\z` in the source are dropped;
    /// anchoring is always to the segment boundary.
    pub fn new(source: &str) -> RoutingResult<Self> {
        let compile_error = |e: regex::Error| RoutingError::PatternCompilation {
            source_text: source.to_string(),
            message: e.to_string(),
        };

        // The body must parse on its own, otherwise stray parentheses could
        // close the wrapper group and add an unanchored alternative.
        let body = strip_anchors(source);
        let groups = Regex::new(body).map_err(compile_error)?.captures_len() - 1;

        let regex = Regex::new(&format!(r"\A/(?:{body})(/|\z)")).map_err(compile_error)?;
        if regex.captures_len() != groups + 2 {
            return Err(RoutingError::PatternCompilation {
                source_text: source.to_string(),
                message: "pattern does not stay inside its segment group".to_string(),
            });
        }

        Ok(Self {
            source: source.to_string(),
            regex,
            groups,
        })
    }

    /// The pattern source this was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Number of capture groups the caller sees.
    pub fn group_count(&self) -> usize {
        self.groups
    }

    /// Match at the start of `remaining`.
    pub fn match_prefix<'p>(&self, remaining: &'p str) -> Option<PatternMatch<'p>> {
        let caps = self.regex.captures(remaining)?;
        let boundary = caps.get(self.groups + 1)?;

        let groups = (1..=self.groups)
            .map(|i| caps.get(i).map_or("", |m| m.as_str()))
            .collect();

        Some(PatternMatch {
            groups,
            tail: &remaining[boundary.start()..],
        })
    }
}

fn strip_anchors(source: &str) -> &str {
    let mut body = source;
    if let Some(rest) = body.strip_prefix('^').or_else(|| body.strip_prefix(r"\A")) {
        body = rest;
    }
    if let Some(rest) = body.strip_suffix(r"\z") {
        if !is_escaped(rest) {
            body = rest;
        }
    } else if let Some(rest) = body.strip_suffix('$') {
        if !is_escaped(rest) {
            body = rest;
        }
    }
    body
}

/// True if the character following `prefix` would be escaped.
fn is_escaped(prefix: &str) -> bool {
    prefix.bytes().rev().take_while(|b| *b == b'\\').count() % 2 == 1
}
