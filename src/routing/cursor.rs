//! Path cursor.
//!
//! # Responsibilities
//! - Track the unconsumed suffix of the request path
//! - Consume whole segments (literal, single segment, anchored pattern)
//! - Snapshot and restore for rollback
//!
//! # Design Decisions
//! - `remaining` is a sub-slice of the request path, so snapshots are a copy of a `&str`
//! - `remaining` always starts with `/` or is empty
//! - Every consume operation decides before it mutates; a failed consume leaves the cursor untouched

use crate::routing::pattern::AnchoredPattern;

/// A saved cursor position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot<'p>(&'p str);

/// The remaining path of one request.
#[derive(Debug, Clone)]
pub struct PathCursor<'p> {
    path: &'p str,
    remaining: &'p str,
}

impl<'p> PathCursor<'p> {
    /// Create a cursor positioned at the start of `path`.
    pub fn new(path: &'p str) -> Self {
        Self {
            path,
            remaining: path,
        }
    }

    /// The unconsumed suffix of the path.
    pub fn remaining(&self) -> &'p str {
        self.remaining
    }

    /// The prefix of the path consumed so far.
    pub fn matched_path(&self) -> &'p str {
        &self.path[..self.path.len() - self.remaining.len()]
    }

    pub fn snapshot(&self) -> Snapshot<'p> {
        Snapshot(self.remaining)
    }

    pub fn restore(&mut self, snapshot: Snapshot<'p>) {
        self.remaining = snapshot.0;
    }

    /// True once the whole path has been consumed.
    pub fn is_empty(&self) -> bool {
        self.remaining.is_empty()
    }

    /// Consume `/text` when it ends on a segment boundary.
    ///
    /// A following `/` stays at the front of `remaining`.
    pub fn consume_literal(&mut self, text: &str) -> bool {
        let Some(rest) = self
            .remaining
            .strip_prefix('/')
            .and_then(|r| r.strip_prefix(text))
        else {
            return false;
        };

        if rest.is_empty() || rest.starts_with('/') {
            self.remaining = rest;
            true
        } else {
            false
        }
    }

    /// Consume one non-empty segment.
    pub fn consume_segment(&mut self) -> Option<&'p str> {
        self.consume_segment_if(Some)
    }

    /// Consume one non-empty segment if `accept` produces a value for it.
    pub fn consume_segment_if<T, F>(&mut self, accept: F) -> Option<T>
    where
        F: FnOnce(&'p str) -> Option<T>,
    {
        let rest = self.remaining.strip_prefix('/')?;
        let end = rest.find('/').unwrap_or(rest.len());
        if end == 0 {
            return None;
        }

        let (segment, tail) = rest.split_at(end);
        let value = accept(segment)?;
        self.remaining = tail;
        Some(value)
    }

    /// Apply an anchored pattern at the front of `remaining`.
    ///
    /// Returns the capture groups in order; groups that did not participate
    /// in the match are returned as empty strings.
    pub fn consume_pattern(&mut self, pattern: &AnchoredPattern) -> Option<Vec<&'p str>> {
        self.consume_pattern_if(pattern, Some)
    }

    /// Apply an anchored pattern and advance only if `accept` produces a
    /// value from its groups.
    pub fn consume_pattern_if<T, F>(&mut self, pattern: &AnchoredPattern, accept: F) -> Option<T>
    where
        F: FnOnce(Vec<&'p str>) -> Option<T>,
    {
        let found = pattern.match_prefix(self.remaining)?;
        let value = accept(found.groups)?;
        self.remaining = found.tail;
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_respects_segment_boundary() {
        let mut cursor = PathCursor::new("/foobar");
        assert!(!cursor.consume_literal("foo"));
        assert_eq!(cursor.remaining(), "/foobar");

        assert!(cursor.consume_literal("foobar"));
        assert_eq!(cursor.remaining(), "");
    }

    #[test]
    fn test_literal_keeps_following_slash() {
        let mut cursor = PathCursor::new("/bar/baz");
        assert!(cursor.consume_literal("bar"));
        assert_eq!(cursor.remaining(), "/baz");
        assert_eq!(cursor.matched_path(), "/bar");
    }

    #[test]
    fn test_multi_segment_literal_and_trailing_slash() {
        let mut cursor = PathCursor::new("/foo/bar/");
        assert!(cursor.consume_literal("foo/bar"));
        assert_eq!(cursor.remaining(), "/");

        let mut cursor = PathCursor::new("/foo/bar/");
        assert!(cursor.consume_literal("foo/bar/"));
        assert!(cursor.is_empty());
    }

    #[test]
    fn test_empty_literal() {
        let mut cursor = PathCursor::new("/");
        assert!(cursor.consume_literal(""));
        assert!(cursor.is_empty());

        let mut cursor = PathCursor::new("/foo");
        assert!(!cursor.consume_literal(""));
        assert_eq!(cursor.remaining(), "/foo");

        let mut cursor = PathCursor::new("");
        assert!(!cursor.consume_literal(""));
    }

    #[test]
    fn test_consume_segment() {
        let mut cursor = PathCursor::new("/users/42");
        assert_eq!(cursor.consume_segment(), Some("users"));
        assert_eq!(cursor.remaining(), "/42");
        assert_eq!(cursor.consume_segment(), Some("42"));
        assert_eq!(cursor.consume_segment(), None);

        for path in ["", "/", "//x"] {
            let mut cursor = PathCursor::new(path);
            assert_eq!(cursor.consume_segment(), None, "path {path:?}");
            assert_eq!(cursor.remaining(), path);
        }
    }

    #[test]
    fn test_rejected_segment_is_not_consumed() {
        let mut cursor = PathCursor::new("/abc/def");
        let parsed: Option<i64> = cursor.consume_segment_if(|s| s.parse().ok());
        assert_eq!(parsed, None);
        assert_eq!(cursor.remaining(), "/abc/def");
    }

    #[test]
    fn test_snapshot_restore() {
        let mut cursor = PathCursor::new("/a/b/c");
        let snapshot = cursor.snapshot();
        assert!(cursor.consume_literal("a"));
        assert!(cursor.consume_literal("b"));
        cursor.restore(snapshot);
        assert_eq!(cursor.remaining(), "/a/b/c");
        assert_eq!(cursor.matched_path(), "");
    }

    #[test]
    fn test_consume_pattern() {
        let pattern = AnchoredPattern::new(r"(\d{4})-(\d{2})").unwrap();

        let mut cursor = PathCursor::new("/2024-05/notes");
        assert_eq!(cursor.consume_pattern(&pattern), Some(vec!["2024", "05"]));
        assert_eq!(cursor.remaining(), "/notes");

        let mut cursor = PathCursor::new("/2024-05x");
        assert_eq!(cursor.consume_pattern(&pattern), None);
        assert_eq!(cursor.remaining(), "/2024-05x");
    }
}
