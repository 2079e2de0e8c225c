//! Match coordination and terminal commit.
//!
//! # Responsibilities
//! - Evaluate matcher lists with one snapshot per list
//! - Hand captures to the continuation of the list that produced them
//! - Carry a committed response out of any nesting depth
//!
//! # Design Decisions
//! - A routing tree is nested calls: a continuation may call `on`/`is` again
//! - A failed list restores both the cursor and the ancestor's captures
//! - Commit and fault travel through the same `Err` arm (`Unwind`) so `?`
//!   skips the rest of every enclosing frame; they stay distinct variants
//! - No match is `Ok(false)`, never an error

use std::iter;
use std::time::Instant;

use axum::http::Method;

use crate::observability::metrics;
use crate::routing::cache::PatternCache;
use crate::routing::captures::Captures;
use crate::routing::cursor::PathCursor;
use crate::routing::dispatcher::{evaluate, MatchEnv};
use crate::routing::matcher::Matcher;
use crate::routing::types::{RequestInfo, RoutingError, RoutingResult};

static TERMINAL: Matcher = Matcher::Terminal;

/// A non-local exit from routing.
#[derive(Debug)]
pub enum Unwind<R> {
    /// A final handler produced `R`; stop routing and return it.
    Commit(R),
    /// Routing configuration error; abort the request.
    Fault(RoutingError),
}

impl<R> From<RoutingError> for Unwind<R> {
    fn from(err: RoutingError) -> Self {
        Unwind::Fault(err)
    }
}

/// Result of a routing call: `Ok(matched)` or an unwind in progress.
pub type Flow<R> = Result<bool, Unwind<R>>;

/// Final state of one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<R> {
    Matched(R),
    Exhausted,
}

impl<R> Outcome<R> {
    pub fn matched(self) -> Option<R> {
        match self {
            Outcome::Matched(r) => Some(r),
            Outcome::Exhausted => None,
        }
    }

    pub fn is_matched(&self) -> bool {
        matches!(self, Outcome::Matched(_))
    }
}

/// Per-request routing state: the cursor and the capture list.
pub struct Routing<'a> {
    request: &'a RequestInfo,
    cache: &'a PatternCache,
    cursor: PathCursor<'a>,
    captures: Captures,
}

impl<'a> Routing<'a> {
    pub fn new(request: &'a RequestInfo, cache: &'a PatternCache) -> Self {
        Self {
            request,
            cache,
            cursor: PathCursor::new(&request.path),
            captures: Captures::new(),
        }
    }

    pub fn request(&self) -> &'a RequestInfo {
        self.request
    }

    pub fn remaining(&self) -> &'a str {
        self.cursor.remaining()
    }

    pub fn matched_path(&self) -> &'a str {
        self.cursor.matched_path()
    }

    /// Captures of the attempt currently being evaluated.
    pub fn captures(&self) -> &Captures {
        &self.captures
    }

    /// Evaluate `matchers` in order and run `on_success` if all match.
    ///
    /// On failure the cursor and the capture list are restored and
    /// `Ok(false)` is returned so the caller can try a sibling.
    pub fn try_match<R, F>(&mut self, matchers: &[Matcher], on_success: F) -> Flow<R>
    where
        F: FnOnce(&mut Self, Captures) -> Result<(), Unwind<R>>,
    {
        match self.attempt(matchers.iter())? {
            Some(captures) => {
                on_success(self, captures)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Branch on a path prefix.
    pub fn on<R, F>(&mut self, matchers: &[Matcher], body: F) -> Flow<R>
    where
        F: FnOnce(&mut Self, Captures) -> Result<(), Unwind<R>>,
    {
        self.try_match(matchers, body)
    }

    /// Final handler: matches only if `matchers` consume the whole path,
    /// then commits the handler's value.
    pub fn is<R, F>(&mut self, matchers: &[Matcher], handler: F) -> Flow<R>
    where
        F: FnOnce(&mut Self, Captures) -> RoutingResult<R>,
    {
        match self.attempt(matchers.iter().chain(iter::once(&TERMINAL)))? {
            Some(captures) => self.commit(captures, handler),
            None => Ok(false),
        }
    }

    /// Method-gated handler. With no matchers it commits as soon as the
    /// method matches; otherwise it behaves like [`Routing::is`].
    pub fn verb<R, F>(&mut self, method: Method, matchers: &[Matcher], handler: F) -> Flow<R>
    where
        F: FnOnce(&mut Self, Captures) -> RoutingResult<R>,
    {
        if self.request.method != method {
            return Ok(false);
        }
        if matchers.is_empty() {
            return self.commit(Captures::new(), handler);
        }
        self.is(matchers, handler)
    }

    pub fn get<R, F>(&mut self, matchers: &[Matcher], handler: F) -> Flow<R>
    where
        F: FnOnce(&mut Self, Captures) -> RoutingResult<R>,
    {
        self.verb(Method::GET, matchers, handler)
    }

    pub fn post<R, F>(&mut self, matchers: &[Matcher], handler: F) -> Flow<R>
    where
        F: FnOnce(&mut Self, Captures) -> RoutingResult<R>,
    {
        self.verb(Method::POST, matchers, handler)
    }

    pub fn put<R, F>(&mut self, matchers: &[Matcher], handler: F) -> Flow<R>
    where
        F: FnOnce(&mut Self, Captures) -> RoutingResult<R>,
    {
        self.verb(Method::PUT, matchers, handler)
    }

    pub fn patch<R, F>(&mut self, matchers: &[Matcher], handler: F) -> Flow<R>
    where
        F: FnOnce(&mut Self, Captures) -> RoutingResult<R>,
    {
        self.verb(Method::PATCH, matchers, handler)
    }

    pub fn delete<R, F>(&mut self, matchers: &[Matcher], handler: F) -> Flow<R>
    where
        F: FnOnce(&mut Self, Captures) -> RoutingResult<R>,
    {
        self.verb(Method::DELETE, matchers, handler)
    }

    /// GET request whose remaining path is exactly `/`.
    pub fn root<R, F>(&mut self, handler: F) -> Flow<R>
    where
        F: FnOnce(&mut Self, Captures) -> RoutingResult<R>,
    {
        if self.request.method == Method::GET && self.cursor.remaining() == "/" {
            return self.commit(Captures::new(), handler);
        }
        Ok(false)
    }

    /// Commit `value` immediately.
    pub fn halt<R>(&mut self, value: R) -> Flow<R> {
        tracing::debug!(path = %self.request.path, "Routing halted");
        Err(Unwind::Commit(value))
    }

    fn commit<R, F>(&mut self, captures: Captures, handler: F) -> Flow<R>
    where
        F: FnOnce(&mut Self, Captures) -> RoutingResult<R>,
    {
        let value = handler(self, captures)?;
        tracing::debug!(
            path = %self.request.path,
            matched = %self.cursor.matched_path(),
            "Route committed"
        );
        Err(Unwind::Commit(value))
    }

    /// Run one matcher list. `Some` carries the list's own captures; the
    /// ancestor's captures are back in place either way.
    fn attempt<'m, I>(&mut self, matchers: I) -> RoutingResult<Option<Captures>>
    where
        I: IntoIterator<Item = &'m Matcher>,
    {
        let env = MatchEnv {
            request: self.request,
            cache: self.cache,
        };
        let snapshot = self.cursor.snapshot();
        let previous = std::mem::take(&mut self.captures);

        for matcher in matchers {
            match evaluate(matcher, &mut self.cursor, &mut self.captures, env) {
                Ok(true) => {}
                Ok(false) => {
                    self.cursor.restore(snapshot);
                    self.captures = previous;
                    return Ok(None);
                }
                Err(err) => {
                    self.cursor.restore(snapshot);
                    self.captures = previous;
                    return Err(err);
                }
            }
        }

        Ok(Some(std::mem::replace(&mut self.captures, previous)))
    }
}

/// Route one request from the top.
///
/// `Matched` if some handler committed, `Exhausted` if `route` returned
/// without a commit.
pub fn dispatch<'a, R, F>(
    request: &'a RequestInfo,
    cache: &'a PatternCache,
    route: F,
) -> RoutingResult<Outcome<R>>
where
    F: FnOnce(&mut Routing<'a>) -> Result<(), Unwind<R>>,
{
    let start = Instant::now();
    let mut routing = Routing::new(request, cache);

    let result = match route(&mut routing) {
        Ok(()) => Ok(Outcome::Exhausted),
        Err(Unwind::Commit(value)) => Ok(Outcome::Matched(value)),
        Err(Unwind::Fault(err)) => {
            tracing::error!(method = %request.method, path = %request.path, error = %err, "Routing failed");
            Err(err)
        }
    };

    let label = match &result {
        Ok(Outcome::Matched(_)) => "matched",
        Ok(Outcome::Exhausted) => "exhausted",
        Err(_) => "error",
    };
    metrics::record_dispatch(label, start);

    result
}
