//! Routing behavior through the public API.

use std::sync::Arc;
use std::thread;

use axum::http::Method;
use path_router::routing::{
    dispatch, Capture, Captures, Matcher, Outcome, PatternCache, RequestInfo, Routing, Unwind,
};

/// Run one `try_match` and report (matched, captures, remaining).
fn attempt(method: Method, path: &str, matchers: &[Matcher]) -> (bool, Vec<Capture>, String) {
    let cache = PatternCache::new();
    let request = RequestInfo::new(method, path);
    let mut routing = Routing::new(&request, &cache);

    let mut seen = Vec::new();
    let matched = routing
        .try_match::<(), _>(matchers, |_, captures| {
            seen = captures.into_vec();
            Ok(())
        })
        .unwrap();
    (matched, seen, routing.remaining().to_string())
}

#[test]
fn test_literal_then_integer() {
    let (matched, captures, remaining) = attempt(
        Method::GET,
        "/users/123",
        &[Matcher::lit("users"), Matcher::integer()],
    );
    assert!(matched);
    assert_eq!(captures, vec![Capture::Int(123)]);
    assert_eq!(remaining, "");
}

#[test]
fn test_literal_needs_segment_boundary() {
    let (matched, captures, remaining) =
        attempt(Method::GET, "/users123", &[Matcher::lit("users")]);
    assert!(!matched);
    assert!(captures.is_empty());
    assert_eq!(remaining, "/users123");
}

#[test]
fn test_method_gated_root() {
    let matchers = [Matcher::method("GET"), Matcher::lit(""), Matcher::Terminal];

    let (matched, _, remaining) = attempt(Method::GET, "/", &matchers);
    assert!(matched);
    assert_eq!(remaining, "");

    let (matched, _, remaining) = attempt(Method::POST, "/", &matchers);
    assert!(!matched);
    assert_eq!(remaining, "/");
}

#[test]
fn test_alternation_captures_literal() {
    let (matched, captures, remaining) = attempt(
        Method::GET,
        "/bar/baz",
        &[Matcher::any_of([Matcher::lit("foo"), Matcher::lit("bar")])],
    );
    assert!(matched);
    assert_eq!(captures, vec![Capture::from("bar")]);
    assert_eq!(remaining, "/baz");
}

#[test]
fn test_trailing_slash_is_significant() {
    let (matched, _, remaining) = attempt(
        Method::GET,
        "/foo/bar/",
        &[Matcher::lit("foo/bar"), Matcher::Terminal],
    );
    assert!(!matched);
    assert_eq!(remaining, "/foo/bar/");

    let (matched, _, remaining) = attempt(
        Method::GET,
        "/foo/bar/",
        &[Matcher::lit("foo/bar/"), Matcher::Terminal],
    );
    assert!(matched);
    assert_eq!(remaining, "");
}

#[test]
fn test_concurrent_pattern_compilation() {
    let cache = Arc::new(PatternCache::new());

    thread::scope(|scope| {
        for _ in 0..16 {
            let cache = cache.clone();
            scope.spawn(move || {
                let pattern = cache.compile(r"^\d+$").unwrap();
                assert!(pattern.match_prefix("/123").is_some());
                assert!(pattern.match_prefix("/12a").is_none());
                assert!(pattern.match_prefix("/456/rest").is_some());
            });
        }
    });

    assert_eq!(cache.len(), 1);
}

#[test]
fn test_first_committed_sibling_wins() {
    fn route(r: &mut Routing<'_>) -> Result<(), Unwind<String>> {
        r.on(&[Matcher::lit("api")], |r, _| {
            r.on(&[Matcher::lit("v1")], |r, _| {
                r.is(&[Matcher::lit("status")], |_, _| Ok("v1 status".to_string()))?;
                Ok(())
            })?;
            r.is(&[Matcher::segment(), Matcher::lit("status")], |_, captures| {
                let (version,): (String,) = captures.extract()?;
                Ok(format!("{} status", version))
            })?;
            Ok(())
        })?;
        Ok(())
    }

    let cache = PatternCache::new();
    let outcome = |path: &str| {
        let request = RequestInfo::new(Method::GET, path);
        dispatch(&request, &cache, route).unwrap()
    };

    assert_eq!(outcome("/api/v1/status"), Outcome::Matched("v1 status".to_string()));
    // v1 keeps its consumed prefix after falling through, so the sibling sees `/other`.
    assert_eq!(outcome("/api/v1/other"), Outcome::Exhausted);
    assert_eq!(outcome("/api/v2/status"), Outcome::Matched("v2 status".to_string()));
}

#[test]
fn test_conjunction_reads_request_context() {
    let cache = PatternCache::new();
    let request = RequestInfo::new(Method::GET, "/report.csv")
        .with_query("year=2024")
        .with_header("x-tenant", "acme");

    let outcome = dispatch(&request, &cache, |r| {
        r.is(
            &[Matcher::all_of([
                ("extension", Matcher::lit("csv")),
                ("param", Matcher::lit("year")),
                ("header", Matcher::lit("x-tenant")),
            ])],
            |_, captures: Captures| Ok(captures.into_vec()),
        )?;
        Ok(())
    })
    .unwrap();

    assert_eq!(
        outcome,
        Outcome::Matched(vec![
            Capture::from("report"),
            Capture::from("2024"),
            Capture::from("acme"),
        ])
    );
}
