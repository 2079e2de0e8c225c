//! Configuration-driven route tree.
//!
//! # Responsibilities
//! - Build an immutable tree of matcher lists from `RouteConfig`
//! - Interpret it per request through [`Routing`]
//! - Render the committed route's response
//!
//! # Design Decisions
//! - Built once (and again on reload), then shared via `Arc`
//! - Branch nodes are prefixes (`on`), leaves are final handlers (`is`)
//! - A branch's captures are passed down so leaves can render them
//! - Every pattern is compiled at build time so bad sources fail the load

use serde::Serialize;

use crate::config::RouteConfig;
use crate::routing::cache::PatternCache;
use crate::routing::captures::{Capture, Captures};
use crate::routing::matcher::Matcher;
use crate::routing::router::{dispatch, Outcome, Routing, Unwind};
use crate::routing::types::{RequestInfo, RoutingResult};

/// The response of a committed route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteResponse {
    pub route: String,
    pub status: u16,
    pub body: String,
    pub captures: Captures,
}

#[derive(Debug)]
struct RouteNode {
    name: String,
    matchers: Vec<Matcher>,
    status: u16,
    body: String,
    children: Vec<RouteNode>,
}

/// A compiled route tree plus the pattern cache it owns.
#[derive(Debug)]
pub struct RouteTable {
    routes: Vec<RouteNode>,
    cache: PatternCache,
}

impl RouteTable {
    /// Build a table from route configs.
    pub fn from_config(routes: &[RouteConfig]) -> RoutingResult<Self> {
        let cache = PatternCache::new();
        let routes = routes
            .iter()
            .map(|route| build_node(route, &cache))
            .collect::<RoutingResult<Vec<_>>>()?;

        tracing::info!(
            routes = routes.len(),
            patterns = cache.len(),
            "Route table built"
        );

        Ok(Self { routes, cache })
    }

    /// An empty table; every request is exhausted.
    pub fn empty() -> Self {
        Self {
            routes: Vec::new(),
            cache: PatternCache::new(),
        }
    }

    /// Number of top-level routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Names of all routes, depth first, as `parent/child`.
    pub fn route_names(&self) -> Vec<String> {
        let mut names = Vec::new();
        collect_names(&self.routes, "", &mut names);
        names
    }

    pub fn cache(&self) -> &PatternCache {
        &self.cache
    }

    /// Route one request.
    pub fn route(&self, request: &RequestInfo) -> RoutingResult<Outcome<RouteResponse>> {
        dispatch(request, &self.cache, |r| walk(&self.routes, r, &Captures::new()))
    }
}

/// Matchers for one route config: the method check (if any) followed by
/// the parsed path tokens.
pub fn route_matchers(route: &RouteConfig) -> RoutingResult<Vec<Matcher>> {
    let mut matchers = Vec::with_capacity(route.path.len() + 1);

    if let Some(method) = &route.method {
        let methods: Vec<Matcher> = method.split('|').map(|m| Matcher::lit(m.trim())).collect();
        let value = if methods.len() == 1 {
            methods.into_iter().next().unwrap_or(Matcher::Bool(false))
        } else {
            Matcher::Alternation(methods)
        };
        matchers.push(Matcher::all_of([("method", value)]));
    }

    for token in &route.path {
        matchers.push(Matcher::parse(token)?);
    }

    Ok(matchers)
}

fn build_node(route: &RouteConfig, cache: &PatternCache) -> RoutingResult<RouteNode> {
    let matchers = route_matchers(route)?;
    for matcher in &matchers {
        precompile(matcher, cache)?;
    }

    let children = route
        .children
        .iter()
        .map(|child| build_node(child, cache))
        .collect::<RoutingResult<Vec<_>>>()?;

    Ok(RouteNode {
        name: route.name.clone(),
        matchers,
        status: route.status,
        body: route.body.clone(),
        children,
    })
}

fn precompile(matcher: &Matcher, cache: &PatternCache) -> RoutingResult<()> {
    match matcher {
        Matcher::Pattern(p) => cache.compile(&p.source).map(|_| ()),
        Matcher::Alternation(list) => list.iter().try_for_each(|m| precompile(m, cache)),
        Matcher::Conjunction(entries) => entries.iter().try_for_each(|(_, m)| precompile(m, cache)),
        _ => Ok(()),
    }
}

fn walk(
    nodes: &[RouteNode],
    r: &mut Routing<'_>,
    inherited: &Captures,
) -> Result<(), Unwind<RouteResponse>> {
    for node in nodes {
        if node.children.is_empty() {
            r.is(&node.matchers, |_, captures| {
                let mut all = inherited.clone();
                all.extend(captures);
                Ok(node.respond(all))
            })?;
        } else {
            r.on(&node.matchers, |r, captures| {
                let mut all = inherited.clone();
                all.extend(captures);
                walk(&node.children, r, &all)
            })?;
        }
    }
    Ok(())
}

impl RouteNode {
    fn respond(&self, captures: Captures) -> RouteResponse {
        RouteResponse {
            route: self.name.clone(),
            status: self.status,
            body: render(&self.body, captures.as_slice()),
            captures,
        }
    }
}

fn collect_names(nodes: &[RouteNode], prefix: &str, out: &mut Vec<String>) {
    for node in nodes {
        let name = if prefix.is_empty() {
            node.name.clone()
        } else {
            format!("{}/{}", prefix, node.name)
        };
        collect_names(&node.children, &name, out);
        out.push(name);
    }
}

/// Replace `{N}` with the N-th capture. Unknown indices are left as written.
pub fn render(template: &str, captures: &[Capture]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let replaced = after.find('}').and_then(|close| {
            let index: usize = after[..close].parse().ok()?;
            let capture = captures.get(index)?;
            Some((capture, close))
        });

        match replaced {
            Some((capture, close)) => {
                out.push_str(&capture.to_string());
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}
