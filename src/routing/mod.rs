//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (method, path, query, headers)
//!     → router.rs (Routing: one cursor + capture list per request)
//!     → on / is / try_match (matcher lists, one snapshot each)
//!     → dispatcher.rs (evaluate each matcher)
//!         → cursor.rs (consume literal / segment / pattern)
//!         → cache.rs (compiled, segment-anchored patterns)
//!     → Outcome::Matched(response) | Outcome::Exhausted
//!
//! Route Compilation (at startup and on reload):
//!     RouteConfig[]
//!     → table.rs (parse tokens, precompile patterns)
//!     → Freeze as immutable RouteTable
//! ```
//!
//! # Design Decisions
//! - The routing tree is nested calls; a branch's continuation holds its children
//! - No backtracking across siblings: first committed handler wins
//! - Matchers never mutate on failure; lists roll back as a unit
//! - The pattern cache is the only state shared between requests

pub mod cache;
pub mod captures;
pub mod cursor;
pub mod dispatcher;
pub mod matcher;
pub mod pattern;
pub mod router;
pub mod table;
pub mod types;

pub use cache::PatternCache;
pub use captures::{Capture, Captures, FromCapture, FromCaptures};
pub use cursor::{PathCursor, Snapshot};
pub use dispatcher::{evaluate, MatchEnv};
pub use matcher::{Matcher, PatternMatcher, SegmentKind};
pub use pattern::AnchoredPattern;
pub use router::{dispatch, Flow, Outcome, Routing, Unwind};
pub use table::{RouteResponse, RouteTable};
pub use types::{RequestInfo, RoutingError, RoutingResult};
