//! Path-consuming request router library.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::RouterConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::{dispatch, Matcher, Outcome, RouteTable, Routing, RoutingError};
