//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the router.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the router.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RouterConfig {
    /// Listener configuration (bind address, request timeout).
    pub listener: ListenerConfig,

    /// Logging and metrics settings.
    pub observability: ObservabilityConfig,

    /// Route tree, evaluated in declaration order.
    pub routes: Vec<RouteConfig>,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// One node of the route tree.
///
/// A node with `children` is a branch: its `path` is a prefix and the
/// children are tried after it matches. A node without children is a
/// final handler: its `path` must consume the rest of the request path.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouteConfig {
    /// Route identifier for logging/metrics.
    pub name: String,

    /// Matcher tokens, e.g. `["users", ":id:int"]`.
    #[serde(default)]
    pub path: Vec<String>,

    /// HTTP method(s) to accept, `|`-separated (e.g. "GET|HEAD").
    #[serde(default)]
    pub method: Option<String>,

    /// Response status for final handlers.
    #[serde(default = "default_status")]
    pub status: u16,

    /// Response body template; `{0}`, `{1}`, ... are replaced with captures.
    #[serde(default)]
    pub body: String,

    /// Nested routes.
    #[serde(default)]
    pub children: Vec<RouteConfig>,
}

fn default_status() -> u16 {
    200
}

impl RouteConfig {
    /// A final handler answering `body` with status 200.
    pub fn leaf(name: &str, path: &[&str], body: &str) -> Self {
        Self {
            name: name.to_string(),
            path: path.iter().map(|t| t.to_string()).collect(),
            method: None,
            status: default_status(),
            body: body.to_string(),
            children: Vec::new(),
        }
    }

    /// A branch node with a path prefix.
    pub fn branch(name: &str, path: &[&str], children: Vec<RouteConfig>) -> Self {
        Self {
            children,
            ..Self::leaf(name, path, "")
        }
    }

    pub fn with_method(mut self, method: &str) -> Self {
        self.method = Some(method.to_string());
        self
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }
}

/// Logging and metrics configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Default log filter when `RUST_LOG` is unset.
    pub log_level: String,

    /// `json` or `pretty`.
    pub log_format: String,

    /// Enable the Prometheus exporter.
    pub metrics_enabled: bool,

    /// Prometheus exporter address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "path_router=info,tower_http=info".to_string(),
            log_format: "pretty".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
