//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router forwarding every path to the route table
//! - Wire up middleware (tracing, timeout, request ID)
//! - Swap the route table when a new configuration arrives
//! - Graceful shutdown when the shutdown signal is raised

use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use axum::{
    body::Body,
    extract::{Request, State},
    middleware,
    response::Response,
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::RouterConfig;
use crate::http::request::{request_id_middleware, request_info, RequestId};
use crate::http::response;
use crate::lifecycle::ShutdownSignal;
use crate::observability::metrics;
use crate::routing::{RouteTable, RoutingResult};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub table: Arc<ArcSwap<RouteTable>>,
}

/// HTTP server for the route table.
pub struct HttpServer {
    router: Router,
    config: RouterConfig,
    table: Arc<ArcSwap<RouteTable>>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: RouterConfig) -> RoutingResult<Self> {
        let table = Arc::new(ArcSwap::from_pointee(RouteTable::from_config(&config.routes)?));
        let state = AppState {
            table: table.clone(),
        };

        let router = Self::build_router(&config, state);
        Ok(Self {
            router,
            config,
            table,
        })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &RouterConfig, state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(route_handler))
            .route("/", any(route_handler))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.listener.request_timeout_secs,
            )))
            .layer(middleware::from_fn(request_id_middleware))
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server until `shutdown` fires.
    ///
    /// Every config received on `config_updates` replaces the route table;
    /// one that fails to build is logged and dropped.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<RouterConfig>,
        mut shutdown: ShutdownSignal,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            routes = self.table.load().len(),
            "HTTP server starting"
        );

        let table = self.table.clone();
        tokio::spawn(async move {
            while let Some(config) = config_updates.recv().await {
                match RouteTable::from_config(&config.routes) {
                    Ok(new_table) => {
                        table.store(Arc::new(new_table));
                        metrics::record_reload();
                        tracing::info!(routes = config.routes.len(), "Route table swapped");
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Rejected route table, keeping current");
                    }
                }
            }
        });

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Shared handle to the live route table.
    pub fn table(&self) -> Arc<ArcSwap<RouteTable>> {
        self.table.clone()
    }
}

/// Route every request through the current table.
async fn route_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let (parts, _body) = request.into_parts();
    let info = request_info(&parts);
    let request_id = parts
        .extensions
        .get::<RequestId>()
        .map(|id| id.0.as_str())
        .unwrap_or("unknown");

    let table = state.table.load();
    let result = table.route(&info);

    match &result {
        Ok(outcome) if outcome.is_matched() => {
            tracing::debug!(request_id = %request_id, method = %info.method, path = %info.path, "Route matched");
        }
        Ok(_) => {
            tracing::debug!(request_id = %request_id, method = %info.method, path = %info.path, "No route matched");
        }
        Err(e) => {
            tracing::warn!(request_id = %request_id, path = %info.path, error = %e, "Routing error");
        }
    }

    response::into_response(result)
}
