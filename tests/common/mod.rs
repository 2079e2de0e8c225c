//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::time::Duration;

use path_router::config::{parse_config, RouterConfig};
use path_router::{HttpServer, Shutdown};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

/// Route file used by most tests.
#[allow(dead_code)]
pub const ROUTES: &str = r#"
[[routes]]
name = "home"
path = [""]
method = "GET"
body = "welcome"

[[routes]]
name = "users"
path = ["users"]

  [[routes.children]]
  name = "list"
  method = "GET"
  body = "all users"

  [[routes.children]]
  name = "create"
  method = "POST"
  status = 201
  body = "created"

  [[routes.children]]
  name = "show"
  path = [":id:int"]
  body = "user {0}"

[[routes]]
name = "archive"
path = ["archive", 're:(\d{4})-(\d{2})']
body = "{0}/{1}"
"#;

/// A server running on an ephemeral port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub updates: mpsc::UnboundedSender<RouterConfig>,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Trigger shutdown and wait for the server task to finish.
    #[allow(dead_code)]
    pub async fn stop(self) {
        self.shutdown.trigger();
        let _ = tokio::time::timeout(Duration::from_secs(5), self.handle).await;
    }
}

/// Parse `routes` and start a server for it.
pub async fn start_server(routes: &str) -> TestServer {
    let config = parse_config(routes).unwrap();
    start_server_with(config).await
}

pub async fn start_server_with(config: RouterConfig) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let (updates, config_updates) = mpsc::unbounded_channel();
    let server = HttpServer::new(config).unwrap();

    let rx = shutdown.subscribe();
    let handle = tokio::spawn(async move {
        server.run(listener, config_updates, rx).await.unwrap();
    });

    TestServer {
        addr,
        shutdown,
        updates,
        handle,
    }
}

/// Poll `check` until it returns true or the deadline passes.
#[allow(dead_code)]
pub async fn eventually<F, Fut>(mut check: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    for _ in 0..50 {
        if check().await {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    false
}
