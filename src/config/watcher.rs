//! Route file watcher for hot reload.

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::load_config;
use crate::config::schema::RouterConfig;

/// Monitors the configuration file and emits every version that loads and validates.
pub struct ConfigWatcher {
    path: PathBuf,
    update_tx: mpsc::UnboundedSender<RouterConfig>,
}

impl ConfigWatcher {
    /// Returns the watcher and a receiver for configuration updates.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<RouterConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        (
            Self {
                path: path.to_path_buf(),
                update_tx,
            },
            update_rx,
        )
    }

    /// Start watching. The returned watcher must be kept alive.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let tx = self.update_tx;
        let path = self.path.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) if event.kind.is_modify() || event.kind.is_create() => {
                    match load_config(&path) {
                        Ok(config) => {
                            tracing::info!(
                                path = ?path,
                                routes = config.routes.len(),
                                "Route file changed, reloading"
                            );
                            let _ = tx.send(config);
                        }
                        Err(e) => {
                            tracing::error!(error = %e, "Route file rejected, keeping current routes");
                        }
                    }
                }
                Ok(_) => {}
                Err(e) => tracing::error!(error = ?e, "Watch error"),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&self.path, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?self.path, "Config watcher started");
        Ok(watcher)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const V1: &str = r#"
        [[routes]]
        name = "v1"
        path = ["v1"]
    "#;

    const V2: &str = r#"
        [[routes]]
        name = "v2"
        path = ["v2"]
    "#;

    #[tokio::test]
    async fn test_file_edit_reaches_receiver() {
        let path = std::env::temp_dir().join(format!(
            "path_router_watch_{}.toml",
            std::process::id()
        ));
        fs::write(&path, V1).unwrap();

        let (watcher, mut updates) = ConfigWatcher::new(&path);
        let _watcher = watcher.run().unwrap();

        // An invalid edit is dropped; only the valid one comes through.
        tokio::time::sleep(Duration::from_millis(100)).await;
        fs::write(&path, "[[routes]]\nname = \"\"\n").unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
        fs::write(&path, V2).unwrap();

        // A write may be observed mid-truncate as an empty (valid) file.
        let received = tokio::time::timeout(Duration::from_secs(10), async {
            let mut seen = Vec::new();
            while let Some(config) = updates.recv().await {
                let names: Vec<String> = config.routes.iter().map(|r| r.name.clone()).collect();
                let done = names.iter().any(|n| n == "v2");
                seen.push(names);
                if done {
                    break;
                }
            }
            seen
        })
        .await
        .expect("no v2 config within 10s");

        assert!(received.iter().flatten().all(|name| name == "v2"));

        fs::remove_file(&path).unwrap_or_default();
    }
}
