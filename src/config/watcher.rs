//! Configuration file watcher for hot reload.

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;

use crate::config::loader::load_config;
use crate::config::schema::GateConfig;

/// Watches the configuration file and emits every valid revision.
///
/// Invalid revisions are logged and dropped; the receiver only ever sees
/// configurations that passed validation.
pub struct ConfigWatcher {
    path: PathBuf,
    update_tx: mpsc::UnboundedSender<GateConfig>,
}

impl ConfigWatcher {
    /// Returns the watcher and a receiver for configuration updates.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<GateConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();
        (
            Self {
                path: path.to_path_buf(),
                update_tx,
            },
            update_rx,
        )
    }

    /// Start watching. The returned handle must be kept alive.
    ///
    /// The parent directory is watched rather than the file itself so that
    /// atomic saves (write a sibling, rename over the original) are seen.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let tx = self.update_tx;
        let path = std::fs::canonicalize(&self.path).map_err(notify::Error::io)?;
        let dir = path
            .parent()
            .map(Path::to_path_buf)
            .ok_or_else(|| notify::Error::path_not_found().add_path(path.clone()))?;

        let target = path.clone();
        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) if !event.paths.iter().any(|p| p == &target) => {}
                Ok(event) if event.kind.is_modify() || event.kind.is_create() => {
                    match load_config(&target) {
                        Ok(config) => {
                            tracing::info!(path = %target.display(), "Gate configuration reloaded");
                            if tx.send(config).is_err() {
                                tracing::warn!(
                                    path = %target.display(),
                                    "Configuration receiver closed, reload discarded"
                                );
                            }
                        }
                        Err(e) => {
                            tracing::error!(
                                path = %target.display(),
                                error = %e,
                                "Rejected configuration change, keeping current policy"
                            );
                        }
                    }
                }
                Ok(_) => {}
                Err(e) => tracing::error!(error = %e, "Config watch error"),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&dir, RecursiveMode::NonRecursive)?;

        tracing::info!(path = %self.path.display(), "Config watcher started");
        Ok(watcher)
    }
}
