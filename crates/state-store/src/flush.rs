//! Best-effort periodic snapshot flushing.

use std::path::PathBuf;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::InMemoryStateStore;

/// Snapshot flush configuration.
///
/// Reads from environment variables:
/// - `STATE_SNAPSHOT_PATH` — snapshot file location (default: `"state-snapshot.json"`)
/// - `STATE_SNAPSHOT_INTERVAL_SECS` — flush interval in seconds (default: `60`)
#[derive(Debug, Clone)]
pub struct SnapshotConfig {
    pub path: PathBuf,
    pub interval: Duration,
}

impl SnapshotConfig {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self {
            path: std::env::var("STATE_SNAPSHOT_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("state-snapshot.json")),
            interval: std::env::var("STATE_SNAPSHOT_INTERVAL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(Duration::from_secs(60)),
        }
    }
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("state-snapshot.json"),
            interval: Duration::from_secs(60),
        }
    }
}

/// Spawns a task that periodically flushes the store to the snapshot file.
///
/// The flush is best-effort: a failed write is logged and retried at the next
/// tick, and store operations never wait on it. The task only reads the store;
/// it runs until the handle is aborted or the runtime shuts down.
pub fn spawn_flush_task(store: InMemoryStateStore, config: SnapshotConfig) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(config.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // The first tick fires immediately; skip it so a fresh store does not
        // clobber an existing snapshot before anything was written.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            let snapshot = store.export_snapshot().await;
            match snapshot.write(&config.path).await {
                Ok(()) => {
                    tracing::debug!(
                        path = %config.path.display(),
                        records = snapshot.record_count(),
                        "state snapshot flushed"
                    );
                }
                Err(error) => {
                    tracing::warn!(
                        path = %config.path.display(),
                        %error,
                        "state snapshot flush failed"
                    );
                }
            }
        }
    })
}
