//! Dataset file watcher with debouncing.
//!
//! Editors often write a file in several steps (truncate, write, rename),
//! so change events are collected until the file has been quiet for the
//! debounce window and only then is the dataset reloaded. A reload that
//! fails keeps the previous graph.

use crate::SharedState;
use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::Path;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Watcher settings.
#[derive(Debug, Clone)]
pub struct WatcherConfig {
    /// Quiet period before a reload, in milliseconds.
    pub debounce_ms: u64,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self { debounce_ms: 300 }
    }
}

/// Watches the dataset file and reloads the store when it changes.
///
/// Runs until the underlying notify channel closes.
pub async fn watch_dataset(state: SharedState, config: WatcherConfig) -> notify::Result<()> {
    let (notify_tx, mut notify_rx) = mpsc::channel::<notify::Result<Event>>(256);

    // Create watcher in sync context
    let mut watcher = RecommendedWatcher::new(
        move |res| {
            let _ = notify_tx.blocking_send(res);
        },
        Config::default(),
    )?;

    // Watch the directory so rename-over-file saves are still seen
    let dir = match state.dataset.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => Path::new(".").to_path_buf(),
    };
    watcher.watch(&dir, RecursiveMode::NonRecursive)?;
    info!("Watching dataset {}", state.dataset.display());

    let debounce = Duration::from_millis(config.debounce_ms);
    let mut pending: Option<Instant> = None;

    loop {
        if let Some(since) = pending {
            if since.elapsed() >= debounce {
                pending = None;
                debug!("Dataset changed, reloading");
                // reload() logs and broadcasts failures itself
                let _ = state.reload().await;
            }
        }

        match tokio::time::timeout(Duration::from_millis(50), notify_rx.recv()).await {
            Ok(Some(Ok(event))) => {
                if event
                    .paths
                    .iter()
                    .any(|path| is_dataset_path(path, &state.dataset))
                {
                    pending = Some(Instant::now());
                }
            }
            Ok(Some(Err(e))) => {
                warn!("Watch error: {}", e);
            }
            Ok(None) => break,
            Err(_) => {}
        }
    }

    Ok(())
}

/// Matches on file name; event paths may be absolute while the
/// configured dataset path is relative.
fn is_dataset_path(path: &Path, dataset: &Path) -> bool {
    match (path.file_name(), dataset.file_name()) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_dataset_path() {
        let dataset = Path::new("data/pathways.json");
        assert!(is_dataset_path(Path::new("/srv/map/data/pathways.json"), dataset));
        assert!(!is_dataset_path(Path::new("/srv/map/data/rooms.json"), dataset));
        assert!(!is_dataset_path(Path::new("/"), dataset));
    }
}
