//! Campus Server - WebSocket server for map renderers
//!
//! This crate exposes the campus graph over JSON-RPC 2.0 so a front end
//! can populate its location pickers, draw the walkable network and ask
//! for routes without embedding the engine.
//!
//! The server supports:
//! - Multiple concurrent connections
//! - Reloading the dataset on request or when the file changes
//! - Pushing reload notifications to every connected client

use campus_core::{CanvasTransform, LoadError};
use campus_graph::{FileSource, GraphStore, LoadReport};
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tracing::{info, warn};

mod handlers;
mod protocol;
mod server;
mod watcher;

pub use protocol::{Request, Response, RpcError};
pub use server::{CampusServer, ServerConfig};
pub use watcher::{watch_dataset, WatcherConfig};

/// Server-to-client notifications.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(tag = "type", content = "payload")]
pub enum ServerEvent {
    /// A new dataset was published.
    GraphReloaded(ReloadPayload),
    /// A reload was attempted and the previous graph was kept.
    ReloadFailed { message: String },
}

#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReloadPayload {
    pub generation: u64,
    pub node_count: usize,
    pub edge_count: usize,
    pub dropped_edges: usize,
    pub timestamp: String,
}

/// State shared by every connection and the watcher.
pub struct ServerState {
    pub store: Arc<GraphStore>,
    pub dataset: PathBuf,
    pub canvas: CanvasTransform,
    loaded_at: RwLock<Option<DateTime<Utc>>>,
    events: broadcast::Sender<ServerEvent>,
}

pub type SharedState = Arc<ServerState>;

impl ServerState {
    pub fn new(store: Arc<GraphStore>, dataset: PathBuf, canvas: CanvasTransform) -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            store,
            dataset,
            canvas,
            loaded_at: RwLock::new(None),
            events,
        }
    }

    /// Reloads the dataset file and notifies subscribers.
    pub async fn reload(&self) -> Result<LoadReport, LoadError> {
        let source = FileSource::new(&self.dataset);
        match self.store.load(&source).await {
            Ok(report) => {
                let now = Utc::now();
                *self.loaded_at.write().await = Some(now);
                info!("Dataset reloaded (generation {})", self.store.generation());

                let _ = self.events.send(ServerEvent::GraphReloaded(ReloadPayload {
                    generation: self.store.generation(),
                    node_count: report.nodes,
                    edge_count: report.edges,
                    dropped_edges: report.dropped_edges.len(),
                    timestamp: now.to_rfc3339(),
                }));
                Ok(report)
            }
            Err(e) => {
                warn!("Reload of {} failed: {}", self.dataset.display(), e);
                let _ = self.events.send(ServerEvent::ReloadFailed {
                    message: e.to_string(),
                });
                Err(e)
            }
        }
    }

    /// Marks the store as loaded now, for graphs loaded before the server started.
    pub async fn mark_loaded(&self) {
        *self.loaded_at.write().await = Some(Utc::now());
    }

    pub async fn loaded_at(&self) -> Option<DateTime<Utc>> {
        *self.loaded_at.read().await
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ServerEvent> {
        self.events.subscribe()
    }
}
