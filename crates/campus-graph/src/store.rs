//! The graph store: owner of the current campus graph.
//!
//! The store holds an `Arc` to an immutable [`CampusGraph`]. A load
//! builds a complete new graph off to the side and swaps the pointer in
//! one step, so readers see either the previous graph or the new one.
//! A failed load leaves the previous graph in place.

use crate::builder::{GraphBuilder, LoadReport};
use crate::config::{EdgePolicy, EngineConfig};
use crate::graph::{CampusGraph, GraphStats, WalkableSegment};
use crate::route::{RouteEngine, RouteResult};
use crate::source::DataSource;
use campus_core::{Dataset, LoadError, MapNode, NodeKind, RouteError};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Instant;
use tracing::{debug, info};

pub struct GraphStore {
    current: RwLock<Arc<CampusGraph>>,
    /// Bumped on every successful load; zero means never loaded.
    generation: AtomicU64,
    engine: RouteEngine,
    policy: EdgePolicy,
}

impl Default for GraphStore {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl GraphStore {
    /// Creates an empty, unloaded store.
    pub fn new(config: EngineConfig) -> Self {
        Self {
            current: RwLock::new(Arc::new(CampusGraph::new())),
            generation: AtomicU64::new(0),
            engine: RouteEngine::new(config),
            policy: config.edge_policy,
        }
    }

    /// Fetches, validates and publishes a dataset.
    ///
    /// On any error the previously loaded graph stays current.
    pub async fn load(&self, source: &dyn DataSource) -> Result<LoadReport, LoadError> {
        let start = Instant::now();
        let location = source.describe();
        debug!("Loading dataset from {}", location);

        let bytes = source.fetch().await?;
        let dataset = Dataset::from_json(&bytes)?;
        let mut report = self.load_dataset(dataset)?;

        report.source = location;
        report.duration_ms = start.elapsed().as_millis() as u64;

        info!(
            "Loaded {} nodes and {} pathways from {} in {}ms",
            report.nodes, report.edges, report.source, report.duration_ms
        );

        Ok(report)
    }

    /// Validates and publishes an already-parsed dataset.
    pub fn load_dataset(&self, dataset: Dataset) -> Result<LoadReport, LoadError> {
        let (graph, report) = GraphBuilder::new(self.policy).build(dataset)?;
        self.replace(graph);
        Ok(report)
    }

    /// Publishes a graph, replacing the current one wholesale.
    pub fn replace(&self, graph: CampusGraph) {
        let graph = Arc::new(graph);
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *guard = graph;
        self.generation.fetch_add(1, Ordering::Release);
    }

    /// The graph current at the time of the call.
    pub fn snapshot(&self) -> Arc<CampusGraph> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_loaded(&self) -> bool {
        self.generation() > 0
    }

    /// Number of successful loads so far.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    pub fn engine_config(&self) -> &EngineConfig {
        self.engine.config()
    }

    pub fn get_node(&self, id: &str) -> Option<MapNode> {
        self.snapshot().get_node(id).cloned()
    }

    pub fn nodes_by_kind(&self, kind: NodeKind) -> Vec<MapNode> {
        self.snapshot()
            .nodes_by_kind(kind)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Buildings and gates, unsorted.
    pub fn landmarks(&self) -> Vec<MapNode> {
        self.snapshot().landmarks().into_iter().cloned().collect()
    }

    pub fn walkable_neighbors(&self, id: &str) -> Vec<(MapNode, f64)> {
        self.snapshot()
            .walkable_neighbors(id)
            .into_iter()
            .map(|(node, weight)| (node.clone(), weight))
            .collect()
    }

    pub fn walkable_edges(&self) -> Vec<WalkableSegment> {
        self.snapshot().walkable_edges()
    }

    pub fn stats(&self) -> GraphStats {
        self.snapshot().stats()
    }

    /// Shortest walkable route over the current graph.
    pub fn find_shortest_path(&self, start: &str, end: &str) -> Result<RouteResult, RouteError> {
        let graph = self.snapshot();
        self.engine.find_shortest_path(&graph, start, end)
    }
}
