//! Campus Graph - Pathway graph and route engine
//!
//! This crate owns the walkable network of a campus map. It validates a
//! dataset into an immutable [`CampusGraph`], publishes it through a
//! [`GraphStore`] that can be reloaded wholesale, and computes shortest
//! walking routes over it.
//!
//! # Architecture
//!
//! The graph uses petgraph internally with additional indexes for:
//! - Id-based lookups
//! - Kind-based filtering (buildings, gates, waypoints)
//!
//! Readers take an `Arc` snapshot of the current graph, so a reload never
//! exposes a half-built network.
//!
//! # Example
//!
//! ```no_run
//! use campus_graph::{FileSource, GraphStore};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let store = GraphStore::default();
//! store.load(&FileSource::new("data/pathways.json")).await?;
//!
//! let route = store.find_shortest_path("gate-1", "library")?;
//! println!("{:.0} units, {}", route.distance, route.duration());
//! # Ok(())
//! # }
//! ```

mod builder;
mod config;
mod graph;
mod route;
mod source;
mod store;

pub use builder::{GraphBuilder, LoadReport};
pub use config::{CampusConfig, EdgePolicy, EngineConfig};
pub use graph::{CampusGraph, GraphStats, NodeId, WalkableSegment};
pub use route::{RouteDuration, RouteEngine, RouteResult};
pub use source::{DataSource, FileSource, StaticSource};
pub use store::GraphStore;
