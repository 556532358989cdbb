//! Graph builder for turning a raw dataset into a CampusGraph.
//!
//! The builder runs the two-pass process:
//! 1. Validate and add all nodes
//! 2. Resolve pathway endpoints into graph edges
//!
//! Node problems always reject the dataset. Pathway problems are handled
//! according to the configured [`EdgePolicy`].

use crate::config::EdgePolicy;
use crate::graph::CampusGraph;
use campus_core::{Dataset, MalformedData, MapNode, NodeKind, Pathway, RawNode, RawPathway};
use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, warn};

/// Summary of a successful load.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadReport {
    /// Where the data came from.
    pub source: String,
    pub nodes: usize,
    pub edges: usize,
    pub walkable_edges: usize,
    /// Pathways discarded under the lenient policy.
    pub dropped_edges: Vec<MalformedData>,
    pub duration_ms: u64,
}

/// Builds a CampusGraph from a dataset.
pub struct GraphBuilder {
    policy: EdgePolicy,
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new(EdgePolicy::default())
    }
}

impl GraphBuilder {
    /// Creates a new builder.
    pub fn new(policy: EdgePolicy) -> Self {
        Self { policy }
    }

    /// Validates the dataset and builds the graph.
    pub fn build(&self, dataset: Dataset) -> Result<(CampusGraph, LoadReport), MalformedData> {
        let mut graph = CampusGraph::new();
        let mut seen = HashSet::with_capacity(dataset.nodes.len());

        for (index, raw) in dataset.nodes.into_iter().enumerate() {
            let node = validate_node(index, raw)?;
            if !seen.insert(node.id.clone()) {
                return Err(MalformedData::DuplicateNode { id: node.id });
            }
            graph.add_node(node);
        }

        let mut dropped = Vec::new();

        for (index, raw) in dataset.paths.into_iter().enumerate() {
            match self.resolve_pathway(&graph, index, raw) {
                Ok(pathway) => {
                    // resolve_pathway already checked both ends
                    if let (Some(from), Some(to)) =
                        (graph.get_index(&pathway.start), graph.get_index(&pathway.end))
                    {
                        graph.add_pathway(from, to, pathway);
                    }
                }
                Err(problem) => match self.policy {
                    EdgePolicy::Strict => return Err(problem),
                    EdgePolicy::Lenient => {
                        warn!("Dropping pathway: {}", problem);
                        dropped.push(problem);
                    }
                },
            }
        }

        debug!(
            "Built graph with {} nodes, {} pathways ({} dropped)",
            graph.node_count(),
            graph.edge_count(),
            dropped.len()
        );

        let report = LoadReport {
            nodes: graph.node_count(),
            edges: graph.edge_count(),
            walkable_edges: graph.walkable_edge_count(),
            dropped_edges: dropped,
            ..LoadReport::default()
        };

        Ok((graph, report))
    }

    fn resolve_pathway(
        &self,
        graph: &CampusGraph,
        index: usize,
        raw: RawPathway,
    ) -> Result<Pathway, MalformedData> {
        let start = raw.start.ok_or(MalformedData::MissingField {
            entry: "path",
            index,
            field: "start",
        })?;
        let end = raw.end.ok_or(MalformedData::MissingField {
            entry: "path",
            index,
            field: "end",
        })?;

        for id in [&start, &end] {
            if graph.get_index(id).is_none() {
                return Err(MalformedData::DanglingEdge {
                    index,
                    start: start.clone(),
                    end: end.clone(),
                    missing: id.clone(),
                });
            }
        }

        Ok(Pathway {
            start,
            end,
            walkable: raw.walkable,
        })
    }
}

fn validate_node(index: usize, raw: RawNode) -> Result<MapNode, MalformedData> {
    let missing = |field| MalformedData::MissingField {
        entry: "node",
        index,
        field,
    };

    let id = raw.id.ok_or_else(|| missing("id"))?;
    let x = raw.x.ok_or_else(|| missing("x"))?;
    let y = raw.y.ok_or_else(|| missing("y"))?;
    let kind_str = raw.kind.ok_or_else(|| missing("type"))?;

    let kind: NodeKind = kind_str
        .parse()
        .map_err(|_| MalformedData::UnknownNodeKind {
            id: id.clone(),
            kind: kind_str.clone(),
        })?;

    if !x.is_finite() || !y.is_finite() {
        return Err(MalformedData::InvalidCoordinate { id });
    }

    let name = raw.name.filter(|n| !n.trim().is_empty());
    if kind.is_landmark() && name.is_none() {
        return Err(MalformedData::UnnamedLandmark { id, kind });
    }

    Ok(MapNode {
        id,
        x,
        y,
        kind,
        name,
    })
}
