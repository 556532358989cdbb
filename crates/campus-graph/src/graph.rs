//! Core graph data structure.
//!
//! The CampusGraph wraps petgraph and adds indexes for fast lookups.
//! It is built once by the [`GraphBuilder`](crate::GraphBuilder) and
//! never mutated afterwards; a reload builds a new one.

use campus_core::{MapNode, NodeKind, Pathway, Point};
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Index of a node inside the graph.
pub type NodeId = NodeIndex;

/// A walkable pathway with both endpoint positions resolved, ready to draw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalkableSegment {
    pub start: String,
    pub end: String,
    pub from: Point,
    pub to: Point,
    pub length: f64,
}

/// The campus pathway graph.
///
/// Nodes carry their map data, edges carry the pathway record including
/// the walkable flag. Edge costs are derived from node coordinates on
/// every access.
#[derive(Debug, Clone, Default)]
pub struct CampusGraph {
    /// The underlying petgraph graph.
    pub(crate) graph: UnGraph<MapNode, Pathway>,

    /// Maps string IDs to graph node indexes.
    id_index: HashMap<String, NodeId>,

    /// Maps node kinds to node IDs.
    kind_index: HashMap<NodeKind, Vec<NodeId>>,
}

impl CampusGraph {
    /// Creates a new empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node. The builder guarantees ids are unique.
    pub(crate) fn add_node(&mut self, node: MapNode) -> NodeId {
        let id = node.id.clone();
        let kind = node.kind;

        let index = self.graph.add_node(node);

        self.id_index.insert(id, index);
        self.kind_index.entry(kind).or_default().push(index);

        index
    }

    /// Adds a pathway between two already-added nodes.
    pub(crate) fn add_pathway(&mut self, from: NodeId, to: NodeId, pathway: Pathway) {
        self.graph.add_edge(from, to, pathway);
    }

    /// Gets a node by its string ID. Exact, case-sensitive match.
    pub fn get_node(&self, id: &str) -> Option<&MapNode> {
        let index = self.id_index.get(id)?;
        self.graph.node_weight(*index)
    }

    /// Gets a node by its graph index.
    pub fn get(&self, index: NodeId) -> Option<&MapNode> {
        self.graph.node_weight(index)
    }

    /// Gets the node index for a string ID.
    pub fn get_index(&self, id: &str) -> Option<NodeId> {
        self.id_index.get(id).copied()
    }

    /// All nodes of the given kind, in load order.
    pub fn nodes_by_kind(&self, kind: NodeKind) -> Vec<&MapNode> {
        self.kind_index
            .get(&kind)
            .map(|indexes| {
                indexes
                    .iter()
                    .filter_map(|idx| self.graph.node_weight(*idx))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Buildings followed by gates: the nodes offered as route endpoints.
    pub fn landmarks(&self) -> Vec<&MapNode> {
        let mut out = self.nodes_by_kind(NodeKind::Building);
        out.extend(self.nodes_by_kind(NodeKind::Gate));
        out
    }

    /// Neighbors reachable over one walkable pathway, with the pathway length.
    ///
    /// Returned in dataset pathway order. An unknown id has no neighbors.
    pub fn walkable_neighbors(&self, id: &str) -> Vec<(&MapNode, f64)> {
        let Some(index) = self.get_index(id) else {
            return Vec::new();
        };

        self.walkable_adjacent(index)
            .into_iter()
            .filter_map(|(next, weight)| Some((self.graph.node_weight(next)?, weight)))
            .collect()
    }

    /// Index-level adjacency used by the route engine.
    pub(crate) fn walkable_adjacent(&self, index: NodeId) -> Vec<(NodeId, f64)> {
        let mut edges: Vec<_> = self
            .graph
            .edges(index)
            .filter(|edge| edge.weight().walkable)
            .collect();

        // petgraph walks adjacency lists newest-first
        edges.sort_by_key(|edge| edge.id());

        edges
            .into_iter()
            .filter_map(|edge| {
                let other = if edge.source() == index {
                    edge.target()
                } else {
                    edge.source()
                };
                Some((other, self.segment_length(index, other)?))
            })
            .collect()
    }

    /// Euclidean length between two nodes.
    fn segment_length(&self, a: NodeId, b: NodeId) -> Option<f64> {
        let a = self.graph.node_weight(a)?.position();
        let b = self.graph.node_weight(b)?.position();
        Some(a.distance_to(&b))
    }

    /// All walkable pathways with resolved endpoints, in dataset order.
    pub fn walkable_edges(&self) -> Vec<WalkableSegment> {
        self.graph
            .edge_references()
            .filter(|edge| edge.weight().walkable)
            .filter_map(|edge| {
                let from = self.graph.node_weight(edge.source())?;
                let to = self.graph.node_weight(edge.target())?;
                Some(WalkableSegment {
                    start: from.id.clone(),
                    end: to.id.clone(),
                    from: from.position(),
                    to: to.position(),
                    length: from.position().distance_to(&to.position()),
                })
            })
            .collect()
    }

    /// Iterates over all nodes.
    pub fn nodes(&self) -> impl Iterator<Item = &MapNode> {
        self.graph.node_weights()
    }

    /// Iterates over all pathways, walkable or not.
    pub fn pathways(&self) -> impl Iterator<Item = &Pathway> {
        self.graph.edge_weights()
    }

    /// Returns the number of nodes.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns the number of pathways, including closed ones.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn walkable_edge_count(&self) -> usize {
        self.pathways().filter(|p| p.walkable).count()
    }
}

/// Graph statistics for the info endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStats {
    pub node_count: usize,
    pub edge_count: usize,
    pub walkable_edges: usize,
    pub buildings: usize,
    pub gates: usize,
    pub waypoints: usize,
}

impl CampusGraph {
    /// Returns graph statistics.
    pub fn stats(&self) -> GraphStats {
        let count = |kind| self.kind_index.get(&kind).map_or(0, Vec::len);
        GraphStats {
            node_count: self.node_count(),
            edge_count: self.edge_count(),
            walkable_edges: self.walkable_edge_count(),
            buildings: count(NodeKind::Building),
            gates: count(NodeKind::Gate),
            waypoints: count(NodeKind::Waypoint),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CampusGraph {
        let mut graph = CampusGraph::new();
        let hall = graph.add_node(
            MapNode::new("hall", 0.0, 0.0, NodeKind::Building).with_name("Main Hall"),
        );
        let gate =
            graph.add_node(MapNode::new("gate", 3.0, 4.0, NodeKind::Gate).with_name("Gate 1"));
        let j1 = graph.add_node(MapNode::new("j1", 3.0, 0.0, NodeKind::Waypoint));
        let j2 = graph.add_node(MapNode::new("j2", 0.0, 4.0, NodeKind::Waypoint));

        graph.add_pathway(hall, j1, Pathway::new("hall", "j1"));
        graph.add_pathway(j1, gate, Pathway::new("j1", "gate"));
        graph.add_pathway(hall, j2, Pathway::closed("hall", "j2"));
        graph.add_pathway(hall, gate, Pathway::new("hall", "gate"));
        graph
    }

    #[test]
    fn test_get_node_exact_match() {
        let graph = sample();
        assert_eq!(graph.get_node("hall").unwrap().label(), "Main Hall");
        assert!(graph.get_node("Hall").is_none());
        assert!(graph.get_node("hal").is_none());
    }

    #[test]
    fn test_nodes_by_kind_partitions_nodes() {
        let graph = sample();
        let mut total = 0;
        for kind in NodeKind::ALL {
            let nodes = graph.nodes_by_kind(kind);
            assert!(nodes.iter().all(|n| n.kind == kind));
            total += nodes.len();
        }
        assert_eq!(total, graph.node_count());
        assert_eq!(graph.nodes_by_kind(NodeKind::Waypoint).len(), 2);
    }

    #[test]
    fn test_walkable_neighbors_skip_closed_pathways() {
        let graph = sample();
        let neighbors = graph.walkable_neighbors("hall");
        let ids: Vec<&str> = neighbors.iter().map(|(n, _)| n.id.as_str()).collect();

        // dataset order, j2 is behind a closed pathway
        assert_eq!(ids, vec!["j1", "gate"]);
        assert!((neighbors[0].1 - 3.0).abs() < 1e-9);
        assert!((neighbors[1].1 - 5.0).abs() < 1e-9);

        assert!(graph.walkable_neighbors("j2").is_empty());
        assert!(graph.walkable_neighbors("missing").is_empty());
    }

    #[test]
    fn test_walkable_neighbors_are_symmetric() {
        let graph = sample();
        let from_gate: Vec<&str> = graph
            .walkable_neighbors("gate")
            .iter()
            .map(|(n, _)| n.id.as_str())
            .collect();
        assert_eq!(from_gate, vec!["j1", "hall"]);
    }

    #[test]
    fn test_walkable_edges_and_stats() {
        let graph = sample();
        let segments = graph.walkable_edges();
        assert_eq!(segments.len(), 3);
        assert!(segments.iter().all(|s| !(s.start == "hall" && s.end == "j2")));

        let stats = graph.stats();
        assert_eq!(stats.node_count, 4);
        assert_eq!(stats.edge_count, 4);
        assert_eq!(stats.walkable_edges, 3);
        assert_eq!(stats.buildings, 1);
        assert_eq!(stats.gates, 1);
        assert_eq!(stats.waypoints, 2);
    }

    #[test]
    fn test_landmarks() {
        let graph = sample();
        let ids: Vec<&str> = graph.landmarks().iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["hall", "gate"]);
    }
}
