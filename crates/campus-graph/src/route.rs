//! Shortest walking routes.
//!
//! Routing is Dijkstra over walkable pathways, with the straight-line
//! length of each pathway as its cost. The search stops as soon as the
//! destination is settled. Queue entries carry a discovery sequence
//! number and relaxations only win on a strictly shorter distance, so
//! equal-length alternatives resolve to whichever was seen first and the
//! result is stable for a given dataset.

use crate::config::EngineConfig;
use crate::graph::{CampusGraph, NodeId};
use campus_core::{Point, RouteError};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

/// A computed route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteResult {
    /// Node ids from start to end, inclusive.
    pub node_ids: Vec<String>,
    /// Node positions from start to end, in normalized map space.
    pub coordinates: Vec<Point>,
    /// Sum of segment lengths, in map units.
    pub distance: f64,
    /// Walking time in fractional minutes.
    pub estimated_time: f64,
}

impl RouteResult {
    /// Splits the time estimate into minutes and seconds for display.
    pub fn duration(&self) -> RouteDuration {
        RouteDuration::from_minutes(self.estimated_time)
    }

    /// Number of segments walked.
    pub fn hops(&self) -> usize {
        self.node_ids.len().saturating_sub(1)
    }
}

/// A walking time split into whole minutes and rounded seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteDuration {
    pub minutes: u64,
    pub seconds: u64,
}

impl RouteDuration {
    pub fn from_minutes(minutes: f64) -> Self {
        let minutes = if minutes.is_finite() { minutes.max(0.0) } else { 0.0 };
        let whole = minutes.floor();
        let mut seconds = ((minutes - whole) * 60.0).round() as u64;
        let mut whole = whole as u64;
        if seconds == 60 {
            whole += 1;
            seconds = 0;
        }
        Self {
            minutes: whole,
            seconds,
        }
    }
}

impl std::fmt::Display for RouteDuration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let plural = |n: u64| if n == 1 { "" } else { "s" };
        match (self.minutes, self.seconds) {
            (0, s) => write!(f, "{} second{}", s, plural(s)),
            (m, 0) => write!(f, "{} minute{}", m, plural(m)),
            (m, s) => write!(
                f,
                "{} minute{} {} second{}",
                m,
                plural(m),
                s,
                plural(s)
            ),
        }
    }
}

/// Queue entry: lowest cost first, then earliest discovery.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    cost: f64,
    seq: u64,
    node: NodeId,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    // Reversed so BinaryHeap pops the minimum
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Computes routes over a graph snapshot.
#[derive(Debug, Clone, Copy, Default)]
pub struct RouteEngine {
    config: EngineConfig,
}

impl RouteEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Finds the shortest walkable route between two node ids.
    pub fn find_shortest_path(
        &self,
        graph: &CampusGraph,
        start: &str,
        end: &str,
    ) -> Result<RouteResult, RouteError> {
        let from = graph
            .get_index(start)
            .ok_or_else(|| RouteError::UnknownEndpoint(start.to_string()))?;
        let to = graph
            .get_index(end)
            .ok_or_else(|| RouteError::UnknownEndpoint(end.to_string()))?;

        let (path, distance) = dijkstra(graph, from, to).ok_or_else(|| RouteError::NoRoute {
            start: start.to_string(),
            end: end.to_string(),
        })?;

        let nodes: Vec<_> = path.iter().filter_map(|idx| graph.get(*idx)).collect();

        Ok(RouteResult {
            node_ids: nodes.iter().map(|n| n.id.clone()).collect(),
            coordinates: nodes.iter().map(|n| n.position()).collect(),
            distance,
            estimated_time: distance * self.config.minutes_per_unit,
        })
    }
}

/// Returns the node sequence and total cost, or None when unreachable.
fn dijkstra(graph: &CampusGraph, from: NodeId, to: NodeId) -> Option<(Vec<NodeId>, f64)> {
    let mut dist: HashMap<NodeId, f64> = HashMap::new();
    let mut prev: HashMap<NodeId, NodeId> = HashMap::new();
    let mut settled: HashSet<NodeId> = HashSet::new();
    let mut heap = BinaryHeap::new();
    let mut seq = 0u64;

    dist.insert(from, 0.0);
    heap.push(Candidate {
        cost: 0.0,
        seq,
        node: from,
    });

    while let Some(Candidate { cost, node, .. }) = heap.pop() {
        if !settled.insert(node) {
            continue;
        }

        if node == to {
            let mut path = vec![to];
            let mut current = to;
            while let Some(&parent) = prev.get(&current) {
                path.push(parent);
                current = parent;
            }
            path.reverse();
            return Some((path, cost));
        }

        for (next, weight) in graph.walkable_adjacent(node) {
            if settled.contains(&next) {
                continue;
            }
            let candidate = cost + weight;
            let improves = dist.get(&next).map_or(true, |&known| candidate < known);
            if improves {
                dist.insert(next, candidate);
                prev.insert(next, node);
                seq += 1;
                heap.push(Candidate {
                    cost: candidate,
                    seq,
                    node: next,
                });
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::GraphBuilder;
    use campus_core::{Dataset, RawNode, RawPathway};

    const EPS: f64 = 1e-9;

    fn graph(nodes: &[(&str, f64, f64)], paths: &[(&str, &str, bool)]) -> CampusGraph {
        let data = Dataset {
            nodes: nodes
                .iter()
                .map(|(id, x, y)| RawNode {
                    id: Some(id.to_string()),
                    x: Some(*x),
                    y: Some(*y),
                    kind: Some("path".to_string()),
                    name: None,
                })
                .collect(),
            paths: paths
                .iter()
                .map(|(a, b, walkable)| RawPathway {
                    start: Some(a.to_string()),
                    end: Some(b.to_string()),
                    walkable: *walkable,
                })
                .collect(),
        };
        GraphBuilder::default().build(data).unwrap().0
    }

    fn abc() -> CampusGraph {
        graph(
            &[("A", 0.0, 0.0), ("B", 3.0, 0.0), ("C", 3.0, 4.0)],
            &[("A", "B", true), ("B", "C", true)],
        )
    }

    #[test]
    fn test_chain_example() {
        let engine = RouteEngine::default();
        let route = engine.find_shortest_path(&abc(), "A", "C").unwrap();

        assert_eq!(route.node_ids, vec!["A", "B", "C"]);
        assert_eq!(
            route.coordinates,
            vec![Point::new(0.0, 0.0), Point::new(3.0, 0.0), Point::new(3.0, 4.0)]
        );
        assert!((route.distance - 7.0).abs() < EPS);
        assert!((route.estimated_time - 7.0 * engine.config().minutes_per_unit).abs() < EPS);
        assert_eq!(route.hops(), 2);
    }

    #[test]
    fn test_reverse_direction() {
        let route = RouteEngine::default()
            .find_shortest_path(&abc(), "C", "A")
            .unwrap();
        assert_eq!(route.node_ids, vec!["C", "B", "A"]);
        assert!((route.distance - 7.0).abs() < EPS);
    }

    #[test]
    fn test_same_node_is_single_point() {
        let route = RouteEngine::default()
            .find_shortest_path(&abc(), "B", "B")
            .unwrap();
        assert_eq!(route.node_ids, vec!["B"]);
        assert_eq!(route.coordinates, vec![Point::new(3.0, 0.0)]);
        assert_eq!(route.distance, 0.0);
        assert_eq!(route.estimated_time, 0.0);
    }

    #[test]
    fn test_isolated_node_routes_to_itself() {
        let g = graph(&[("solo", 1.0, 1.0)], &[]);
        let route = RouteEngine::default().find_shortest_path(&g, "solo", "solo").unwrap();
        assert_eq!(route.node_ids, vec!["solo"]);
    }

    #[test]
    fn test_unknown_endpoint() {
        let engine = RouteEngine::default();
        assert_eq!(
            engine.find_shortest_path(&abc(), "Z", "A").unwrap_err(),
            RouteError::UnknownEndpoint("Z".into())
        );
        assert_eq!(
            engine.find_shortest_path(&abc(), "A", "Z").unwrap_err(),
            RouteError::UnknownEndpoint("Z".into())
        );
        assert_eq!(
            engine.find_shortest_path(&abc(), "a", "C").unwrap_err(),
            RouteError::UnknownEndpoint("a".into())
        );
    }

    #[test]
    fn test_disjoint_components() {
        let g = graph(
            &[("A", 0.0, 0.0), ("B", 1.0, 0.0), ("X", 50.0, 50.0), ("Y", 51.0, 50.0)],
            &[("A", "B", true), ("X", "Y", true)],
        );
        assert_eq!(
            RouteEngine::default().find_shortest_path(&g, "A", "Y").unwrap_err(),
            RouteError::NoRoute {
                start: "A".into(),
                end: "Y".into()
            }
        );
    }

    #[test]
    fn test_closed_bridge_is_not_routed() {
        let g = graph(
            &[("A", 0.0, 0.0), ("B", 1.0, 0.0), ("C", 2.0, 0.0), ("D", 3.0, 0.0)],
            &[("A", "B", true), ("B", "C", false), ("C", "D", true)],
        );
        assert!(matches!(
            RouteEngine::default().find_shortest_path(&g, "A", "D"),
            Err(RouteError::NoRoute { .. })
        ));
    }

    #[test]
    fn test_prefers_shorter_of_two_routes() {
        // Direct hop A-D is 8, the detour through B and C is 20
        let nodes = [("A", 0.0, 0.0), ("B", 0.0, 6.0), ("C", 8.0, 6.0), ("D", 8.0, 0.0)];
        let open = graph(
            &nodes,
            &[("A", "B", true), ("B", "C", true), ("C", "D", true), ("A", "D", true)],
        );
        let route = RouteEngine::default().find_shortest_path(&open, "A", "D").unwrap();
        assert_eq!(route.node_ids, vec!["A", "D"]);
        assert!((route.distance - 8.0).abs() < EPS);

        let closed = graph(
            &nodes,
            &[("A", "B", true), ("B", "C", true), ("C", "D", true), ("A", "D", false)],
        );
        let route = RouteEngine::default().find_shortest_path(&closed, "A", "D").unwrap();
        assert_eq!(route.node_ids, vec!["A", "B", "C", "D"]);
        assert!((route.distance - 20.0).abs() < EPS);
    }

    #[test]
    fn test_distance_matches_segment_sum() {
        let g = graph(
            &[("A", 10.0, 10.0), ("B", 13.0, 14.0), ("C", 20.0, 14.0), ("D", 20.0, 30.0)],
            &[("A", "B", true), ("B", "C", true), ("C", "D", true)],
        );
        let route = RouteEngine::default().find_shortest_path(&g, "A", "D").unwrap();
        let sum: f64 = route
            .coordinates
            .windows(2)
            .map(|w| w[0].distance_to(&w[1]))
            .sum();
        assert!((route.distance - sum).abs() < EPS);
        assert!((route.distance - 28.0).abs() < EPS);
    }

    #[test]
    fn test_equal_routes_resolve_deterministically() {
        // Square: A-B-D and A-C-D have equal length. B is listed first.
        let g = graph(
            &[("A", 0.0, 0.0), ("B", 5.0, 0.0), ("C", 0.0, 5.0), ("D", 5.0, 5.0)],
            &[("A", "B", true), ("A", "C", true), ("B", "D", true), ("C", "D", true)],
        );
        let engine = RouteEngine::default();
        let first = engine.find_shortest_path(&g, "A", "D").unwrap();
        assert_eq!(first.node_ids, vec!["A", "B", "D"]);
        for _ in 0..10 {
            assert_eq!(engine.find_shortest_path(&g, "A", "D").unwrap(), first);
        }
    }

    #[test]
    fn test_custom_walking_speed() {
        let engine = RouteEngine::new(EngineConfig {
            minutes_per_unit: 0.5,
            ..EngineConfig::default()
        });
        let route = engine.find_shortest_path(&abc(), "A", "C").unwrap();
        assert!((route.estimated_time - 3.5).abs() < EPS);
    }

    #[test]
    fn test_duration_split() {
        assert_eq!(
            RouteDuration::from_minutes(0.75),
            RouteDuration { minutes: 0, seconds: 45 }
        );
        assert_eq!(
            RouteDuration::from_minutes(2.0),
            RouteDuration { minutes: 2, seconds: 0 }
        );
        // 59.7 seconds rounds up into the next minute
        assert_eq!(
            RouteDuration::from_minutes(1.995),
            RouteDuration { minutes: 2, seconds: 0 }
        );
    }

    #[test]
    fn test_duration_display() {
        assert_eq!(RouteDuration::from_minutes(0.75).to_string(), "45 seconds");
        assert_eq!(RouteDuration::from_minutes(1.0).to_string(), "1 minute");
        assert_eq!(RouteDuration::from_minutes(3.0).to_string(), "3 minutes");
        assert_eq!(RouteDuration::from_minutes(1.5).to_string(), "1 minute 30 seconds");
        assert_eq!(RouteDuration::from_minutes(0.0).to_string(), "0 seconds");
    }
}
