//! Map node types.
//!
//! A node is anything a route can pass through: a building entrance,
//! a campus gate, or an unnamed waypoint where footpaths meet. Positions
//! are stored in normalized map space (percent of the map extent), never
//! in pixels.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A position in normalized map coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Straight-line distance to another point, in map units.
    pub fn distance_to(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// The category of a map node.
///
/// Buildings and gates are landmarks: they carry a display name and are
/// the only nodes offered as route endpoints. Everything else is a plain
/// waypoint used to shape the walking network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// A campus building.
    Building,

    /// An entrance gate on the campus perimeter.
    Gate,

    /// A junction or bend in the footpath network.
    #[serde(rename = "path", alias = "junction", alias = "waypoint")]
    Waypoint,
}

impl NodeKind {
    /// All kinds, in a fixed order.
    pub const ALL: [NodeKind; 3] = [NodeKind::Building, NodeKind::Gate, NodeKind::Waypoint];

    /// Returns true for kinds that are offered as route endpoints.
    pub fn is_landmark(&self) -> bool {
        matches!(self, NodeKind::Building | NodeKind::Gate)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Building => "building",
            NodeKind::Gate => "gate",
            NodeKind::Waypoint => "path",
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for NodeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "building" => Ok(NodeKind::Building),
            "gate" => Ok(NodeKind::Gate),
            "path" | "junction" | "waypoint" => Ok(NodeKind::Waypoint),
            other => Err(format!("unknown node type: {}", other)),
        }
    }
}

/// A validated node of the campus map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapNode {
    /// Unique, case-sensitive identifier.
    pub id: String,

    /// Horizontal position, percent of map width.
    pub x: f64,

    /// Vertical position, percent of map height.
    pub y: f64,

    /// Node category.
    #[serde(rename = "type")]
    pub kind: NodeKind,

    /// Display label. Always present for landmarks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl MapNode {
    /// Creates an unnamed node.
    pub fn new(id: impl Into<String>, x: f64, y: f64, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            x,
            y,
            kind,
            name: None,
        }
    }

    /// Builder: attach a display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// The display label, falling back to the id for unnamed waypoints.
    pub fn label(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => &self.id,
        }
    }
}

/// Display order for location lists: case-insensitive by label, then id.
pub fn sort_by_label(nodes: &mut [MapNode]) {
    nodes.sort_by(|a, b| {
        a.label()
            .to_lowercase()
            .cmp(&b.label().to_lowercase())
            .then_with(|| a.id.cmp(&b.id))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_is_euclidean() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert!((a.distance_to(&b) - 5.0).abs() < 1e-9);
        assert!((b.distance_to(&a) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_waypoint_aliases() {
        for raw in ["\"path\"", "\"junction\"", "\"waypoint\""] {
            let kind: NodeKind = serde_json::from_str(raw).unwrap();
            assert_eq!(kind, NodeKind::Waypoint);
        }
        assert_eq!(serde_json::to_string(&NodeKind::Waypoint).unwrap(), "\"path\"");
    }

    #[test]
    fn test_kind_from_str() {
        assert_eq!("gate".parse::<NodeKind>().unwrap(), NodeKind::Gate);
        assert_eq!("junction".parse::<NodeKind>().unwrap(), NodeKind::Waypoint);
        assert!("Building".parse::<NodeKind>().is_err());
    }

    #[test]
    fn test_label_falls_back_to_id() {
        let plain = MapNode::new("j7", 1.0, 2.0, NodeKind::Waypoint);
        assert_eq!(plain.label(), "j7");

        let named = MapNode::new("b1", 1.0, 2.0, NodeKind::Building).with_name("Library");
        assert_eq!(named.label(), "Library");
    }

    #[test]
    fn test_sort_by_label() {
        let mut nodes = vec![
            MapNode::new("g2", 0.0, 0.0, NodeKind::Gate).with_name("gate 2"),
            MapNode::new("b1", 0.0, 0.0, NodeKind::Building).with_name("Auditorium"),
            MapNode::new("g9", 0.0, 0.0, NodeKind::Gate).with_name("Gate 1"),
            MapNode::new("g1", 0.0, 0.0, NodeKind::Gate).with_name("Gate 1"),
        ];
        sort_by_label(&mut nodes);
        let ids: Vec<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["b1", "g1", "g9", "g2"]);
    }
}
