//! Pathway types for the campus graph.
//!
//! A pathway connects two nodes in both directions. Its cost is never
//! stored: it is the straight-line distance between the endpoints,
//! derived from their coordinates whenever it is needed.

use serde::{Deserialize, Serialize};

/// An undirected connection between two map nodes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pathway {
    /// Id of one endpoint.
    pub start: String,

    /// Id of the other endpoint.
    pub end: String,

    /// Closed or restricted pathways stay in the data but are never
    /// drawn or routed over.
    pub walkable: bool,
}

impl Pathway {
    /// Creates a walkable pathway.
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
            walkable: true,
        }
    }

    /// Creates a pathway that exists in the data but is not walkable.
    pub fn closed(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            walkable: false,
            ..Self::new(start, end)
        }
    }
}

impl std::fmt::Display for Pathway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sep = if self.walkable { "--" } else { "-x-" };
        write!(f, "{} {} {}", self.start, sep, self.end)
    }
}
