//! The raw dataset document.
//!
//! Every field is optional at this layer so a document that is valid
//! JSON but misses a required field can be reported as malformed data
//! with the offending entry, instead of as an opaque parse failure.
//! Validation into [`MapNode`](crate::MapNode) and
//! [`Pathway`](crate::Pathway) happens in the graph crate.

use crate::error::LoadError;
use serde::{Deserialize, Serialize};

/// A node entry as it appears in the dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawNode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// A pathway entry as it appears in the dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPathway {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
    /// Absent means closed: only flagged pathways are drawn or routed.
    #[serde(default)]
    pub walkable: bool,
}

/// The whole document: a node list and a pathway list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub nodes: Vec<RawNode>,
    #[serde(default, alias = "edges")]
    pub paths: Vec<RawPathway>,
}

impl Dataset {
    /// Parses a dataset from JSON bytes.
    pub fn from_json(bytes: &[u8]) -> Result<Self, LoadError> {
        serde_json::from_slice(bytes).map_err(LoadError::Parse)
    }
}
