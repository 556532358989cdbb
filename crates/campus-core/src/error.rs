//! Error types shared across Campus Route crates.
//!
//! Nothing here is fatal. Each error is a classified condition handed
//! back to the caller, which decides how to present it.

use crate::node::NodeKind;
use serde::Serialize;
use thiserror::Error;

/// A dataset that parsed as JSON but does not describe a valid map.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "problem", rename_all = "camelCase")]
pub enum MalformedData {
    #[error("{entry} #{index} is missing required field `{field}`")]
    MissingField {
        entry: &'static str,
        index: usize,
        field: &'static str,
    },

    #[error("duplicate node id: {id}")]
    DuplicateNode { id: String },

    #[error("node {id} has unknown type `{kind}`")]
    UnknownNodeKind { id: String, kind: String },

    #[error("node {id} has a non-finite coordinate")]
    InvalidCoordinate { id: String },

    #[error("{kind} node {id} has no name")]
    UnnamedLandmark { id: String, kind: NodeKind },

    #[error("path #{index} ({start} - {end}) references unknown node {missing}")]
    DanglingEdge {
        index: usize,
        start: String,
        end: String,
        missing: String,
    },
}

/// Why a load did not replace the current graph.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to fetch dataset from {location}: {source}")]
    Fetch {
        location: String,
        #[source]
        source: std::io::Error,
    },

    #[error("dataset is not valid JSON: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("malformed dataset: {0}")]
    Malformed(#[from] MalformedData),
}

impl LoadError {
    /// True for the fetch/parse class of failures, false for malformed data.
    pub fn is_load_failure(&self) -> bool {
        !matches!(self, LoadError::Malformed(_))
    }
}

/// Why a route could not be computed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    #[error("unknown endpoint: {0}")]
    UnknownEndpoint(String),

    #[error("no walkable route from {start} to {end}")]
    NoRoute { start: String, end: String },
}

/// Configuration file problems.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}
