//! Request handlers for protocol methods.
//!
//! Each handler implements one method. Sorting for display happens here,
//! at the surface, never in the store.

use crate::protocol::{
    NodeGetParams, NodesByKindParams, Response, RouteParams, NODE_NOT_FOUND, NO_ROUTE,
    RELOAD_FAILED, UNKNOWN_ENDPOINT,
};
use crate::SharedState;
use campus_core::{sort_by_label, CanvasPoint, RouteError};
use campus_graph::{RouteDuration, RouteResult};
use serde::Serialize;
use serde_json::Value;
use std::time::Instant;
use tracing::debug;

/// Handles the graph.info method.
pub async fn handle_info(state: &SharedState, id: Option<Value>) -> Response {
    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct InfoResult {
        loaded: bool,
        generation: u64,
        loaded_at: Option<String>,
        node_count: usize,
        edge_count: usize,
        walkable_edges: usize,
        minutes_per_unit: f64,
        version: &'static str,
    }

    let stats = state.store.stats();
    Response::success(
        id,
        InfoResult {
            loaded: state.store.is_loaded(),
            generation: state.store.generation(),
            loaded_at: state.loaded_at().await.map(|t| t.to_rfc3339()),
            node_count: stats.node_count,
            edge_count: stats.edge_count,
            walkable_edges: stats.walkable_edges,
            minutes_per_unit: state.store.engine_config().minutes_per_unit,
            version: env!("CARGO_PKG_VERSION"),
        },
    )
}

/// Handles the node.get method.
pub async fn handle_node_get(
    state: &SharedState,
    id: Option<Value>,
    params: NodeGetParams,
) -> Response {
    match state.store.get_node(&params.id) {
        Some(node) => Response::success(id, node),
        None => Response::error(id, NODE_NOT_FOUND, format!("Node not found: {}", params.id)),
    }
}

/// Handles the nodes.byKind method.
pub async fn handle_nodes_by_kind(
    state: &SharedState,
    id: Option<Value>,
    params: NodesByKindParams,
) -> Response {
    let nodes = state.store.nodes_by_kind(params.kind);
    Response::success(id, serde_json::json!({ "nodes": nodes, "total": nodes.len() }))
}

/// Handles the landmarks method: route endpoints sorted by display name.
pub async fn handle_landmarks(state: &SharedState, id: Option<Value>) -> Response {
    let mut nodes = state.store.landmarks();
    sort_by_label(&mut nodes);
    Response::success(id, serde_json::json!({ "nodes": nodes }))
}

/// Handles the edges.walkable method.
pub async fn handle_walkable_edges(state: &SharedState, id: Option<Value>) -> Response {
    let edges = state.store.walkable_edges();
    Response::success(id, serde_json::json!({ "edges": edges }))
}

/// Handles the route.find method.
pub async fn handle_route(state: &SharedState, id: Option<Value>, params: RouteParams) -> Response {
    let start = Instant::now();
    debug!("Route request: {} -> {}", params.start, params.end);

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct RouteReply {
        #[serde(flatten)]
        route: RouteResult,
        hops: usize,
        duration: RouteDuration,
        duration_text: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        pixels: Option<Vec<CanvasPoint>>,
        query_time: u64,
    }

    match state.store.find_shortest_path(&params.start, &params.end) {
        Ok(route) => {
            let pixels = params.canvas.map(|canvas| {
                state.canvas.to_canvas_all(
                    route.coordinates.iter().copied(),
                    canvas.width,
                    canvas.height,
                )
            });
            let duration = route.duration();
            Response::success(
                id,
                RouteReply {
                    hops: route.hops(),
                    duration_text: duration.to_string(),
                    duration,
                    route,
                    pixels,
                    query_time: start.elapsed().as_millis() as u64,
                },
            )
        }
        Err(e @ RouteError::UnknownEndpoint(_)) => {
            Response::error(id, UNKNOWN_ENDPOINT, e.to_string())
        }
        Err(e @ RouteError::NoRoute { .. }) => Response::error(id, NO_ROUTE, e.to_string()),
    }
}

/// Handles the graph.reload method.
pub async fn handle_reload(state: &SharedState, id: Option<Value>) -> Response {
    match state.reload().await {
        Ok(report) => Response::success(id, report),
        Err(e) => Response::error(id, RELOAD_FAILED, e.to_string()),
    }
}
