//! WebSocket server implementation.
//!
//! Handles client connections, routes requests to handlers and forwards
//! reload notifications.

use crate::handlers::{
    handle_info, handle_landmarks, handle_node_get, handle_nodes_by_kind, handle_reload,
    handle_route, handle_walkable_edges,
};
use crate::protocol::{NodeGetParams, NodesByKindParams, Request, Response, RouteParams};
use crate::SharedState;
use futures_util::{SinkExt, StreamExt};
use std::net::SocketAddr;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::broadcast;
use tokio_tungstenite::{accept_async, tungstenite::Message};
use tracing::{debug, error, info, warn};

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to.
    pub addr: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 7480)),
        }
    }
}

/// The Campus Route WebSocket server.
pub struct CampusServer {
    config: ServerConfig,
    state: SharedState,
}

impl CampusServer {
    pub fn new(state: SharedState, config: ServerConfig) -> Self {
        Self { config, state }
    }

    /// Runs the server, accepting connections forever.
    pub async fn run(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let listener = TcpListener::bind(&self.config.addr).await?;
        info!("Campus server listening on ws://{}", self.config.addr);

        loop {
            match listener.accept().await {
                Ok((stream, addr)) => {
                    debug!("New connection from {}", addr);
                    let state = self.state.clone();
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(stream, addr, state).await {
                            error!("Connection error from {}: {}", addr, e);
                        }
                    });
                }
                Err(e) => {
                    error!("Accept error: {}", e);
                }
            }
        }
    }
}

/// Handles a single WebSocket connection.
async fn handle_connection(
    stream: TcpStream,
    addr: SocketAddr,
    state: SharedState,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let ws_stream = accept_async(stream).await?;
    info!("WebSocket connection established with {}", addr);

    let (mut write, mut read) = ws_stream.split();
    let mut events = state.subscribe();

    loop {
        tokio::select! {
            msg = read.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let response = process_message(&text, &state).await;
                        let json = serde_json::to_string(&response)?;
                        write.send(Message::Text(json)).await?;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        write.send(Message::Pong(data)).await?;
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        debug!("Client {} disconnected", addr);
                        break;
                    }
                    Some(Err(e)) => {
                        warn!("Message error from {}: {}", addr, e);
                        break;
                    }
                    Some(Ok(_)) => {}
                }
            }

            event = events.recv() => {
                match event {
                    Ok(event) => {
                        let json = serde_json::to_string(&event)?;
                        if write.send(Message::Text(json)).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        warn!("Client {} lagged by {} events", addr, n);
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }

    info!("Connection closed: {}", addr);
    Ok(())
}

/// Processes a JSON-RPC message and returns a response.
pub(crate) async fn process_message(text: &str, state: &SharedState) -> Response {
    let request: Request = match serde_json::from_str(text) {
        Ok(r) => r,
        Err(_) => return Response::parse_error(),
    };

    let id = request.id.clone();
    let method = request.method.as_str();

    debug!("Processing method: {}", method);

    match method {
        "graph.info" => handle_info(state, id).await,

        "graph.reload" => handle_reload(state, id).await,

        "node.get" => match serde_json::from_value::<NodeGetParams>(request.params) {
            Ok(params) => handle_node_get(state, id, params).await,
            Err(e) => Response::invalid_params(id, e.to_string()),
        },

        "nodes.byKind" => match serde_json::from_value::<NodesByKindParams>(request.params) {
            Ok(params) => handle_nodes_by_kind(state, id, params).await,
            Err(e) => Response::invalid_params(id, e.to_string()),
        },

        "landmarks" => handle_landmarks(state, id).await,

        "edges.walkable" => handle_walkable_edges(state, id).await,

        "route.find" => match serde_json::from_value::<RouteParams>(request.params) {
            Ok(params) => handle_route(state, id, params).await,
            Err(e) => Response::invalid_params(id, e.to_string()),
        },

        _ => Response::method_not_found(id, method),
    }
}
