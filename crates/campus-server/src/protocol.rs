//! JSON-RPC 2.0 message types.

use campus_core::NodeKind;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const PARSE_ERROR: i32 = -32700;
pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INVALID_PARAMS: i32 = -32602;
pub const NODE_NOT_FOUND: i32 = -32001;
pub const UNKNOWN_ENDPOINT: i32 = -32002;
pub const NO_ROUTE: i32 = -32003;
pub const RELOAD_FAILED: i32 = -32004;

/// An incoming request.
#[derive(Debug, Clone, Deserialize)]
pub struct Request {
    #[serde(default)]
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: Value,
    #[serde(default)]
    pub id: Option<Value>,
}

/// An error object inside a response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
}

/// An outgoing response. Exactly one of `result` and `error` is set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
    pub id: Option<Value>,
}

impl Response {
    pub fn success<T: Serialize>(id: Option<Value>, result: T) -> Self {
        match serde_json::to_value(result) {
            Ok(value) => Self {
                jsonrpc: "2.0".to_string(),
                result: Some(value),
                error: None,
                id,
            },
            Err(e) => Self::error(id, -32603, format!("Internal error: {}", e)),
        }
    }

    pub fn error(id: Option<Value>, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(RpcError {
                code,
                message: message.into(),
            }),
            id,
        }
    }

    pub fn parse_error() -> Self {
        Self::error(None, PARSE_ERROR, "Parse error")
    }

    pub fn invalid_params(id: Option<Value>, message: impl Into<String>) -> Self {
        Self::error(id, INVALID_PARAMS, format!("Invalid params: {}", message.into()))
    }

    pub fn method_not_found(id: Option<Value>, method: &str) -> Self {
        Self::error(id, METHOD_NOT_FOUND, format!("Method not found: {}", method))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NodeGetParams {
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NodesByKindParams {
    pub kind: NodeKind,
}

/// Canvas size in pixels, for routes returned already transformed.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct CanvasSize {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RouteParams {
    pub start: String,
    pub end: String,
    #[serde(default)]
    pub canvas: Option<CanvasSize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_omits_error() {
        let json = serde_json::to_string(&Response::success(Some(Value::from(1)), 42)).unwrap();
        assert!(json.contains("\"result\":42"));
        assert!(!json.contains("error"));
    }

    #[test]
    fn test_request_defaults() {
        let req: Request = serde_json::from_str(r#"{"method": "graph.info"}"#).unwrap();
        assert_eq!(req.method, "graph.info");
        assert!(req.params.is_null());
        assert!(req.id.is_none());
    }
}
