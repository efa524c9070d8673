//! JSON-RPC 2.0 protocol layer for tool discovery and dispatch.
//!
//! Defines the wire types and routes incoming requests to the tool
//! handlers. Tool-level failures are returned inside the `tools/call`
//! result with `isError` set, so they reach the caller as data rather than
//! protocol errors; JSON-RPC errors are reserved for malformed requests
//! and unknown methods.

use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::core::{DirectoryMcpServer, ToolResult};
use super::{handlers, tools};
use crate::directory::DirectoryClient;

/// MCP protocol revision implemented by this server.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// JSON-RPC 2.0 request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    /// Protocol version, must be "2.0".
    pub jsonrpc: String,
    /// Method name to invoke.
    pub method: String,
    /// Method parameters.
    #[serde(default)]
    pub params: Value,
    /// Request id; absent for notifications.
    #[serde(default)]
    pub id: Option<Value>,
}

/// JSON-RPC 2.0 response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
    pub id: Option<Value>,
}

impl JsonRpcResponse {
    /// Success response echoing the request id.
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            result: Some(result),
            error: None,
            id,
        }
    }

    /// Error response echoing the request id.
    pub fn error(id: Option<Value>, error: JsonRpcError) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(error),
            id,
        }
    }
}

/// JSON-RPC 2.0 error object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcError {
    /// Parse error (-32700).
    pub fn parse_error(message: impl Into<String>) -> Self {
        Self {
            code: -32700,
            message: message.into(),
            data: None,
        }
    }

    /// Invalid request (-32600).
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            code: -32600,
            message: message.into(),
            data: None,
        }
    }

    /// Method not found (-32601).
    pub fn method_not_found(method: impl Into<String>) -> Self {
        Self {
            code: -32601,
            message: format!("Method not found: {}", method.into()),
            data: None,
        }
    }

    /// Invalid params (-32602).
    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self {
            code: -32602,
            message: message.into(),
            data: None,
        }
    }
}

impl<C: DirectoryClient> DirectoryMcpServer<C> {
    /// Tool definitions served from `tools/list`.
    pub fn get_tools(&self) -> Vec<Value> {
        vec![
            tools::create_user_tool(),
            tools::read_user_tool(),
            tools::update_user_tool(),
            tools::delete_user_tool(),
        ]
    }

    /// Execute a tool by name.
    pub async fn execute_tool(&self, tool_name: &str, arguments: Value) -> ToolResult {
        debug!("executing tool {tool_name}");

        match tool_name {
            "create_user" => handlers::handle_create_user(self, arguments).await,
            "read_user" => handlers::handle_read_user(self, arguments).await,
            "update_user" => handlers::handle_update_user(self, arguments).await,
            "delete_user" => handlers::handle_delete_user(self, arguments).await,
            _ => ToolResult {
                success: false,
                content: json!({
                    "error": {
                        "kind": "InvalidInputError",
                        "message": format!("unknown tool: {tool_name}"),
                    }
                }),
                metadata: None,
            },
        }
    }

    /// Route one JSON-RPC request. Returns `None` for notifications, which
    /// take no response.
    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.jsonrpc != "2.0" {
            return Some(JsonRpcResponse::error(
                request.id,
                JsonRpcError::invalid_request("jsonrpc must be '2.0'"),
            ));
        }

        if request.method.starts_with("notifications/") {
            debug!("ignoring notification {}", request.method);
            return None;
        }

        Some(match request.method.as_str() {
            "initialize" => self.handle_initialize(request),
            "ping" => JsonRpcResponse::success(request.id, json!({})),
            "tools/list" => {
                JsonRpcResponse::success(request.id, json!({ "tools": self.get_tools() }))
            }
            "tools/call" => self.handle_tools_call(request).await,
            _ => JsonRpcResponse::error(
                request.id,
                JsonRpcError::method_not_found(&request.method),
            ),
        })
    }

    fn handle_initialize(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        let info = self.server_info();
        JsonRpcResponse::success(
            request.id,
            json!({
                "protocolVersion": PROTOCOL_VERSION,
                "serverInfo": {
                    "name": info.name,
                    "version": info.version,
                },
                "capabilities": { "tools": {} },
                "instructions": info.description,
            }),
        )
    }

    async fn handle_tools_call(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        let JsonRpcRequest { id, params, .. } = request;

        let Some(params) = params.as_object() else {
            return JsonRpcResponse::error(id, JsonRpcError::invalid_params("params must be an object"));
        };

        let Some(tool_name) = params.get("name").and_then(Value::as_str) else {
            return JsonRpcResponse::error(id, JsonRpcError::invalid_params("missing 'name' field"));
        };

        let arguments = params
            .get("arguments")
            .cloned()
            .unwrap_or_else(|| Value::Object(serde_json::Map::new()));

        let result = self.execute_tool(tool_name, arguments).await;

        let text = serde_json::to_string_pretty(&result.content)
            .unwrap_or_else(|_| result.content.to_string());

        JsonRpcResponse::success(
            id,
            json!({
                "content": [{ "type": "text", "text": text }],
                "isError": !result.success,
            }),
        )
    }
}
