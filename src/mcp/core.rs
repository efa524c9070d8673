//! Core MCP integration types.
//!
//! [`DirectoryMcpServer`] is the entry point: it binds the four user tools
//! to a directory client and is shared (behind an `Arc`) across all
//! concurrent sessions. It holds no per-session state.

use serde_json::{Value, json};

use crate::directory::DirectoryClient;
use crate::error::AdapterError;

/// Server metadata reported to callers during MCP initialization.
#[derive(Debug, Clone)]
pub struct ServerInfo {
    /// Human-readable server name.
    pub name: String,
    /// Version string.
    pub version: String,
    /// Short description of what the tools manage.
    pub description: String,
}

impl Default for ServerInfo {
    fn default() -> Self {
        Self {
            name: "entra-mcp-server".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            description: "Azure AD / Entra ID user management tools".to_string(),
        }
    }
}

/// Outcome of one tool invocation.
///
/// Failures carry a structured `{"error": {"kind", "message"}}` body so a
/// caller can branch on the error kind without parsing prose.
#[derive(Debug, Clone)]
pub struct ToolResult {
    /// Whether the invocation succeeded.
    pub success: bool,
    /// Result content: the user representation, an acknowledgement, or the
    /// error body.
    pub content: Value,
    /// Operation context (tool name, target user id).
    pub metadata: Option<Value>,
}

impl ToolResult {
    /// Successful result with operation metadata.
    pub fn ok(content: Value, metadata: Value) -> Self {
        Self {
            success: true,
            content,
            metadata: Some(metadata),
        }
    }

    /// Convert an adapter error into the failure envelope.
    pub fn failure(operation: &str, error: &AdapterError) -> Self {
        Self {
            success: false,
            content: json!({
                "error": {
                    "kind": error.kind(),
                    "message": error.to_string(),
                }
            }),
            metadata: Some(json!({ "operation": operation })),
        }
    }

    /// The wire-level error kind, if this is a failure.
    pub fn error_kind(&self) -> Option<&str> {
        self.content
            .get("error")
            .and_then(|e| e.get("kind"))
            .and_then(Value::as_str)
    }
}

/// MCP server binding the four user tools to a directory client.
///
/// # Type parameters
///
/// * `C` - the directory client implementation; production wiring uses
///   [`crate::graph::GraphDirectoryClient`], tests substitute a mock.
pub struct DirectoryMcpServer<C: DirectoryClient> {
    pub(crate) directory: C,
    server_info: ServerInfo,
}

impl<C: DirectoryClient> DirectoryMcpServer<C> {
    /// Create a server with default metadata.
    pub fn new(directory: C) -> Self {
        Self {
            directory,
            server_info: ServerInfo::default(),
        }
    }

    /// Create a server with custom metadata.
    pub fn with_info(directory: C, server_info: ServerInfo) -> Self {
        Self {
            directory,
            server_info,
        }
    }

    /// Server metadata for introspection.
    pub fn server_info(&self) -> &ServerInfo {
        &self.server_info
    }
}
