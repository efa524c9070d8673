//! Model Context Protocol integration.
//!
//! Exposes the four directory user operations as MCP tools: schema discovery
//! through `tools/list`, execution through `tools/call`, and the JSON-RPC
//! plumbing both ride on. The HTTP/SSE surface lives in
//! [`crate::transport`]; this module is transport-agnostic.
//!
//! Layout mirrors the operation flow:
//!
//! - [`core`] — server struct, server metadata, tool result envelope
//! - [`protocol`] — JSON-RPC 2.0 types and request dispatch
//! - [`tools`] — tool schema definitions for discovery
//! - [`handlers`] — per-tool validation and directory calls

pub mod core;
pub mod handlers;
pub mod protocol;
pub mod tools;

pub use core::{DirectoryMcpServer, ServerInfo, ToolResult};
pub use protocol::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, PROTOCOL_VERSION};
