//! MCP server for Azure AD / Entra ID user management.
//!
//! Bridges the Model Context Protocol to the Microsoft Graph users API:
//! an MCP client connects over SSE, discovers four tools (`create_user`,
//! `read_user`, `update_user`, `delete_user`), and invokes them with JSON
//! payloads; each invocation becomes at most one Graph call authorized by
//! an OAuth2 client-credentials token.
//!
//! # Architecture
//!
//! - [`config`] — environment-driven configuration, validated at startup
//! - [`auth`] — token acquisition and the shared credential cache
//! - [`directory`] — the [`directory::DirectoryClient`] trait and its
//!   data types
//! - [`graph`] — the Microsoft Graph implementation of the trait
//! - [`mcp`] — tool schemas, handlers, and JSON-RPC dispatch
//! - [`transport`] — HTTP/SSE session plumbing
//!
//! The MCP layer is generic over [`directory::DirectoryClient`], so tests
//! drive the full protocol path against an in-memory directory.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use entra_mcp_server::auth::{ClientSecretCredential, CredentialManager};
//! use entra_mcp_server::config::AdapterConfig;
//! use entra_mcp_server::graph::GraphDirectoryClient;
//! use entra_mcp_server::mcp::DirectoryMcpServer;
//!
//! # async fn run() -> entra_mcp_server::error::AdapterResult<()> {
//! let config = AdapterConfig::from_env()?;
//! let addr = std::net::SocketAddr::from(([0, 0, 0, 0], config.port));
//! let credentials = CredentialManager::new(Arc::new(ClientSecretCredential::new(&config)));
//! let directory = GraphDirectoryClient::new(credentials)?;
//! let server = DirectoryMcpServer::new(directory);
//! entra_mcp_server::transport::serve(server, addr).await
//! # }
//! ```

pub mod auth;
pub mod config;
pub mod directory;
pub mod error;
pub mod graph;
pub mod mcp;
pub mod transport;

pub use config::AdapterConfig;
pub use directory::{DirectoryClient, NewUser, UserChanges, UserRecord};
pub use error::{AdapterError, AdapterResult};
pub use graph::GraphDirectoryClient;
pub use mcp::{DirectoryMcpServer, ServerInfo, ToolResult};
