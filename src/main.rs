//! Server binary.
//!
//! Reads configuration from the environment, wires the Graph directory
//! client into the MCP server, and serves the SSE transport until the
//! process is stopped. Missing or empty credentials abort startup before
//! the listener binds.

use std::net::SocketAddr;
use std::process;
use std::sync::Arc;

use log::{error, info};

use entra_mcp_server::auth::{ClientSecretCredential, CredentialManager};
use entra_mcp_server::config::AdapterConfig;
use entra_mcp_server::graph::GraphDirectoryClient;
use entra_mcp_server::mcp::DirectoryMcpServer;
use entra_mcp_server::transport;

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match AdapterConfig::from_env() {
        Ok(config) => config,
        Err(error) => {
            error!("configuration error: {error}");
            process::exit(1);
        }
    };

    let credentials = CredentialManager::new(Arc::new(ClientSecretCredential::new(&config)));

    let directory = match GraphDirectoryClient::new(credentials) {
        Ok(directory) => directory,
        Err(error) => {
            error!("startup error: {error}");
            process::exit(1);
        }
    };

    let server = DirectoryMcpServer::new(directory);
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("starting MCP server for tenant {}", config.tenant_id);

    if let Err(error) = transport::serve(server, addr).await {
        error!("server error: {error}");
        process::exit(1);
    }
}
