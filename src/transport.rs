//! HTTP/SSE transport.
//!
//! Serves the MCP wire contract over two endpoints:
//!
//! - `GET /sse` opens a session: the server allocates a session id, emits an
//!   `endpoint` event carrying the POST path for that session, then streams
//!   every response as a `message` event.
//! - `POST /messages?sessionId={id}` accepts one JSON-RPC request and
//!   returns `202 Accepted` immediately; the response travels back over the
//!   session's SSE stream.
//!
//! Sessions are tracked in a shared registry keyed by UUID. A watcher task
//! removes the entry as soon as the SSE stream's channel closes, so a
//! dropped connection cannot leak its slot.

use std::collections::HashMap;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::sse::{Event as SseEvent, KeepAlive};
use axum::response::{IntoResponse, Sse};
use axum::routing::{get, post};
use log::{debug, info, warn};
use serde::Deserialize;
use tokio::sync::{Mutex, mpsc};
use tokio_stream::StreamExt as _;
use tokio_stream::wrappers::ReceiverStream;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use crate::directory::DirectoryClient;
use crate::error::AdapterResult;
use crate::mcp::{DirectoryMcpServer, JsonRpcError, JsonRpcRequest, JsonRpcResponse};

/// Outbound message buffer per session. Responses are small; a slow
/// consumer only ever has a handful in flight.
const SESSION_CHANNEL_CAPACITY: usize = 64;

/// Active SSE sessions keyed by session id.
#[derive(Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<Mutex<HashMap<Uuid, mpsc::Sender<JsonRpcResponse>>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new session and return its id with the receive half.
    pub async fn open(&self) -> (Uuid, mpsc::Receiver<JsonRpcResponse>) {
        let session_id = Uuid::new_v4();
        let (tx, rx) = mpsc::channel(SESSION_CHANNEL_CAPACITY);

        self.sessions.lock().await.insert(session_id, tx.clone());

        // Reap the entry once the stream side drops its receiver.
        let registry = self.clone();
        tokio::spawn(async move {
            tx.closed().await;
            registry.close(session_id).await;
        });

        (session_id, rx)
    }

    /// Remove a session. Safe to call after the session is already gone.
    pub async fn close(&self, session_id: Uuid) {
        if self.sessions.lock().await.remove(&session_id).is_some() {
            info!("session {session_id} closed");
        }
    }

    /// Sender for a live session, if any.
    pub async fn sender(&self, session_id: Uuid) -> Option<mpsc::Sender<JsonRpcResponse>> {
        self.sessions.lock().await.get(&session_id).cloned()
    }

    /// Number of live sessions.
    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.lock().await.is_empty()
    }
}

struct TransportState<C: DirectoryClient> {
    server: DirectoryMcpServer<C>,
    registry: SessionRegistry,
}

#[derive(Debug, Deserialize)]
struct SessionQuery {
    #[serde(rename = "sessionId")]
    session_id: Uuid,
}

/// Build the transport router around an MCP server.
pub fn build_router<C: DirectoryClient + 'static>(server: DirectoryMcpServer<C>) -> Router {
    let state = Arc::new(TransportState {
        server,
        registry: SessionRegistry::new(),
    });

    Router::new()
        .route("/sse", get(sse_handler::<C>))
        .route("/messages", post(messages_handler::<C>))
        .with_state(state)
        .layer(CorsLayer::permissive())
}

/// Bind and serve until the listener fails.
pub async fn serve<C: DirectoryClient + 'static>(
    server: DirectoryMcpServer<C>,
    addr: SocketAddr,
) -> AdapterResult<()> {
    let router = build_router(server);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("listening on {addr}");
    axum::serve(listener, router).await?;
    Ok(())
}

async fn sse_handler<C: DirectoryClient + 'static>(
    State(state): State<Arc<TransportState<C>>>,
) -> Sse<impl tokio_stream::Stream<Item = Result<SseEvent, Infallible>>> {
    let (session_id, rx) = state.registry.open().await;
    info!("session {session_id} opened");

    let endpoint = SseEvent::default()
        .event("endpoint")
        .data(format!("/messages?sessionId={session_id}"));

    let responses = ReceiverStream::new(rx).map(|response| {
        let data = serde_json::to_string(&response)
            .unwrap_or_else(|_| r#"{"jsonrpc":"2.0","result":null,"id":null}"#.to_string());
        Ok(SseEvent::default().event("message").data(data))
    });

    let stream = tokio_stream::once(Ok(endpoint)).chain(responses);

    Sse::new(stream).keep_alive(KeepAlive::default())
}

async fn messages_handler<C: DirectoryClient + 'static>(
    State(state): State<Arc<TransportState<C>>>,
    Query(query): Query<SessionQuery>,
    body: String,
) -> impl IntoResponse {
    let session_id = query.session_id;

    let Some(tx) = state.registry.sender(session_id).await else {
        debug!("message for unknown session {session_id}");
        return (StatusCode::NOT_FOUND, "unknown session");
    };

    let request: JsonRpcRequest = match serde_json::from_str(&body) {
        Ok(request) => request,
        Err(error) => {
            let response = JsonRpcResponse::error(
                None,
                JsonRpcError::parse_error(format!("invalid JSON-RPC payload: {error}")),
            );
            if tx.send(response).await.is_err() {
                warn!("session {session_id} disconnected before parse error delivery");
            }
            return (StatusCode::ACCEPTED, "Accepted");
        }
    };

    // Dispatch off the request path so the POST can return immediately.
    let state = Arc::clone(&state);
    tokio::spawn(async move {
        if let Some(response) = state.server.handle_request(request).await {
            if tx.send(response).await.is_err() {
                warn!("session {session_id} disconnected before response delivery");
            }
        }
    });

    (StatusCode::ACCEPTED, "Accepted")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_registers_session() {
        let registry = SessionRegistry::new();
        let (session_id, _rx) = registry.open().await;

        assert_eq!(registry.len().await, 1);
        assert!(registry.sender(session_id).await.is_some());
    }

    #[tokio::test]
    async fn test_close_removes_session() {
        let registry = SessionRegistry::new();
        let (session_id, _rx) = registry.open().await;

        registry.close(session_id).await;

        assert!(registry.is_empty().await);
        assert!(registry.sender(session_id).await.is_none());
    }

    #[tokio::test]
    async fn test_dropped_receiver_reaps_session() {
        let registry = SessionRegistry::new();
        let (session_id, rx) = registry.open().await;

        drop(rx);

        // The watcher runs on a spawned task; give it a few polls.
        for _ in 0..50 {
            if registry.sender(session_id).await.is_none() {
                return;
            }
            tokio::task::yield_now().await;
        }
        panic!("session was not reaped after receiver drop");
    }

    #[tokio::test]
    async fn test_sender_delivers_to_receiver() {
        let registry = SessionRegistry::new();
        let (session_id, mut rx) = registry.open().await;

        let tx = registry.sender(session_id).await.unwrap();
        tx.send(JsonRpcResponse::success(
            Some(serde_json::json!(1)),
            serde_json::json!({}),
        ))
        .await
        .unwrap();

        let response = rx.recv().await.unwrap();
        assert_eq!(response.id, Some(serde_json::json!(1)));
    }
}
