//! HTTP transport for the MCP server.
//!
//! Serves JSON-RPC over POST plus an SSE channel for clients that
//! prefer streaming, with a plain health endpoint alongside.

use crate::error::McpError;
use crate::protocol::{JsonRpcRequest, JsonRpcResponse};
use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Sse},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::Arc;
use tokio::sync::{RwLock, mpsc};

/// Shared state for the HTTP handlers.
pub struct HttpTransportState {
    /// Channel for forwarding requests to the MCP server loop.
    request_tx: mpsc::Sender<(JsonRpcRequest, mpsc::Sender<JsonRpcResponse>)>,
    /// Active SSE connections keyed by session id.
    sse_connections: RwLock<HashMap<String, mpsc::Sender<SseEvent>>>,
}

impl HttpTransportState {
    pub fn new(
        request_tx: mpsc::Sender<(JsonRpcRequest, mpsc::Sender<JsonRpcResponse>)>,
    ) -> Self {
        Self {
            request_tx,
            sse_connections: RwLock::new(HashMap::new()),
        }
    }
}

/// An event pushed over an SSE connection.
#[derive(Debug, Clone, Serialize)]
pub struct SseEvent {
    pub event: String,
    pub data: serde_json::Value,
}

/// Query parameters for the MCP endpoint.
#[derive(Debug, Deserialize)]
pub struct McpQuery {
    /// Session id for SSE connections.
    session_id: Option<String>,
}

/// Build the router for the MCP HTTP transport.
pub fn create_router(state: Arc<HttpTransportState>) -> Router {
    Router::new()
        .route("/mcp", post(handle_mcp_post))
        .route("/mcp", get(handle_mcp_sse))
        .route("/health", get(handle_health))
        .with_state(state)
}

/// POST /mcp carries a single JSON-RPC request and returns its response.
async fn handle_mcp_post(
    State(state): State<Arc<HttpTransportState>>,
    Json(request): Json<JsonRpcRequest>,
) -> impl IntoResponse {
    let (response_tx, mut response_rx) = mpsc::channel(1);

    if state.request_tx.send((request, response_tx)).await.is_err() {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(JsonRpcResponse::error(
                None,
                -32603,
                "MCP server unavailable",
            )),
        );
    }

    match response_rx.recv().await {
        Some(response) => (StatusCode::OK, Json(response)),
        None => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(JsonRpcResponse::error(
                None,
                -32603,
                "No response from MCP server",
            )),
        ),
    }
}

/// GET /mcp opens an SSE stream for the session.
async fn handle_mcp_sse(
    State(state): State<Arc<HttpTransportState>>,
    Query(query): Query<McpQuery>,
) -> impl IntoResponse {
    let session_id = query
        .session_id
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    let (event_tx, event_rx) = mpsc::channel(100);

    state
        .sse_connections
        .write()
        .await
        .insert(session_id.clone(), event_tx);

    let stream = async_stream::stream! {
        let mut rx = event_rx;
        while let Some(event) = rx.recv().await {
            let data = serde_json::to_string(&event.data).unwrap_or_default();
            yield Ok::<_, Infallible>(axum::response::sse::Event::default()
                .event(event.event)
                .data(data));
        }
    };

    Sse::new(stream).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(std::time::Duration::from_secs(30))
            .text("ping"),
    )
}

async fn handle_health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "gavel-mcp",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// HTTP server hosting the MCP transport.
pub struct HttpServer {
    host: String,
    port: u16,
    state: Arc<HttpTransportState>,
}

impl HttpServer {
    pub fn new(
        host: &str,
        port: u16,
        request_tx: mpsc::Sender<(JsonRpcRequest, mpsc::Sender<JsonRpcResponse>)>,
    ) -> Self {
        Self {
            host: host.to_string(),
            port,
            state: Arc::new(HttpTransportState::new(request_tx)),
        }
    }

    /// Bind and serve until the process exits.
    pub async fn run(self) -> Result<(), McpError> {
        let app = create_router(self.state);

        let addr = format!("{}:{}", self.host, self.port);
        let listener = tokio::net::TcpListener::bind(&addr).await.map_err(|e| {
            McpError::StartupFailed(format!("Failed to bind to {}: {}", addr, e))
        })?;

        tracing::info!(%addr, "MCP HTTP server listening");

        axum::serve(listener, app)
            .await
            .map_err(|e| McpError::Internal(e.into()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    #[tokio::test]
    async fn health_endpoint_responds() {
        let (tx, _rx) = mpsc::channel(1);
        let state = Arc::new(HttpTransportState::new(tx));
        let app = create_router(state);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
