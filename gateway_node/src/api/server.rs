//! HTTP transport (encode-only).
//!
//! Consumes the dispatch engine without a signer: queries execute directly,
//! mutations come back as unsigned transaction payloads for the caller to
//! sign. Caller errors surface as 400, chain-call failures as 500.

use crate::config::GatewayConfig;
use crate::ops::build::Capabilities;
use crate::ops::catalogue;
use crate::ops::dispatch::DispatchEngine;
use crate::ops::outcome::Outcome;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{Json, Response};
use axum::routing::{get, post};
use axum::Router;
use log::info;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// Shared state for the HTTP transport.
pub struct HttpState {
    pub engine: DispatchEngine,
    pub config: GatewayConfig,
}

pub struct HttpServer {
    port: u16,
    state: Arc<HttpState>,
}

impl HttpServer {
    pub fn new(port: u16, state: Arc<HttpState>) -> Self {
        Self { port, state }
    }

    pub fn router(state: Arc<HttpState>) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        Router::new()
            .route("/", get(root_docs))
            .route("/health", get(health))
            .route("/tools", get(list_tools))
            .route("/tools/call", post(call_tool))
            .layer(middleware::from_fn(log_requests))
            .layer(cors)
            .with_state(state)
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let app = Self::router(self.state);
        let listener = tokio::net::TcpListener::bind(("0.0.0.0", self.port)).await?;
        info!("gateway HTTP server listening on port {}", self.port);
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("received shutdown signal, exiting gracefully");
    }
}

async fn log_requests(request: Request, next: Next) -> Response {
    info!("{} {}", request.method(), request.uri().path());
    next.run(request).await
}

async fn root_docs() -> Json<Value> {
    Json(json!({
        "name": "Unlock Contract Gateway",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Gateway for Unlock Protocol contract operations on Base networks",
        "endpoints": {
            "GET /": "This documentation",
            "GET /health": "Health check",
            "GET /tools": "List available operations",
            "POST /tools/call": "Execute an operation",
        },
        "supportedChains": [8453, 84532],
        "toolsCount": catalogue::OPERATIONS.len(),
    }))
}

async fn health(State(state): State<Arc<HttpState>>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "tools": catalogue::OPERATIONS.len(),
        "supportedChains": [8453, 84532],
        "unlockAddress": format!("{:#x}", state.config.factory_address),
        "defaultLockAddress": state
            .config
            .default_lock_address
            .map(|address| format!("{address:#x}")),
    }))
}

async fn list_tools() -> Json<Value> {
    Json(json!({ "tools": catalogue::listing() }))
}

#[derive(Debug, Deserialize)]
struct ToolCallRequest {
    name: String,
    #[serde(default)]
    arguments: Value,
}

async fn call_tool(
    State(state): State<Arc<HttpState>>,
    Json(request): Json<ToolCallRequest>,
) -> (StatusCode, Json<Value>) {
    let outcome = state
        .engine
        .dispatch(
            &request.name,
            &request.arguments,
            Capabilities { can_submit: false },
        )
        .await;
    (status_for(&outcome), Json(outcome.to_json()))
}

fn status_for(outcome: &Outcome) -> StatusCode {
    match outcome.failure_kind() {
        None => StatusCode::OK,
        Some(kind) if kind.is_caller_error() => StatusCode::BAD_REQUEST,
        Some(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
