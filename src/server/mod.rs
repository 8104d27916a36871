//! HTTP surface for the search pipeline

pub mod search;

use crate::backend::LyricsBackend;
use axum::{Json, Router, routing::get};
use serde::Serialize;
use serde_json::{Value, json};
use std::sync::Arc;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<dyn LyricsBackend>,
}

impl AppState {
    pub fn new(backend: Arc<dyn LyricsBackend>) -> Self {
        Self { backend }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub module: String,
    pub version: String,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/_ping", get(ping))
        .route("/health", get(health))
        .route("/search", get(search::search_lyrics))
        .with_state(state)
}

async fn root() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn ping() -> Json<Value> {
    Json(json!({ "pong": true }))
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        module: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Serve until Ctrl-C.
pub async fn serve(listener: tokio::net::TcpListener, state: AppState) -> anyhow::Result<()> {
    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::warn!("failed to listen for ctrl-c: {e}");
                std::future::pending::<()>().await;
            }
            tracing::info!("shutting down");
        })
        .await?;
    Ok(())
}
