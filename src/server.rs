use std::{net::SocketAddr, str::FromStr, sync::Arc};

use axum::{Extension, Router, routing::get};
use tokio::sync::Mutex;

use crate::{api, config, spotify::Catalog, types::PkceToken};

/// Shared state of the analysis API.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn Catalog>,
}

impl AppState {
    pub fn new(catalog: Arc<dyn Catalog>) -> Self {
        Self { catalog }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/playlist/{id}/analyze", get(api::analyze))
        .with_state(state)
}

pub async fn start_api_server(state: AppState) -> Result<(), String> {
    let addr = bind_addr()?;
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| format!("Failed to bind {}: {}", addr, e))?;

    tracing::info!(%addr, "analysis API listening");
    axum::serve(listener, build_router(state))
        .await
        .map_err(|e| e.to_string())
}

/// Serves the OAuth redirect target for the duration of a login.
pub async fn start_callback_server(state: Arc<Mutex<Option<PkceToken>>>) -> Result<(), String> {
    let app = Router::new()
        .route("/health", get(api::health))
        .route("/callback", get(api::callback).layer(Extension(state)));

    let addr = bind_addr()?;
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| format!("Failed to bind {}: {}", addr, e))?;
    axum::serve(listener, app).await.map_err(|e| e.to_string())
}

fn bind_addr() -> Result<SocketAddr, String> {
    let raw = config::server_addr();
    SocketAddr::from_str(&raw).map_err(|e| format!("Failed to parse server address {}: {}", raw, e))
}
