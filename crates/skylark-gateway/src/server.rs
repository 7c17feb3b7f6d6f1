// SPDX-FileCopyrightText: 2026 Skylark Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state.

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use skylark_agent::Orchestrator;
use skylark_core::{SkylarkError, TranscriptStore};

use crate::auth::{AuthConfig, auth_middleware};
use crate::handlers;

/// Body limit for the upload route: the 5 MiB payload cap plus multipart
/// framing overhead.
const UPLOAD_BODY_LIMIT: usize = 8 * 1024 * 1024;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
    pub transcripts: Arc<dyn TranscriptStore>,
    /// Directory where uploaded files are written.
    pub uploads_dir: PathBuf,
    /// Process start time for uptime reporting.
    pub start_time: std::time::Instant,
}

/// Builds the router:
/// - GET  /health            (public)
/// - POST /api/chat          (auth; SSE streaming)
/// - DELETE /api/chat        (auth)
/// - POST /api/files/upload  (auth)
pub fn build_router(state: AppState, auth: AuthConfig) -> Router {
    let public_routes = Router::new()
        .route("/health", get(handlers::get_health))
        .with_state(state.clone());

    let api_routes = Router::new()
        .route(
            "/api/chat",
            post(handlers::post_chat).delete(handlers::delete_chat),
        )
        .route(
            "/api/files/upload",
            post(handlers::upload_file).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route_layer(axum_middleware::from_fn_with_state(auth, auth_middleware))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Binds and serves the router until ctrl-c.
pub async fn start_server(host: &str, port: u16, app: Router) -> Result<(), SkylarkError> {
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| SkylarkError::Internal(format!("failed to bind gateway to {addr}: {e}")))?;

    tracing::info!("gateway listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| SkylarkError::Internal(format!("gateway server error: {e}")))?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}
