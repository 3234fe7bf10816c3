//! Axum router construction for the game API.
//!
//! Assembles all routes (REST + `WebSocket`) into a single [`Router`]
//! with CORS middleware enabled for cross-origin frontend access.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;
use crate::ws;

/// Build the complete Axum router for the game server.
///
/// The router includes:
/// - `GET /` -- minimal HTML status page
/// - `GET /health` -- liveness probe
/// - `GET /api/me` -- player identity (minting a cookie on first call)
/// - `POST /api/logout` -- expire the identity cookie
/// - `GET /api/state` -- whole game state snapshot
/// - `GET /api/catalog` -- current planet's building catalog
/// - `GET /api/skills` -- skill table with derived states
/// - `POST /api/command` -- execute one game command
/// - `GET /api/ws` -- `WebSocket` tick summary stream
///
/// CORS is configured to allow any origin for development. In
/// production this should be restricted.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Status page and liveness
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        // Identity
        .route("/api/me", get(handlers::me))
        .route("/api/logout", post(handlers::logout))
        // Game reads
        .route("/api/state", get(handlers::get_state))
        .route("/api/catalog", get(handlers::get_catalog))
        .route("/api/skills", get(handlers::get_skills))
        // Commands
        .route("/api/command", post(handlers::post_command))
        // WebSocket
        .route("/api/ws", get(ws::ws_ticks))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
