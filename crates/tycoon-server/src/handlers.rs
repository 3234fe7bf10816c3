//! REST API endpoint handlers for the game server.
//!
//! All game reads snapshot the caller's [`Session`] state under its
//! lock, so responses always reflect a state the scheduler actually
//! produced; commands route through the same lock.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/` | Minimal HTML status page |
//! | `GET` | `/health` | Liveness probe |
//! | `GET` | `/api/me` | Player identity (minted on first call) |
//! | `POST` | `/api/logout` | Expire the identity cookie |
//! | `GET` | `/api/state` | Whole game state snapshot |
//! | `GET` | `/api/catalog` | Current planet's building catalog |
//! | `GET` | `/api/skills` | Skill table with derived states |
//! | `POST` | `/api/command` | Execute one game command |
//!
//! [`Session`]: tycoon_core::session::Session

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::header::SET_COOKIE;
use axum::response::{Html, IntoResponse};

use tycoon_core::skills;
use tycoon_types::{Command, PlayerId};
use tycoon_world::find_planet;

use crate::error::ApiError;
use crate::identity;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// GET / -- minimal HTML status page
// ---------------------------------------------------------------------------

/// Serve a minimal HTML page showing server status and API links.
pub async fn index(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let sessions = state.session_count().await;
    let scenario = format!("{:?}", state.config.game.scenario);
    let map_size = state.config.game.map_size;
    let tick_ms = state.config.game.tick_interval_ms;
    let autosave = state.config.game.autosave_every_ticks;

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>Energy Tycoon</title>
    <style>
        body {{
            background: #0d1117;
            color: #c9d1d9;
            font-family: 'Cascadia Code', 'Fira Code', 'Consolas', monospace;
            padding: 2rem;
            max-width: 800px;
            margin: 0 auto;
        }}
        h1 {{ color: #58a6ff; margin-bottom: 0.25rem; }}
        .subtitle {{ color: #8b949e; margin-top: 0; }}
        .metric {{
            display: inline-block;
            background: #161b22;
            border: 1px solid #30363d;
            border-radius: 6px;
            padding: 1rem 1.5rem;
            margin: 0.5rem 0.5rem 0.5rem 0;
            min-width: 120px;
        }}
        .metric .label {{ color: #8b949e; font-size: 0.85rem; }}
        .metric .value {{ color: #58a6ff; font-size: 1.5rem; font-weight: bold; }}
        a {{ color: #58a6ff; text-decoration: none; }}
        a:hover {{ text-decoration: underline; }}
        ul {{ list-style: none; padding: 0; }}
        li {{ padding: 0.3rem 0; }}
        .method {{ color: #7ee787; font-weight: bold; }}
        .method.post {{ color: #d2a8ff; }}
        .status {{ color: #3fb950; font-weight: bold; }}
        hr {{ border: none; border-top: 1px solid #30363d; margin: 1.5rem 0; }}
    </style>
</head>
<body>
    <h1>Energy Tycoon</h1>
    <p class="subtitle">Idle power-grid empire -- game server</p>

    <p>Status: <span class="status">RUNNING</span></p>

    <div>
        <div class="metric">
            <div class="label">Sessions</div>
            <div class="value">{sessions}</div>
        </div>
        <div class="metric">
            <div class="label">Scenario</div>
            <div class="value">{scenario}</div>
        </div>
        <div class="metric">
            <div class="label">Map</div>
            <div class="value">{map_size}x{map_size}</div>
        </div>
        <div class="metric">
            <div class="label">Tick</div>
            <div class="value">{tick_ms}ms</div>
        </div>
        <div class="metric">
            <div class="label">Autosave</div>
            <div class="value">every {autosave}</div>
        </div>
    </div>

    <hr>

    <h2>API Endpoints</h2>
    <ul>
        <li><span class="method">GET</span> <a href="/health">/health</a> -- Liveness probe</li>
        <li><span class="method">GET</span> <a href="/api/me">/api/me</a> -- Player identity (mints a cookie on first call)</li>
        <li><span class="method post">POST</span> /api/logout -- Expire the identity cookie</li>
        <li><span class="method">GET</span> <a href="/api/state">/api/state</a> -- Whole game state snapshot</li>
        <li><span class="method">GET</span> <a href="/api/catalog">/api/catalog</a> -- Current planet's building catalog</li>
        <li><span class="method">GET</span> <a href="/api/skills">/api/skills</a> -- Skill table with derived states</li>
        <li><span class="method post">POST</span> /api/command -- Execute one game command (JSON, tagged "type")</li>
    </ul>

    <h2>WebSocket</h2>
    <ul>
        <li style="list-style:none;"><code>ws://host:port/api/ws</code> -- Live per-tick summary stream</li>
    </ul>
</body>
</html>"#
    ))
}

// ---------------------------------------------------------------------------
// GET /health -- liveness probe
// ---------------------------------------------------------------------------

/// Liveness probe for deployment health checks.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ---------------------------------------------------------------------------
// GET /api/me -- player identity
// ---------------------------------------------------------------------------

/// Return the caller's player identity, minting a new anonymous one
/// (and setting its cookie) when the request carries none.
pub async fn me(headers: HeaderMap) -> impl IntoResponse {
    if let Some(player) = identity::player_from_headers(&headers) {
        return Json(serde_json::json!({ "player": player, "minted": false })).into_response();
    }

    let player = PlayerId::new();
    tracing::info!(player = %player, "Minted new player identity");
    (
        [(SET_COOKIE, identity::identity_cookie(player))],
        Json(serde_json::json!({ "player": player, "minted": true })),
    )
        .into_response()
}

// ---------------------------------------------------------------------------
// POST /api/logout -- expire the identity cookie
// ---------------------------------------------------------------------------

/// Expire the identity cookie. The save document is untouched; the same
/// identity resumes the game if the cookie is ever restored.
pub async fn logout() -> impl IntoResponse {
    (
        [(SET_COOKIE, identity::expired_identity_cookie())],
        Json(serde_json::json!({ "status": "logged_out" })),
    )
}

// ---------------------------------------------------------------------------
// GET /api/state -- whole game state
// ---------------------------------------------------------------------------

/// Return the caller's whole game state.
pub async fn get_state(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let player = identity::require_player(&headers)?;
    let session = state.session(player).await;
    Ok(Json(session.snapshot().await))
}

// ---------------------------------------------------------------------------
// GET /api/catalog -- current planet's building catalog
// ---------------------------------------------------------------------------

/// Return the building catalog of the planet the caller is viewing.
pub async fn get_catalog(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let player = identity::require_player(&headers)?;
    let session = state.session(player).await;
    let snapshot = session.snapshot().await;

    let planet = find_planet(&snapshot.universe, &snapshot.current_planet).ok_or_else(|| {
        ApiError::Internal(format!(
            "current planet '{}' is missing from the universe",
            snapshot.current_planet
        ))
    })?;

    Ok(Json(serde_json::json!({
        "planet": planet.key,
        "name": planet.name,
        "catalog": planet.catalog,
    })))
}

// ---------------------------------------------------------------------------
// GET /api/skills -- skill table with derived states
// ---------------------------------------------------------------------------

/// Return the skill table annotated with each skill's derived state
/// (`locked`, `unlockable`, or `unlocked`) for the caller's game.
pub async fn get_skills(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let player = identity::require_player(&headers)?;
    let session = state.session(player).await;
    let snapshot = session.snapshot().await;

    let entries: Vec<serde_json::Value> = snapshot
        .skills
        .values()
        .map(|skill| {
            serde_json::json!({
                "id": skill.id,
                "name": skill.name,
                "description": skill.description,
                "cost": skill.cost,
                "prerequisites": skill.prerequisites,
                "effect": skill.effect,
                "state": skills::skill_state(skill, &snapshot.skills, snapshot.research_points),
            })
        })
        .collect();

    Ok(Json(serde_json::json!({
        "research_points": snapshot.research_points,
        "skills": entries,
    })))
}

// ---------------------------------------------------------------------------
// POST /api/command -- execute one game command
// ---------------------------------------------------------------------------

/// Execute one command against the caller's game.
///
/// Responds with the command outcome on success; rejections map to
/// `409`, unknown entities to `404`, and internal inconsistencies to
/// `500` (see [`ApiError`]).
pub async fn post_command(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(command): Json<Command>,
) -> Result<impl IntoResponse, ApiError> {
    let player = identity::require_player(&headers)?;
    let session = state.session(player).await;
    let outcome = session.handle_command(command).await?;
    Ok(Json(outcome))
}
