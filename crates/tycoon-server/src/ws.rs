//! `WebSocket` handler for real-time tick summary streaming.
//!
//! Clients connect to `GET /api/ws` and receive a JSON-encoded
//! [`TickSummary`](tycoon_types::TickSummary) each time their session's
//! scheduler completes a tick. The handler uses a
//! [`broadcast::Receiver`](tokio::sync::broadcast::Receiver), so every
//! connection of the same player sees the same stream.
//!
//! If a client falls behind, lagged summaries are silently skipped and
//! the client resumes from the most recent tick.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use tracing::{debug, warn};

use tycoon_core::session::Session;

use crate::error::ApiError;
use crate::identity;
use crate::state::AppState;

/// Upgrade an HTTP request to a `WebSocket` connection and begin
/// streaming the caller's tick summaries.
///
/// # Route
///
/// `GET /api/ws`
pub async fn ws_ticks(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let player = identity::require_player(&headers)?;
    let session = state.session(player).await;
    Ok(ws.on_upgrade(move |socket| handle_ws(socket, session)))
}

/// Handle the `WebSocket` lifecycle: subscribe to the session's tick
/// broadcast and forward each summary as a text frame.
async fn handle_ws(mut socket: WebSocket, session: Arc<Session>) {
    debug!(player = %session.player(), "WebSocket client connected");

    let mut rx = session.subscribe();

    loop {
        tokio::select! {
            // Receive a tick summary from the scheduler.
            result = rx.recv() => {
                match result {
                    Ok(summary) => {
                        let json = match serde_json::to_string(&summary) {
                            Ok(j) => j,
                            Err(e) => {
                                warn!("Failed to serialize tick summary: {e}");
                                continue;
                            }
                        };
                        let msg: Message = Message::Text(json.into());
                        if socket.send(msg).await.is_err() {
                            debug!("WebSocket client disconnected (send failed)");
                            return;
                        }
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(n)) => {
                        debug!(skipped = n, "WebSocket client lagged, skipping ahead");
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => {
                        debug!("Broadcast channel closed, shutting down WebSocket");
                        return;
                    }
                }
            }
            // Check if the client sent a close frame or disconnected.
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Close(_))) | None => {
                        debug!("WebSocket client disconnected");
                        return;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        let pong = Message::Pong(data);
                        if socket.send(pong).await.is_err() {
                            debug!("WebSocket client disconnected (pong failed)");
                            return;
                        }
                    }
                    Some(Err(e)) => {
                        debug!("WebSocket error: {e}");
                        return;
                    }
                    _ => {
                        // Ignore other message types (text, binary from client).
                    }
                }
            }
        }
    }
}
