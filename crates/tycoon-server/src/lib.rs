//! Game API server for Energy Tycoon.
//!
//! This crate provides an Axum HTTP server that exposes:
//!
//! - **REST endpoints** for the game loop: identity, state snapshot,
//!   catalog and skill reads, and the single `POST /api/command` intent
//!   endpoint
//! - **`WebSocket` endpoint** (`/api/ws`) streaming per-tick summaries
//!   via [`tokio::sync::broadcast`]
//! - **Minimal HTML status page** (`GET /`) showing live session count
//!   and links to API endpoints
//!
//! # Architecture
//!
//! Each player identity (an anonymous UUID in the `player` cookie) maps
//! to one live [`Session`] held in the [`AppState`] registry. Sessions
//! open lazily on first contact: the save document is loaded (or a
//! fresh game seeded) and a scheduler task starts driving accrual and
//! autosave. Handlers never touch game rules directly; every mutation
//! goes through the session's command surface under its lock.
//!
//! [`Session`]: tycoon_core::session::Session

pub mod error;
pub mod handlers;
pub mod identity;
pub mod router;
pub mod server;
pub mod state;
pub mod ws;

// Re-export primary types for convenience.
pub use error::ApiError;
pub use router::build_router;
pub use server::{ServerConfig, ServerError, start_server};
pub use state::AppState;
