//! Persistence layer for Energy Tycoon save documents.
//!
//! A player's entire game is one JSON document keyed by their
//! [`PlayerId`](tycoon_types::PlayerId). Saves are whole-document
//! replacements, so the store never has to reconcile partial writes
//! against live game state.
//!
//! # Architecture
//!
//! ```text
//! Game session (autosave + shutdown)
//!     |
//!     +-- SaveStore::save / load
//!         |-- Memory   (shared map, tests and ephemeral servers)
//!         |-- File     (<player>.json, temp-file + rename)
//!         +-- Postgres (JSONB row per player, upserted)
//! ```
//!
//! # Modules
//!
//! - [`store`] -- The [`SaveStore`] gateway and its three backends
//! - [`postgres`] -- `PostgreSQL` connection pool and configuration
//! - [`error`] -- Shared error types

pub mod error;
pub mod postgres;
pub mod store;

// Re-export primary types for convenience.
pub use error::StoreError;
pub use postgres::{PostgresConfig, PostgresPool};
pub use store::{SaveRow, SaveStore};
