//! Shared application state for the game API server.
//!
//! [`AppState`] holds the configuration, the save gateway, and the
//! session registry: one live [`Session`] (plus its scheduler task) per
//! player identity. Sessions are opened lazily on the first request that
//! names a player and live until process shutdown, so a returning player
//! always lands on the same in-memory game.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use tycoon_core::config::TycoonConfig;
use tycoon_core::session::{self, Session};
use tycoon_db::SaveStore;
use tycoon_types::PlayerId;

/// A registered session and the scheduler task driving it.
#[derive(Debug)]
struct SessionEntry {
    session: Arc<Session>,
    scheduler: JoinHandle<()>,
}

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`] and injected via Axum's `State` extractor.
#[derive(Debug)]
pub struct AppState {
    /// Server configuration, also consulted when opening sessions.
    pub config: TycoonConfig,
    /// Save gateway every session persists through.
    pub store: SaveStore,
    /// Live sessions keyed by player identity.
    sessions: RwLock<BTreeMap<PlayerId, SessionEntry>>,
}

impl AppState {
    /// Create the application state with an empty session registry.
    pub const fn new(config: TycoonConfig, store: SaveStore) -> Self {
        Self {
            config,
            store,
            sessions: RwLock::const_new(BTreeMap::new()),
        }
    }

    /// Fetch the player's session, opening it (and spawning its
    /// scheduler) on first contact.
    pub async fn session(&self, player: PlayerId) -> Arc<Session> {
        if let Some(entry) = self.sessions.read().await.get(&player) {
            return Arc::clone(&entry.session);
        }

        let mut sessions = self.sessions.write().await;
        // Double-check: another request may have opened it while we
        // waited for the write lock.
        if let Some(entry) = sessions.get(&player) {
            return Arc::clone(&entry.session);
        }

        let session = Arc::new(Session::open(player, &self.config, self.store.clone()).await);
        let scheduler = tokio::spawn(session::run_scheduler(Arc::clone(&session)));
        sessions.insert(
            player,
            SessionEntry {
                session: Arc::clone(&session),
                scheduler,
            },
        );
        info!(player = %player, sessions = sessions.len(), "Session opened");
        session
    }

    /// Number of live sessions.
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Stop every scheduler and wait for their final saves.
    ///
    /// Called on graceful shutdown; afterwards the registry is empty.
    pub async fn shutdown(&self) {
        let mut sessions = self.sessions.write().await;
        let entries = std::mem::take(&mut *sessions);
        drop(sessions);

        for (player, entry) in entries {
            entry.session.request_stop();
            if let Err(e) = entry.scheduler.await {
                warn!(player = %player, error = %e, "Scheduler task failed during shutdown");
            }
        }
        info!("All sessions stopped");
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn make_state() -> AppState {
        let mut config = TycoonConfig::default();
        // Keep scheduler wakeups far away so tests observe only their
        // own effects.
        config.game.tick_interval_ms = 60_000;
        AppState::new(config, SaveStore::memory())
    }

    #[tokio::test]
    async fn sessions_are_reused_per_player() {
        let state = make_state();
        let player = PlayerId::new();

        let first = state.session(player).await;
        let second = state.session(player).await;
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(state.session_count().await, 1);
    }

    #[tokio::test]
    async fn distinct_players_get_distinct_sessions() {
        let state = make_state();

        let a = state.session(PlayerId::new()).await;
        let b = state.session(PlayerId::new()).await;
        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(state.session_count().await, 2);
    }

    #[tokio::test]
    async fn shutdown_saves_and_clears_sessions() {
        let store = SaveStore::memory();
        let mut config = TycoonConfig::default();
        config.game.tick_interval_ms = 10;
        let state = AppState::new(config, store.clone());

        let player = PlayerId::new();
        let _session = state.session(player).await;

        state.shutdown().await;
        assert_eq!(state.session_count().await, 0);

        // The scheduler's final save ran before shutdown returned.
        let loaded = store.load(&player).await.unwrap();
        assert!(loaded.is_some());
    }
}
