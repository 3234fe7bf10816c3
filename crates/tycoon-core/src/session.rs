//! Per-player game sessions and the scheduler task that drives them.
//!
//! A [`Session`] owns one player's [`GameState`] behind a
//! [`tokio::sync::Mutex`]: commands, accrual ticks, and saves all take the
//! lock, so every mutation observes the latest state and no two writers
//! interleave. [`run_scheduler`] is the companion task driving the two
//! periodic triggers on one timeline -- accrual every tick and autosave
//! every Nth tick -- and broadcasting a [`TickSummary`] after each tick
//! for `WebSocket` observers.
//!
//! Saves are whole-document overwrites through the [`SaveStore`] gateway.
//! A failed save never corrupts or rolls back in-memory state; it is
//! logged at WARN and retried on the next autosave cycle.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::{Mutex, broadcast};
use tracing::{info, warn};

use tycoon_db::SaveStore;
use tycoon_types::{Command, CommandOutcome, GameState, PlayerId, TickSummary};

use crate::commands::{self, CommandError};
use crate::config::{GameRules, TycoonConfig};
use crate::state;

/// Capacity of the per-session tick broadcast channel.
///
/// Lagging receivers skip missed summaries rather than blocking the
/// scheduler.
const BROADCAST_CAPACITY: usize = 256;

/// One player's live game: exclusive state plus the handles the server
/// and scheduler share.
///
/// Constructed once per player identity via [`Session::open`], then held
/// behind an [`Arc`] by the HTTP layer while [`run_scheduler`] drives it.
#[derive(Debug)]
pub struct Session {
    /// Owning player identity, used as the persistence slot key.
    player: PlayerId,
    /// The game state; every mutation takes this lock.
    state: Mutex<GameState>,
    /// Resolved tuning values applied by command handlers and ticks.
    rules: GameRules,
    /// Save gateway this session persists through.
    store: SaveStore,
    /// Publishes one [`TickSummary`] per executed tick.
    tick_tx: broadcast::Sender<TickSummary>,
    /// Milliseconds between accrual ticks.
    tick_interval_ms: u64,
    /// Autosave every Nth tick; `0` disables autosaving.
    autosave_every_ticks: u64,
    /// Set by [`Session::request_stop`]; the scheduler exits cleanly
    /// (with a final save) once it observes the flag.
    stop_requested: AtomicBool,
}

impl Session {
    /// Open the session for `player`: load their save, or start fresh.
    ///
    /// Load happens here, once, before the scheduler starts. A missing
    /// save means a fresh game; a load or validation failure also falls
    /// back to a fresh game after logging, so opening never fails.
    pub async fn open(player: PlayerId, config: &TycoonConfig, store: SaveStore) -> Self {
        let state = match store.load(&player).await {
            Ok(Some(saved)) => match state::restore(saved, &config.game) {
                Ok(state) => {
                    info!(player = %player, money = state.money, "Restored saved game");
                    state
                }
                Err(e) => {
                    warn!(
                        player = %player,
                        error = %e,
                        "Saved game failed validation, starting fresh"
                    );
                    state::new_game(&config.game)
                }
            },
            Ok(None) => {
                info!(player = %player, "No saved game found, starting fresh");
                state::new_game(&config.game)
            }
            Err(e) => {
                warn!(player = %player, error = %e, "Failed to load saved game, starting fresh");
                state::new_game(&config.game)
            }
        };

        let (tick_tx, _) = broadcast::channel(BROADCAST_CAPACITY);

        Self {
            player,
            state: Mutex::new(state),
            rules: GameRules::from_config(config),
            store,
            tick_tx,
            tick_interval_ms: config.game.tick_interval_ms,
            autosave_every_ticks: config.game.autosave_every_ticks,
            stop_requested: AtomicBool::new(false),
        }
    }

    /// The player identity this session belongs to.
    pub const fn player(&self) -> PlayerId {
        self.player
    }

    /// Execute a command against the session state.
    ///
    /// Takes the state lock for the duration of the command, so commands
    /// never interleave with ticks or saves.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError`] if the command is rejected or references
    /// an unknown entity. The state is unchanged on error.
    pub async fn handle_command(&self, command: Command) -> Result<CommandOutcome, CommandError> {
        let mut state = self.state.lock().await;
        commands::handle_command(&mut state, &self.rules, command)
    }

    /// Clone the current game state.
    pub async fn snapshot(&self) -> GameState {
        self.state.lock().await.clone()
    }

    /// Subscribe to per-tick summaries.
    ///
    /// A receiver that falls more than [`BROADCAST_CAPACITY`] summaries
    /// behind misses the oldest ones; it never blocks the scheduler.
    pub fn subscribe(&self) -> broadcast::Receiver<TickSummary> {
        self.tick_tx.subscribe()
    }

    /// Ask the scheduler to exit after a final save.
    pub fn request_stop(&self) {
        self.stop_requested.store(true, Ordering::Release);
    }

    /// Whether a stop has been requested.
    pub fn is_stop_requested(&self) -> bool {
        self.stop_requested.load(Ordering::Acquire)
    }

    /// Whether `tick` is an autosave tick.
    fn autosave_due(&self, tick: u64) -> bool {
        self.autosave_every_ticks > 0
            && tick.checked_rem(self.autosave_every_ticks) == Some(0)
    }

    /// Persist `state` for this player, logging (not propagating) failure.
    ///
    /// Returns whether the save succeeded.
    async fn try_save(&self, state: &GameState) -> bool {
        match self.store.save(&self.player, state).await {
            Ok(()) => true,
            Err(e) => {
                warn!(
                    player = %self.player,
                    error = %e,
                    "Save failed, will retry on the next cycle"
                );
                false
            }
        }
    }
}

/// Drive a session's periodic triggers until a stop is requested.
///
/// Each cycle sleeps for the tick interval, runs one accrual tick under
/// the state lock, autosaves on the configured cadence (still holding the
/// lock, so the persisted document is exactly the post-tick state), and
/// broadcasts the tick summary after the lock is released. On stop, a
/// final save runs before the task returns.
pub async fn run_scheduler(session: Arc<Session>) {
    let mut tick: u64 = 0;

    info!(
        player = %session.player,
        tick_interval_ms = session.tick_interval_ms,
        autosave_every_ticks = session.autosave_every_ticks,
        "Session scheduler starting"
    );

    loop {
        if session.is_stop_requested() {
            break;
        }

        tokio::time::sleep(Duration::from_millis(session.tick_interval_ms)).await;

        if session.is_stop_requested() {
            break;
        }

        tick = tick.saturating_add(1);

        let summary = {
            let mut state = session.state.lock().await;
            let summary = crate::tick::run_tick(&mut state, tick, &session.rules);
            if session.autosave_due(tick) {
                session.try_save(&state).await;
            }
            summary
        };

        // Err means no live receivers, which is fine.
        let _ = session.tick_tx.send(summary);
    }

    // Final save so a clean shutdown never loses progress.
    {
        let state = session.state.lock().await;
        session.try_save(&state).await;
    }
    info!(player = %session.player, ticks = tick, "Session scheduler stopped");
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::config::TycoonConfig;
    use tycoon_types::Command;

    /// Config tuned for fast scheduler tests.
    fn make_config(tick_interval_ms: u64, autosave_every_ticks: u64) -> TycoonConfig {
        let mut config = TycoonConfig::default();
        config.game.tick_interval_ms = tick_interval_ms;
        config.game.autosave_every_ticks = autosave_every_ticks;
        config
    }

    #[tokio::test]
    async fn open_starts_fresh_without_save() {
        let config = make_config(1_000, 15);
        let session = Session::open(PlayerId::new(), &config, SaveStore::memory()).await;

        let state = session.snapshot().await;
        assert_eq!(state.money, 1_000_000);
        assert_eq!(state.current_planet.as_str(), "sol-0");
    }

    #[tokio::test]
    async fn open_restores_saved_game() {
        let config = make_config(1_000, 15);
        let store = SaveStore::memory();
        let player = PlayerId::new();

        let mut saved = state::new_game(&config.game);
        saved.money = 777;
        saved.research_points = 42;
        store.save(&player, &saved).await.unwrap();

        let session = Session::open(player, &config, store).await;
        let state = session.snapshot().await;
        assert_eq!(state.money, 777);
        assert_eq!(state.research_points, 42);
    }

    #[tokio::test]
    async fn open_falls_back_to_fresh_on_invalid_save() {
        let config = make_config(1_000, 15);
        let store = SaveStore::memory();
        let player = PlayerId::new();

        // A save pointing at a planet that does not exist fails restore
        // validation; the session must start fresh instead of crashing.
        let mut saved = state::new_game(&config.game);
        saved.money = 777;
        saved.current_planet = tycoon_types::PlanetKey::from("nowhere-9");
        store.save(&player, &saved).await.unwrap();

        let session = Session::open(player, &config, store).await;
        let state = session.snapshot().await;
        assert_eq!(state.money, 1_000_000);
        assert_eq!(state.current_planet.as_str(), "sol-0");
    }

    #[tokio::test]
    async fn commands_route_through_the_session() {
        let config = make_config(1_000, 15);
        let session = Session::open(PlayerId::new(), &config, SaveStore::memory()).await;

        let outcome = session
            .handle_command(Command::SelectBuilding {
                building: tycoon_types::BuildingId::from("wind_turbine"),
            })
            .await
            .unwrap();
        assert_eq!(
            outcome,
            CommandOutcome::BuildingSelected {
                building: tycoon_types::BuildingId::from("wind_turbine"),
            }
        );

        let state = session.snapshot().await;
        assert_eq!(
            state.selected_building,
            Some(tycoon_types::BuildingId::from("wind_turbine"))
        );
    }

    #[tokio::test]
    async fn scheduler_ticks_broadcast_and_autosave() {
        let config = make_config(5, 1);
        let store = SaveStore::memory();
        let player = PlayerId::new();
        let session = Arc::new(Session::open(player, &config, store.clone()).await);

        let mut rx = session.subscribe();
        let handle = tokio::spawn(run_scheduler(Arc::clone(&session)));

        let first = rx.recv().await.unwrap();
        assert_eq!(first.tick, 1);
        // Fresh game, nothing placed: no power, no income.
        assert_eq!(first.power, 0);
        assert_eq!(first.income, 0);
        assert_eq!(first.money, 1_000_000);

        // Autosave cadence is every tick here, and the save happens
        // before the summary is broadcast, so the store must have a
        // document by now.
        let loaded = store.load(&player).await.unwrap();
        assert!(loaded.is_some());

        session.request_stop();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn stop_before_first_tick_still_saves() {
        let config = make_config(1_000, 0);
        let store = SaveStore::memory();
        let player = PlayerId::new();
        let session = Arc::new(Session::open(player, &config, store.clone()).await);

        session.request_stop();
        run_scheduler(Arc::clone(&session)).await;

        // No ticks ran (interval is a full second), but the final save
        // on shutdown still persisted the fresh game.
        let loaded = store.load(&player).await.unwrap();
        assert_eq!(loaded.map(|s| s.money), Some(1_000_000));
    }

    #[tokio::test]
    async fn autosave_disabled_by_zero_cadence() {
        let config = make_config(5, 0);
        let store = SaveStore::memory();
        let player = PlayerId::new();
        let session = Arc::new(Session::open(player, &config, store.clone()).await);

        let mut rx = session.subscribe();
        let handle = tokio::spawn(run_scheduler(Arc::clone(&session)));

        let _ = rx.recv().await.unwrap();
        // A tick ran but autosave is disabled: nothing persisted yet.
        let loaded = store.load(&player).await.unwrap();
        assert!(loaded.is_none());

        session.request_stop();
        handle.await.unwrap();
    }
}
