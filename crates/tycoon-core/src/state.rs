//! Fresh-game construction and loaded-document validation.
//!
//! A session gets its [`GameState`] from exactly one of two paths: a fresh
//! game seeded from the configured scenario, or a saved document restored
//! wholesale from the store. Restored documents are validated with the
//! same structural checks the seeded data passes at startup; a document
//! that fails them is discarded in favor of a fresh game rather than
//! served in a state no command sequence could have produced.

use std::collections::BTreeMap;

use tracing::info;
use tycoon_types::{GameState, PlanetKey, StarSystem, SystemId};
use tycoon_world::error::UniverseError;
use tycoon_world::terrain::ensure_grid;
use tycoon_world::universe::{
    find_planet_mut, single_world_universe, standard_universe, validate_universe,
};

use crate::config::{GameConfig, Scenario};
use crate::skills::{self, SkillGraphError};

/// Both seeded scenarios start the player here.
const STARTING_SYSTEM: &str = "sol";
/// Both seeded scenarios start the player here.
const STARTING_PLANET: &str = "sol-0";

/// Errors found when validating a game state document.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    /// The universe failed structural validation.
    #[error("universe validation failed: {source}")]
    Universe {
        /// The underlying universe error.
        #[from]
        source: UniverseError,
    },

    /// The skill table failed graph validation.
    #[error("skill validation failed: {source}")]
    Skills {
        /// The underlying skill graph error.
        #[from]
        source: SkillGraphError,
    },
}

/// The seeded universe for a scenario.
fn seeded_universe(scenario: Scenario) -> BTreeMap<SystemId, StarSystem> {
    match scenario {
        Scenario::SingleWorld => single_world_universe(),
        Scenario::Standard => standard_universe(),
    }
}

/// Build a fresh game from the configured scenario.
///
/// Mints a world seed when the config leaves it unset, seeds the universe
/// and skill table, and generates the starting planet's terrain so the
/// first state snapshot is immediately playable.
pub fn new_game(config: &GameConfig) -> GameState {
    let world_seed = config.world_seed.unwrap_or_else(rand::random);
    let mut universe = seeded_universe(config.scenario);
    let starting_planet = PlanetKey::from(STARTING_PLANET);
    if let Some(planet) = find_planet_mut(&mut universe, &starting_planet) {
        ensure_grid(planet, world_seed, config.map_size);
    }

    info!(
        world_seed,
        scenario = ?config.scenario,
        starting_money = config.starting_money,
        "seeding fresh game"
    );

    GameState {
        money: config.starting_money,
        power: 0,
        research_points: 0,
        research_ticks_remaining: None,
        active_effects: Vec::new(),
        selected_building: None,
        universe,
        selected_system: SystemId::from(STARTING_SYSTEM),
        current_planet: starting_planet,
        skills: skills::seeded_skills(),
        world_seed,
    }
}

/// Validate the structural invariants of a state document.
///
/// Covers exactly the checks seeded data passes at startup: universe
/// structure (planet keys, catalogs, current/selected pointers) and the
/// skill prerequisite graph.
pub fn validate_state(state: &GameState) -> Result<(), StateError> {
    validate_universe(
        &state.universe,
        &state.current_planet,
        &state.selected_system,
    )?;
    skills::validate_skills(&state.skills)?;
    Ok(())
}

/// Validate a scenario's seeded data before serving it.
///
/// Run at engine startup so an inconsistent seeded universe or skill
/// table aborts the process instead of producing an unplayable world at
/// the first session.
///
/// # Errors
///
/// Returns [`StateError`] when the seeded data fails validation.
pub fn validate_scenario(scenario: Scenario) -> Result<(), StateError> {
    let universe = seeded_universe(scenario);
    validate_universe(
        &universe,
        &PlanetKey::from(STARTING_PLANET),
        &SystemId::from(STARTING_SYSTEM),
    )?;
    skills::validate_skills(&skills::seeded_skills())?;
    Ok(())
}

/// Accept a loaded document for play, regenerating the current planet's
/// grid if the document predates its first visit.
///
/// # Errors
///
/// Returns [`StateError`] when the document fails validation; the caller
/// falls back to [`new_game`].
pub fn restore(mut state: GameState, config: &GameConfig) -> Result<GameState, StateError> {
    validate_state(&state)?;
    let world_seed = state.world_seed;
    if let Some(planet) = find_planet_mut(&mut state.universe, &state.current_planet) {
        ensure_grid(planet, world_seed, config.map_size);
    }
    Ok(state)
}
