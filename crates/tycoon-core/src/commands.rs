//! Command handling: validation and commit for every player intent.
//!
//! Each handler validates completely before mutating anything, so a
//! rejected command leaves the state byte-for-byte untouched. Rejections
//! ([`Rejection`]) are recoverable player-facing answers; lookup failures
//! ([`CommandError::UnknownBuilding`] and friends) mean the client named
//! an entity this game cannot see.

use tracing::info;
use tycoon_types::{
    BuildingId, Command, CommandOutcome, GameState, PlanetKey, Rejection, SkillId, SystemId,
};
use tycoon_world::placement::validate_placement;
use tycoon_world::terrain::ensure_grid;
use tycoon_world::universe;

use crate::config::GameRules;
use crate::tick;

/// Errors produced by command handling.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    /// The command failed validation; the state is untouched.
    #[error("{rejection}")]
    Rejected {
        /// The failing check.
        rejection: Rejection,
    },

    /// The named building is not in the current planet's catalog.
    #[error("building '{building}' is not in the current planet's catalog")]
    UnknownBuilding {
        /// The unresolvable building id.
        building: BuildingId,
    },

    /// The named planet does not exist or lies in an undiscovered system.
    #[error("planet '{planet}' is not reachable")]
    UnknownPlanet {
        /// The unresolvable planet key.
        planet: PlanetKey,
    },

    /// The named system does not exist.
    #[error("system '{system}' does not exist")]
    UnknownSystem {
        /// The unresolvable system id.
        system: SystemId,
    },

    /// The named skill is not in the research tree.
    #[error("skill '{skill}' does not exist")]
    UnknownSkill {
        /// The unresolvable skill id.
        skill: SkillId,
    },

    /// The state's current-planet pointer resolves nowhere. Startup and
    /// restore validation make this unreachable through the API; it maps
    /// to an internal error, not a player mistake.
    #[error("current planet '{planet}' is missing from the universe")]
    MissingCurrentPlanet {
        /// The dangling planet key.
        planet: PlanetKey,
    },
}

impl From<Rejection> for CommandError {
    fn from(rejection: Rejection) -> Self {
        Self::Rejected { rejection }
    }
}

/// Dispatch one command against the state.
pub fn handle_command(
    state: &mut GameState,
    rules: &GameRules,
    command: Command,
) -> Result<CommandOutcome, CommandError> {
    match command {
        Command::SelectBuilding { building } => select_building(state, building),
        Command::PlaceBuilding { x, y } => place_building(state, x, y),
        Command::CancelSelection => {
            state.selected_building = None;
            Ok(CommandOutcome::SelectionCleared)
        }
        Command::SwitchPlanet { planet } => switch_planet(state, rules, planet),
        Command::DiscoverSystem { system } => discover_system(state, system),
        Command::UnlockSkill { skill } => unlock_skill(state, skill),
        Command::InvestResearch => invest_research(state, rules),
    }
}

/// Select a building from the current planet's catalog.
fn select_building(
    state: &mut GameState,
    building: BuildingId,
) -> Result<CommandOutcome, CommandError> {
    let planet =
        universe::current_planet(state).ok_or_else(|| CommandError::MissingCurrentPlanet {
            planet: state.current_planet.clone(),
        })?;
    if !planet.catalog.contains_key(&building) {
        return Err(CommandError::UnknownBuilding { building });
    }
    state.selected_building = Some(building.clone());
    Ok(CommandOutcome::BuildingSelected { building })
}

/// Place the selected building, debiting its effective cost.
///
/// A successful commit clears the selection; the next placement starts
/// from an explicit select.
fn place_building(state: &mut GameState, x: u32, y: u32) -> Result<CommandOutcome, CommandError> {
    let Some(building) = state.selected_building.clone() else {
        return Err(Rejection::NoBuildingSelected.into());
    };
    let planet_key = state.current_planet.clone();

    let cost = {
        let planet = universe::find_planet(&state.universe, &planet_key).ok_or_else(|| {
            CommandError::MissingCurrentPlanet {
                planet: planet_key.clone(),
            }
        })?;
        let def = planet
            .catalog
            .get(&building)
            .ok_or_else(|| CommandError::UnknownBuilding {
                building: building.clone(),
            })?;
        validate_placement(&planet.grid, def, x, y, state.money, &state.active_effects)
            .map_err(CommandError::from)?
    };

    let planet = universe::find_planet_mut(&mut state.universe, &planet_key).ok_or_else(|| {
        CommandError::MissingCurrentPlanet {
            planet: planet_key.clone(),
        }
    })?;
    let col = usize::try_from(x).unwrap_or(usize::MAX);
    let row = usize::try_from(y).unwrap_or(usize::MAX);
    if let Some(cell) = planet.grid.cell_mut(col, row) {
        cell.building = Some(building.clone());
    }
    state.money = state.money.saturating_sub(cost);
    state.selected_building = None;
    let power = tick::refresh_power(state);

    info!(
        planet = %planet_key,
        building = %building,
        x,
        y,
        cost,
        power,
        "building placed"
    );
    Ok(CommandOutcome::BuildingPlaced {
        planet: planet_key,
        x,
        y,
        building,
        cost,
    })
}

/// Travel to a planet of a discovered system, generating its terrain on
/// first visit.
///
/// Undiscovered planets are invisible to clients, so naming one is an
/// unknown-entity error rather than a rejection. Switching drops the
/// building selection (catalogs do not carry across planets) and pulls
/// the chart selection along to the owning system.
fn switch_planet(
    state: &mut GameState,
    rules: &GameRules,
    planet_key: PlanetKey,
) -> Result<CommandOutcome, CommandError> {
    let Some(owner) = universe::system_of_planet(&state.universe, &planet_key) else {
        return Err(CommandError::UnknownPlanet { planet: planet_key });
    };
    if !owner.discovered {
        return Err(CommandError::UnknownPlanet { planet: planet_key });
    }
    let owner_id = owner.id.clone();

    let world_seed = state.world_seed;
    if let Some(planet) = universe::find_planet_mut(&mut state.universe, &planet_key) {
        ensure_grid(planet, world_seed, rules.map_size);
    }
    state.current_planet = planet_key.clone();
    state.selected_system = owner_id;
    state.selected_building = None;

    info!(planet = %planet_key, "switched planet");
    Ok(CommandOutcome::PlanetSwitched { planet: planet_key })
}

/// Pay the discovery cost of an undiscovered system.
fn discover_system(
    state: &mut GameState,
    system_id: SystemId,
) -> Result<CommandOutcome, CommandError> {
    let Some(system) = state.universe.get_mut(&system_id) else {
        return Err(CommandError::UnknownSystem { system: system_id });
    };
    if system.discovered {
        return Err(Rejection::SystemAlreadyDiscovered.into());
    }
    let cost = system.discovery_cost;
    if state.money < cost {
        return Err(Rejection::InsufficientFunds {
            required: cost,
            available: state.money,
        }
        .into());
    }
    system.discovered = true;
    state.money = state.money.saturating_sub(cost);

    info!(system = %system_id, cost, "system discovered");
    Ok(CommandOutcome::SystemDiscovered {
        system: system_id,
        cost,
    })
}

/// Unlock a skill, debiting research points and activating its modifier.
fn unlock_skill(state: &mut GameState, skill_id: SkillId) -> Result<CommandOutcome, CommandError> {
    let Some(entry) = state.skills.get(&skill_id) else {
        return Err(CommandError::UnknownSkill { skill: skill_id });
    };
    if entry.unlocked {
        return Err(Rejection::SkillAlreadyUnlocked.into());
    }
    for prerequisite in &entry.prerequisites {
        if !state
            .skills
            .get(prerequisite)
            .is_some_and(|skill| skill.unlocked)
        {
            return Err(Rejection::PrerequisiteLocked {
                prerequisite: prerequisite.clone(),
            }
            .into());
        }
    }
    let cost = entry.cost;
    if state.research_points < cost {
        return Err(Rejection::InsufficientResearch {
            required: cost,
            available: state.research_points,
        }
        .into());
    }
    let effect = entry.effect.clone();

    state.research_points = state.research_points.saturating_sub(cost);
    if let Some(entry) = state.skills.get_mut(&skill_id) {
        entry.unlocked = true;
    }
    state.active_effects.push(effect);

    info!(skill = %skill_id, cost, "skill unlocked");
    Ok(CommandOutcome::SkillUnlocked {
        skill: skill_id,
        cost,
    })
}

/// Start a timed research investment; at most one may be in flight.
fn invest_research(
    state: &mut GameState,
    rules: &GameRules,
) -> Result<CommandOutcome, CommandError> {
    if state.research_ticks_remaining.is_some() {
        return Err(Rejection::ResearchInProgress.into());
    }
    let cost = rules.research_cost;
    if state.money < cost {
        return Err(Rejection::InsufficientFunds {
            required: cost,
            available: state.money,
        }
        .into());
    }
    state.money = state.money.saturating_sub(cost);
    state.research_ticks_remaining = Some(rules.research_duration_ticks);

    info!(
        cost,
        duration_ticks = rules.research_duration_ticks,
        "research investment started"
    );
    Ok(CommandOutcome::ResearchStarted {
        cost,
        duration_ticks: rules.research_duration_ticks,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use tycoon_types::{Cell, Grid, Modifier, TerrainKind};
    use tycoon_world::universe::{current_planet, current_planet_mut};

    use super::*;
    use crate::config::{GameConfig, Scenario};
    use crate::state::new_game;
    use crate::tick::run_tick;

    fn make_state() -> GameState {
        new_game(&GameConfig {
            scenario: Scenario::Standard,
            world_seed: Some(7),
            ..GameConfig::default()
        })
    }

    fn rules() -> GameRules {
        GameRules::default()
    }

    fn flat_grid(size: usize, terrain: TerrainKind) -> Grid {
        Grid {
            rows: vec![vec![Cell::new(terrain); size]; size],
        }
    }

    /// A standard-scenario game whose home planet is all grass, so
    /// placement tests control their own terrain.
    fn grass_home_state() -> GameState {
        let mut state = make_state();
        current_planet_mut(&mut state).unwrap().grid = flat_grid(20, TerrainKind::Grass);
        state
    }

    fn select(state: &mut GameState, building: &str) {
        let outcome = handle_command(
            state,
            &rules(),
            Command::SelectBuilding {
                building: BuildingId::from(building),
            },
        );
        assert!(outcome.is_ok());
    }

    #[test]
    fn select_requires_catalog_entry() {
        let mut state = make_state();
        let result = handle_command(
            &mut state,
            &rules(),
            Command::SelectBuilding {
                building: BuildingId::from("dyson_sphere"),
            },
        );
        assert!(matches!(
            result,
            Err(CommandError::UnknownBuilding { building }) if building.as_str() == "dyson_sphere"
        ));
        assert_eq!(state.selected_building, None);
    }

    #[test]
    fn place_without_selection_is_rejected() {
        let mut state = grass_home_state();
        let result = handle_command(&mut state, &rules(), Command::PlaceBuilding { x: 0, y: 0 });
        assert!(matches!(
            result,
            Err(CommandError::Rejected {
                rejection: Rejection::NoBuildingSelected
            })
        ));
    }

    #[test]
    fn placement_debits_cost_and_sets_exactly_one_cell() {
        let mut state = grass_home_state();
        select(&mut state, "wind_turbine");
        let outcome =
            handle_command(&mut state, &rules(), Command::PlaceBuilding { x: 3, y: 4 }).unwrap();
        assert_eq!(
            outcome,
            CommandOutcome::BuildingPlaced {
                planet: PlanetKey::from("sol-0"),
                x: 3,
                y: 4,
                building: BuildingId::from("wind_turbine"),
                cost: 100,
            }
        );
        assert_eq!(state.money, 999_900);
        assert_eq!(state.power, 10);
        let planet = current_planet(&state).unwrap();
        let occupied = planet
            .grid
            .cells()
            .filter(|cell| cell.building.is_some())
            .count();
        assert_eq!(occupied, 1);
        // Committing consumes the selection.
        assert_eq!(state.selected_building, None);
    }

    #[test]
    fn rejected_placement_mutates_nothing() {
        let mut state = grass_home_state();
        select(&mut state, "hydro_plant");
        let before = state.clone();
        // All-grass home: water building has no valid tile.
        let result = handle_command(&mut state, &rules(), Command::PlaceBuilding { x: 5, y: 5 });
        assert!(matches!(
            result,
            Err(CommandError::Rejected {
                rejection: Rejection::UnsuitableTerrain
            })
        ));
        assert_eq!(state, before);
    }

    #[test]
    fn placement_applies_cost_reduction() {
        let mut state = grass_home_state();
        state.active_effects = vec![Modifier::GlobalCostReduction { fraction: 0.1 }];
        select(&mut state, "wind_turbine");
        let outcome =
            handle_command(&mut state, &rules(), Command::PlaceBuilding { x: 0, y: 0 }).unwrap();
        assert!(matches!(
            outcome,
            CommandOutcome::BuildingPlaced { cost: 90, .. }
        ));
        assert_eq!(state.money, 999_910);
    }

    #[test]
    fn end_to_end_place_then_tick() {
        let mut state = grass_home_state();
        state.money = 1_000;
        select(&mut state, "wind_turbine");
        handle_command(&mut state, &rules(), Command::PlaceBuilding { x: 0, y: 0 }).unwrap();
        assert_eq!(state.money, 900);
        assert_eq!(state.power, 10);

        let summary = run_tick(&mut state, 1, &rules());
        assert_eq!(summary.power, 10);
        assert_eq!(summary.money, 901);
    }

    #[test]
    fn cancel_selection_always_succeeds() {
        let mut state = grass_home_state();
        select(&mut state, "wind_turbine");
        let outcome = handle_command(&mut state, &rules(), Command::CancelSelection).unwrap();
        assert_eq!(outcome, CommandOutcome::SelectionCleared);
        assert_eq!(state.selected_building, None);

        // Cancelling with nothing selected is still a success.
        let outcome = handle_command(&mut state, &rules(), Command::CancelSelection).unwrap();
        assert_eq!(outcome, CommandOutcome::SelectionCleared);
    }

    #[test]
    fn switch_planet_generates_grid_and_clears_selection() {
        let mut state = make_state();
        select(&mut state, "wind_turbine");
        let outcome = handle_command(
            &mut state,
            &rules(),
            Command::SwitchPlanet {
                planet: PlanetKey::from("sol-1"),
            },
        )
        .unwrap();
        assert_eq!(
            outcome,
            CommandOutcome::PlanetSwitched {
                planet: PlanetKey::from("sol-1"),
            }
        );
        assert_eq!(state.current_planet.as_str(), "sol-1");
        assert_eq!(state.selected_building, None);
        assert_eq!(state.selected_system.as_str(), "sol");
        let mars = current_planet(&state).unwrap();
        assert!(mars.grid.is_generated());
    }

    #[test]
    fn switch_planet_never_touches_money_or_power() {
        let mut state = make_state();
        let money = state.money;
        let power = state.power;
        handle_command(
            &mut state,
            &rules(),
            Command::SwitchPlanet {
                planet: PlanetKey::from("sol-1"),
            },
        )
        .unwrap();
        assert_eq!(state.money, money);
        assert_eq!(state.power, power);
    }

    #[test]
    fn switch_to_undiscovered_planet_is_unknown() {
        let mut state = make_state();
        let result = handle_command(
            &mut state,
            &rules(),
            Command::SwitchPlanet {
                planet: PlanetKey::from("sir-0"),
            },
        );
        assert!(matches!(result, Err(CommandError::UnknownPlanet { .. })));
        assert_eq!(state.current_planet.as_str(), "sol-0");
    }

    #[test]
    fn discovery_gate_checks_funds_atomically() {
        let mut state = make_state();
        state.money = 49_999;
        let target = SystemId::from("alpha-centauri");

        let result = handle_command(
            &mut state,
            &rules(),
            Command::DiscoverSystem {
                system: target.clone(),
            },
        );
        assert!(matches!(
            result,
            Err(CommandError::Rejected {
                rejection: Rejection::InsufficientFunds {
                    required: 50_000,
                    available: 49_999,
                }
            })
        ));
        assert!(!state.universe.get(&target).unwrap().discovered);
        assert_eq!(state.money, 49_999);

        state.money = 50_000;
        let outcome = handle_command(
            &mut state,
            &rules(),
            Command::DiscoverSystem {
                system: target.clone(),
            },
        )
        .unwrap();
        assert_eq!(
            outcome,
            CommandOutcome::SystemDiscovered {
                system: target.clone(),
                cost: 50_000,
            }
        );
        assert!(state.universe.get(&target).unwrap().discovered);
        assert_eq!(state.money, 0);
    }

    #[test]
    fn repeated_discovery_is_rejected_without_debit() {
        let mut state = make_state();
        let result = handle_command(
            &mut state,
            &rules(),
            Command::DiscoverSystem {
                system: SystemId::from("sol"),
            },
        );
        assert!(matches!(
            result,
            Err(CommandError::Rejected {
                rejection: Rejection::SystemAlreadyDiscovered
            })
        ));
        assert_eq!(state.money, 1_000_000);
        assert!(state.universe.get(&SystemId::from("sol")).unwrap().discovered);
    }

    #[test]
    fn switch_after_discovery_reaches_the_new_system() {
        let mut state = make_state();
        handle_command(
            &mut state,
            &rules(),
            Command::DiscoverSystem {
                system: SystemId::from("alpha-centauri"),
            },
        )
        .unwrap();
        handle_command(
            &mut state,
            &rules(),
            Command::SwitchPlanet {
                planet: PlanetKey::from("ac-0"),
            },
        )
        .unwrap();
        assert_eq!(state.current_planet.as_str(), "ac-0");
        assert_eq!(state.selected_system.as_str(), "alpha-centauri");
    }

    #[test]
    fn unlock_skill_walks_the_gate_order() {
        let mut state = make_state();
        let rotors = SkillId::from("carbon_rotors");

        // Prerequisite gate fires before affordability.
        state.research_points = 100;
        let result = handle_command(
            &mut state,
            &rules(),
            Command::UnlockSkill {
                skill: rotors.clone(),
            },
        );
        assert!(matches!(
            result,
            Err(CommandError::Rejected {
                rejection: Rejection::PrerequisiteLocked { prerequisite }
            }) if prerequisite.as_str() == "improved_blades"
        ));

        let blades = SkillId::from("improved_blades");
        handle_command(
            &mut state,
            &rules(),
            Command::UnlockSkill {
                skill: blades.clone(),
            },
        )
        .unwrap();
        assert_eq!(state.research_points, 95);
        assert_eq!(state.active_effects.len(), 1);

        let outcome = handle_command(
            &mut state,
            &rules(),
            Command::UnlockSkill {
                skill: rotors.clone(),
            },
        )
        .unwrap();
        assert_eq!(
            outcome,
            CommandOutcome::SkillUnlocked {
                skill: rotors,
                cost: 15,
            }
        );
        assert_eq!(state.research_points, 80);
        assert_eq!(state.active_effects.len(), 2);
    }

    #[test]
    fn unlock_is_unrepeatable() {
        let mut state = make_state();
        state.research_points = 10;
        let blades = SkillId::from("improved_blades");
        handle_command(
            &mut state,
            &rules(),
            Command::UnlockSkill {
                skill: blades.clone(),
            },
        )
        .unwrap();
        let result = handle_command(
            &mut state,
            &rules(),
            Command::UnlockSkill { skill: blades },
        );
        assert!(matches!(
            result,
            Err(CommandError::Rejected {
                rejection: Rejection::SkillAlreadyUnlocked
            })
        ));
        assert_eq!(state.research_points, 5);
        assert_eq!(state.active_effects.len(), 1);
    }

    #[test]
    fn unaffordable_skill_is_rejected() {
        let mut state = make_state();
        state.research_points = 4;
        let result = handle_command(
            &mut state,
            &rules(),
            Command::UnlockSkill {
                skill: SkillId::from("improved_blades"),
            },
        );
        assert!(matches!(
            result,
            Err(CommandError::Rejected {
                rejection: Rejection::InsufficientResearch {
                    required: 5,
                    available: 4,
                }
            })
        ));
        assert_eq!(state.research_points, 4);
    }

    #[test]
    fn invest_research_arms_the_timer() {
        let mut state = make_state();
        let outcome = handle_command(&mut state, &rules(), Command::InvestResearch).unwrap();
        assert_eq!(
            outcome,
            CommandOutcome::ResearchStarted {
                cost: 500,
                duration_ticks: 10,
            }
        );
        assert_eq!(state.money, 999_500);
        assert_eq!(state.research_ticks_remaining, Some(10));
    }

    #[test]
    fn second_investment_is_rejected_without_debit() {
        let mut state = make_state();
        handle_command(&mut state, &rules(), Command::InvestResearch).unwrap();
        let result = handle_command(&mut state, &rules(), Command::InvestResearch);
        assert!(matches!(
            result,
            Err(CommandError::Rejected {
                rejection: Rejection::ResearchInProgress
            })
        ));
        assert_eq!(state.money, 999_500);
        assert_eq!(state.research_ticks_remaining, Some(10));
    }

    #[test]
    fn unaffordable_investment_is_rejected() {
        let mut state = make_state();
        state.money = 499;
        let result = handle_command(&mut state, &rules(), Command::InvestResearch);
        assert!(matches!(
            result,
            Err(CommandError::Rejected {
                rejection: Rejection::InsufficientFunds {
                    required: 500,
                    available: 499,
                }
            })
        ));
        assert_eq!(state.research_ticks_remaining, None);
    }
}
