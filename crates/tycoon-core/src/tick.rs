//! The accrual tick: research countdown, power recomputation, and income.
//!
//! Each tick recomputes the power total from scratch (every placed
//! building on every planet of every *discovered* system, with power
//! boosts compounding in unlock order), then floors it into the
//! displayed power and credits a tenth of it as income. Recomputing from
//! scratch keeps the tick idempotent with respect to state: two ticks
//! with no intervening change produce the same deltas, and a transient
//! bad read heals on the next tick instead of compounding.

use tracing::{debug, info};
use tycoon_types::{BuildingDef, BuildingId, GameState, Modifier, TickSummary};

use crate::config::GameRules;

/// Power totals stay far below 2^53, so flooring into integer display
/// units is exact; negative and non-finite totals clamp to zero.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn floor_power(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        value.floor() as u64
    } else {
        0
    }
}

/// The effective output of one placed building: catalog base power
/// multiplied by `1 + fraction` for every matching boost, in unlock
/// order, compounding.
fn effective_power(def: &BuildingDef, building: &BuildingId, effects: &[Modifier]) -> f64 {
    effects
        .iter()
        .filter_map(|effect| effect.power_factor(building))
        .fold(def.power, |power, factor| power * factor)
}

/// Sum the effective power of every placed building on every planet of
/// every discovered system.
///
/// Undiscovered systems never contribute, regardless of how their grids
/// came to hold buildings. A cell whose building id has no entry in the
/// owning planet's catalog is skipped with a debug log; a stale save is
/// not worth a panic.
pub fn total_power(state: &GameState) -> f64 {
    let mut total = 0.0;
    for system in state.universe.values().filter(|system| system.discovered) {
        for planet in &system.planets {
            for cell in planet.grid.cells() {
                let Some(building) = &cell.building else {
                    continue;
                };
                match planet.catalog.get(building) {
                    Some(def) => {
                        total += effective_power(def, building, &state.active_effects);
                    }
                    None => {
                        debug!(
                            planet = %planet.key,
                            building = %building,
                            "placed building has no catalog entry, skipping"
                        );
                    }
                }
            }
        }
    }
    total
}

/// Recompute and store the displayed power total without touching income.
///
/// Used by the placement handler so the display reflects a new building
/// immediately; money still only moves on scheduled ticks.
pub fn refresh_power(state: &mut GameState) -> u64 {
    let power = floor_power(total_power(state));
    state.power = power;
    power
}

/// Execute one accrual tick.
///
/// Order matters: the research countdown resolves first so a payout is
/// visible in the same summary as the tick that completed it, then power
/// and income are recomputed and credited.
pub fn run_tick(state: &mut GameState, tick: u64, rules: &GameRules) -> TickSummary {
    let research_completed = advance_research(state, rules);

    let total = total_power(state);
    let power = floor_power(total);
    let income = floor_power(total / 10.0);
    state.power = power;
    state.money = state.money.saturating_add(income);

    TickSummary {
        tick,
        power,
        income,
        money: state.money,
        research_points: state.research_points,
        research_ticks_remaining: state.research_ticks_remaining,
        research_completed,
    }
}

/// Count down the in-flight research investment, granting the reward when
/// it reaches zero. Returns whether a payout happened this tick.
fn advance_research(state: &mut GameState, rules: &GameRules) -> bool {
    let Some(remaining) = state.research_ticks_remaining else {
        return false;
    };
    let remaining = remaining.saturating_sub(1);
    if remaining == 0 {
        state.research_points = state
            .research_points
            .saturating_add(rules.research_reward_points);
        state.research_ticks_remaining = None;
        info!(
            reward = rules.research_reward_points,
            research_points = state.research_points,
            "research investment completed"
        );
        true
    } else {
        state.research_ticks_remaining = Some(remaining);
        false
    }
}
