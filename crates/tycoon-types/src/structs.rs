//! Core entity structs: grid cells, building catalogs, planets, star
//! systems, skills, modifiers, and the root game state.
//!
//! Everything here is plain serializable data. The whole [`GameState`] is
//! persisted wholesale (one document per player, last writer wins), so
//! every field round-trips through serde unchanged.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{PlanetKind, PlanetTheme, StarKind, TerrainKind};
use crate::ids::{BuildingId, PlanetKey, SkillId, SystemId};

// ---------------------------------------------------------------------------
// Grid
// ---------------------------------------------------------------------------

/// One tile of a planet's grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Cell {
    /// Terrain of the tile, immutable after generation.
    pub terrain: TerrainKind,
    /// Building occupying the tile, if any. If set, the building's catalog
    /// entry allowed this terrain at placement time; since terrain never
    /// changes, the pairing stays valid for the cell's lifetime.
    pub building: Option<BuildingId>,
}

impl Cell {
    /// Create an empty cell of the given terrain.
    pub const fn new(terrain: TerrainKind) -> Self {
        Self {
            terrain,
            building: None,
        }
    }
}

/// A square 2D array of cells, owned exclusively by one planet.
///
/// An empty grid (`rows` is empty) marks a planet that has never been
/// visited; generation fills it exactly once and it is never regenerated
/// afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Grid {
    /// Row-major cell storage; `rows[y][x]` addresses column `x` of row `y`.
    pub rows: Vec<Vec<Cell>>,
}

impl Grid {
    /// Whether the grid has been generated.
    pub const fn is_generated(&self) -> bool {
        !self.rows.is_empty()
    }

    /// Side length of the grid (zero while ungenerated).
    pub const fn size(&self) -> usize {
        self.rows.len()
    }

    /// Borrow the cell at `(x, y)`, if in bounds.
    pub fn cell(&self, x: usize, y: usize) -> Option<&Cell> {
        self.rows.get(y)?.get(x)
    }

    /// Mutably borrow the cell at `(x, y)`, if in bounds.
    pub fn cell_mut(&mut self, x: usize, y: usize) -> Option<&mut Cell> {
        self.rows.get_mut(y)?.get_mut(x)
    }

    /// Iterate over all cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.rows.iter().flatten()
    }
}

// ---------------------------------------------------------------------------
// Building catalog
// ---------------------------------------------------------------------------

/// Immutable definition of a placeable building.
///
/// Definitions live in per-planet catalogs; the same [`BuildingId`] may
/// carry different stats on different planets (a Martian solar panel is
/// cheaper and stronger than a terrestrial one).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct BuildingDef {
    /// Display name.
    pub name: String,
    /// Purchase cost in currency, before cost-reduction modifiers.
    pub cost: u64,
    /// Base power output per tick, before power-boost modifiers.
    pub power: f64,
    /// Terrain kinds this building may be placed on.
    pub valid_terrain: BTreeSet<TerrainKind>,
    /// Requires at least one orthogonal water neighbor.
    #[serde(default)]
    pub requires_water_adjacency: bool,
    /// Requires at least one orthogonal non-water neighbor.
    #[serde(default)]
    pub requires_land_adjacency: bool,
    /// Flavor text shown in the build menu.
    pub description: String,
}

// ---------------------------------------------------------------------------
// Universe
// ---------------------------------------------------------------------------

/// Position of a star system on the universe chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ChartPosition {
    /// Chart column.
    pub x: u32,
    /// Chart row.
    pub y: u32,
}

/// A planet: one grid, one catalog, some flavor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Planet {
    /// Globally unique key, stable across the whole universe.
    pub key: PlanetKey,
    /// Display name.
    pub name: String,
    /// Physical classification shown in the chart sidebar.
    pub kind: PlanetKind,
    /// Theme selecting the terrain distribution table.
    pub theme: PlanetTheme,
    /// The planet's grid; empty until first visited.
    #[serde(default)]
    pub grid: Grid,
    /// Buildings available on this planet. Lookups for cells of this
    /// planet resolve here and nowhere else.
    pub catalog: BTreeMap<BuildingId, BuildingDef>,
    /// Notable resources, flavor data only.
    pub resources: Vec<String>,
}

/// A star system owning an ordered list of planets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct StarSystem {
    /// System identifier.
    pub id: SystemId,
    /// Display name.
    pub name: String,
    /// Spectral class of the primary star.
    pub star: StarKind,
    /// Whether the player has discovered this system. Flips false→true at
    /// most once; undiscovered systems expose no playable planets and
    /// never contribute to accrual.
    pub discovered: bool,
    /// Currency cost of discovery. Zero for the starting system.
    pub discovery_cost: u64,
    /// Position on the universe chart.
    pub position: ChartPosition,
    /// Planets of this system, in display order.
    pub planets: Vec<Planet>,
}

// ---------------------------------------------------------------------------
// Skills and modifiers
// ---------------------------------------------------------------------------

/// A persistent adjustment granted by unlocking a skill.
///
/// Modifiers are applied by pattern matching, never by string tags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum Modifier {
    /// Multiplies the power output of one building kind by
    /// `1 + fraction`. Boosts targeting the same building compound in
    /// unlock order.
    BuildingPowerBoost {
        /// Target building id, matched against cells of every catalog.
        building: BuildingId,
        /// Boost fraction; `0.1` is +10%.
        fraction: f64,
    },
    /// Reduces every building's purchase cost by `fraction`. Only the
    /// first active reduction applies.
    GlobalCostReduction {
        /// Reduction fraction; `0.1` is -10%.
        fraction: f64,
    },
}

impl Modifier {
    /// Power multiplier this modifier contributes for `building`, or
    /// `None` when it does not apply.
    pub fn power_factor(&self, building: &BuildingId) -> Option<f64> {
        match self {
            Self::BuildingPowerBoost {
                building: target,
                fraction,
            } if target == building => Some(1.0 + fraction),
            Self::BuildingPowerBoost { .. } | Self::GlobalCostReduction { .. } => None,
        }
    }

    /// Cost multiplier this modifier contributes, or `None` when it does
    /// not affect costs.
    pub const fn cost_factor(&self) -> Option<f64> {
        match self {
            Self::GlobalCostReduction { fraction } => Some(1.0 - *fraction),
            Self::BuildingPowerBoost { .. } => None,
        }
    }
}

/// An unlockable upgrade in the research tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Skill {
    /// Skill identifier.
    pub id: SkillId,
    /// Display name.
    pub name: String,
    /// Flavor text shown in the research tree.
    pub description: String,
    /// Unlock cost in research points.
    pub cost: u64,
    /// Modifier appended to the active effects on unlock.
    pub effect: Modifier,
    /// Skills that must be unlocked first. The prerequisite graph is a
    /// DAG, validated at startup.
    #[serde(default)]
    pub prerequisites: BTreeSet<SkillId>,
    /// Whether this skill has been unlocked. Transitions false→true
    /// exactly once, irreversibly.
    #[serde(default)]
    pub unlocked: bool,
}

// ---------------------------------------------------------------------------
// Root game state
// ---------------------------------------------------------------------------

/// The whole state of one player's game.
///
/// Created fresh with seeded defaults or restored wholesale from a saved
/// document; mutated only under a session's exclusive lock; serialized
/// wholesale on save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GameState {
    /// Currency on hand.
    pub money: u64,
    /// Displayed power total, refreshed by the accrual engine.
    pub power: u64,
    /// Research points available for unlocking skills.
    pub research_points: u64,
    /// Ticks remaining on the in-flight research investment; `Some` also
    /// serves as the at-most-one-investment guard.
    pub research_ticks_remaining: Option<u32>,
    /// Modifiers from unlocked skills, in unlock order. Never removed.
    pub active_effects: Vec<Modifier>,
    /// Building currently selected in the build menu, if any.
    pub selected_building: Option<BuildingId>,
    /// All star systems, keyed by id.
    pub universe: BTreeMap<SystemId, StarSystem>,
    /// System highlighted on the universe chart.
    pub selected_system: SystemId,
    /// Planet the player is currently viewing and building on.
    pub current_planet: PlanetKey,
    /// The research tree with per-skill unlock state.
    pub skills: BTreeMap<SkillId, Skill>,
    /// Seed from which per-planet terrain streams are derived.
    pub world_seed: u64,
}

// ---------------------------------------------------------------------------
// Tick summary
// ---------------------------------------------------------------------------

/// Summary of one accrual tick, broadcast to `WebSocket` observers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TickSummary {
    /// The tick number that was executed (counted per session).
    pub tick: u64,
    /// Power total after this tick.
    pub power: u64,
    /// Currency credited by this tick.
    pub income: u64,
    /// Currency on hand after this tick.
    pub money: u64,
    /// Research points after this tick.
    pub research_points: u64,
    /// Ticks remaining on the in-flight research investment, if any.
    pub research_ticks_remaining: Option<u32>,
    /// Whether a research investment paid out during this tick.
    pub research_completed: bool,
}
