//! Enumeration types for the game core.
//!
//! Terrain and theme vocabularies, star classes, derived skill states,
//! and the rejection reasons returned by command validation.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::ids::SkillId;

// ---------------------------------------------------------------------------
// Terrain and planet vocabulary
// ---------------------------------------------------------------------------

/// Categorical label of a grid cell, constraining which buildings may
/// occupy it. Terrain is immutable once a grid has been generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum TerrainKind {
    /// Fertile open ground.
    Grass,
    /// Open water. The only terrain that counts as "not land".
    Water,
    /// High elevation terrain.
    Mountain,
    /// Barren rocky ground.
    Rock,
    /// Frozen surface, found only on ice-themed planets.
    Ice,
}

/// Visual and climatic theme of a planet, selecting its terrain
/// distribution table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum PlanetTheme {
    /// Temperate world: grass, water, and mountain ranges.
    Earth,
    /// Dusty red world: rock with sparse mountains.
    Mars,
    /// Frozen world: ice sheets, subsurface water, rare mountains.
    Ice,
    /// Tidally locked rocky world under a red dwarf.
    Proxima,
    /// Volcanic world: rock crust over magma, dense mountains.
    Lava,
    /// Overgrown greenhouse world: near-total grass cover.
    Jungle,
}

/// Broad physical classification of a planet, shown in the universe chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum PlanetKind {
    /// Earth-like world with liquid water.
    Terran,
    /// Barren rocky world.
    Rocky,
    /// Frozen world.
    Ice,
    /// Volcanically active world.
    Lava,
    /// Vegetation-covered world.
    Jungle,
}

/// Spectral class of a star system's primary, shown in the universe chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum StarKind {
    /// Yellow main-sequence star (Sol-like).
    #[serde(rename = "sun-g")]
    GClass,
    /// Blue-white star, hotter and brighter.
    #[serde(rename = "sun-b")]
    BClass,
}

// ---------------------------------------------------------------------------
// Skill states
// ---------------------------------------------------------------------------

/// Derived lifecycle state of a skill, computed from its prerequisites
/// and the player's research points. `Unlocked` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum SkillState {
    /// Prerequisites unmet, or met but currently unaffordable.
    Locked,
    /// All prerequisites unlocked and research points cover the cost.
    Unlockable,
    /// Permanently unlocked; its modifier is active.
    Unlocked,
}

// ---------------------------------------------------------------------------
// Validation rejections
// ---------------------------------------------------------------------------

/// Reason a command was rejected by validation.
///
/// Rejections are always recoverable: they are reported to the player with
/// a human-readable message and leave the game state untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "reason", rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum Rejection {
    /// A placement was attempted with no building selected.
    NoBuildingSelected,
    /// The target tile lies outside the current planet's grid.
    OutOfBounds {
        /// Requested column.
        x: u32,
        /// Requested row.
        y: u32,
    },
    /// The target tile already holds a building.
    TileOccupied,
    /// The target tile's terrain is not in the building's valid set.
    UnsuitableTerrain,
    /// The building requires at least one orthogonal water neighbor.
    NeedsWaterAdjacency,
    /// The building requires at least one orthogonal non-water neighbor.
    NeedsLandAdjacency,
    /// The player cannot afford the effective cost.
    InsufficientFunds {
        /// Effective cost of the attempted purchase.
        required: u64,
        /// Money available at the time of the attempt.
        available: u64,
    },
    /// The player cannot afford the skill's research-point cost.
    InsufficientResearch {
        /// Research-point cost of the skill.
        required: u64,
        /// Research points available at the time of the attempt.
        available: u64,
    },
    /// A prerequisite skill has not been unlocked yet.
    PrerequisiteLocked {
        /// The missing prerequisite.
        prerequisite: SkillId,
    },
    /// The skill is already unlocked; unlocking is irreversible and
    /// unrepeatable.
    SkillAlreadyUnlocked,
    /// A research investment is already in flight; at most one at a time.
    ResearchInProgress,
    /// The system is already discovered; discovery never repeats or
    /// re-debits.
    SystemAlreadyDiscovered,
}

impl core::fmt::Display for Rejection {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NoBuildingSelected => write!(f, "no building selected"),
            Self::OutOfBounds { x, y } => {
                write!(f, "tile ({x}, {y}) is outside the map")
            }
            Self::TileOccupied => write!(f, "tile is already occupied"),
            Self::UnsuitableTerrain => write!(f, "unsuitable terrain"),
            Self::NeedsWaterAdjacency => write!(f, "must be adjacent to water"),
            Self::NeedsLandAdjacency => write!(f, "must be adjacent to land"),
            Self::InsufficientFunds {
                required,
                available,
            } => write!(f, "not enough money: need {required}, have {available}"),
            Self::InsufficientResearch {
                required,
                available,
            } => write!(
                f,
                "not enough research points: need {required}, have {available}"
            ),
            Self::PrerequisiteLocked { prerequisite } => {
                write!(f, "prerequisite skill '{prerequisite}' is not unlocked")
            }
            Self::SkillAlreadyUnlocked => write!(f, "skill is already unlocked"),
            Self::ResearchInProgress => {
                write!(f, "research is already in progress")
            }
            Self::SystemAlreadyDiscovered => {
                write!(f, "system is already discovered")
            }
        }
    }
}
