//! Player intents and their outcomes.
//!
//! The presentation layer (any HTTP client) drives the game exclusively
//! through [`Command`] values; the core answers each with a
//! [`CommandOutcome`] on success or a rejection/lookup error otherwise.
//! Both sides are tagged enums so the wire format stays self-describing.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::ids::{BuildingId, PlanetKey, SkillId, SystemId};

/// A discrete player intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum Command {
    /// Select a building from the current planet's catalog for placement.
    SelectBuilding {
        /// Building to select.
        building: BuildingId,
    },
    /// Place the selected building at `(x, y)` on the current planet.
    PlaceBuilding {
        /// Target column.
        x: u32,
        /// Target row.
        y: u32,
    },
    /// Clear the current building selection.
    CancelSelection,
    /// Travel to another planet of a discovered system.
    SwitchPlanet {
        /// Destination planet.
        planet: PlanetKey,
    },
    /// Pay the discovery cost of an undiscovered system.
    DiscoverSystem {
        /// System to discover.
        system: SystemId,
    },
    /// Spend research points to unlock a skill.
    UnlockSkill {
        /// Skill to unlock.
        skill: SkillId,
    },
    /// Spend currency to start a timed research investment.
    InvestResearch,
}

/// Successful result of a [`Command`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum CommandOutcome {
    /// A building is now selected.
    BuildingSelected {
        /// The selected building.
        building: BuildingId,
    },
    /// A building was placed and paid for.
    BuildingPlaced {
        /// Planet the building was placed on.
        planet: PlanetKey,
        /// Column of the placement.
        x: u32,
        /// Row of the placement.
        y: u32,
        /// The placed building.
        building: BuildingId,
        /// Effective cost actually debited.
        cost: u64,
    },
    /// The selection was cleared.
    SelectionCleared,
    /// The current planet changed.
    PlanetSwitched {
        /// The new current planet.
        planet: PlanetKey,
    },
    /// A system was discovered and paid for.
    SystemDiscovered {
        /// The discovered system.
        system: SystemId,
        /// Discovery cost debited.
        cost: u64,
    },
    /// A skill was unlocked and its modifier activated.
    SkillUnlocked {
        /// The unlocked skill.
        skill: SkillId,
        /// Research points debited.
        cost: u64,
    },
    /// A research investment started.
    ResearchStarted {
        /// Currency debited.
        cost: u64,
        /// Ticks until the investment pays out.
        duration_ticks: u32,
    },
}
