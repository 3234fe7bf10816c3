//! Shared type definitions for the Energy Tycoon game.
//!
//! This crate is the single source of truth for all types used across the
//! workspace. Types defined here flow downstream to `TypeScript` via
//! `ts-rs` for the browser frontend.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe key and identifier wrappers
//! - [`enums`] -- Enumeration types (terrain, themes, skill states,
//!   rejections)
//! - [`structs`] -- Core entity structs (grids, catalogs, universe, state)
//! - [`commands`] -- Player intents and command outcomes

pub mod commands;
pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use commands::{Command, CommandOutcome};
pub use enums::{PlanetKind, PlanetTheme, Rejection, SkillState, StarKind, TerrainKind};
pub use ids::{BuildingId, PlanetKey, PlayerId, SkillId, SystemId};
pub use structs::{
    BuildingDef, Cell, ChartPosition, GameState, Grid, Modifier, Planet, Skill, StarSystem,
    TickSummary,
};
