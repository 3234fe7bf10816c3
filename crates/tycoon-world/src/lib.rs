//! Terrain, catalogs, and placement rules for the Energy Tycoon core.
//!
//! This crate models the physical game world: deterministic per-theme
//! terrain generation, per-planet building catalogs, the seeded universes
//! both scenarios start from, and the pure placement validator.
//!
//! # Modules
//!
//! - [`terrain`] -- Theme threshold tables and the deterministic
//!   xorshift64 sampling stream; lazy generate-once grids.
//! - [`catalog`] -- The base building catalog of the single-world
//!   scenario.
//! - [`universe`] -- Seeded universes, planet/system lookups, and
//!   startup validation.
//! - [`placement`] -- Ordered placement legality checks and effective
//!   cost calculation.
//! - [`error`] -- Startup-time validation errors.

pub mod catalog;
pub mod error;
pub mod placement;
pub mod terrain;
pub mod universe;

// Re-export primary entry points at crate root.
pub use catalog::base_catalog;
pub use error::UniverseError;
pub use placement::{effective_cost, validate_placement};
pub use terrain::{ensure_grid, generate, planet_seed, terrain_for_sample};
pub use universe::{
    current_planet, current_planet_mut, find_planet, find_planet_mut, single_world_universe,
    standard_universe, system_of_planet, validate_universe,
};
