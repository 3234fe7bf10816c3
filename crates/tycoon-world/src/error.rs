//! Error types for the `tycoon-world` crate.
//!
//! [`UniverseError`] covers startup-time validation of seeded or loaded
//! universe data. Genuinely invalid data aborts startup; it is never a
//! runtime state.

use tycoon_types::{BuildingId, PlanetKey, SystemId};

/// Structural problems in universe data, detected before play begins.
#[derive(Debug, thiserror::Error)]
pub enum UniverseError {
    /// Two planets share the same key; planet keys are globally unique.
    #[error("duplicate planet key: {0}")]
    DuplicatePlanetKey(PlanetKey),

    /// A system owns no planets, so discovering it would expose nothing.
    #[error("system {0} has no planets")]
    EmptySystem(SystemId),

    /// A catalog entry allows no terrain at all and could never be placed.
    #[error("building {building} on planet {planet} allows no terrain")]
    EmptyTerrainSet {
        /// Owning planet.
        planet: PlanetKey,
        /// The unplaceable building.
        building: BuildingId,
    },

    /// The current-planet pointer references a planet that does not exist.
    #[error("current planet not found: {0}")]
    UnknownCurrentPlanet(PlanetKey),

    /// The current planet belongs to a system the player has not
    /// discovered, which no sequence of commands can produce.
    #[error("current planet {0} belongs to an undiscovered system")]
    UndiscoveredCurrentPlanet(PlanetKey),

    /// The selected-system pointer references a system that does not exist.
    #[error("selected system not found: {0}")]
    UnknownSelectedSystem(SystemId),
}
