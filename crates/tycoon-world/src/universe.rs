//! Seeded universes and universe-wide lookups.
//!
//! Two scenarios share one data model: `single_world_universe` wraps the
//! classic one-planet game in a pre-discovered system carrying the base
//! catalog, while `standard_universe` seeds the four-system star chart
//! with per-planet catalogs. Grids start empty everywhere and are
//! generated on first visit.

use std::collections::{BTreeMap, BTreeSet};

use tycoon_types::{
    BuildingDef, BuildingId, ChartPosition, GameState, Grid, Planet, PlanetKey, PlanetKind,
    PlanetTheme, StarKind, StarSystem, SystemId, TerrainKind,
};

use crate::catalog::{base_catalog, def};
use crate::error::UniverseError;

/// Helper to build a [`Planet`] with an empty grid.
fn planet(
    key: &str,
    name: &str,
    kind: PlanetKind,
    theme: PlanetTheme,
    resources: &[&str],
    catalog: BTreeMap<BuildingId, BuildingDef>,
) -> Planet {
    Planet {
        key: PlanetKey::from(key),
        name: name.to_owned(),
        kind,
        theme,
        grid: Grid::default(),
        catalog,
        resources: resources.iter().map(|r| (*r).to_owned()).collect(),
    }
}

/// Helper to build a [`StarSystem`].
fn system(
    id: &str,
    name: &str,
    star: StarKind,
    discovered: bool,
    discovery_cost: u64,
    x: u32,
    y: u32,
    planets: Vec<Planet>,
) -> StarSystem {
    StarSystem {
        id: SystemId::from(id),
        name: name.to_owned(),
        star,
        discovered,
        discovery_cost,
        position: ChartPosition { x, y },
        planets,
    }
}

/// The single-world scenario: one discovered system, one earth planet,
/// the global base catalog.
pub fn single_world_universe() -> BTreeMap<SystemId, StarSystem> {
    let home = planet(
        "sol-0",
        "Earth",
        PlanetKind::Terran,
        PlanetTheme::Earth,
        &["Water", "Coal", "Uranium"],
        base_catalog(),
    );
    let mut universe = BTreeMap::new();
    universe.insert(
        SystemId::from("sol"),
        system("sol", "Sol", StarKind::GClass, true, 0, 2, 5, vec![home]),
    );
    universe
}

/// The multi-planet scenario: four systems, six planets, per-planet
/// catalogs. Only Sol starts discovered.
#[allow(clippy::too_many_lines)]
pub fn standard_universe() -> BTreeMap<SystemId, StarSystem> {
    // --- Sol ---
    let mut earth_catalog = BTreeMap::new();
    earth_catalog.insert(
        BuildingId::from("wind_turbine"),
        def(
            "Wind Turbine",
            100,
            10.0,
            &[TerrainKind::Grass],
            "Clean energy from steady winds.",
        ),
    );
    earth_catalog.insert(
        BuildingId::from("hydro_plant"),
        def(
            "Hydro Plant",
            500,
            50.0,
            &[TerrainKind::Water],
            "Power from flowing water.",
        ),
    );
    earth_catalog.insert(
        BuildingId::from("solar_panel"),
        def(
            "Solar Panel",
            80,
            8.0,
            &[TerrainKind::Grass],
            "Power from sunlight.",
        ),
    );
    earth_catalog.insert(
        BuildingId::from("bio_reactor"),
        def(
            "Bio Reactor",
            300,
            35.0,
            &[TerrainKind::Grass],
            "Energy from fermented biomass.",
        ),
    );
    let mut tidal = def(
        "Tidal Generator",
        800,
        70.0,
        &[TerrainKind::Water],
        "Harvests the pull of the tides; anchored to the shore.",
    );
    tidal.requires_land_adjacency = true;
    earth_catalog.insert(BuildingId::from("tidal_generator"), tidal);

    let mut mars_catalog = BTreeMap::new();
    mars_catalog.insert(
        BuildingId::from("solar_panel"),
        def(
            "Martian Panel",
            60,
            25.0,
            &[TerrainKind::Rock],
            "Stronger sun, thinner atmosphere.",
        ),
    );
    mars_catalog.insert(
        BuildingId::from("dust_turbine"),
        def(
            "Dust Turbine",
            200,
            18.0,
            &[TerrainKind::Rock],
            "Rides the planet-wide dust storms.",
        ),
    );
    mars_catalog.insert(
        BuildingId::from("regolith_reactor"),
        def(
            "Regolith Reactor",
            1_500,
            150.0,
            &[TerrainKind::Mountain],
            "Extracts energy from Martian soil.",
        ),
    );
    mars_catalog.insert(
        BuildingId::from("ice_miner"),
        def(
            "Ice Miner",
            400,
            40.0,
            &[TerrainKind::Mountain],
            "Mines energy from subsurface ice.",
        ),
    );

    // --- Alpha Centauri ---
    let mut proxima_catalog = BTreeMap::new();
    proxima_catalog.insert(
        BuildingId::from("radiation_collector"),
        def(
            "Radiation Collector",
            2_000,
            200.0,
            &[TerrainKind::Rock],
            "Collects high-energy stellar radiation.",
        ),
    );
    proxima_catalog.insert(
        BuildingId::from("magnetic_dynamo"),
        def(
            "Magnetic Dynamo",
            3_500,
            380.0,
            &[TerrainKind::Mountain],
            "Driven by the planet's strong magnetic field.",
        ),
    );
    proxima_catalog.insert(
        BuildingId::from("crystal_harvester"),
        def(
            "Crystal Harvester",
            1_200,
            120.0,
            &[TerrainKind::Rock],
            "Harvests naturally charged crystals.",
        ),
    );

    let mut ice_catalog = BTreeMap::new();
    ice_catalog.insert(
        BuildingId::from("cryo_reactor"),
        def(
            "Cryo Reactor",
            1_800,
            280.0,
            &[TerrainKind::Ice],
            "Power from extreme temperature differentials.",
        ),
    );
    ice_catalog.insert(
        BuildingId::from("methane_burner"),
        def(
            "Methane Burner",
            900,
            95.0,
            &[TerrainKind::Ice],
            "Burns pockets of subsurface methane.",
        ),
    );
    ice_catalog.insert(
        BuildingId::from("thermal_drill"),
        def(
            "Thermal Drill",
            2_500,
            320.0,
            &[TerrainKind::Mountain],
            "Reaches down toward the warm core.",
        ),
    );
    ice_catalog.insert(
        BuildingId::from("ice_fusion"),
        def(
            "Ice Fusion",
            5_000,
            600.0,
            &[TerrainKind::Water],
            "A fusion reactor cooled by glacial melt.",
        ),
    );

    // --- Sirius ---
    let mut lava_catalog = BTreeMap::new();
    lava_catalog.insert(
        BuildingId::from("lava_tap"),
        def(
            "Lava Tap",
            4_000,
            500.0,
            &[TerrainKind::Rock],
            "Draws power straight from the magma.",
        ),
    );
    lava_catalog.insert(
        BuildingId::from("plasma_extractor"),
        def(
            "Plasma Extractor",
            8_000,
            950.0,
            &[TerrainKind::Mountain],
            "Collects high-temperature plasma.",
        ),
    );
    lava_catalog.insert(
        BuildingId::from("stellar_mirror"),
        def(
            "Stellar Mirror",
            6_000,
            720.0,
            &[TerrainKind::Rock],
            "Focuses Sirius's fierce glare.",
        ),
    );

    // --- Tau Ceti ---
    let mut jungle_catalog = BTreeMap::new();
    jungle_catalog.insert(
        BuildingId::from("bio_dome"),
        def(
            "Bio Dome",
            3_000,
            420.0,
            &[TerrainKind::Grass],
            "Cultivates engineered power flora.",
        ),
    );
    jungle_catalog.insert(
        BuildingId::from("photosynthesis_array"),
        def(
            "Photosynthesis Array",
            2_200,
            290.0,
            &[TerrainKind::Grass],
            "Mimics the local plant life.",
        ),
    );
    jungle_catalog.insert(
        BuildingId::from("spore_reactor"),
        def(
            "Spore Reactor",
            5_500,
            680.0,
            &[TerrainKind::Grass],
            "Ferments exotic spores.",
        ),
    );
    jungle_catalog.insert(
        BuildingId::from("root_network"),
        def(
            "Root Network",
            4_200,
            550.0,
            &[TerrainKind::Grass],
            "A linked web of conductive roots.",
        ),
    );

    let mut universe = BTreeMap::new();
    universe.insert(
        SystemId::from("sol"),
        system(
            "sol",
            "Sol",
            StarKind::GClass,
            true,
            0,
            2,
            5,
            vec![
                planet(
                    "sol-0",
                    "Earth",
                    PlanetKind::Terran,
                    PlanetTheme::Earth,
                    &["Water", "Iron"],
                    earth_catalog,
                ),
                planet(
                    "sol-1",
                    "Mars",
                    PlanetKind::Rocky,
                    PlanetTheme::Mars,
                    &["Iron", "Silicon"],
                    mars_catalog,
                ),
            ],
        ),
    );
    universe.insert(
        SystemId::from("alpha-centauri"),
        system(
            "alpha-centauri",
            "Alpha Centauri",
            StarKind::BClass,
            false,
            50_000,
            7,
            3,
            vec![
                planet(
                    "ac-0",
                    "Proxima b",
                    PlanetKind::Rocky,
                    PlanetTheme::Proxima,
                    &["Carbon", "Iron"],
                    proxima_catalog,
                ),
                planet(
                    "ac-1",
                    "Proxima c",
                    PlanetKind::Ice,
                    PlanetTheme::Ice,
                    &["Water", "Methane"],
                    ice_catalog,
                ),
            ],
        ),
    );
    universe.insert(
        SystemId::from("sirius"),
        system(
            "sirius",
            "Sirius",
            StarKind::BClass,
            false,
            120_000,
            5,
            8,
            vec![planet(
                "sir-0",
                "Sirius Prime",
                PlanetKind::Lava,
                PlanetTheme::Lava,
                &["Tungsten", "Platinum"],
                lava_catalog,
            )],
        ),
    );
    universe.insert(
        SystemId::from("tau-ceti"),
        system(
            "tau-ceti",
            "Tau Ceti",
            StarKind::GClass,
            false,
            200_000,
            9,
            6,
            vec![planet(
                "tc-0",
                "Ceti Garden",
                PlanetKind::Jungle,
                PlanetTheme::Jungle,
                &["Exotic flora", "Organics"],
                jungle_catalog,
            )],
        ),
    );
    universe
}

// ---------------------------------------------------------------------------
// Lookups
// ---------------------------------------------------------------------------

/// Find a planet anywhere in the universe by its globally unique key.
pub fn find_planet<'a>(
    universe: &'a BTreeMap<SystemId, StarSystem>,
    key: &PlanetKey,
) -> Option<&'a Planet> {
    universe
        .values()
        .flat_map(|system| system.planets.iter())
        .find(|planet| planet.key == *key)
}

/// Mutable variant of [`find_planet`].
pub fn find_planet_mut<'a>(
    universe: &'a mut BTreeMap<SystemId, StarSystem>,
    key: &PlanetKey,
) -> Option<&'a mut Planet> {
    universe
        .values_mut()
        .flat_map(|system| system.planets.iter_mut())
        .find(|planet| planet.key == *key)
}

/// Find the system that owns the given planet.
pub fn system_of_planet<'a>(
    universe: &'a BTreeMap<SystemId, StarSystem>,
    key: &PlanetKey,
) -> Option<&'a StarSystem> {
    universe
        .values()
        .find(|system| system.planets.iter().any(|planet| planet.key == *key))
}

/// Borrow the planet the player is currently viewing.
pub fn current_planet(state: &GameState) -> Option<&Planet> {
    find_planet(&state.universe, &state.current_planet)
}

/// Mutable variant of [`current_planet`].
pub fn current_planet_mut(state: &mut GameState) -> Option<&mut Planet> {
    find_planet_mut(&mut state.universe, &state.current_planet)
}

// ---------------------------------------------------------------------------
// Startup validation
// ---------------------------------------------------------------------------

/// Validate the structural invariants of a universe before play.
///
/// Runs against seeded data at startup (failure aborts) and against
/// loaded documents (failure falls back to a fresh game). Catches exactly
/// the states no command sequence can produce.
pub fn validate_universe(
    universe: &BTreeMap<SystemId, StarSystem>,
    current_planet: &PlanetKey,
    selected_system: &SystemId,
) -> Result<(), UniverseError> {
    let mut seen_keys: BTreeSet<&PlanetKey> = BTreeSet::new();
    for system in universe.values() {
        if system.planets.is_empty() {
            return Err(UniverseError::EmptySystem(system.id.clone()));
        }
        for planet in &system.planets {
            if !seen_keys.insert(&planet.key) {
                return Err(UniverseError::DuplicatePlanetKey(planet.key.clone()));
            }
            for (building, def) in &planet.catalog {
                if def.valid_terrain.is_empty() {
                    return Err(UniverseError::EmptyTerrainSet {
                        planet: planet.key.clone(),
                        building: building.clone(),
                    });
                }
            }
        }
    }

    let Some(owner) = system_of_planet(universe, current_planet) else {
        return Err(UniverseError::UnknownCurrentPlanet(current_planet.clone()));
    };
    if !owner.discovered {
        return Err(UniverseError::UndiscoveredCurrentPlanet(
            current_planet.clone(),
        ));
    }
    if !universe.contains_key(selected_system) {
        return Err(UniverseError::UnknownSelectedSystem(selected_system.clone()));
    }
    Ok(())
}
