//! Building catalog construction.
//!
//! A catalog is a read-only map from [`BuildingId`] to [`BuildingDef`],
//! owned by exactly one planet. The base catalog here serves the
//! single-world scenario; the multi-planet universe seeds its own catalogs
//! in [`crate::universe`].

use std::collections::BTreeMap;

use tycoon_types::{BuildingDef, BuildingId, TerrainKind};

/// Build a [`BuildingDef`] with no adjacency requirements.
pub(crate) fn def(
    name: &str,
    cost: u64,
    power: f64,
    terrain: &[TerrainKind],
    description: &str,
) -> BuildingDef {
    BuildingDef {
        name: name.to_owned(),
        cost,
        power,
        valid_terrain: terrain.iter().copied().collect(),
        requires_water_adjacency: false,
        requires_land_adjacency: false,
        description: description.to_owned(),
    }
}

/// The global catalog of the single-world scenario.
///
/// Six classic generators spanning the earth terrain set, topped by the
/// nuclear plant with its water-adjacency requirement.
pub fn base_catalog() -> BTreeMap<BuildingId, BuildingDef> {
    let mut catalog = BTreeMap::new();
    catalog.insert(
        BuildingId::from("wind_turbine"),
        def(
            "Wind Turbine",
            100,
            10.0,
            &[TerrainKind::Grass, TerrainKind::Rock],
            "Clean energy from steady winds.",
        ),
    );
    catalog.insert(
        BuildingId::from("hydro_plant"),
        def(
            "Hydro Plant",
            500,
            50.0,
            &[TerrainKind::Water],
            "Power from flowing water.",
        ),
    );
    catalog.insert(
        BuildingId::from("coal_plant"),
        def(
            "Coal Plant",
            1_000,
            120.0,
            &[TerrainKind::Mountain, TerrainKind::Rock],
            "Cheap, dirty, dependable.",
        ),
    );
    catalog.insert(
        BuildingId::from("solar_panel"),
        def(
            "Solar Panel",
            80,
            8.0,
            &[TerrainKind::Grass, TerrainKind::Rock],
            "Power from sunlight.",
        ),
    );
    catalog.insert(
        BuildingId::from("geothermal_plant"),
        def(
            "Geothermal Plant",
            2_500,
            250.0,
            &[TerrainKind::Mountain],
            "Taps heat deep under the mountains.",
        ),
    );
    let mut nuclear = def(
        "Nuclear Plant",
        10_000,
        1_000.0,
        &[TerrainKind::Grass],
        "Enormous output; must border water for cooling.",
    );
    nuclear.requires_water_adjacency = true;
    catalog.insert(BuildingId::from("nuclear_plant"), nuclear);
    catalog
}
