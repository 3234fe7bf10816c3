//! Placement legality checks.
//!
//! Validation is pure: it borrows the grid, the resolved building
//! definition, and the player's funds, and returns either the effective
//! cost to debit or the first failing check as a [`Rejection`]. Committing
//! a placement is the caller's job, so a rejection can never leave partial
//! state behind.
//!
//! Adjacency is orthogonal only (no diagonals) and edge-safe: a neighbor
//! outside the grid simply does not exist and never matches.

use tycoon_types::{BuildingDef, Cell, Grid, Modifier, Rejection, TerrainKind};

/// Currency values stay far below 2^53, so the conversion is exact.
#[allow(clippy::cast_precision_loss)]
const fn currency_to_f64(value: u64) -> f64 {
    value as f64
}

/// Round modifier-adjusted cost back to integer currency, clamping
/// negative and non-finite results to zero.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn round_to_currency(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        value.round() as u64
    } else {
        0
    }
}

/// The cost actually charged for a building: the catalog cost adjusted by
/// the first active global cost reduction, rounded to the nearest unit.
pub fn effective_cost(base: u64, effects: &[Modifier]) -> u64 {
    match effects.iter().find_map(Modifier::cost_factor) {
        Some(factor) => round_to_currency(currency_to_f64(base) * factor),
        None => base,
    }
}

/// The four orthogonal neighbors of `(x, y)` that exist on the grid.
fn neighbor_cells(grid: &Grid, x: usize, y: usize) -> impl Iterator<Item = &Cell> {
    let up = y.checked_sub(1).and_then(|ny| grid.cell(x, ny));
    let down = y.checked_add(1).and_then(|ny| grid.cell(x, ny));
    let left = x.checked_sub(1).and_then(|nx| grid.cell(nx, y));
    let right = x.checked_add(1).and_then(|nx| grid.cell(nx, y));
    [up, down, left, right].into_iter().flatten()
}

/// Whether any orthogonal neighbor of `(x, y)` is water.
pub fn has_water_neighbor(grid: &Grid, x: usize, y: usize) -> bool {
    neighbor_cells(grid, x, y).any(|cell| cell.terrain == TerrainKind::Water)
}

/// Whether any orthogonal neighbor of `(x, y)` is land (anything but
/// water).
pub fn has_land_neighbor(grid: &Grid, x: usize, y: usize) -> bool {
    neighbor_cells(grid, x, y).any(|cell| cell.terrain != TerrainKind::Water)
}

/// Check whether `def` may be placed at `(x, y)`, in order: bounds,
/// occupancy, terrain, water adjacency, land adjacency, affordability.
/// The first failing check wins. Returns the effective cost to debit.
///
/// The caller resolves `def` through the owning planet's catalog and
/// checks that a building is selected at all; ids never cross catalogs.
pub fn validate_placement(
    grid: &Grid,
    def: &BuildingDef,
    x: u32,
    y: u32,
    money: u64,
    effects: &[Modifier],
) -> Result<u64, Rejection> {
    let col = usize::try_from(x).unwrap_or(usize::MAX);
    let row = usize::try_from(y).unwrap_or(usize::MAX);
    let Some(cell) = grid.cell(col, row) else {
        return Err(Rejection::OutOfBounds { x, y });
    };
    if cell.building.is_some() {
        return Err(Rejection::TileOccupied);
    }
    if !def.valid_terrain.contains(&cell.terrain) {
        return Err(Rejection::UnsuitableTerrain);
    }
    if def.requires_water_adjacency && !has_water_neighbor(grid, col, row) {
        return Err(Rejection::NeedsWaterAdjacency);
    }
    if def.requires_land_adjacency && !has_land_neighbor(grid, col, row) {
        return Err(Rejection::NeedsLandAdjacency);
    }
    let cost = effective_cost(def.cost, effects);
    if money < cost {
        return Err(Rejection::InsufficientFunds {
            required: cost,
            available: money,
        });
    }
    Ok(cost)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use tycoon_types::BuildingId;

    use super::*;

    /// 3×3 grid: water in the center, grass everywhere else.
    fn make_pond_grid() -> Grid {
        let mut rows = vec![vec![Cell::new(TerrainKind::Grass); 3]; 3];
        if let Some(center) = rows.get_mut(1).and_then(|row| row.get_mut(1)) {
            *center = Cell::new(TerrainKind::Water);
        }
        Grid { rows }
    }

    fn make_def(terrain: &[TerrainKind]) -> BuildingDef {
        BuildingDef {
            name: String::from("Test Plant"),
            cost: 100,
            power: 10.0,
            valid_terrain: terrain.iter().copied().collect(),
            requires_water_adjacency: false,
            requires_land_adjacency: false,
            description: String::new(),
        }
    }

    #[test]
    fn accepts_valid_grass_placement() {
        let grid = make_pond_grid();
        let def = make_def(&[TerrainKind::Grass]);
        let cost = validate_placement(&grid, &def, 0, 0, 1_000, &[]);
        assert_eq!(cost, Ok(100));
    }

    #[test]
    fn rejects_out_of_bounds_target() {
        let grid = make_pond_grid();
        let def = make_def(&[TerrainKind::Grass]);
        let result = validate_placement(&grid, &def, 3, 0, 1_000, &[]);
        assert_eq!(result, Err(Rejection::OutOfBounds { x: 3, y: 0 }));
    }

    #[test]
    fn rejects_occupied_tile_before_terrain() {
        let mut grid = make_pond_grid();
        if let Some(cell) = grid.cell_mut(0, 0) {
            cell.building = Some(BuildingId::from("wind_turbine"));
        }
        // Terrain would also fail here; occupancy is checked first.
        let def = make_def(&[TerrainKind::Mountain]);
        let result = validate_placement(&grid, &def, 0, 0, 1_000, &[]);
        assert_eq!(result, Err(Rejection::TileOccupied));
    }

    #[test]
    fn rejects_unsuitable_terrain() {
        let grid = make_pond_grid();
        let def = make_def(&[TerrainKind::Mountain]);
        let result = validate_placement(&grid, &def, 0, 0, 1_000, &[]);
        assert_eq!(result, Err(Rejection::UnsuitableTerrain));
    }

    #[test]
    fn water_adjacency_is_orthogonal_only() {
        let grid = make_pond_grid();
        let mut def = make_def(&[TerrainKind::Grass]);
        def.requires_water_adjacency = true;

        // (0, 1) borders the center pond orthogonally: accepted.
        assert!(validate_placement(&grid, &def, 0, 1, 1_000, &[]).is_ok());
        // (0, 0) touches the pond only diagonally: rejected.
        assert_eq!(
            validate_placement(&grid, &def, 0, 0, 1_000, &[]),
            Err(Rejection::NeedsWaterAdjacency)
        );
    }

    #[test]
    fn adjacency_is_safe_at_grid_edges() {
        // 1×1 grid: every neighbor is out of bounds, none match.
        let grid = Grid {
            rows: vec![vec![Cell::new(TerrainKind::Grass)]],
        };
        let mut def = make_def(&[TerrainKind::Grass]);
        def.requires_water_adjacency = true;
        assert_eq!(
            validate_placement(&grid, &def, 0, 0, 1_000, &[]),
            Err(Rejection::NeedsWaterAdjacency)
        );
    }

    #[test]
    fn land_adjacency_accepts_shoreline_water() {
        let grid = make_pond_grid();
        let mut def = make_def(&[TerrainKind::Water]);
        def.requires_land_adjacency = true;
        // The center pond is ringed by grass: accepted.
        assert!(validate_placement(&grid, &def, 1, 1, 1_000, &[]).is_ok());
    }

    #[test]
    fn land_adjacency_rejects_open_water() {
        // 3×3 all-water grid: the center has no land neighbor.
        let grid = Grid {
            rows: vec![vec![Cell::new(TerrainKind::Water); 3]; 3],
        };
        let mut def = make_def(&[TerrainKind::Water]);
        def.requires_land_adjacency = true;
        assert_eq!(
            validate_placement(&grid, &def, 1, 1, 1_000, &[]),
            Err(Rejection::NeedsLandAdjacency)
        );
    }

    #[test]
    fn rejects_insufficient_funds_with_effective_cost() {
        let grid = make_pond_grid();
        let def = make_def(&[TerrainKind::Grass]);
        let result = validate_placement(&grid, &def, 0, 0, 99, &[]);
        assert_eq!(
            result,
            Err(Rejection::InsufficientFunds {
                required: 100,
                available: 99,
            })
        );
        // Exact funds pass.
        assert!(validate_placement(&grid, &def, 0, 0, 100, &[]).is_ok());
    }

    #[test]
    fn effective_cost_applies_first_reduction_only() {
        let effects = vec![
            Modifier::GlobalCostReduction { fraction: 0.1 },
            Modifier::GlobalCostReduction { fraction: 0.5 },
        ];
        // Only the first reduction applies: 100 * 0.9 = 90.
        assert_eq!(effective_cost(100, &effects), 90);
    }

    #[test]
    fn effective_cost_rounds_to_nearest() {
        let effects = vec![Modifier::GlobalCostReduction { fraction: 0.15 }];
        // 99 * 0.85 = 84.15 -> 84; 90 * 0.85 = 76.5 -> 77 (round half up).
        assert_eq!(effective_cost(99, &effects), 84);
        assert_eq!(effective_cost(90, &effects), 77);
    }

    #[test]
    fn effective_cost_ignores_power_boosts() {
        let effects = vec![Modifier::BuildingPowerBoost {
            building: BuildingId::from("solar_panel"),
            fraction: 0.5,
        }];
        assert_eq!(effective_cost(80, &effects), 80);
    }

    #[test]
    fn cheaper_cost_lets_tight_budget_through() {
        let grid = make_pond_grid();
        let def = make_def(&[TerrainKind::Grass]);
        let effects = vec![Modifier::GlobalCostReduction { fraction: 0.1 }];
        // 100 -> 90 effective; 95 on hand suffices.
        let cost = validate_placement(&grid, &def, 0, 0, 95, &effects);
        assert_eq!(cost, Ok(90));
    }

    #[test]
    fn empty_terrain_set_rejects_everywhere() {
        // Startup validation forbids this shape; the validator still
        // answers it deterministically.
        let def = make_def(&[]);
        let grid = make_pond_grid();
        assert_eq!(
            validate_placement(&grid, &def, 0, 0, 1_000, &[]),
            Err(Rejection::UnsuitableTerrain)
        );
    }
}
