//! Procedural terrain generation.
//!
//! Every planet theme maps a uniform sample in [0, 1) to a terrain kind
//! through an ordered threshold table. Samples are drawn from a
//! deterministic xorshift64 stream keyed by the planet seed and the cell
//! index, so the same world seed always produces the same terrain. Cells
//! are sampled independently: there is deliberately no contiguity
//! guarantee and no river or coastline shaping, just the raw
//! distribution.
//!
//! A grid is generated lazily, exactly once, on a planet's first visit.
//! [`ensure_grid`] never touches a non-empty grid, so player buildings can
//! never be destroyed by regeneration.

use tycoon_types::{Cell, Grid, Planet, PlanetKey, PlanetTheme, TerrainKind};

/// Multiplier used to spread seed and index bits before shifting.
const MIXING_CONSTANT: u64 = 0x517c_c1b7_2722_0a95;

/// Substitute state for the one value xorshift cannot leave.
const ZERO_STATE_FALLBACK: u64 = 0xdead_beef_cafe_babe;

/// One raw 64-bit draw from a planet's terrain stream.
///
/// Single xorshift64 step over the mixed seed and cell index. Not
/// cryptographic; it only needs to be uniform enough for terrain and
/// perfectly reproducible.
const fn cell_noise(planet_seed: u64, cell_index: u64) -> u64 {
    let mut state = planet_seed ^ cell_index.wrapping_mul(MIXING_CONSTANT);
    if state == 0 {
        state = ZERO_STATE_FALLBACK;
    }
    state ^= state << 13;
    state ^= state >> 7;
    state ^= state << 17;
    state
}

/// Map a raw draw to a uniform sample in [0, 1).
///
/// Uses the top 53 bits, which an `f64` represents exactly.
#[allow(clippy::cast_precision_loss)]
const fn unit_sample(raw: u64) -> f64 {
    ((raw >> 11) as f64) / ((1_u64 << 53) as f64)
}

/// Derive a planet's terrain seed from the world seed and its key.
///
/// A simple multiply-xor fold over the key bytes; planets with different
/// keys get uncorrelated streams from the same world seed.
pub fn planet_seed(world_seed: u64, key: &PlanetKey) -> u64 {
    key.as_str()
        .bytes()
        .fold(world_seed ^ MIXING_CONSTANT, |acc, byte| {
            (acc ^ u64::from(byte)).wrapping_mul(MIXING_CONSTANT)
        })
}

/// Map one uniform sample to a terrain kind via the theme's ordered
/// threshold table.
pub const fn terrain_for_sample(theme: PlanetTheme, sample: f64) -> TerrainKind {
    match theme {
        PlanetTheme::Mars => {
            if sample > 0.8 {
                TerrainKind::Mountain
            } else {
                TerrainKind::Rock
            }
        }
        PlanetTheme::Ice => {
            if sample > 0.9 {
                TerrainKind::Mountain
            } else if sample < 0.3 {
                TerrainKind::Water
            } else {
                TerrainKind::Ice
            }
        }
        PlanetTheme::Proxima => {
            if sample > 0.85 {
                TerrainKind::Mountain
            } else {
                TerrainKind::Rock
            }
        }
        PlanetTheme::Lava => {
            if sample > 0.75 {
                TerrainKind::Mountain
            } else {
                TerrainKind::Rock
            }
        }
        PlanetTheme::Jungle => {
            if sample > 0.95 {
                TerrainKind::Mountain
            } else if sample < 0.1 {
                TerrainKind::Water
            } else {
                TerrainKind::Grass
            }
        }
        PlanetTheme::Earth => {
            if sample > 0.85 {
                TerrainKind::Mountain
            } else if sample < 0.15 {
                TerrainKind::Water
            } else {
                TerrainKind::Grass
            }
        }
    }
}

/// Generate a fresh `size` × `size` grid for the given theme and seed.
pub fn generate(theme: PlanetTheme, seed: u64, size: usize) -> Grid {
    let mut rows = Vec::with_capacity(size);
    let mut index: u64 = 0;
    for _ in 0..size {
        let mut row = Vec::with_capacity(size);
        for _ in 0..size {
            let sample = unit_sample(cell_noise(seed, index));
            row.push(Cell::new(terrain_for_sample(theme, sample)));
            index = index.wrapping_add(1);
        }
        rows.push(row);
    }
    Grid { rows }
}

/// Generate the planet's grid only if it has never been generated. A
/// planet with a non-empty grid is left untouched.
pub fn ensure_grid(planet: &mut Planet, world_seed: u64, size: usize) {
    if planet.grid.is_generated() {
        return;
    }
    let seed = planet_seed(world_seed, &planet.key);
    planet.grid = generate(planet.theme, seed, size);
    tracing::info!(
        planet = %planet.key,
        theme = ?planet.theme,
        size,
        "Generated planet grid"
    );
}
