//! Seeded procedural map generation.
//!
//! Each tile independently rolls wall / water / rough / open from the
//! configured densities, then `smoothing_passes` rounds of a cellular
//! automaton turn isolated specks into cave-like clusters: a tile becomes a
//! wall when at least 5 of its 8 neighbours are walls, and is cleared when
//! at most 2 are.  The same config always yields the same grid.

use tw_core::{Bounds, Coord, Direction, SimRng};

use crate::{Terrain, Tile, TileGrid};

/// Parameters for [`scatter`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ScatterConfig {
    pub width:  u32,
    pub height: u32,
    /// Probability a tile starts as `Wall`.
    pub wall_density: f64,
    /// Probability a non-wall tile is `Water`.
    pub water_density: f64,
    /// Probability a non-wall, non-water tile is `Rough`.
    pub rough_density: f64,
    /// Cellular-automaton rounds applied to walls.
    pub smoothing_passes: u32,
    /// Surround the map with a one-tile wall ring.
    pub border: bool,
    pub seed: u64,
}

impl Default for ScatterConfig {
    fn default() -> Self {
        Self {
            width:            32,
            height:           32,
            wall_density:     0.3,
            water_density:    0.05,
            rough_density:    0.15,
            smoothing_passes: 2,
            border:           true,
            seed:             0,
        }
    }
}

/// Generate a bounded grid from `cfg`.
pub fn scatter(cfg: &ScatterConfig) -> TileGrid {
    let bounds = Bounds::new(cfg.width, cfg.height);
    let root = SimRng::new(cfg.seed);
    let mut wall_rng = root.stream(0);
    let mut surface_rng = root.stream(1);

    let mut walls: Vec<bool> = (0..bounds.area())
        .map(|_| wall_rng.chance(cfg.wall_density))
        .collect();

    for _ in 0..cfg.smoothing_passes {
        walls = smooth(&bounds, &walls);
    }

    let mut grid = TileGrid::bounded(cfg.width, cfg.height, Tile::open());
    for (i, c) in bounds.iter().enumerate() {
        let on_border = cfg.border
            && (c.x == 0 || c.y == 0 || c.x == bounds.max.x - 1 || c.y == bounds.max.y - 1);
        // Always roll the surface so toggling `border` doesn't reshuffle the interior.
        let water = surface_rng.chance(cfg.water_density);
        let rough = surface_rng.chance(cfg.rough_density);

        let terrain = if on_border || walls[i] {
            Terrain::Wall
        } else if water {
            Terrain::Water
        } else if rough {
            Terrain::Rough
        } else {
            continue;
        };
        // In-bounds by construction.
        let _ = grid.set(c, Tile::new(terrain));
    }
    grid
}

fn smooth(bounds: &Bounds, walls: &[bool]) -> Vec<bool> {
    bounds
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let around = wall_neighbours(bounds, walls, c);
            match around {
                5.. => true,
                ..=2 => false,
                _ => walls[i],
            }
        })
        .collect()
}

/// Out-of-bounds neighbours count as walls so edges close up naturally.
fn wall_neighbours(bounds: &Bounds, walls: &[bool], c: Coord) -> usize {
    Direction::ALL
        .into_iter()
        .filter(|&d| bounds.linear_index(c.step(d)).is_none_or(|j| walls[j]))
        .count()
}
