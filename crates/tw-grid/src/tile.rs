//! A single grid cell: terrain tag plus traversal cost.

use std::fmt;

use crate::{GridError, GridResult, Terrain};

// ── TileCost ─────────────────────────────────────────────────────────────────

/// Cost of entering a tile: a finite, non-negative number or the
/// [`IMPASSABLE`](Self::IMPASSABLE) sentinel.
///
/// Internally the sentinel is `f32::INFINITY`, so summing costs along a
/// route never silently wraps.  NaN and negative values cannot be
/// constructed.
#[derive(Copy, Clone, PartialEq, PartialOrd, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileCost(f32);

impl TileCost {
    pub const IMPASSABLE: TileCost = TileCost(f32::INFINITY);

    /// Validate a raw cost.  `f32::INFINITY` maps to `IMPASSABLE`.
    pub fn new(cost: f32) -> GridResult<Self> {
        if cost.is_nan() || cost < 0.0 {
            return Err(GridError::InvalidCost(cost));
        }
        Ok(TileCost(cost))
    }

    #[inline]
    pub fn is_passable(self) -> bool {
        self.0.is_finite()
    }

    /// The finite cost, or `None` when impassable.
    #[inline]
    pub fn value(self) -> Option<f32> {
        self.is_passable().then_some(self.0)
    }
}

impl fmt::Display for TileCost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value() {
            Some(v) => write!(f, "{v}"),
            None    => f.write_str("impassable"),
        }
    }
}

// ── Tile ─────────────────────────────────────────────────────────────────────

/// One addressable cell of the world.
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tile {
    pub terrain: Terrain,
    pub cost:    TileCost,
}

impl Tile {
    /// A tile with the terrain's default cost.
    pub fn new(terrain: Terrain) -> Self {
        let cost = match terrain.default_cost() {
            Some(c) => TileCost(c),
            None    => TileCost::IMPASSABLE,
        };
        Self { terrain, cost }
    }

    /// A tile with an explicit cost, e.g. a road through rough terrain.
    pub fn with_cost(terrain: Terrain, cost: f32) -> GridResult<Self> {
        Ok(Self { terrain, cost: TileCost::new(cost)? })
    }

    /// Shorthand for `Tile::new(Terrain::Open)`.
    pub fn open() -> Self {
        Self::new(Terrain::Open)
    }

    /// Shorthand for `Tile::new(Terrain::Wall)`.
    pub fn wall() -> Self {
        Self::new(Terrain::Wall)
    }

    #[inline]
    pub fn is_passable(&self) -> bool {
        self.cost.is_passable()
    }
}

impl Default for Tile {
    fn default() -> Self {
        Self::open()
    }
}
