//! `TileGrid` — the authoritative tile store.
//!
//! # Storage
//!
//! | Variant  | Constructor               | Lookup        | Out of bounds              |
//! |----------|---------------------------|---------------|----------------------------|
//! | Dense    | [`TileGrid::bounded`]     | O(1) index    | outside `width × height`   |
//! | Sparse   | [`TileGrid::unbounded`]   | O(1) hash     | any coordinate never set   |
//!
//! The dense variant is a row-major `Vec<Tile>`; the sparse variant is an
//! `FxHashMap<Coord, Tile>` that grows as tiles are placed, so worlds can
//! extend in any direction without reallocating a rectangle.
//!
//! # Revisions
//!
//! Every successful [`set`](TileGrid::set) bumps [`revision`](TileGrid::revision).
//! Derived structures (the spatial index, computed paths) record the
//! revision they were built from and compare it to detect staleness.

use rustc_hash::FxHashMap;

use tw_core::{Bounds, Coord};

use crate::{GridError, GridResult, Tile};

#[derive(Debug, Clone)]
enum Storage {
    Dense { bounds: Bounds, tiles: Vec<Tile> },
    Sparse { tiles: FxHashMap<Coord, Tile> },
}

/// Tile storage addressed by integer coordinates.
#[derive(Debug, Clone)]
pub struct TileGrid {
    storage:  Storage,
    revision: u64,
}

impl TileGrid {
    /// A `width × height` grid anchored at the origin, every cell `fill`.
    pub fn bounded(width: u32, height: u32, fill: Tile) -> Self {
        let bounds = Bounds::new(width, height);
        Self {
            storage:  Storage::Dense { bounds, tiles: vec![fill; bounds.area()] },
            revision: 0,
        }
    }

    /// An empty grid with no fixed extent.
    pub fn unbounded() -> Self {
        Self {
            storage:  Storage::Sparse { tiles: FxHashMap::default() },
            revision: 0,
        }
    }

    // ── Dimensions ────────────────────────────────────────────────────────

    /// `true` for grids built with [`bounded`](Self::bounded).
    pub fn is_bounded(&self) -> bool {
        matches!(self.storage, Storage::Dense { .. })
    }

    /// Fixed extent of a bounded grid; `None` for unbounded grids.
    pub fn bounds(&self) -> Option<Bounds> {
        match &self.storage {
            Storage::Dense { bounds, .. } => Some(*bounds),
            Storage::Sparse { .. }        => None,
        }
    }

    /// Smallest rectangle covering every stored tile.  `None` when empty.
    pub fn extent(&self) -> Option<Bounds> {
        match &self.storage {
            Storage::Dense { bounds, .. } => (!bounds.is_empty()).then_some(*bounds),
            Storage::Sparse { tiles } => {
                let mut keys = tiles.keys();
                let first = *keys.next()?;
                let (min, max) = keys.fold((first, first), |(lo, hi), c| {
                    (
                        Coord::new(lo.x.min(c.x), lo.y.min(c.y)),
                        Coord::new(hi.x.max(c.x), hi.y.max(c.y)),
                    )
                });
                let end = Coord::new(max.x.saturating_add(1), max.y.saturating_add(1));
                Some(Bounds::from_corners(min, end))
            }
        }
    }

    /// Number of addressable tiles.
    pub fn len(&self) -> usize {
        match &self.storage {
            Storage::Dense { tiles, .. } => tiles.len(),
            Storage::Sparse { tiles }    => tiles.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Edit counter; starts at 0 and increases by one per successful `set`.
    #[inline]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    // ── Reads ─────────────────────────────────────────────────────────────

    /// The tile at `c`, or `None` when out of bounds.
    #[inline]
    pub fn tile(&self, c: Coord) -> Option<&Tile> {
        match &self.storage {
            Storage::Dense { bounds, tiles } => bounds.linear_index(c).map(|i| &tiles[i]),
            Storage::Sparse { tiles }        => tiles.get(&c),
        }
    }

    /// The tile at `c`, or [`GridError::OutOfBounds`].
    #[inline]
    pub fn get(&self, c: Coord) -> GridResult<&Tile> {
        self.tile(c).ok_or(GridError::OutOfBounds(c))
    }

    #[inline]
    pub fn contains(&self, c: Coord) -> bool {
        self.tile(c).is_some()
    }

    /// `true` if `c` is in bounds and its tile can be entered.
    #[inline]
    pub fn is_passable(&self, c: Coord) -> bool {
        self.tile(c).is_some_and(Tile::is_passable)
    }

    /// Every `(coord, tile)` pair in deterministic order: row-major for
    /// bounded grids, sorted by `(y, x)` for unbounded ones.
    pub fn iter(&self) -> Box<dyn Iterator<Item = (Coord, &Tile)> + '_> {
        match &self.storage {
            Storage::Dense { bounds, tiles } => {
                let bounds = *bounds;
                Box::new(tiles.iter().enumerate().map(move |(i, t)| (bounds.coord_at(i), t)))
            }
            Storage::Sparse { tiles } => {
                let mut sorted: Vec<(Coord, &Tile)> = tiles.iter().map(|(c, t)| (*c, t)).collect();
                sorted.sort_unstable_by_key(|(c, _)| (c.y, c.x));
                Box::new(sorted.into_iter())
            }
        }
    }

    /// Cheapest finite tile cost in the grid, `None` if nothing is passable.
    ///
    /// O(n).  The spatial index caches this per revision for its heuristic.
    pub fn min_passable_cost(&self) -> Option<f32> {
        self.iter()
            .filter_map(|(_, t)| t.cost.value())
            .min_by(f32::total_cmp)
    }

    // ── Writes ────────────────────────────────────────────────────────────

    /// Place `tile` at `c`, returning the tile it replaced (if any).
    ///
    /// Bounded grids reject coordinates outside their extent; unbounded
    /// grids accept any coordinate and grow.
    pub fn set(&mut self, c: Coord, tile: Tile) -> GridResult<Option<Tile>> {
        let previous = match &mut self.storage {
            Storage::Dense { bounds, tiles } => {
                let i = bounds.linear_index(c).ok_or(GridError::OutOfBounds(c))?;
                Some(std::mem::replace(&mut tiles[i], tile))
            }
            Storage::Sparse { tiles } => tiles.insert(c, tile),
        };
        self.revision += 1;
        Ok(previous)
    }

    /// Fill every in-bounds coordinate of `area` with `tile`.  Coordinates
    /// outside a bounded grid are skipped.  Counts as one revision.
    pub fn fill(&mut self, area: Bounds, tile: Tile) -> usize {
        let mut written = 0;
        match &mut self.storage {
            Storage::Dense { bounds, tiles } => {
                for c in area.intersect(bounds).iter() {
                    if let Some(i) = bounds.linear_index(c) {
                        tiles[i] = tile;
                        written += 1;
                    }
                }
            }
            Storage::Sparse { tiles } => {
                for c in area.iter() {
                    tiles.insert(c, tile);
                    written += 1;
                }
            }
        }
        if written > 0 {
            self.revision += 1;
        }
        written
    }
}
