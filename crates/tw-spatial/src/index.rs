//! `SpatialIndex` — neighbour, cost, area, and connectivity queries.
//!
//! # Derived data
//!
//! The grid is the single source of truth.  The index caches only what is
//! expensive to recompute per query:
//!
//! | Field        | Meaning                                               |
//! |--------------|-------------------------------------------------------|
//! | `rooms`      | 4-connected component label of every passable tile    |
//! | `room_sizes` | tile count per room, indexed by `RoomId`              |
//! | `min_cost`   | cheapest passable tile cost (A* heuristic scale)      |
//! | `revision`   | grid revision the above were computed from            |
//!
//! All of it is rebuilt by [`SpatialIndex::sync`] when the grid revision has
//! moved.  Room labels always describe the last sync; callers gate them on
//! [`is_current`](SpatialIndex::is_current).  The heuristic scale drops to
//! `0.0` when stale, so a stale index can slow a search down but never make
//! it wrong.
//!
//! # Rooms and diagonals
//!
//! Rooms use orthogonal adjacency only.  Because a diagonal step requires
//! both orthogonal side tiles to be passable, every diagonal move stays
//! inside one 4-connected component, so the labels are valid for both
//! connectivities.

use std::collections::VecDeque;

use rustc_hash::FxHashMap;

use tw_core::{Coord, Direction, DIAGONAL_FACTOR};
use tw_grid::TileGrid;

use crate::{AgentConstraints, SpatialError, SpatialResult};

/// Label of a connected component of passable tiles.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoomId(pub u32);

impl RoomId {
    #[inline(always)]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

// ── SpatialIndex ─────────────────────────────────────────────────────────────

/// Query layer over a [`TileGrid`].  Holds no tiles, only derived data.
#[derive(Debug, Default, Clone)]
pub struct SpatialIndex {
    revision:   Option<u64>,
    rooms:      FxHashMap<Coord, RoomId>,
    room_sizes: Vec<u32>,
    min_cost:   Option<f32>,
}

impl SpatialIndex {
    /// An index that has never been synced.  Every derived shortcut is
    /// bypassed until [`sync`](Self::sync) runs.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a current index for `grid`.
    pub fn build(grid: &TileGrid) -> Self {
        let mut index = Self::new();
        index.sync(grid);
        index
    }

    // ── Freshness ─────────────────────────────────────────────────────────

    /// Rebuild derived data if `grid` has changed since the last sync.
    /// Returns `true` if a rebuild happened.
    pub fn sync(&mut self, grid: &TileGrid) -> bool {
        if self.is_current(grid) {
            return false;
        }
        self.rebuild(grid);
        true
    }

    /// `true` if derived data reflects `grid`'s current revision.
    #[inline]
    pub fn is_current(&self, grid: &TileGrid) -> bool {
        self.revision == Some(grid.revision())
    }

    /// Grid revision of the last sync, `None` if never synced.
    pub fn revision(&self) -> Option<u64> {
        self.revision
    }

    fn rebuild(&mut self, grid: &TileGrid) {
        self.rooms.clear();
        self.room_sizes.clear();
        self.min_cost = None;

        let mut queue = VecDeque::new();
        for (c, tile) in grid.iter() {
            let Some(cost) = tile.cost.value() else { continue };
            self.min_cost = Some(self.min_cost.map_or(cost, |m| m.min(cost)));

            if self.rooms.contains_key(&c) {
                continue;
            }
            let room = RoomId(self.room_sizes.len() as u32);
            let mut size = 0u32;
            self.rooms.insert(c, room);
            queue.push_back(c);
            while let Some(cur) = queue.pop_front() {
                size += 1;
                for &dir in &Direction::ORTHOGONAL {
                    let Some(next) = cur.checked_step(dir) else { continue };
                    if grid.is_passable(next) && !self.rooms.contains_key(&next) {
                        self.rooms.insert(next, room);
                        queue.push_back(next);
                    }
                }
            }
            self.room_sizes.push(size);
        }
        self.revision = Some(grid.revision());
    }

    // ── Connectivity ──────────────────────────────────────────────────────

    /// Room containing `c`; `None` for impassable or out-of-bounds tiles
    /// (and for everything while the index has never been synced).
    #[inline]
    pub fn room_of(&self, c: Coord) -> Option<RoomId> {
        self.rooms.get(&c).copied()
    }

    pub fn room_count(&self) -> usize {
        self.room_sizes.len()
    }

    /// Number of tiles in `room`; 0 for unknown labels.
    pub fn room_size(&self, room: RoomId) -> usize {
        self.room_sizes.get(room.index()).map_or(0, |&n| n as usize)
    }

    /// `false` only when both tiles are labelled and the labels differ,
    /// i.e. when the pair is provably disconnected.
    pub fn same_room(&self, a: Coord, b: Coord) -> bool {
        match (self.room_of(a), self.room_of(b)) {
            (Some(ra), Some(rb)) => ra == rb,
            _ => true,
        }
    }

    /// Multiplier for distance heuristics: the cheapest passable tile cost
    /// when current, otherwise `0.0`.
    pub fn heuristic_scale(&self, grid: &TileGrid) -> f32 {
        if self.is_current(grid) {
            self.min_cost.unwrap_or(0.0)
        } else {
            0.0
        }
    }

    // ── Adjacency ─────────────────────────────────────────────────────────

    /// Call `f(next, step_cost)` for every tile the agent can step to from
    /// `c`, in direction order (N, E, S, W, then NE, SE, SW, NW).
    ///
    /// Allocation-free; this is the search inner loop.
    #[inline]
    pub fn for_each_step(
        &self,
        grid: &TileGrid,
        c: Coord,
        constraints: &AgentConstraints,
        mut f: impl FnMut(Coord, f32),
    ) {
        for &dir in constraints.connectivity.directions() {
            let Some(next) = c.checked_step(dir) else { continue };
            let Some(tile) = grid.tile(next) else { continue };
            if constraints.avoid == Some(next) || !constraints.can_enter(tile) {
                continue;
            }
            let Some(cost) = tile.cost.value() else { continue };
            match dir.components() {
                None => f(next, cost),
                Some((a, b)) => {
                    let side = |d: Direction| {
                        c.checked_step(d).is_some_and(|s| constraints.can_enter_at(grid, s))
                    };
                    if side(a) && side(b)
                    {
                        f(next, cost * DIAGONAL_FACTOR);
                    }
                }
            }
        }
    }

    /// Tiles the agent can step to from `c`, in direction order.
    pub fn neighbors(
        &self,
        grid: &TileGrid,
        c: Coord,
        constraints: &AgentConstraints,
    ) -> Vec<Coord> {
        let mut out = Vec::with_capacity(constraints.connectivity.directions().len());
        self.for_each_step(grid, c, constraints, |next, _| out.push(next));
        out
    }

    /// Cost of stepping from `from` into `to`: the entry cost of `to`,
    /// multiplied by √2 for a diagonal step.
    ///
    /// Fails with [`SpatialError::InvalidEdge`] when the two are not one
    /// king-move apart or either is impassable or out of bounds.
    pub fn cost(&self, grid: &TileGrid, from: Coord, to: Coord) -> SpatialResult<f32> {
        let invalid = SpatialError::InvalidEdge { from, to };
        let dir = from.direction_to(to).ok_or(invalid.clone())?;
        if !grid.is_passable(from) {
            return Err(invalid);
        }
        let entry = grid
            .tile(to)
            .and_then(|t| t.cost.value())
            .ok_or(invalid)?;
        Ok(if dir.is_diagonal() { entry * DIAGONAL_FACTOR } else { entry })
    }

    // ── Areas ─────────────────────────────────────────────────────────────

    /// In-bounds coordinates within Euclidean `radius` of `center`
    /// (inclusive), in row-major order.  The bounding square is clipped to
    /// the `i32` plane.
    pub fn region(&self, grid: &TileGrid, center: Coord, radius: u32) -> Vec<Coord> {
        let r = i64::from(radius);
        let r_sq = u64::from(radius) * u64::from(radius);
        let clip = |v: i64| v.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32;
        let lo = Coord::new(clip(i64::from(center.x) - r), clip(i64::from(center.y) - r));
        let hi = Coord::new(clip(i64::from(center.x) + r), clip(i64::from(center.y) + r));
        let within = |c: Coord| c.distance_sq(center) <= r_sq;

        // Wider than the grid holds: walk the stored tiles instead.
        let span = (u64::from(hi.x.abs_diff(lo.x)) + 1)
            .saturating_mul(u64::from(hi.y.abs_diff(lo.y)) + 1);
        if span > grid.len() as u64 {
            return grid.iter().map(|(c, _)| c).filter(|&c| within(c)).collect();
        }

        let mut out = Vec::new();
        for y in lo.y..=hi.y {
            for x in lo.x..=hi.x {
                let c = Coord::new(x, y);
                if within(c) && grid.contains(c) {
                    out.push(c);
                }
            }
        }
        out
    }

    /// The part of [`region`](Self::region) with an unobstructed line of
    /// sight from `center`.  Impassable tiles block the line beyond them but
    /// are themselves visible.
    pub fn visible(&self, grid: &TileGrid, center: Coord, radius: u32) -> Vec<Coord> {
        self.region(grid, center, radius)
            .into_iter()
            .filter(|&c| line_of_sight(grid, center, c))
            .collect()
    }
}

// ── Line of sight ────────────────────────────────────────────────────────────

/// `true` if every tile strictly between `from` and `to` on the Bresenham
/// line is passable.
pub fn line_of_sight(grid: &TileGrid, from: Coord, to: Coord) -> bool {
    let cells = bresenham(from, to);
    let inner = cells.len().saturating_sub(1);
    cells.iter().take(inner).skip(1).all(|&c| grid.is_passable(c))
}

/// Cells on the Bresenham line from `a` to `b`, both ends included.
pub fn bresenham(a: Coord, b: Coord) -> Vec<Coord> {
    // i64 throughout: the deltas of two i32 coordinates need 33 bits.
    let (ax, ay, bx, by) = (i64::from(a.x), i64::from(a.y), i64::from(b.x), i64::from(b.y));
    let dx = (bx - ax).abs();
    let dy = -(by - ay).abs();
    let sx = if ax < bx { 1 } else { -1 };
    let sy = if ay < by { 1 } else { -1 };
    let mut err = dx + dy;
    let (mut x, mut y) = (ax, ay);
    let mut out = Vec::with_capacity(dx.max(-dy) as usize + 1);
    loop {
        // Every visited cell lies between `a` and `b`, so it fits in i32.
        out.push(Coord::new(x as i32, y as i32));
        if x == bx && y == by {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
    out
}
