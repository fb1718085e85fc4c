//! Pathfinding trait and the default A* implementation.
//!
//! # Pluggability
//!
//! `tw-behavior` and `tw-sim` call search through the [`Pathfinder`] trait,
//! so hosts can swap in jump-point search, flow fields, or a scripted
//! planner without touching the engine.  [`AStar`] is the default.
//!
//! # Costs
//!
//! A step costs the entry cost of the destination tile, times √2 for a
//! diagonal.  The A* heuristic is the Manhattan (4-way) or octile (8-way)
//! distance to the goal scaled by the cheapest passable tile in the grid.
//! Every real step costs at least that much per unit of distance, so the
//! heuristic never overestimates and never drops by more than one step's
//! cost: admissible and consistent, and the first goal pop is optimal.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::collections::hash_map::Entry;

use rustc_hash::FxHashMap;

use tw_core::Coord;
use tw_grid::TileGrid;

use crate::{AgentConstraints, Path, SpatialError, SpatialIndex, SpatialResult};

// ── Pathfinder trait ──────────────────────────────────────────────────────────

/// Pluggable route search.
///
/// # Thread safety
///
/// Implementations must be `Send + Sync` so one instance can be shared by
/// Rayon workers during the parallel decision phase.
pub trait Pathfinder: Send + Sync {
    /// Cheapest path from `start` to `goal` under `constraints`.
    ///
    /// - `InvalidEndpoint` if either end is out of bounds or not enterable,
    ///   checked before any expansion.
    /// - `NoPathFound` if the goal is unreachable.
    /// - `start == goal` yields a one-step path of cost 0.
    fn find_path(
        &self,
        grid: &TileGrid,
        index: &SpatialIndex,
        start: Coord,
        goal: Coord,
        constraints: &AgentConstraints,
    ) -> SpatialResult<Path>;
}

// ── AStar ─────────────────────────────────────────────────────────────────────

/// Best-first search ordered by `f = g + h`.
///
/// Ties on `f` go to the entry pushed first, which together with the fixed
/// neighbour order makes results identical across runs and threads.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AStar {
    informed: bool,
}

impl AStar {
    pub fn new() -> Self {
        Self { informed: true }
    }

    /// `h = 0` everywhere, i.e. Dijkstra.  Slower; used as a reference when
    /// checking that the informed search stays optimal.
    pub fn uninformed() -> Self {
        Self { informed: false }
    }

    pub fn is_informed(&self) -> bool {
        self.informed
    }
}

impl Default for AStar {
    fn default() -> Self {
        Self::new()
    }
}

impl Pathfinder for AStar {
    fn find_path(
        &self,
        grid: &TileGrid,
        index: &SpatialIndex,
        start: Coord,
        goal: Coord,
        constraints: &AgentConstraints,
    ) -> SpatialResult<Path> {
        constraints.check_endpoint(grid, start)?;
        constraints.check_endpoint(grid, goal)?;

        if start == goal {
            return Ok(Path::trivial(start, grid.revision()));
        }
        if index.is_current(grid) && !index.same_room(start, goal) {
            return Err(SpatialError::NoPathFound { start, goal });
        }

        let scale = if self.informed { index.heuristic_scale(grid) } else { 0.0 };
        search(grid, index, start, goal, constraints, scale)
    }
}

// ── A* internals ──────────────────────────────────────────────────────────────

struct Node {
    g:      f32,
    parent: Option<Coord>,
    closed: bool,
}

/// Frontier entry.  `BinaryHeap` is a max-heap, so the ordering is reversed:
/// lowest `f` first, then lowest insertion sequence.
struct Frontier {
    f:     f32,
    seq:   u64,
    coord: Coord,
}

impl PartialEq for Frontier {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Frontier {}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

fn search(
    grid: &TileGrid,
    index: &SpatialIndex,
    start: Coord,
    goal: Coord,
    constraints: &AgentConstraints,
    scale: f32,
) -> SpatialResult<Path> {
    let h = |c: Coord| constraints.connectivity.distance(c, goal) * scale;

    let mut nodes: FxHashMap<Coord, Node> = FxHashMap::default();
    let mut heap = BinaryHeap::new();
    let mut seq = 0u64;

    nodes.insert(start, Node { g: 0.0, parent: None, closed: false });
    heap.push(Frontier { f: h(start), seq, coord: start });

    while let Some(Frontier { coord, .. }) = heap.pop() {
        let g = match nodes.get_mut(&coord) {
            // Stale entry: a cheaper copy was already expanded.
            Some(node) if node.closed => continue,
            Some(node) => {
                node.closed = true;
                node.g
            }
            None => continue,
        };

        if coord == goal {
            return Ok(reconstruct(&nodes, goal, g, grid.revision()));
        }

        index.for_each_step(grid, coord, constraints, |next, step| {
            let candidate = g + step;
            match nodes.entry(next) {
                Entry::Occupied(mut e) => {
                    let node = e.get_mut();
                    if node.closed || candidate >= node.g {
                        return;
                    }
                    node.g = candidate;
                    node.parent = Some(coord);
                }
                Entry::Vacant(e) => {
                    e.insert(Node { g: candidate, parent: Some(coord), closed: false });
                }
            }
            seq += 1;
            heap.push(Frontier { f: candidate + h(next), seq, coord: next });
        });
    }

    Err(SpatialError::NoPathFound { start, goal })
}

fn reconstruct(nodes: &FxHashMap<Coord, Node>, goal: Coord, cost: f32, revision: u64) -> Path {
    let mut steps = vec![goal];
    let mut cur = goal;
    while let Some(parent) = nodes.get(&cur).and_then(|n| n.parent) {
        steps.push(parent);
        cur = parent;
    }
    steps.reverse();
    Path::from_parts(steps, cost, revision)
}
