//! `Path` — a route frozen at the grid revision it was computed against.

use tw_core::Coord;
use tw_grid::TileGrid;

use crate::{AgentConstraints, SpatialError, SpatialIndex, SpatialResult};

/// Ordered steps from start to goal, both included.
///
/// A path is a snapshot: it is never re-validated automatically.  Callers
/// that care compare [`revision`](Self::revision) with the grid's, or walk
/// the remaining steps with [`first_blocked`](Self::first_blocked).
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    steps:    Vec<Coord>,
    cost:     f32,
    revision: u64,
}

impl Path {
    /// The zero-move path `[at]`.
    pub fn trivial(at: Coord, revision: u64) -> Self {
        Self { steps: vec![at], cost: 0.0, revision }
    }

    pub(crate) fn from_parts(steps: Vec<Coord>, cost: f32, revision: u64) -> Self {
        debug_assert!(!steps.is_empty());
        Self { steps, cost, revision }
    }

    /// Build a path from `start` through `moves`, checking that every step
    /// is a valid edge for `constraints` and summing the cost.
    pub fn from_steps(
        grid: &TileGrid,
        index: &SpatialIndex,
        start: Coord,
        moves: &[Coord],
        constraints: &AgentConstraints,
    ) -> SpatialResult<Self> {
        constraints.check_endpoint(grid, start)?;
        let mut steps = Vec::with_capacity(moves.len() + 1);
        steps.push(start);
        let mut cost = 0.0;
        for &to in moves {
            let from = steps[steps.len() - 1];
            let mut step = None;
            index.for_each_step(grid, from, constraints, |next, c| {
                if next == to {
                    step = Some(c);
                }
            });
            cost += step.ok_or(SpatialError::InvalidEdge { from, to })?;
            steps.push(to);
        }
        Ok(Self { steps, cost, revision: grid.revision() })
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn steps(&self) -> &[Coord] {
        &self.steps
    }

    pub fn start(&self) -> Coord {
        self.steps[0]
    }

    pub fn goal(&self) -> Coord {
        self.steps[self.steps.len() - 1]
    }

    /// Number of coordinates, start and goal included.
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Number of moves (`step_count() - 1`).
    pub fn move_count(&self) -> usize {
        self.steps.len() - 1
    }

    /// `true` when start and goal coincide.
    pub fn is_trivial(&self) -> bool {
        self.steps.len() == 1
    }

    /// Sum of step costs.
    pub fn cost(&self) -> f32 {
        self.cost
    }

    /// Grid revision the path was computed against.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn contains(&self, c: Coord) -> bool {
        self.steps.contains(&c)
    }

    // ── Validity ──────────────────────────────────────────────────────────

    /// `true` if the grid has been edited since the path was computed.
    /// Conservative: the edit may not touch the path at all.
    pub fn is_stale(&self, grid: &TileGrid) -> bool {
        grid.revision() != self.revision
    }

    /// Index of the first step at or after `from` the agent can no longer
    /// enter, if any.
    pub fn first_blocked(
        &self,
        grid: &TileGrid,
        constraints: &AgentConstraints,
        from: usize,
    ) -> Option<usize> {
        (from..self.steps.len()).find(|&i| !constraints.can_enter_at(grid, self.steps[i]))
    }

    // ── Presentation ──────────────────────────────────────────────────────

    /// Start, goal, and every corner in between: runs of steps in the same
    /// direction collapse to their endpoints.
    pub fn waypoints(&self) -> Vec<Coord> {
        let mut out = vec![self.start()];
        for w in self.steps.windows(3) {
            let d1 = (w[1].x - w[0].x, w[1].y - w[0].y);
            let d2 = (w[2].x - w[1].x, w[2].y - w[1].y);
            if d1 != d2 {
                out.push(w[1]);
            }
        }
        if !self.is_trivial() {
            out.push(self.goal());
        }
        out
    }
}
