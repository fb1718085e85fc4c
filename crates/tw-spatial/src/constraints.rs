//! Per-agent movement rules consulted by neighbour queries and search.

use tw_core::{Connectivity, Coord};
use tw_grid::{Tile, TileGrid};

use crate::{EndpointReason, SpatialError, SpatialResult};

/// How a particular agent is allowed to move.
///
/// Constraints only ever *remove* options relative to raw passability, so
/// anything unreachable on the bare grid is unreachable for every agent.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AgentConstraints {
    pub connectivity: Connectivity,
    /// Tiles whose cost exceeds this are treated as impassable for the agent.
    pub max_tile_cost: Option<f32>,
    /// One tile to route around, e.g. one held by an agent that is not
    /// moving.  Never checked at search endpoints.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub avoid: Option<Coord>,
}

impl AgentConstraints {
    /// Orthogonal movement, no cost ceiling.
    pub fn four() -> Self {
        Self { connectivity: Connectivity::Four, max_tile_cost: None, avoid: None }
    }

    /// Eight-way movement, no cost ceiling.
    pub fn eight() -> Self {
        Self { connectivity: Connectivity::Eight, max_tile_cost: None, avoid: None }
    }

    pub fn with_max_tile_cost(mut self, max: f32) -> Self {
        self.max_tile_cost = Some(max);
        self
    }

    /// The same rules with `c` treated as impassable.
    pub fn avoiding(mut self, c: Coord) -> Self {
        self.avoid = Some(c);
        self
    }

    /// `true` if the agent may stand on `tile`.
    #[inline]
    pub fn can_enter(&self, tile: &Tile) -> bool {
        match (tile.cost.value(), self.max_tile_cost) {
            (None, _)            => false,
            (Some(_), None)      => true,
            (Some(c), Some(max)) => c <= max,
        }
    }

    /// `true` if `c` is in bounds and enterable for the agent.
    #[inline]
    pub fn can_enter_at(&self, grid: &TileGrid, c: Coord) -> bool {
        self.avoid != Some(c) && grid.tile(c).is_some_and(|t| self.can_enter(t))
    }

    /// Reject `c` as a search endpoint, naming the reason.
    pub fn check_endpoint(&self, grid: &TileGrid, c: Coord) -> SpatialResult<()> {
        let reason = match grid.tile(c) {
            None                          => EndpointReason::OutOfBounds,
            Some(t) if !t.is_passable()   => EndpointReason::Impassable,
            Some(t) if !self.can_enter(t) => EndpointReason::TooCostly,
            Some(_)                       => return Ok(()),
        };
        Err(SpatialError::InvalidEndpoint { coord: c, reason })
    }
}
