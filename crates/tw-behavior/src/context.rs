//! Read-only world state passed to every decision.

use tw_agent::AgentStore;
use tw_core::Tick;
use tw_grid::TileGrid;
use tw_spatial::SpatialIndex;

/// A read-only snapshot of the world shared by every
/// [`decide`][crate::BehaviorEngine::decide] call in one tick.
///
/// # Lifetimes
///
/// All borrows live for the duration of one tick's decision phase.  The
/// world never hands out mutable access to these structures while a
/// `TickContext` is alive, so decisions cannot observe a half-applied tick.
#[derive(Clone, Copy)]
pub struct TickContext<'a> {
    /// Tick being decided.
    pub tick: Tick,

    pub grid: &'a TileGrid,

    /// Synced with `grid` at the start of the tick.
    pub index: &'a SpatialIndex,

    /// Read-only view of every agent's SoA state arrays.
    pub agents: &'a AgentStore,
}

impl<'a> TickContext<'a> {
    #[inline]
    pub fn new(
        tick:   Tick,
        grid:   &'a TileGrid,
        index:  &'a SpatialIndex,
        agents: &'a AgentStore,
    ) -> Self {
        Self { tick, grid, index, agents }
    }
}
