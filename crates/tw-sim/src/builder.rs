//! Fluent builder for constructing a [`World`].

use tw_core::{Coord, SimConfig};
use tw_grid::TileGrid;
use tw_spatial::{AStar, AgentConstraints, Pathfinder};

use crate::{SimError, SimResult, World};

/// Fluent builder for [`World<P>`].
///
/// # Required inputs
///
/// - a [`TileGrid`]
///
/// # Optional inputs (have defaults)
///
/// | Method               | Default                  |
/// |----------------------|--------------------------|
/// | `.config(c)`         | `SimConfig::default()`   |
/// | `.pathfinder(p)`     | `AStar::new()`           |
/// | `.agent(at)`         | no agents                |
/// | `.agent_with(at, k)` | no agents                |
///
/// Agents are spawned in the order given, so the first gets `AgentId(0)`.
/// Each start must be in bounds, enterable under the agent's constraints,
/// and not shared with an earlier agent.
///
/// # Example
///
/// ```rust,ignore
/// let mut world = WorldBuilder::new(TileGrid::from_ascii(MAP)?)
///     .config(config)
///     .agent(Coord::new(0, 0))
///     .agent_with(Coord::new(4, 0), AgentConstraints::eight())
///     .build()?;
/// world.run(&mut NoopObserver);
/// ```
pub struct WorldBuilder<P: Pathfinder = AStar> {
    config:     SimConfig,
    grid:       TileGrid,
    pathfinder: P,
    agents:     Vec<(Coord, AgentConstraints)>,
}

impl WorldBuilder<AStar> {
    pub fn new(grid: TileGrid) -> Self {
        Self {
            config:     SimConfig::default(),
            grid,
            pathfinder: AStar::new(),
            agents:     Vec::new(),
        }
    }
}

impl<P: Pathfinder> WorldBuilder<P> {
    pub fn config(mut self, config: SimConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the search algorithm.
    pub fn pathfinder<Q: Pathfinder>(self, pathfinder: Q) -> WorldBuilder<Q> {
        WorldBuilder {
            config: self.config,
            grid: self.grid,
            pathfinder,
            agents: self.agents,
        }
    }

    /// Add an agent with default (4-way, no cost ceiling) constraints.
    pub fn agent(self, at: Coord) -> Self {
        self.agent_with(at, AgentConstraints::default())
    }

    pub fn agent_with(mut self, at: Coord, constraints: AgentConstraints) -> Self {
        self.agents.push((at, constraints));
        self
    }

    /// Validate inputs, place agents, build the spatial index and the first
    /// snapshot, and return a ready-to-run [`World`].
    pub fn build(self) -> SimResult<World<P>> {
        if self.config.num_threads == Some(0) {
            return Err(SimError::Config("num_threads must be at least 1".into()));
        }

        let mut world = World::new(self.config, self.grid, self.pathfinder)?;
        for (at, constraints) in self.agents {
            world.place(at, constraints)?;
        }
        world.publish_snapshot();
        Ok(world)
    }
}
