//! `WorldSnapshot` — immutable per-tick view for renderers and writers.
//!
//! A snapshot is built completely from committed state and then swapped in
//! behind an `Arc`, so a reader holding one never sees a tick half-applied
//! and never blocks the step loop.

use rustc_hash::FxHashMap;

use tw_agent::{AgentState, AgentStore};
use tw_core::{AgentId, Bounds, Coord, Tick};
use tw_grid::{Tile, TileGrid};

/// One tile and whoever stands on it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileRecord {
    pub coord:    Coord,
    pub tile:     Tile,
    pub occupant: Option<AgentId>,
}

/// One live agent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentRecord {
    pub id:       AgentId,
    pub position: Coord,
    pub state:    AgentState,
    pub goal:     Option<Coord>,
}

/// Committed world state after a given number of ticks.
#[derive(Debug, Clone, Default)]
pub struct WorldSnapshot {
    tick:     Tick,
    revision: u64,
    records:  Vec<TileRecord>,
    agents:   Vec<AgentRecord>,
    lookup:   FxHashMap<Coord, usize>,
}

impl WorldSnapshot {
    /// Capture `grid` and `agents` as they stand.  `tick` is the number of
    /// ticks committed so far.
    pub fn capture(
        tick:      Tick,
        grid:      &TileGrid,
        agents:    &AgentStore,
        occupancy: &FxHashMap<Coord, AgentId>,
    ) -> Self {
        let records: Vec<TileRecord> = grid
            .iter()
            .map(|(coord, &tile)| TileRecord { coord, tile, occupant: occupancy.get(&coord).copied() })
            .collect();
        let lookup = records.iter().enumerate().map(|(i, r)| (r.coord, i)).collect();
        let agents = agents
            .agent_ids()
            .map(|id| {
                let i = id.index();
                AgentRecord {
                    id,
                    position: agents.position[i],
                    state:    agents.state[i],
                    goal:     agents.goal[i],
                }
            })
            .collect();
        Self { tick, revision: grid.revision(), records, agents, lookup }
    }

    /// Ticks committed when the snapshot was taken.
    pub fn tick(&self) -> Tick {
        self.tick
    }

    /// Grid revision at capture time.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Every tile in the grid's iteration order.
    pub fn records(&self) -> &[TileRecord] {
        &self.records
    }

    /// Live agents in ascending id order.
    pub fn agents(&self) -> &[AgentRecord] {
        &self.agents
    }

    pub fn record_at(&self, c: Coord) -> Option<&TileRecord> {
        self.lookup.get(&c).map(|&i| &self.records[i])
    }

    pub fn tile_at(&self, c: Coord) -> Option<&Tile> {
        self.record_at(c).map(|r| &r.tile)
    }

    pub fn occupant_at(&self, c: Coord) -> Option<AgentId> {
        self.record_at(c).and_then(|r| r.occupant)
    }

    /// Records inside `area`, in iteration order.  This is what a renderer
    /// reads for its viewport.
    pub fn view(&self, area: Bounds) -> impl Iterator<Item = &TileRecord> + '_ {
        self.records.iter().filter(move |r| area.contains(r.coord))
    }

    /// ASCII rendering with `@` for occupied tiles.
    pub fn to_ascii(&self) -> String {
        let Some(first) = self.records.first() else { return String::new() };
        let (mut lo, mut hi) = (first.coord, first.coord);
        for r in &self.records {
            lo = Coord::new(lo.x.min(r.coord.x), lo.y.min(r.coord.y));
            hi = Coord::new(hi.x.max(r.coord.x), hi.y.max(r.coord.y));
        }
        let mut out = String::new();
        for y in lo.y..=hi.y {
            for x in lo.x..=hi.x {
                out.push(match self.record_at(Coord::new(x, y)) {
                    Some(r) if r.occupant.is_some() => '@',
                    Some(r)                         => r.tile.terrain.glyph(),
                    None                            => ' ',
                });
            }
            out.push('\n');
        }
        out
    }
}
