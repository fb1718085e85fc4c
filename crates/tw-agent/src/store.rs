//! Core agent storage: `AgentStore` (SoA data).
//!
//! # Layout
//!
//! Every `Vec` field has exactly `count` elements and the `AgentId` value is
//! the index into all of them:
//!
//! ```ignore
//! let pos = store.position[agent.index()];  // O(1), cache-friendly
//! ```
//!
//! # Spawning and despawning
//!
//! Ids are handed out in ascending order and never reused.  Despawning
//! tombstones the slot (`alive[i] = false`) and clears its goal, path and
//! action; the slot's arrays keep their length so every other id stays
//! valid.  Every read helper treats a tombstoned id like an unknown one.

use tw_core::{ActionId, AgentId, Coord};
use tw_spatial::AgentConstraints;

use crate::{ActivePath, AgentState};

/// Structure-of-Arrays storage for all agent state.
#[derive(Debug, Default, Clone)]
pub struct AgentStore {
    /// Number of slots ever allocated, live or tombstoned.
    pub count: usize,

    /// `false` once an agent has been despawned.
    pub alive: Vec<bool>,

    // ── Spatial state ─────────────────────────────────────────────────────
    /// Tile the agent currently stands on.  Meaningless for dead slots.
    pub position: Vec<Coord>,

    /// Movement rules used for every search on this agent's behalf.
    pub constraints: Vec<AgentConstraints>,

    // ── Behaviour state ───────────────────────────────────────────────────
    pub state: Vec<AgentState>,

    /// Current destination; `None` while idle.
    pub goal: Vec<Option<Coord>>,

    /// Action to perform on arrival, if any.
    pub action: Vec<Option<ActionId>>,

    /// Path being walked.  Present only while `Moving`.
    pub path: Vec<Option<ActivePath>>,

    // ── Blockage ──────────────────────────────────────────────────────────
    /// Consecutive ticks the agent's move was blocked by an occupant.
    pub blocked_ticks: Vec<u32>,

    /// Tile the next search routes around.  Consumed by that search.
    pub detour: Vec<Option<Coord>>,
}

impl AgentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-allocate room for `n` agents.
    pub fn with_capacity(n: usize) -> Self {
        Self {
            count:         0,
            alive:         Vec::with_capacity(n),
            position:      Vec::with_capacity(n),
            constraints:   Vec::with_capacity(n),
            state:         Vec::with_capacity(n),
            goal:          Vec::with_capacity(n),
            action:        Vec::with_capacity(n),
            path:          Vec::with_capacity(n),
            blocked_ticks: Vec::with_capacity(n),
            detour:        Vec::with_capacity(n),
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────

    /// Append a new idle agent at `position` and return its id.
    ///
    /// Placement rules (in bounds, passable, unoccupied) are the owner's
    /// business; the store records whatever it is given.
    pub fn spawn(&mut self, position: Coord, constraints: AgentConstraints) -> AgentId {
        let id = AgentId(self.count as u32);
        self.alive.push(true);
        self.position.push(position);
        self.constraints.push(constraints);
        self.state.push(AgentState::Idle);
        self.goal.push(None);
        self.action.push(None);
        self.path.push(None);
        self.blocked_ticks.push(0);
        self.detour.push(None);
        self.count += 1;
        id
    }

    /// Tombstone `agent`.  Returns `false` if it was unknown or already dead.
    pub fn despawn(&mut self, agent: AgentId) -> bool {
        let Some(i) = self.slot(agent) else { return false };
        self.alive[i] = false;
        self.clear_goal(agent);
        true
    }

    /// Drop goal, path, action and blockage and return the agent to `Idle`.
    pub fn clear_goal(&mut self, agent: AgentId) {
        let i = agent.index();
        if i >= self.count {
            return;
        }
        self.state[i] = AgentState::Idle;
        self.goal[i] = None;
        self.action[i] = None;
        self.path[i] = None;
        self.blocked_ticks[i] = 0;
        self.detour[i] = None;
    }

    // ── Lookup ────────────────────────────────────────────────────────────

    /// Index of a live agent's slot.
    #[inline]
    pub fn slot(&self, agent: AgentId) -> Option<usize> {
        let i = agent.index();
        (i < self.count && self.alive[i]).then_some(i)
    }

    #[inline]
    pub fn is_alive(&self, agent: AgentId) -> bool {
        self.slot(agent).is_some()
    }

    /// `true` if there are no live agents.
    pub fn is_empty(&self) -> bool {
        self.live_count() == 0
    }

    pub fn live_count(&self) -> usize {
        self.alive.iter().filter(|&&a| a).count()
    }

    /// Live `AgentId`s in ascending order.
    pub fn agent_ids(&self) -> impl Iterator<Item = AgentId> + '_ {
        self.alive
            .iter()
            .enumerate()
            .filter(|&(_, &a)| a)
            .map(|(i, _)| AgentId(i as u32))
    }

    pub fn position(&self, agent: AgentId) -> Option<Coord> {
        self.slot(agent).map(|i| self.position[i])
    }

    pub fn state(&self, agent: AgentId) -> Option<AgentState> {
        self.slot(agent).map(|i| self.state[i])
    }

    pub fn goal(&self, agent: AgentId) -> Option<Coord> {
        self.slot(agent).and_then(|i| self.goal[i])
    }

    pub fn active_path(&self, agent: AgentId) -> Option<&ActivePath> {
        self.slot(agent).and_then(|i| self.path[i].as_ref())
    }

    pub fn constraints(&self, agent: AgentId) -> Option<&AgentConstraints> {
        self.slot(agent).map(|i| &self.constraints[i])
    }

    /// Consecutive ticks `agent` has been blocked; 0 for unknown ids.
    pub fn blocked_ticks(&self, agent: AgentId) -> u32 {
        self.slot(agent).map_or(0, |i| self.blocked_ticks[i])
    }
}
