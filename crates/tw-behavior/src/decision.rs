//! The output of one agent's decision.

use tw_core::{ActionId, AgentId, Coord};
use tw_spatial::{Path, SpatialError};

use crate::Intent;

/// State change an agent asks for during the decide phase.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// Keep the current state and path.
    Stay,
    /// Adopt a freshly computed path (replacing any old one).
    Follow(Path),
    /// Planning failed; drop the goal and go idle.
    GiveUp(SpatialError),
}

/// One agent's decision for one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub agent: AgentId,
    /// `None` only for agents that go (or stay) idle.
    pub intent: Option<Intent>,
    pub transition: Transition,
    /// The agent's next step had become impassable and it replanned.
    pub stale: bool,
}

impl Decision {
    /// Nothing to do: idle or unknown agent.
    pub fn idle(agent: AgentId) -> Self {
        Self { agent, intent: None, transition: Transition::Stay, stale: false }
    }
}

/// An agent reached the end of its path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arrival {
    pub agent: AgentId,
    pub at: Coord,
    /// Terminal action queued for the next tick, if any.
    pub action: Option<ActionId>,
}

/// What a mover does after the world blocked its step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockedOutcome {
    /// Keep the path and retry the same step next tick.
    Wait,
    /// Waited too long behind a moving agent; search again next tick.
    Replan,
    /// Waited too long behind a standing agent; search again around it.
    Detour,
    /// The goal itself is held by an agent that is not moving; goal dropped.
    GoalOccupied,
}
