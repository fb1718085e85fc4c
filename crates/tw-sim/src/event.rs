//! Per-tick outcomes reported to observers, logs, and the `TickReport`.
//!
//! None of these are errors: a lost conflict or an unreachable goal is a
//! normal result of a tick.  Caller mistakes (unknown agent, goal off the
//! grid) are rejected up front by `World` methods and never show up here.

use std::fmt;

use tw_core::{ActionId, AgentId, Coord};
use tw_spatial::{EndpointReason, SpatialError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimEvent {
    /// Search exhausted (or rooms differ); the agent went idle.
    NoPathFound { agent: AgentId, start: Coord, goal: Coord },

    /// The goal (or start) could not be entered; the agent went idle.
    InvalidEndpoint { agent: AgentId, coord: Coord, reason: EndpointReason },

    /// The next step of the agent's path stopped being enterable.  Either it
    /// replanned during decide or its move was dropped before commit.
    StalePath { agent: AgentId, blocked: Coord },

    /// Another agent with a lower id claimed the same tile this tick.
    ConflictLoss { agent: AgentId, target: Coord, winner: AgentId },

    /// The target is held by an agent that is not moving away (or is
    /// swapping with this one).  The agent keeps its path and waits, up to
    /// `MAX_BLOCKED_TICKS` ticks in a row before searching again.
    MoveBlocked { agent: AgentId, target: Coord, by: AgentId },

    /// The goal itself is held by an agent that is not moving; the agent
    /// dropped the goal and went idle.
    GoalOccupied { agent: AgentId, goal: Coord, by: AgentId },

    /// The agent consumed its path.
    GoalReached { agent: AgentId, at: Coord },

    /// The terminal action committed.
    ActionPerformed { agent: AgentId, action: ActionId, at: Coord },

    /// A queued edit would have left the occupant on a tile it cannot enter.
    EditRejected { coord: Coord, occupant: AgentId },
}

impl SimEvent {
    /// Event for a failed search.
    pub fn from_search_error(agent: AgentId, err: &SpatialError) -> Self {
        match *err {
            SpatialError::NoPathFound { start, goal } => SimEvent::NoPathFound { agent, start, goal },
            SpatialError::InvalidEndpoint { coord, reason } => {
                SimEvent::InvalidEndpoint { agent, coord, reason }
            }
            SpatialError::OutOfBounds(coord) => SimEvent::InvalidEndpoint {
                agent,
                coord,
                reason: EndpointReason::OutOfBounds,
            },
            SpatialError::InvalidEdge { to, .. } => SimEvent::StalePath { agent, blocked: to },
        }
    }

    /// The agent the event is about; `None` for edit rejections.
    pub fn agent(&self) -> Option<AgentId> {
        match *self {
            SimEvent::NoPathFound { agent, .. }
            | SimEvent::InvalidEndpoint { agent, .. }
            | SimEvent::StalePath { agent, .. }
            | SimEvent::ConflictLoss { agent, .. }
            | SimEvent::MoveBlocked { agent, .. }
            | SimEvent::GoalOccupied { agent, .. }
            | SimEvent::GoalReached { agent, .. }
            | SimEvent::ActionPerformed { agent, .. } => Some(agent),
            SimEvent::EditRejected { .. } => None,
        }
    }

    /// The coordinate the event is about.
    pub fn coord(&self) -> Coord {
        match *self {
            SimEvent::NoPathFound { goal, .. }         => goal,
            SimEvent::InvalidEndpoint { coord, .. }    => coord,
            SimEvent::StalePath { blocked, .. }        => blocked,
            SimEvent::ConflictLoss { target, .. }      => target,
            SimEvent::MoveBlocked { target, .. }       => target,
            SimEvent::GoalOccupied { goal, .. }        => goal,
            SimEvent::GoalReached { at, .. }           => at,
            SimEvent::ActionPerformed { at, .. }       => at,
            SimEvent::EditRejected { coord, .. }       => coord,
        }
    }

    /// Stable snake_case name, used as the CSV `kind` column.
    pub fn kind(&self) -> &'static str {
        match self {
            SimEvent::NoPathFound { .. }     => "no_path_found",
            SimEvent::InvalidEndpoint { .. } => "invalid_endpoint",
            SimEvent::StalePath { .. }       => "stale_path",
            SimEvent::ConflictLoss { .. }    => "conflict_loss",
            SimEvent::MoveBlocked { .. }     => "move_blocked",
            SimEvent::GoalOccupied { .. }    => "goal_occupied",
            SimEvent::GoalReached { .. }     => "goal_reached",
            SimEvent::ActionPerformed { .. } => "action_performed",
            SimEvent::EditRejected { .. }    => "edit_rejected",
        }
    }

    /// `true` for outcomes that usually point at a host mistake rather than
    /// ordinary congestion.  Logged at `warn`.
    pub fn is_warning(&self) -> bool {
        matches!(self, SimEvent::InvalidEndpoint { .. } | SimEvent::EditRejected { .. })
    }
}

impl fmt::Display for SimEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimEvent::NoPathFound { agent, start, goal } => {
                write!(f, "{agent}: no path from {start} to {goal}")
            }
            SimEvent::InvalidEndpoint { agent, coord, reason } => {
                write!(f, "{agent}: endpoint {coord} is {reason}")
            }
            SimEvent::StalePath { agent, blocked } => write!(f, "{agent}: path blocked at {blocked}"),
            SimEvent::ConflictLoss { agent, target, winner } => {
                write!(f, "{agent}: lost {target} to {winner}")
            }
            SimEvent::MoveBlocked { agent, target, by } => {
                write!(f, "{agent}: waiting for {by} to leave {target}")
            }
            SimEvent::GoalOccupied { agent, goal, by } => {
                write!(f, "{agent}: gave up on {goal}, held by {by}")
            }
            SimEvent::GoalReached { agent, at } => write!(f, "{agent}: reached {at}"),
            SimEvent::ActionPerformed { agent, action, at } => {
                write!(f, "{agent}: performed {action} at {at}")
            }
            SimEvent::EditRejected { coord, occupant } => {
                write!(f, "edit at {coord} rejected: occupied by {occupant}")
            }
        }
    }
}
