//! Per-agent state machine tag.

use std::fmt;

use tw_core::ActionId;

/// Where an agent is in its goal lifecycle.
///
/// ```text
///            assign_goal
///   Idle ───────────────▶ SeekingPath ──path found──▶ Moving
///    ▲                       │    ▲                      │
///    │      no path /        │    └──next step blocked───┤
///    ├──────invalid goal─────┘                           │
///    │                                                   │ path consumed
///    ├───────────────no terminal action──────────────────┤
///    │                                                   ▼
///    └────────────action performed──────────── ExecutingAction
/// ```
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AgentState {
    #[default]
    Idle,
    /// Has a goal, needs a path this tick.
    SeekingPath,
    /// Following an `ActivePath`.
    Moving,
    /// At the goal; performs the action on the next tick, then goes idle.
    ExecutingAction(ActionId),
}

impl AgentState {
    /// `false` only for `Idle`.
    #[inline]
    pub fn is_active(self) -> bool {
        !matches!(self, AgentState::Idle)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AgentState::Idle               => "idle",
            AgentState::SeekingPath        => "seeking_path",
            AgentState::Moving             => "moving",
            AgentState::ExecutingAction(_) => "executing_action",
        }
    }
}

impl fmt::Display for AgentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgentState::ExecutingAction(a) => write!(f, "executing_action({})", a.0),
            other                          => f.write_str(other.as_str()),
        }
    }
}
