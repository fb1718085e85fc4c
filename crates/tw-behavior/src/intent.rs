//! Agent intents — the single action an agent requests for one tick.

use tw_core::{ActionId, Coord};

/// What an agent wants to do this tick.
///
/// Intents are produced by [`BehaviorEngine::decide`][crate::BehaviorEngine::decide]
/// and consumed by the world step loop, which may reject a `Move` (conflict,
/// blocked target, edited terrain).  They never outlive the tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Intent {
    /// Step onto the adjacent tile `to`.
    Move { to: Coord },

    /// Carry out the terminal action at the current position.
    Perform(ActionId),
}

impl Intent {
    /// Target tile for a `Move`, `None` otherwise.
    #[inline]
    pub fn target(&self) -> Option<Coord> {
        match self {
            Intent::Move { to } => Some(*to),
            Intent::Perform(_)  => None,
        }
    }

    #[inline]
    pub fn action(&self) -> Option<ActionId> {
        match self {
            Intent::Perform(a) => Some(*a),
            Intent::Move { .. } => None,
        }
    }
}
