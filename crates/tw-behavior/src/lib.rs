//! `tw-behavior` — the per-agent state machine and the intents it produces.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                       |
//! |--------------|----------------------------------------------------------------|
//! | [`intent`]   | `Intent` enum (`Move`, `Perform`)                              |
//! | [`context`]  | `TickContext<'a>` — read-only tick snapshot shared by all agents |
//! | [`decision`] | `Decision`, `Transition` — what `decide` hands back            |
//! | [`engine`]   | `BehaviorEngine<P>` — decisions plus the state writers         |
//! | [`error`]    | `BehaviorError`, `BehaviorResult<T>`                           |
//!
//! # Design notes
//!
//! The tick loop in `tw-sim` splits behaviour into two halves:
//!
//! 1. **Decide** (optionally parallel): for every active agent call
//!    [`BehaviorEngine::decide`].  Reads go through `&TickContext`; the
//!    result is a [`Decision`] carrying at most one [`Intent`] and the state
//!    [`Transition`] the agent wants.
//!
//! 2. **Apply** (sequential, ascending `AgentId`): the world feeds decisions
//!    and move outcomes back through [`BehaviorEngine::apply_decision`],
//!    [`on_move_committed`](BehaviorEngine::on_move_committed),
//!    [`on_move_rejected`](BehaviorEngine::on_move_rejected) and
//!    [`on_action_performed`](BehaviorEngine::on_action_performed).  These
//!    are the only functions that write agent state.
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                  |
//! |------------|---------------------------------------------------------|
//! | `parallel` | `decide_all` runs on Rayon's thread pool.               |
//! | `serde`    | Derives `Serialize`/`Deserialize` on `Intent`.          |

pub mod context;
pub mod decision;
pub mod engine;
pub mod error;
pub mod intent;

#[cfg(test)]
mod tests;

pub use context::TickContext;
pub use decision::{Arrival, BlockedOutcome, Decision, Transition};
pub use engine::{BehaviorEngine, MAX_BLOCKED_TICKS};
pub use error::{BehaviorError, BehaviorResult};
pub use intent::Intent;
