//! `tw-agent` — Structure-of-Arrays agent storage for the tileworld engine.
//!
//! # Crate layout
//!
//! | Module    | Contents                                                    |
//! |-----------|-------------------------------------------------------------|
//! | [`state`] | `AgentState` — the closed per-agent state machine tag       |
//! | [`path`]  | `ActivePath` — a `Path` plus a cursor into it               |
//! | [`store`] | `AgentStore` — SoA arrays indexed by `AgentId`              |
//!
//! # Ownership
//!
//! The store is plain data.  `tw-behavior` decides transitions and
//! `tw-sim` owns the store and is its only writer during a tick; between
//! ticks the host goes through `World` methods rather than touching the
//! arrays directly.
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                 |
//! |---------|--------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on `AgentState`.     |

pub mod path;
pub mod state;
pub mod store;


pub use path::ActivePath;
pub use state::AgentState;
pub use store::AgentStore;
