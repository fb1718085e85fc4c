//! `tw-core` — foundational types for the `tileworld` engine.
//!
//! This crate is a dependency of every other `tw-*` crate.  It intentionally
//! has no `tw-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`/`toml`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `AgentId`, `ActionId`                                 |
//! | [`coord`]       | `Coord`, `Direction`, `Connectivity`, `Bounds`        |
//! | [`time`]        | `Tick`, `SimConfig`                                   |
//! | [`rng`]         | `SimRng` (seeded, deterministic)                      |
//! | [`error`]       | `TwError`, `TwResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |
//! | `toml`  | Adds `SimConfig::from_toml_str` (implies `serde`).         |

pub mod coord;
pub mod error;
pub mod ids;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use coord::{Bounds, Connectivity, Coord, Direction, DIAGONAL_FACTOR};
pub use error::{TwError, TwResult};
pub use ids::{ActionId, AgentId};
pub use rng::SimRng;
pub use time::{SimConfig, Tick};
