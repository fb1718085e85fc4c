//! `tw-sim` — the world step loop for the tileworld engine.
//!
//! # Tick loop
//!
//! ```text
//! for tick in 0..config.total_ticks:
//!   ⓪ Sync      — rebuild the spatial index if the grid changed.
//!   ① Decide    — BehaviorEngine::decide for every active agent
//!                 (parallel with the `parallel` feature).
//!   ② Transit   — adopt paths / give up, ascending AgentId.
//!   ③ Edits     — apply queued tile edits; re-sync the index.
//!   ④ Resolve   — validity, lowest-id-wins claims, blocked / swap checks.
//!   ⑤ Commit    — move agents, perform actions, advance the clock.
//!   ⑥ Publish   — swap in a new Arc<WorldSnapshot>.
//! ```
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                      |
//! |------------|-------------------------------------------------------------|
//! | `parallel` | Runs phase ① on a Rayon pool sized from `num_threads`.      |
//!
//! # Logging
//!
//! Every tick opens a `tick` span at `debug`.  Routine outcomes (moves,
//! conflicts, arrivals) are `debug` events; rejected commands and
//! rejected edits are `warn`.  Installing a subscriber is up to the host.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use tw_core::{Coord, SimConfig};
//! use tw_grid::TileGrid;
//! use tw_sim::{NoopObserver, WorldBuilder};
//!
//! let mut world = WorldBuilder::new(TileGrid::from_ascii(MAP)?)
//!     .config(SimConfig { total_ticks: 50, ..SimConfig::default() })
//!     .agent(Coord::new(0, 0))
//!     .build()?;
//! world.assign_goal(tw_core::AgentId(0), Coord::new(4, 4))?;
//! world.run(&mut NoopObserver);
//! ```

pub mod builder;
pub mod error;
pub mod event;
pub mod observer;
pub mod resolve;
pub mod snapshot;
pub mod world;


pub use builder::WorldBuilder;
pub use error::{SimError, SimResult};
pub use event::SimEvent;
pub use observer::{NoopObserver, SimObserver};
pub use resolve::{MoveRecord, Rejection};
pub use snapshot::{AgentRecord, TileRecord, WorldSnapshot};
pub use world::{TickReport, World};
