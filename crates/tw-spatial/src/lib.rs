//! `tw-spatial` — adjacency, cost, and area queries plus routing over a
//! [`TileGrid`](tw_grid::TileGrid).
//!
//! # Crate layout
//!
//! | Module          | Contents                                                   |
//! |-----------------|------------------------------------------------------------|
//! | [`constraints`] | `AgentConstraints` — connectivity and cost ceiling         |
//! | [`index`]       | `SpatialIndex` — neighbours, edge cost, region, visibility, rooms |
//! | [`path`]        | `Path` — point-in-time route snapshot                      |
//! | [`pathfinder`]  | `Pathfinder` trait, `AStar`                                |
//! | [`error`]       | `SpatialError`, `EndpointReason`, `SpatialResult<T>`       |
//!
//! # Read-only by construction
//!
//! Every query takes `&TileGrid`; nothing in this crate can mutate tiles.
//! The index owns only *derived* data (room labels, cheapest tile cost),
//! rebuilt by [`SpatialIndex::sync`] when the grid's revision moves.
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public types.           |

pub mod constraints;
pub mod error;
pub mod index;
pub mod path;
pub mod pathfinder;

#[cfg(test)]
mod tests;

pub use constraints::AgentConstraints;
pub use error::{EndpointReason, SpatialError, SpatialResult};
pub use index::{bresenham, line_of_sight, RoomId, SpatialIndex};
pub use path::Path;
pub use pathfinder::{AStar, Pathfinder};
