//! `tw-grid` — the Grid Store: authoritative tile data addressed by `Coord`.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                    |
//! |-------------|-------------------------------------------------------------|
//! | [`terrain`] | `Terrain` tag enum with default costs and ASCII glyphs      |
//! | [`tile`]    | `Tile`, `TileCost` (finite cost or `IMPASSABLE`)            |
//! | [`grid`]    | `TileGrid` — dense (bounded) or sparse (unbounded) storage  |
//! | [`ascii`]   | `TileGrid::from_ascii` / `to_ascii`                         |
//! | [`scatter`] | `ScatterConfig`, `scatter` — seeded procedural maps         |
//! | [`error`]   | `GridError`, `GridResult<T>`                                |
//!
//! # Ownership
//!
//! `TileGrid` is not internally synchronised.  All writes take `&mut self`,
//! and in a running simulation the only holder of `&mut TileGrid` is the
//! world's commit phase; every other component borrows it immutably.
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public types.           |

pub mod ascii;
pub mod error;
pub mod grid;
pub mod scatter;
pub mod terrain;
pub mod tile;


pub use error::{GridError, GridResult};
pub use grid::TileGrid;
pub use scatter::{ScatterConfig, scatter};
pub use terrain::Terrain;
pub use tile::{Tile, TileCost};
