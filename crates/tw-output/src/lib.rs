//! `tw-output` — simulation output writers for the tileworld engine.
//!
//! | Backend | Files created                    |
//! |---------|----------------------------------|
//! | CSV     | `events.csv`, `occupancy.csv`    |
//!
//! Backends implement [`OutputWriter`] and are driven by
//! [`SimOutputObserver`], which implements `tw_sim::SimObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use tw_output::{CsvWriter, SimOutputObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut obs = SimOutputObserver::new(writer);
//! world.run(&mut obs);
//! if let Some(e) = obs.take_error() { eprintln!("output error: {e}"); }
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;


pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::SimOutputObserver;
pub use row::{EventRow, OccupancyRow};
pub use writer::OutputWriter;
