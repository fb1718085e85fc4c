//! The `OutputWriter` trait implemented by backend writers.

use crate::{EventRow, OccupancyRow, OutputResult};

/// Sink for tabular simulation output.
///
/// Errors surface to the caller; [`SimOutputObserver`][crate::SimOutputObserver]
/// stores the first one for retrieval after the run.
pub trait OutputWriter {
    /// Write a batch of event rows.
    fn write_events(&mut self, rows: &[EventRow]) -> OutputResult<()>;

    /// Write a batch of occupancy rows.
    fn write_occupancy(&mut self, rows: &[OccupancyRow]) -> OutputResult<()>;

    /// Flush all underlying file handles.
    ///
    /// Idempotent.
    fn finish(&mut self) -> OutputResult<()>;
}
