//! `SimOutputObserver<W>` — bridges `SimObserver` to an `OutputWriter`.

use tw_core::Tick;
use tw_sim::{SimObserver, TickReport, WorldSnapshot};

use crate::row::{EventRow, OccupancyRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that writes every event and each delivered snapshot's
/// agent positions to an [`OutputWriter`].
///
/// Errors from the writer are stored internally because `SimObserver` methods
/// have no return value.  After `world.run()` returns, check for errors with
/// [`take_error`][Self::take_error].
pub struct SimOutputObserver<W: OutputWriter> {
    writer:     W,
    /// Events of the tick in progress, written as one batch at tick end.
    pending:    Vec<EventRow>,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, pending: Vec::new(), last_error: None }
    }

    /// Take the stored write error (if any) after `world.run()` returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the run).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_event(&mut self, tick: Tick, event: &tw_sim::SimEvent) {
        self.pending.push(EventRow::from_event(tick, event));
    }

    fn on_tick_end(&mut self, _report: &TickReport) {
        if self.pending.is_empty() {
            return;
        }
        let rows = std::mem::take(&mut self.pending);
        let result = self.writer.write_events(&rows);
        self.store_err(result);
    }

    fn on_snapshot(&mut self, snapshot: &WorldSnapshot) {
        let rows: Vec<OccupancyRow> = snapshot
            .agents()
            .iter()
            .map(|r| OccupancyRow::from_record(snapshot.tick(), r))
            .collect();

        if !rows.is_empty() {
            let result = self.writer.write_occupancy(&rows);
            self.store_err(result);
        }
    }

    fn on_sim_end(&mut self, _final_tick: Tick) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
