//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `events.csv`
//! - `occupancy.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{EventRow, OccupancyRow, OutputError, OutputResult};

/// Writes simulation output to two CSV files.
pub struct CsvWriter {
    events:    Writer<File>,
    occupancy: Writer<File>,
    finished:  bool,
}

impl CsvWriter {
    /// Create `dir` if needed, open the two CSV files and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)
            .map_err(|source| OutputError::CreateDir { path: dir.to_path_buf(), source })?;

        let mut events = Writer::from_path(dir.join("events.csv"))?;
        events.write_record(["tick", "kind", "agent", "x", "y", "detail"])?;

        let mut occupancy = Writer::from_path(dir.join("occupancy.csv"))?;
        occupancy.write_record(["tick", "agent", "x", "y", "state"])?;

        Ok(Self { events, occupancy, finished: false })
    }
}

impl OutputWriter for CsvWriter {
    fn write_events(&mut self, rows: &[EventRow]) -> OutputResult<()> {
        for row in rows {
            self.events.write_record(&[
                row.tick.to_string(),
                row.kind.to_owned(),
                row.agent.map(|a| a.to_string()).unwrap_or_default(),
                row.x.to_string(),
                row.y.to_string(),
                row.detail.clone(),
            ])?;
        }
        Ok(())
    }

    fn write_occupancy(&mut self, rows: &[OccupancyRow]) -> OutputResult<()> {
        for row in rows {
            self.occupancy.write_record(&[
                row.tick.to_string(),
                row.agent_id.to_string(),
                row.x.to_string(),
                row.y.to_string(),
                row.state.to_owned(),
            ])?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.events.flush()?;
        self.occupancy.flush()?;
        Ok(())
    }
}
