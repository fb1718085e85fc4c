//! Plain data row types written by output backends.

use tw_sim::{AgentRecord, SimEvent};
use tw_core::Tick;

/// One [`SimEvent`] flattened for tabular output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRow {
    pub tick:   u64,
    /// Stable snake_case event name.
    pub kind:   &'static str,
    /// `None` for events not tied to an agent (edit rejections).
    pub agent:  Option<u32>,
    pub x:      i32,
    pub y:      i32,
    /// Human-readable description.
    pub detail: String,
}

impl EventRow {
    pub fn from_event(tick: Tick, event: &SimEvent) -> Self {
        let at = event.coord();
        Self {
            tick:   tick.0,
            kind:   event.kind(),
            agent:  event.agent().map(|a| a.0),
            x:      at.x,
            y:      at.y,
            detail: event.to_string(),
        }
    }
}

/// Where one agent stood in a published snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OccupancyRow {
    /// Ticks committed when the snapshot was taken.
    pub tick:     u64,
    pub agent_id: u32,
    pub x:        i32,
    pub y:        i32,
    pub state:    &'static str,
}

impl OccupancyRow {
    pub fn from_record(tick: Tick, record: &AgentRecord) -> Self {
        Self {
            tick:     tick.0,
            agent_id: record.id.0,
            x:        record.position.x,
            y:        record.position.y,
            state:    record.state.as_str(),
        }
    }
}
