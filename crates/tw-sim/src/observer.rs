//! Simulation observer trait for progress reporting and data collection.

use tw_core::Tick;

use crate::{SimEvent, TickReport, WorldSnapshot};

/// Callbacks invoked by [`World::run`][crate::World::run] and friends at key
/// points in the step loop.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example — progress printer
///
/// ```rust,ignore
/// struct ProgressPrinter { interval: u64 }
///
/// impl SimObserver for ProgressPrinter {
///     fn on_tick_end(&mut self, report: &TickReport) {
///         if report.tick.0 % self.interval == 0 {
///             println!("{}: {} moves", report.tick, report.moved.len());
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each tick, before any processing.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called once per event, in the order the tick produced them.
    fn on_event(&mut self, _tick: Tick, _event: &SimEvent) {}

    /// Called after the tick has committed and its snapshot is published.
    fn on_tick_end(&mut self, _report: &TickReport) {}

    /// Called at snapshot intervals (every `config.snapshot_interval_ticks`
    /// ticks) with the freshly published snapshot.
    fn on_snapshot(&mut self, _snapshot: &WorldSnapshot) {}

    /// Called once after the final tick of [`World::run`][crate::World::run].
    fn on_sim_end(&mut self, _final_tick: Tick) {}
}

/// A [`SimObserver`] that does nothing.  Use when you need to call `run` but
/// don't want callbacks.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
