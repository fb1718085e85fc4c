//! Simulation time model and run configuration.
//!
//! # Design
//!
//! Time is a monotonically increasing `Tick` counter.  A tick is the unit of
//! atomic commit: every agent move decided during tick `t` becomes visible
//! to observers together, in the snapshot published when `t` commits.
//! There is no wall-clock mapping; hosts that animate between snapshots
//! choose their own tick rate.

use std::fmt;

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation tick counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Return the tick `n` steps after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Tick {
        Tick(self.0 + n)
    }

    /// The tick immediately after `self`.
    #[inline]
    pub fn next(self) -> Tick {
        self.offset(1)
    }

    /// Ticks elapsed from `earlier` to `self`, saturating at zero.
    #[inline]
    pub fn since(self, earlier: Tick) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── SimConfig ────────────────────────────────────────────────────────────────

/// Top-level simulation configuration.
///
/// Typically loaded from a TOML file by the application crate (see
/// [`SimConfig::from_toml_str`], behind the `toml` feature) and passed to
/// the world builder.  Missing keys fall back to [`SimConfig::default`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// Total ticks `World::run` simulates before returning.
    pub total_ticks: u64,

    /// Master RNG seed for procedural content.  The same seed always
    /// produces identical maps.
    pub seed: u64,

    /// Worker thread count for the parallel decision phase.  `None` uses
    /// Rayon's global pool.  Ignored without the `parallel` feature.
    pub num_threads: Option<usize>,

    /// Deliver a snapshot to observers every N ticks.  0 disables the hook;
    /// the latest snapshot is always available from the world regardless.
    pub snapshot_interval_ticks: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            total_ticks:             100,
            seed:                    0,
            num_threads:             None,
            snapshot_interval_ticks: 1,
        }
    }
}

impl SimConfig {
    /// The tick at which `World::run` stops (exclusive upper bound).
    #[inline]
    pub fn end_tick(&self) -> Tick {
        Tick(self.total_ticks)
    }

    /// `true` if observers should receive a snapshot after `tick`.
    #[inline]
    pub fn is_snapshot_tick(&self, tick: Tick) -> bool {
        self.snapshot_interval_ticks > 0 && tick.0.is_multiple_of(self.snapshot_interval_ticks)
    }

    /// Parse a configuration from TOML text.
    ///
    /// ```
    /// # #[cfg(feature = "toml")] {
    /// let cfg = tw_core::SimConfig::from_toml_str("total_ticks = 12\nseed = 7").unwrap();
    /// assert_eq!(cfg.total_ticks, 12);
    /// assert_eq!(cfg.snapshot_interval_ticks, 1);
    /// # }
    /// ```
    #[cfg(feature = "toml")]
    pub fn from_toml_str(text: &str) -> crate::TwResult<Self> {
        toml::from_str(text).map_err(|e| crate::TwError::Config(e.to_string()))
    }
}
