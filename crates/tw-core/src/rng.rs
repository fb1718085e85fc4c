//! Deterministic RNG for procedural content.
//!
//! Only map scattering and host-side setup (spawn points, demo goals) draw
//! random numbers; the tick loop never consults an RNG.  Each terrain layer
//! gets its own stream from [`SimRng::stream`], so changing how many numbers
//! one layer consumes leaves the others untouched.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::{Bounds, Coord};

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Seeded `SmallRng`.  Not `Sync`; hand each worker its own stream.
pub struct SimRng {
    rng:  SmallRng,
    seed: u64,
}

impl SimRng {
    pub fn new(seed: u64) -> Self {
        Self { rng: SmallRng::seed_from_u64(seed), seed }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// An independent generator keyed by `id`.  Streams depend only on the
    /// root seed and `id`, not on how much `self` has been used.
    pub fn stream(&self, id: u64) -> SimRng {
        SimRng::new(self.seed ^ id.wrapping_add(1).wrapping_mul(MIXING_CONSTANT))
    }

    /// `true` with probability `p` (clamped to [0, 1]).
    #[inline]
    pub fn chance(&mut self, p: f64) -> bool {
        self.rng.gen_bool(p.clamp(0.0, 1.0))
    }

    /// Uniform index in `0..n`; `None` when `n == 0`.
    #[inline]
    pub fn index(&mut self, n: usize) -> Option<usize> {
        (n > 0).then(|| self.rng.gen_range(0..n))
    }

    /// Uniform element of `items`.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        self.index(items.len()).map(|i| &items[i])
    }

    /// Uniform coordinate inside `area`.
    pub fn coord_in(&mut self, area: Bounds) -> Option<Coord> {
        if area.is_empty() {
            return None;
        }
        Some(Coord::new(
            self.rng.gen_range(area.min.x..area.max.x),
            self.rng.gen_range(area.min.y..area.max.y),
        ))
    }

    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        self.rng.r#gen()
    }
}
