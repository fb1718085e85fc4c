//! `ActivePath` — the path an agent is currently walking.

use tw_core::Coord;
use tw_spatial::Path;

/// A [`Path`] plus the index of the step the agent is standing on.
///
/// The cursor starts at 0 (the path's start) and advances by one per
/// committed move.  The path is finished when the cursor reaches the goal.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivePath {
    path:   Path,
    cursor: usize,
}

impl ActivePath {
    pub fn new(path: Path) -> Self {
        Self { path, cursor: 0 }
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Index into `path().steps()` of the agent's current tile.
    #[inline]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The tile the agent should step onto next, `None` once finished.
    #[inline]
    pub fn next_step(&self) -> Option<Coord> {
        self.path.steps().get(self.cursor + 1).copied()
    }

    /// Steps not yet taken, excluding the current tile.
    pub fn remaining(&self) -> &[Coord] {
        &self.path.steps()[(self.cursor + 1).min(self.path.step_count())..]
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.cursor + 1 >= self.path.step_count()
    }

    /// Move the cursor forward one step.  No-op once finished.
    pub fn advance(&mut self) {
        if !self.is_finished() {
            self.cursor += 1;
        }
    }
}
