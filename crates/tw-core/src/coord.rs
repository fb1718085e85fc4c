//! Integer grid coordinates, compass directions, and rectangular bounds.
//!
//! Tiles are addressed by `(x, y)`.  [`Direction::North`] is `+y`, and the
//! ASCII renderers print row `y = 0` first, so north points down the page.
//! All distance helpers are exact integer arithmetic except
//! [`Coord::octile`], which weights diagonal steps by √2 and therefore
//! returns `f32`.  Stepping off the edge of `i32` yields `None` rather than
//! wrapping.

use std::fmt;

/// √2, the cost multiplier for a diagonal step.
pub const DIAGONAL_FACTOR: f32 = std::f32::consts::SQRT_2;

// ── Coord ────────────────────────────────────────────────────────────────────

/// A tile address.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The neighbouring coordinate one step in `dir`.  Saturates at the
    /// `i32` edge; use [`checked_step`](Self::checked_step) where tiles may
    /// sit there.
    #[inline]
    pub fn step(self, dir: Direction) -> Coord {
        let (dx, dy) = dir.offset();
        Coord::new(self.x.saturating_add(dx), self.y.saturating_add(dy))
    }

    /// The neighbouring coordinate one step in `dir`, or `None` if it lies
    /// outside the `i32` plane.
    #[inline]
    pub fn checked_step(self, dir: Direction) -> Option<Coord> {
        let (dx, dy) = dir.offset();
        Some(Coord::new(self.x.checked_add(dx)?, self.y.checked_add(dy)?))
    }

    /// Sum of absolute axis deltas: the 4-connected step count.
    #[inline]
    pub fn manhattan(self, other: Coord) -> u32 {
        self.x.abs_diff(other.x).saturating_add(self.y.abs_diff(other.y))
    }

    /// Largest absolute axis delta: the 8-connected step count.
    #[inline]
    pub fn chebyshev(self, other: Coord) -> u32 {
        self.x.abs_diff(other.x).max(self.y.abs_diff(other.y))
    }

    /// Length of the shortest 8-connected route with diagonal steps costing √2.
    #[inline]
    pub fn octile(self, other: Coord) -> f32 {
        let dx = self.x.abs_diff(other.x);
        let dy = self.y.abs_diff(other.y);
        let (lo, hi) = if dx < dy { (dx, dy) } else { (dy, dx) };
        (hi - lo) as f32 + lo as f32 * DIAGONAL_FACTOR
    }

    /// Squared Euclidean distance; exact for radius checks.
    #[inline]
    pub fn distance_sq(self, other: Coord) -> u64 {
        let dx = u64::from(self.x.abs_diff(other.x));
        let dy = u64::from(self.y.abs_diff(other.y));
        (dx * dx).saturating_add(dy * dy)
    }

    /// The direction of a single king-move from `self` to `other`, or `None`
    /// when the two are identical or further apart.
    pub fn direction_to(self, other: Coord) -> Option<Direction> {
        Direction::ALL
            .into_iter()
            .find(|&d| self.checked_step(d) == Some(other))
    }

    /// `true` if `other` is exactly one king-move away.
    #[inline]
    pub fn is_adjacent(self, other: Coord) -> bool {
        self.chebyshev(other) == 1
    }
}

impl From<(i32, i32)> for Coord {
    #[inline]
    fn from((x, y): (i32, i32)) -> Self {
        Coord::new(x, y)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

// ── Direction ────────────────────────────────────────────────────────────────

/// One of the eight compass directions.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    North,
    East,
    South,
    West,
    NorthEast,
    SouthEast,
    SouthWest,
    NorthWest,
}

impl Direction {
    /// Orthogonal directions first, then diagonals.  Neighbour iteration uses
    /// this order, which makes search tie-breaking reproducible.
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
        Direction::NorthEast,
        Direction::SouthEast,
        Direction::SouthWest,
        Direction::NorthWest,
    ];

    pub const ORTHOGONAL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// `(dx, dy)` of a single step.
    #[inline]
    pub fn offset(self) -> (i32, i32) {
        match self {
            Direction::North     => (0, 1),
            Direction::East      => (1, 0),
            Direction::South     => (0, -1),
            Direction::West      => (-1, 0),
            Direction::NorthEast => (1, 1),
            Direction::SouthEast => (1, -1),
            Direction::SouthWest => (-1, -1),
            Direction::NorthWest => (-1, 1),
        }
    }

    #[inline]
    pub fn is_diagonal(self) -> bool {
        let (dx, dy) = self.offset();
        dx != 0 && dy != 0
    }

    /// For a diagonal, the two orthogonal directions it is composed of.
    /// Used to forbid cutting corners past an obstacle.
    pub fn components(self) -> Option<(Direction, Direction)> {
        match self {
            Direction::NorthEast => Some((Direction::North, Direction::East)),
            Direction::SouthEast => Some((Direction::South, Direction::East)),
            Direction::SouthWest => Some((Direction::South, Direction::West)),
            Direction::NorthWest => Some((Direction::North, Direction::West)),
            _ => None,
        }
    }
}

// ── Connectivity ─────────────────────────────────────────────────────────────

/// Which moves count as adjacency for an agent.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Connectivity {
    /// Orthogonal steps only.
    #[default]
    Four,
    /// Orthogonal and diagonal steps.
    Eight,
}

impl Connectivity {
    /// Directions an agent may step in, in neighbour-iteration order.
    pub fn directions(self) -> &'static [Direction] {
        match self {
            Connectivity::Four  => &Direction::ORTHOGONAL,
            Connectivity::Eight => &Direction::ALL,
        }
    }

    /// Minimum number of unit-cost moves between `a` and `b`, weighting
    /// diagonals by √2.  Multiplied by the cheapest tile cost this is an
    /// admissible and consistent A* heuristic.
    #[inline]
    pub fn distance(self, a: Coord, b: Coord) -> f32 {
        match self {
            Connectivity::Four  => a.manhattan(b) as f32,
            Connectivity::Eight => a.octile(b),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Connectivity::Four  => "four",
            Connectivity::Eight => "eight",
        }
    }
}

impl fmt::Display for Connectivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Bounds ───────────────────────────────────────────────────────────────────

/// A half-open rectangle `[min.x, max.x) × [min.y, max.y)`.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bounds {
    pub min: Coord,
    pub max: Coord,
}

impl Bounds {
    /// Rectangle anchored at the origin.  Extents clamp to `i32::MAX`.
    pub fn new(width: u32, height: u32) -> Self {
        let clamp = |n: u32| n.min(i32::MAX as u32) as i32;
        Self {
            min: Coord::new(0, 0),
            max: Coord::new(clamp(width), clamp(height)),
        }
    }

    /// Rectangle spanning `min` (inclusive) to `max` (exclusive).  An
    /// inverted pair produces an empty rectangle.
    pub fn from_corners(min: Coord, max: Coord) -> Self {
        Self { min, max: Coord::new(max.x.max(min.x), max.y.max(min.y)) }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.max.x.abs_diff(self.min.x)
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.max.y.abs_diff(self.min.y)
    }

    #[inline]
    pub fn area(&self) -> usize {
        self.width() as usize * self.height() as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.area() == 0
    }

    #[inline]
    pub fn contains(&self, c: Coord) -> bool {
        c.x >= self.min.x && c.x < self.max.x && c.y >= self.min.y && c.y < self.max.y
    }

    /// Row-major offset of `c`, or `None` if outside.
    #[inline]
    pub fn linear_index(&self, c: Coord) -> Option<usize> {
        if !self.contains(c) {
            return None;
        }
        let col = c.x.abs_diff(self.min.x) as usize;
        let row = c.y.abs_diff(self.min.y) as usize;
        Some(row * self.width() as usize + col)
    }

    /// Inverse of [`linear_index`](Self::linear_index).
    #[inline]
    pub fn coord_at(&self, index: usize) -> Coord {
        let w = self.width() as usize;
        // Offsets can exceed i32::MAX; the sums themselves always fit.
        Coord::new(
            self.min.x.wrapping_add((index % w) as i32),
            self.min.y.wrapping_add((index / w) as i32),
        )
    }

    /// Overlap of two rectangles (possibly empty).
    pub fn intersect(&self, other: &Bounds) -> Bounds {
        Bounds::from_corners(
            Coord::new(self.min.x.max(other.min.x), self.min.y.max(other.min.y)),
            Coord::new(self.max.x.min(other.max.x), self.max.y.min(other.max.y)),
        )
    }

    /// Every coordinate inside, row by row from `min.y` upward.
    pub fn iter(&self) -> impl Iterator<Item = Coord> + use<> {
        let Bounds { min, max } = *self;
        (min.y..max.y).flat_map(move |y| (min.x..max.x).map(move |x| Coord::new(x, y)))
    }
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}..{})", self.min, self.max)
    }
}
