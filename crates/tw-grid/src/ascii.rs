//! ASCII map format.
//!
//! One character per tile, one line per row.  Line `n` of the text is row
//! `y = n`; column `m` is `x = m`.  Leading and trailing blank lines are
//! ignored, as is trailing whitespace on each line.
//!
//! | Glyph | Terrain          |
//! |-------|------------------|
//! | `.`   | `Terrain::Open`  |
//! | `,`   | `Terrain::Rough` |
//! | `~`   | `Terrain::Water` |
//! | `#`   | `Terrain::Wall`  |
//!
//! ```
//! use tw_core::Coord;
//! use tw_grid::TileGrid;
//!
//! let grid = TileGrid::from_ascii("
//! ...
//! .#.
//! ...
//! ").unwrap();
//! assert_eq!(grid.bounds().unwrap().width(), 3);
//! assert!(!grid.is_passable(Coord::new(1, 1)));
//! ```

use tw_core::Coord;

use crate::{GridError, GridResult, Terrain, Tile, TileGrid};

impl TileGrid {
    /// Parse a bounded grid from the ASCII format described in the module
    /// docs.  Every tile takes its terrain's default cost.
    pub fn from_ascii(text: &str) -> GridResult<TileGrid> {
        let rows: Vec<&str> = text
            .lines()
            .map(str::trim_end)
            .skip_while(|l| l.is_empty())
            .collect();
        let rows: Vec<&str> = match rows.iter().rposition(|l| !l.is_empty()) {
            Some(last) => rows[..=last].to_vec(),
            None       => return Err(GridError::Empty),
        };

        let width = rows[0].chars().count();
        for (line, row) in rows.iter().enumerate() {
            let found = row.chars().count();
            if found != width {
                return Err(GridError::RaggedRow { line, expected: width, found });
            }
        }

        let mut grid = TileGrid::bounded(width as u32, rows.len() as u32, Tile::open());
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                let terrain = Terrain::from_glyph(ch)
                    .ok_or(GridError::Parse { line: y, column: x, found: ch })?;
                if terrain != Terrain::Open {
                    grid.set(Coord::new(x as i32, y as i32), Tile::new(terrain))?;
                }
            }
        }
        Ok(grid)
    }

    /// Render the grid's extent back to ASCII, one line per row.
    ///
    /// Coordinates inside the extent of an unbounded grid that hold no tile
    /// are written as spaces.  `overlay` may replace the glyph of any
    /// coordinate (e.g. to draw agents).
    pub fn to_ascii_with(&self, overlay: impl Fn(Coord) -> Option<char>) -> String {
        let Some(extent) = self.extent() else {
            return String::new();
        };
        let mut out = String::with_capacity((extent.width() as usize + 1) * extent.height() as usize);
        for y in extent.min.y..extent.max.y {
            for x in extent.min.x..extent.max.x {
                let c = Coord::new(x, y);
                let glyph = overlay(c)
                    .or_else(|| self.tile(c).map(|t| t.terrain.glyph()))
                    .unwrap_or(' ');
                out.push(glyph);
            }
            out.push('\n');
        }
        out
    }

    /// [`to_ascii_with`](Self::to_ascii_with) without an overlay.
    pub fn to_ascii(&self) -> String {
        self.to_ascii_with(|_| None)
    }
}
