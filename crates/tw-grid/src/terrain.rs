//! Terrain tag enum shared by tiles, loaders, and renderers.
//!
//! The tag is descriptive; what an agent pays to cross a tile lives in
//! [`TileCost`](crate::TileCost).  Each terrain carries a default cost so
//! that maps built from glyphs alone are immediately traversable.

/// The surface type of a tile.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[non_exhaustive]
pub enum Terrain {
    /// Bare floor or short grass (default).
    #[default]
    Open,
    /// Brush, rubble, sand.
    Rough,
    /// Shallow water: slow but crossable.
    Water,
    /// Solid obstacle.
    Wall,
}

impl Terrain {
    pub const ALL: [Terrain; 4] = [Terrain::Open, Terrain::Rough, Terrain::Water, Terrain::Wall];

    /// Cost of entering a tile of this terrain; `None` for obstacles.
    pub fn default_cost(self) -> Option<f32> {
        match self {
            Terrain::Open  => Some(1.0),
            Terrain::Rough => Some(2.0),
            Terrain::Water => Some(5.0),
            Terrain::Wall  => None,
        }
    }

    /// Character used by the ASCII map format.
    pub fn glyph(self) -> char {
        match self {
            Terrain::Open  => '.',
            Terrain::Rough => ',',
            Terrain::Water => '~',
            Terrain::Wall  => '#',
        }
    }

    /// Inverse of [`glyph`](Self::glyph).
    pub fn from_glyph(c: char) -> Option<Terrain> {
        Terrain::ALL.into_iter().find(|t| t.glyph() == c)
    }

    /// Human-readable label, useful for CSV column values.
    pub fn as_str(self) -> &'static str {
        match self {
            Terrain::Open  => "open",
            Terrain::Rough => "rough",
            Terrain::Water => "water",
            Terrain::Wall  => "wall",
        }
    }
}

impl std::fmt::Display for Terrain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
