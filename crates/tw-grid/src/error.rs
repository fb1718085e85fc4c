//! Grid-store error type.

use thiserror::Error;

use tw_core::Coord;

/// Errors produced by `tw-grid`.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum GridError {
    #[error("coordinate {0} is out of bounds")]
    OutOfBounds(Coord),

    #[error("invalid tile cost {0}: must be a non-negative number")]
    InvalidCost(f32),

    #[error("unknown tile glyph {found:?} at line {line}, column {column}")]
    Parse { line: usize, column: usize, found: char },

    #[error("line {line} has {found} tiles, expected {expected}")]
    RaggedRow { line: usize, expected: usize, found: usize },

    #[error("map text contains no tiles")]
    Empty,
}

pub type GridResult<T> = Result<T, GridError>;

impl From<GridError> for tw_core::TwError {
    fn from(e: GridError) -> Self {
        match e {
            GridError::OutOfBounds(c) => tw_core::TwError::OutOfBounds(c),
            other => tw_core::TwError::Parse(other.to_string()),
        }
    }
}
