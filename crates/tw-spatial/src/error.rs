//! Spatial-subsystem error type.

use std::fmt;

use thiserror::Error;

use tw_core::Coord;

/// Why a search endpoint was rejected before any expansion.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EndpointReason {
    OutOfBounds,
    Impassable,
    /// Passable in general, but above the agent's `max_tile_cost`.
    TooCostly,
}

impl fmt::Display for EndpointReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EndpointReason::OutOfBounds => "out of bounds",
            EndpointReason::Impassable  => "impassable",
            EndpointReason::TooCostly   => "exceeds the agent's cost limit",
        })
    }
}

/// Errors produced by `tw-spatial`.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SpatialError {
    #[error("coordinate {0} is out of bounds")]
    OutOfBounds(Coord),

    #[error("no edge from {from} to {to}")]
    InvalidEdge { from: Coord, to: Coord },

    #[error("invalid endpoint {coord}: {reason}")]
    InvalidEndpoint { coord: Coord, reason: EndpointReason },

    #[error("no path from {start} to {goal}")]
    NoPathFound { start: Coord, goal: Coord },
}

pub type SpatialResult<T> = Result<T, SpatialError>;
