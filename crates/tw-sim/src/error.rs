use thiserror::Error;

use tw_behavior::BehaviorError;
use tw_core::{AgentId, Coord};
use tw_grid::GridError;
use tw_spatial::EndpointReason;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("cannot place an agent at {coord}: {reason}")]
    InvalidPlacement { coord: Coord, reason: EndpointReason },

    #[error("tile {coord} is already occupied by {by}")]
    Occupied { coord: Coord, by: AgentId },

    #[error("grid error: {0}")]
    Grid(#[from] GridError),

    #[error("behavior error: {0}")]
    Behavior(#[from] BehaviorError),
}

pub type SimResult<T> = Result<T, SimError>;
