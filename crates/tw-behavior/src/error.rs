use thiserror::Error;

use tw_core::{AgentId, Coord, TwError};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BehaviorError {
    #[error("{0} does not exist")]
    AgentNotFound(AgentId),

    #[error("goal {0} is outside the grid")]
    OutOfBounds(Coord),
}

pub type BehaviorResult<T> = Result<T, BehaviorError>;

impl From<BehaviorError> for TwError {
    fn from(e: BehaviorError) -> Self {
        match e {
            BehaviorError::AgentNotFound(a) => TwError::AgentNotFound(a),
            BehaviorError::OutOfBounds(c)   => TwError::OutOfBounds(c),
        }
    }
}
