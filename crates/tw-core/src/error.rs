//! Engine-wide error type.
//!
//! Sub-crates define their own error enums and convert them into each other
//! via `From` impls where a layer wraps the one below it.  `TwError` covers
//! the handful of failures that are not owned by any single subsystem.

use thiserror::Error;

use crate::{AgentId, Coord};

/// The top-level error type for `tw-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum TwError {
    #[error("{0} not found")]
    AgentNotFound(AgentId),

    #[error("coordinate {0} is out of bounds")]
    OutOfBounds(Coord),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for all `tw-*` crates.
pub type TwResult<T> = Result<T, TwError>;
