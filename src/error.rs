//! Errors
//!
//! All circuit generation functions are pure, so every error is raised immediately by the function that detects it;
//! nothing is retried.
//!

use crate::geometry::Coordinate;
use thiserror::Error;

pub type CircuitResult<T> = Result<T, CircuitError>;

#[derive(Debug, Error)]
pub enum CircuitError {
    /// the lattice geometry is undefined below distance 2
    #[error("invalid code distance {0}: must be at least 2")]
    InvalidDistance(usize),
    /// the stabilizer placement only tiles the lattice for odd distances
    #[error("code distance {0} is even: a rotated surface code circuit requires an odd distance")]
    EvenDistance(usize),
    #[error("invalid physical error rate {0}: must be within [0, 1]")]
    InvalidProbability(f64),
    /// the coordinate-to-index map must be one-to-one; this indicates a geometry bug
    #[error("duplicate coordinate {coordinate} at positions {first} and {second}")]
    DuplicateCoordinate { coordinate: Coordinate, first: usize, second: usize },
    #[error("invalid circuit config: {0}")]
    InvalidConfig(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
