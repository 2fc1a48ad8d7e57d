//! Error types for the MPM core.
//!
//! Every fatal condition of a run surfaces as an `MpmError`. None of them are
//! retried: a step is not restartable half-way, the whole run is.

use thiserror::Error;

use crate::math::{GridCoord, GridSize, Vector};

#[derive(Debug, Error)]
pub enum MpmError {
    /// Configuration value is invalid.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Material name did not match any known material.
    #[error("Unknown material type: {0:?} (expected snow, sand or elastic)")]
    UnknownMaterial(String),

    /// Collision policy name did not match any known policy.
    #[error("Unknown collision policy: {0:?} (expected sticky, separating or slipping)")]
    UnknownCollisionPolicy(String),

    /// A grid coordinate outside `[0, size)` was addressed.
    #[error("Grid index {index} out of range for grid of size {size}")]
    GridIndexOutOfBounds { index: GridCoord, size: GridSize },

    /// The particle's 3×3×3 kernel stencil leaves the grid.
    #[error("Particle {index} at {position} is outside the simulation domain")]
    ParticleOutOfDomain { index: usize, position: Vector },

    /// NaN or infinity accumulated into a grid force.
    #[error("Non-finite force {force} at grid node {node} (step {step}); time step too large for material stiffness?")]
    NonFiniteForce { node: usize, force: Vector, step: u64 },

    /// A supplied particle violates the state invariants at ingestion.
    #[error("Invalid particle {index}: {reason}")]
    InvalidParticle { index: usize, reason: String },

    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias for `Result<T, MpmError>`.
pub type MpmResult<T> = Result<T, MpmError>;
