//! Error types for the planner core

use thiserror::Error;

/// Planner error type
///
/// Only misconfiguration is fatal: degenerate geometry and missing
/// rewire neighbors are handled inline by skipping the affected sample.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlannerError {
    #[error("step size must be positive, got {0}")]
    InvalidStepSize(f32),

    #[error("neighbor count must be positive")]
    InvalidNeighborCount,

    #[error("workspace extent must be positive, got {width}x{height}")]
    InvalidWorkspace { width: f32, height: f32 },
}

pub type Result<T> = std::result::Result<T, PlannerError>;
