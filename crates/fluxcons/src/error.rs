//! Error type shared by model construction and the consistency entry points.
//!
//! Only preconditions are errors. Solver failures during a run are ordinary
//! outcomes and never surface here.

use std::fmt;

#[derive(Clone, Debug, PartialEq)]
pub enum FluxError {
    /// Matrix, rhs, sense or bound vectors disagree in length.
    Shape { reason: String },
    /// A variable has `lower > upper` or a NaN bound.
    Bounds { var: usize, lower: f64, upper: f64 },
    /// `epsilon` is below what the LP backend can resolve.
    EpsilonBelowTolerance { epsilon: f64, tolerance: f64 },
    /// `epsilon` is not a finite positive number.
    InvalidEpsilon { epsilon: f64 },
    /// Unknown textual sense, method or print level.
    Parse { what: &'static str, value: String },
}

impl FluxError {
    pub(crate) fn shape(reason: impl Into<String>) -> Self {
        Self::Shape {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for FluxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Shape { reason } => write!(f, "inconsistent model shape: {reason}"),
            Self::Bounds { var, lower, upper } => {
                write!(f, "variable {var} has invalid bounds [{lower}, {upper}]")
            }
            Self::EpsilonBelowTolerance { epsilon, tolerance } => write!(
                f,
                "epsilon {epsilon:e} is below the solver feasibility tolerance {tolerance:e}"
            ),
            Self::InvalidEpsilon { epsilon } => {
                write!(f, "epsilon must be finite and positive, got {epsilon}")
            }
            Self::Parse { what, value } => write!(f, "unknown {what}: {value:?}"),
        }
    }
}

impl std::error::Error for FluxError {}

pub type Result<T> = std::result::Result<T, FluxError>;
