//! Flux consistency of constraint-based models.
//!
//! Given `S v (sense) b`, `lb <= v <= ub` (plus an optional block of extra
//! inequality rows), find the variables that can carry a flux of magnitude at
//! least ε in some feasible solution, with a witness flux and an orientation
//! for each of them.
//!
//! Layout
//! - `model`: the input model and sparse helpers.
//! - `lp`: canonical LPs, the `LpSolver` seam and the bundled `MicroLp` backend.
//! - `orientation`: the two flip layers and the working-LP transform.
//! - `convex`: LP7 batch/singleton probes (default method).
//! - `nonconvex`: DCA cardinality maximizer and two-sided singleton oracle.
//! - `consistency`: the orchestrating state machine.
//! - `rand_net`: reproducible random networks for tests and benches.

mod cfg;
pub mod api;
pub mod consistency;
pub mod convex;
pub mod error;
pub mod lp;
pub mod model;
pub mod nonconvex;
pub mod orientation;
pub mod rand_net;

#[cfg(test)]
mod test_util;

pub use error::{FluxError, Result};

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::consistency::{
        find_consistent, find_consistent_with_defaults, ConsistencyCfg, ConsistencyReport, Method,
        PrintLevel,
    };
    pub use crate::lp::{LpSolver, MicroLp};
    pub use crate::model::{ExtraConstraints, Model, Sense};
    pub use nalgebra::{DMatrix, DVector};
}
