//! Curated surface for callers that want every building block, not just the
//! `prelude` (custom LP backends, direct use of the probes).

// Model and LPs
pub use crate::lp::{
    build_lp, Direction, ExtraRow, LinearProgram, LpOutcome, LpSolver, LpStatus, MicroLp, Probe,
};
pub use crate::model::{triplets_to_csc, ExtraConstraints, Model, Sense};
// Orientation
pub use crate::orientation::{normalize, Flip, Orientation};
// Probes
pub use crate::convex::{lp7_batch, lp7_single};
pub use crate::nonconvex::{check_single, maximize_cardinality, score};
// Orchestrator
pub use crate::consistency::{
    find_consistent, find_consistent_with_defaults, ConsistencyCfg, ConsistencyReport, Method,
    PrintLevel, ProbeMode, RunStats, StepEvent, StepTrace,
};
// Random networks
pub use crate::rand_net::{random_network, GeneratorError, NetworkParams};
