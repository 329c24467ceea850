//! Flux consistency: which variables can carry non-zero flux at all.
//!
//! Purpose
//! - Split the variables of a `Model` into those with a feasible flux of
//!   magnitude at least ε (consistent) and those that are structurally dead.
//! - Optionally return, per growth of the consistent set, a witness flux in
//!   the caller's orientation.
//!
//! Algorithm
//! - Normalize once: reverse-only variables are reversed (orientation layer 1).
//! - Loop over the shrinking `remaining` set. A batch probe (LP7 or DCA) runs
//!   on all of it; its support (`|v_j| >= 0.99 ε`) joins the consistent set.
//! - On a probe without progress the flippable candidates are reversed once
//!   (layer 2) and the same probe is retried; if that fails too the run drops
//!   to singleton mode for good and probes one variable at a time, dropping a
//!   variable after both directions failed.
//!
//! Layout
//! - `types.rs`: `ConsistencyCfg`, `Method`, `PrintLevel`, report and trace.
//! - `runner.rs`: the state machine.

mod runner;
mod types;

pub use runner::{find_consistent, find_consistent_with_defaults};
pub use types::{
    ConsistencyCfg, ConsistencyReport, Method, PrintLevel, ProbeMode, RunStats, StepEvent,
    StepTrace,
};
