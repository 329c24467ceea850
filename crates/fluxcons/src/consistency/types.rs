//! Configuration, report and trace types of the consistency run.

use std::fmt;
use std::str::FromStr;

use nalgebra::{DMatrix, DVector};

use crate::error::FluxError;

/// Which probes drive the run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Method {
    /// LP7 batch cardinality LP and LP7 singleton probes.
    #[default]
    Convex,
    /// DCA cardinality maximizer and the two-sided singleton oracle.
    /// Ignores the extra constraint block.
    Nonconvex,
}

impl FromStr for Method {
    type Err = FluxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "convex" | "original" | "lp7" => Ok(Self::Convex),
            "nonconvex" | "dca" => Ok(Self::Nonconvex),
            _ => Err(FluxError::Parse {
                what: "method",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Convex => "convex",
            Self::Nonconvex => "nonconvex",
        })
    }
}

/// Verbosity of the run's own events. Never changes results.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum PrintLevel {
    #[default]
    Silent,
    Summary,
    Debug,
}

impl FromStr for PrintLevel {
    type Err = FluxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "0" | "silent" => Ok(Self::Silent),
            "1" | "summary" => Ok(Self::Summary),
            "2" | "debug" => Ok(Self::Debug),
            _ => Err(FluxError::Parse {
                what: "print level",
                value: s.to_string(),
            }),
        }
    }
}

/// Run configuration.
#[derive(Clone, Copy, Debug)]
pub struct ConsistencyCfg {
    /// Smallest flux magnitude counted as non-zero. Must not be below the
    /// solver feasibility tolerance.
    pub epsilon: f64,
    pub method: Method,
    /// Record one witness flux per growth of the consistent set.
    pub witnesses: bool,
    pub print_level: PrintLevel,
}

impl Default for ConsistencyCfg {
    fn default() -> Self {
        Self {
            epsilon: 1e-4,
            method: Method::Convex,
            witnesses: false,
            print_level: PrintLevel::Silent,
        }
    }
}

/// Whether a step probed the whole remaining set or a single variable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProbeMode {
    Batch,
    Singleton,
}

/// What the orchestrator decided after a probe.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepEvent {
    /// Some probed variable became consistent.
    Progress,
    /// No progress; the flippable probed variables were reversed for a retry.
    Flipped { count: usize },
    /// No progress in batch mode even after flipping.
    SwitchedToSingleton,
    /// The probed variable is inconsistent in both directions.
    Dropped { var: usize },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepTrace {
    pub mode: ProbeMode,
    pub probed: usize,
    pub consistent: usize,
    pub remaining: usize,
    pub event: StepEvent,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RunStats {
    pub steps: usize,
    pub batch_probes: usize,
    pub singleton_probes: usize,
    /// Single-column flips applied by the loop (layer 2).
    pub flips: usize,
    pub witness_warnings: usize,
    pub max_residual: f64,
}

/// Result of a consistency run.
#[derive(Clone, Debug)]
pub struct ConsistencyReport {
    pub n_vars: usize,
    /// Consistent variables, ascending.
    pub consistent: Vec<usize>,
    /// Variables proven unable to carry flux, ascending.
    pub inconsistent: Vec<usize>,
    /// Composed orientation per variable: `-1` means the variable was found
    /// consistent only after reversing it.
    pub orientation: Vec<i8>,
    /// Witness fluxes in the caller's orientation, one per growth event
    /// (empty unless requested).
    pub witnesses: Vec<DVector<f64>>,
    /// Index into `witnesses` of the flux that first proved each variable.
    pub witness_of: Vec<Option<usize>>,
    pub stats: RunStats,
    pub trace: Vec<StepTrace>,
}

impl ConsistencyReport {
    /// Boolean mask over all variables.
    pub fn is_consistent(&self) -> Vec<bool> {
        let mut mask = vec![false; self.n_vars];
        for &j in &self.consistent {
            mask[j] = true;
        }
        mask
    }

    /// Witnesses as columns of an `n_vars × k` matrix.
    pub fn witness_matrix(&self) -> DMatrix<f64> {
        if self.witnesses.is_empty() {
            DMatrix::zeros(self.n_vars, 0)
        } else {
            DMatrix::from_columns(&self.witnesses)
        }
    }
}
