//! The consistency state machine.

use std::collections::BTreeSet;

use nalgebra::DVector;

use super::types::{
    ConsistencyCfg, ConsistencyReport, Method, PrintLevel, ProbeMode, RunStats, StepEvent,
    StepTrace,
};
use crate::cfg::{RESIDUAL_SLACK, SUPPORT_FRACTION};
use crate::convex::{lp7_batch, lp7_single};
use crate::error::{FluxError, Result};
use crate::lp::{build_lp, LinearProgram, LpSolver, MicroLp, Probe};
use crate::model::Model;
use crate::nonconvex::{check_single, maximize_cardinality};
use crate::orientation::{normalize, Orientation};

/// Partition the variables of `model` into consistent and inconsistent ones.
///
/// Fails only on configuration errors, before any solve.
pub fn find_consistent<S: LpSolver>(
    model: &Model,
    cfg: &ConsistencyCfg,
    solver: &S,
) -> Result<ConsistencyReport> {
    Ok(ConsistencyRunner::new(model, cfg, solver)?.run())
}

/// Convenience: default configuration and the bundled `MicroLp` backend.
pub fn find_consistent_with_defaults(model: &Model) -> Result<ConsistencyReport> {
    find_consistent(model, &ConsistencyCfg::default(), &MicroLp::default())
}

/// Runner owning all mutable state of one run.
struct ConsistencyRunner<'a, S: LpSolver> {
    solver: &'a S,
    cfg: &'a ConsistencyCfg,
    feas_tol: f64,
    /// Program in the caller's orientation; witnesses are checked against it.
    base: LinearProgram,
    /// `orientation.apply(&base)`, rebuilt after every flip.
    working: LinearProgram,
    orientation: Orientation,
    forward_only: BTreeSet<usize>,
    remaining: BTreeSet<usize>,
    consistent: BTreeSet<usize>,
    inconsistent: BTreeSet<usize>,
    tried_flip_once: bool,
    singleton_mode: bool,
    basis: Option<S::Basis>,
    witnesses: Vec<DVector<f64>>,
    witness_of: Vec<Option<usize>>,
    stats: RunStats,
    trace: Vec<StepTrace>,
}

impl<'a, S: LpSolver> ConsistencyRunner<'a, S> {
    fn new(model: &Model, cfg: &'a ConsistencyCfg, solver: &'a S) -> Result<Self> {
        let feas_tol = solver.feasibility_tolerance();
        if !(cfg.epsilon.is_finite() && cfg.epsilon > 0.0) {
            return Err(FluxError::InvalidEpsilon {
                epsilon: cfg.epsilon,
            });
        }
        if cfg.epsilon < feas_tol {
            return Err(FluxError::EpsilonBelowTolerance {
                epsilon: cfg.epsilon,
                tolerance: feas_tol,
            });
        }
        if cfg.method == Method::Nonconvex && model.extra().is_some() {
            tracing::warn!(
                rows = model.extra().map_or(0, |e| e.n_rows()),
                "nonconvex method does not support extra constraints; ignoring them"
            );
        }

        let base = build_lp(model, cfg.method == Method::Convex);
        let orientation = normalize(&base);
        let working = orientation.apply(&base);
        let n = base.n_vars();
        let forward_only = (0..n).filter(|&j| working.lb[j] >= 0.0).collect();
        Ok(Self {
            solver,
            cfg,
            feas_tol,
            base,
            working,
            orientation,
            forward_only,
            remaining: (0..n).collect(),
            consistent: BTreeSet::new(),
            inconsistent: BTreeSet::new(),
            tried_flip_once: false,
            singleton_mode: false,
            basis: None,
            witnesses: Vec::new(),
            witness_of: vec![None; n],
            stats: RunStats::default(),
            trace: Vec::new(),
        })
    }

    fn run(mut self) -> ConsistencyReport {
        if self.cfg.print_level >= PrintLevel::Summary {
            tracing::info!(
                vars = self.base.n_vars(),
                rows = self.base.n_rows(),
                forward_only = self.forward_only.len(),
                method = %self.cfg.method,
                epsilon = self.cfg.epsilon,
                "consistency run started"
            );
        }
        while !self.remaining.is_empty() {
            self.step();
        }
        self.finish()
    }

    fn step(&mut self) {
        let probe_set: Vec<usize> = if self.singleton_mode {
            self.remaining.iter().take(1).copied().collect()
        } else {
            self.remaining.iter().copied().collect()
        };

        let mode = if self.singleton_mode {
            ProbeMode::Singleton
        } else {
            ProbeMode::Batch
        };
        let probe = self.probe(&probe_set);
        self.basis = probe.basis;
        if let Some(v) = probe.flux {
            self.absorb(&v);
        }

        let event = if probe_set.iter().any(|j| self.consistent.contains(j)) {
            let consistent = &self.consistent;
            self.remaining.retain(|j| !consistent.contains(j));
            self.tried_flip_once = false;
            StepEvent::Progress
        } else {
            let flippable: Vec<usize> = probe_set
                .iter()
                .copied()
                .filter(|j| !self.forward_only.contains(j))
                .collect();
            if self.tried_flip_once || flippable.is_empty() {
                self.tried_flip_once = false;
                if self.singleton_mode {
                    let var = probe_set[0];
                    self.remaining.remove(&var);
                    self.inconsistent.insert(var);
                    StepEvent::Dropped { var }
                } else {
                    self.singleton_mode = true;
                    StepEvent::SwitchedToSingleton
                }
            } else {
                for &j in &flippable {
                    self.orientation.flip(j);
                }
                self.working = self.orientation.apply(&self.base);
                self.tried_flip_once = true;
                self.stats.flips += flippable.len();
                StepEvent::Flipped {
                    count: flippable.len(),
                }
            }
        };

        self.stats.steps += 1;
        let trace = StepTrace {
            mode,
            probed: probe_set.len(),
            consistent: self.consistent.len(),
            remaining: self.remaining.len(),
            event,
        };
        if self.cfg.print_level >= PrintLevel::Debug {
            tracing::debug!(
                step = self.stats.steps,
                mode = ?trace.mode,
                probed = trace.probed,
                consistent = trace.consistent,
                remaining = trace.remaining,
                event = ?trace.event,
                "consistency step"
            );
        }
        self.trace.push(trace);
    }

    fn probe(&mut self, set: &[usize]) -> Probe<S::Basis> {
        let basis = self.basis.take();
        let eps = self.cfg.epsilon;
        if self.singleton_mode {
            self.stats.singleton_probes += 1;
            let j = set[0];
            match self.cfg.method {
                Method::Convex => lp7_single(self.solver, j, &self.working, eps, basis),
                Method::Nonconvex => check_single(self.solver, j, &self.working, basis),
            }
        } else {
            self.stats.batch_probes += 1;
            match self.cfg.method {
                Method::Convex => lp7_batch(self.solver, set, &self.working, eps, basis),
                Method::Nonconvex => {
                    maximize_cardinality(self.solver, set, &self.working, eps, basis)
                }
            }
        }
    }

    /// Add the support of `v` (working orientation) to the consistent set and
    /// record a witness when it grew.
    fn absorb(&mut self, v: &DVector<f64>) {
        let threshold = SUPPORT_FRACTION * self.cfg.epsilon;
        let fresh: Vec<usize> = (0..v.len())
            .filter(|&j| v[j].abs() >= threshold && !self.consistent.contains(&j))
            .collect();
        if fresh.is_empty() {
            return;
        }
        for j in &fresh {
            self.consistent.insert(*j);
            // A support is a proof; it overrides an earlier numerical verdict.
            self.inconsistent.remove(j);
        }
        if !self.cfg.witnesses {
            return;
        }

        let original = self.orientation.to_original(v);
        let residual = self
            .base
            .residual(&original)
            .max(self.base.bound_violation(&original));
        self.stats.max_residual = self.stats.max_residual.max(residual);
        if residual > RESIDUAL_SLACK * self.feas_tol {
            self.stats.witness_warnings += 1;
            tracing::warn!(
                residual,
                tolerance = RESIDUAL_SLACK * self.feas_tol,
                witness = self.witnesses.len(),
                "witness flux violates the original constraints"
            );
        }
        let idx = self.witnesses.len();
        for &j in &fresh {
            self.witness_of[j] = Some(idx);
        }
        self.witnesses.push(original);
    }

    fn finish(self) -> ConsistencyReport {
        if self.cfg.print_level >= PrintLevel::Summary {
            tracing::info!(
                consistent = self.consistent.len(),
                inconsistent = self.inconsistent.len(),
                steps = self.stats.steps,
                flips = self.stats.flips,
                witness_warnings = self.stats.witness_warnings,
                "consistency run finished"
            );
        }
        ConsistencyReport {
            n_vars: self.base.n_vars(),
            consistent: self.consistent.into_iter().collect(),
            inconsistent: self.inconsistent.into_iter().collect(),
            orientation: self.orientation.signs(),
            witnesses: self.witnesses,
            witness_of: self.witness_of,
            stats: self.stats,
            trace: self.trace,
        }
    }
}
