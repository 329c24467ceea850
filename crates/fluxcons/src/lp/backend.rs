//! Bundled LP backend on top of the pure-Rust `microlp` simplex.
//!
//! `microlp` has no warm-start entry point, so the basis type is `()` and every
//! solve is a cold start.

use microlp::{ComparisonOp, OptimizationDirection, Problem, Variable};
use nalgebra::DVector;

use super::{Direction, LinearProgram, LpOutcome, LpSolver, LpStatus};
use crate::cfg::DEFAULT_FEAS_TOL;
use crate::model::Sense;

#[derive(Clone, Copy, Debug)]
pub struct MicroLp {
    pub feas_tol: f64,
}

impl Default for MicroLp {
    fn default() -> Self {
        Self {
            feas_tol: DEFAULT_FEAS_TOL,
        }
    }
}

impl MicroLp {
    pub fn with_tolerance(feas_tol: f64) -> Self {
        Self { feas_tol }
    }
}

impl LpSolver for MicroLp {
    type Basis = ();

    fn feasibility_tolerance(&self) -> f64 {
        self.feas_tol
    }

    fn solve(&self, lp: &LinearProgram, _basis: Option<()>) -> LpOutcome<()> {
        let direction = match lp.direction {
            Direction::Minimize => OptimizationDirection::Minimize,
            Direction::Maximize => OptimizationDirection::Maximize,
        };
        let mut problem = Problem::new(direction);
        let vars: Vec<Variable> = (0..lp.n_vars())
            .map(|j| problem.add_var(lp.c[j], (lp.lb[j], lp.ub[j])))
            .collect();

        for (i, row) in lp.row_entries().into_iter().enumerate() {
            if row.is_empty() {
                // 0 (sense) b: decided without the backend.
                if lp.sense[i].violation(0.0, lp.b[i]) > self.feas_tol {
                    tracing::trace!(row = i, rhs = lp.b[i], "empty row violated");
                    return LpOutcome::failed(LpStatus::Infeasible);
                }
                continue;
            }
            let op = match lp.sense[i] {
                Sense::Eq => ComparisonOp::Eq,
                Sense::Le => ComparisonOp::Le,
                Sense::Ge => ComparisonOp::Ge,
            };
            let expr: Vec<(Variable, f64)> = row.into_iter().map(|(j, v)| (vars[j], v)).collect();
            problem.add_constraint(expr, op, lp.b[i]);
        }

        match problem.solve() {
            Ok(solution) => {
                let x = DVector::from_iterator(vars.len(), vars.iter().map(|&v| solution[v]));
                LpOutcome {
                    status: LpStatus::Optimal,
                    x: Some(x),
                    basis: None,
                }
            }
            Err(microlp::Error::Infeasible) => LpOutcome::failed(LpStatus::Infeasible),
            Err(microlp::Error::Unbounded) => LpOutcome::failed(LpStatus::Unbounded),
            Err(err) => {
                tracing::debug!(error = %err, "microlp gave up");
                LpOutcome::failed(LpStatus::Failed)
            }
        }
    }
}
