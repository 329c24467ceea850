//! Convex probes of the default method (LP7).
//!
//! LP7 over a candidate set `J` maximizes `Σ_J z_j` subject to the working
//! rows, `v_j − z_j >= 0` and `0 <= z_j <= ε`. At the optimum every `j ∈ J`
//! that can carry forward flux of at least ε does so simultaneously when the
//! polyhedron allows it, which makes a single LP a good batch probe. The
//! singleton probe is the same program with `|J| = 1`.

use crate::lp::{Direction, ExtraRow, LinearProgram, LpSolver, Probe};
use crate::model::Sense;

/// Batch cardinality LP over `candidates` (non-empty) in the working program.
pub fn lp7_batch<S: LpSolver>(
    solver: &S,
    candidates: &[usize],
    lp: &LinearProgram,
    epsilon: f64,
    basis: Option<S::Basis>,
) -> Probe<S::Basis> {
    debug_assert!(!candidates.is_empty(), "LP7 needs at least one candidate");
    let n = lp.n_vars();
    let k = candidates.len();
    let rows: Vec<ExtraRow> = candidates
        .iter()
        .enumerate()
        .map(|(a, &j)| ExtraRow {
            coeffs: vec![(j, 1.0), (n + a, -1.0)],
            sense: Sense::Ge,
            rhs: 0.0,
        })
        .collect();
    let mut aux = lp.extended(&vec![0.0; k], &vec![epsilon; k], &rows);
    let mut c = vec![0.0; n + k];
    c[n..].fill(1.0);
    aux.set_objective(c, Direction::Maximize);
    let probe = Probe::from_outcome(solver.solve(&aux, basis), n);
    tracing::trace!(candidates = k, status = ?probe.status, "lp7");
    probe
}

/// Forward feasibility of one variable: LP7 with a single candidate.
pub fn lp7_single<S: LpSolver>(
    solver: &S,
    j: usize,
    lp: &LinearProgram,
    epsilon: f64,
    basis: Option<S::Basis>,
) -> Probe<S::Basis> {
    lp7_batch(solver, &[j], lp, epsilon, basis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lp::{build_lp, LpStatus, MicroLp};
    use crate::model::Model;

    #[test]
    fn lp7_lights_up_every_forward_path() {
        // v0 -> v1 and an isolated dead end v2 (row 1: v2 = 0)
        let model = Model::from_triplets(
            2,
            &[(0, 0, 1.0), (0, 1, -1.0), (1, 2, 1.0)],
            vec![0.0, 0.0],
            vec![0.0; 3],
            vec![10.0; 3],
        )
        .unwrap();
        let lp = build_lp(&model, false);
        let eps = 1e-4;
        let probe = lp7_batch(&MicroLp::default(), &[0, 1, 2], &lp, eps, None);
        assert_eq!(probe.status, LpStatus::Optimal);
        let v = probe.flux.unwrap();
        assert_eq!(v.len(), 3);
        assert!(v[0] >= 0.99 * eps && v[1] >= 0.99 * eps);
        assert!(v[2].abs() < 1e-9);
    }

    #[test]
    fn lp7_single_only_looks_forward() {
        // v0 = -1 exactly
        let model =
            Model::from_triplets(1, &[(0, 0, 1.0)], vec![-1.0], vec![-10.0], vec![10.0]).unwrap();
        let lp = build_lp(&model, false);
        let probe = lp7_single(&MicroLp::default(), 0, &lp, 1e-6, None);
        assert_eq!(probe.status, LpStatus::Infeasible);
        assert!(probe.flux.is_none());
    }
}
