//! Single-variable feasibility oracle.

use crate::cfg::UNBOUNDED_PUSH;
use crate::lp::{Direction, LinearProgram, LpSolver, LpStatus, Probe};

/// Try to push variable `j` away from zero in the working program `lp`.
///
/// - `lb_j >= 0`: maximize `v_j`.
/// - `ub_j <= 0`: minimize `v_j`.
/// - free sign: maximize first; minimize only if that solve failed or left
///   `v_j` at zero (within the solver tolerance).
///
/// An unbounded direction counts as a success (see `push`). The returned flux
/// comes from whichever solve was used; it is absent only when every
/// attempted solve failed.
pub fn check_single<S: LpSolver>(
    solver: &S,
    j: usize,
    lp: &LinearProgram,
    basis: Option<S::Basis>,
) -> Probe<S::Basis> {
    if lp.lb[j] >= 0.0 {
        return push(solver, j, lp, 1.0, basis);
    }
    if lp.ub[j] <= 0.0 {
        return push(solver, j, lp, -1.0, basis);
    }

    let forward = push(solver, j, lp, 1.0, basis);
    let tol = solver.feasibility_tolerance();
    if forward.flux.as_ref().is_some_and(|v| v[j].abs() > tol) {
        return forward;
    }
    tracing::trace!(var = j, status = ?forward.status, "forward push stuck, trying reverse");
    let reverse = push(solver, j, lp, -1.0, forward.basis.clone());
    if reverse.flux.is_none() && forward.flux.is_some() {
        Probe {
            basis: reverse.basis,
            ..forward
        }
    } else {
        reverse
    }
}

/// Optimize `v_j` in direction `dir` (`1` up, `-1` down).
///
/// An unbounded push proves `v_j` can be made as large as wanted, so the
/// returned vector comes from the feasibility program `dir * v_j >= UNBOUNDED_PUSH`.
fn push<S: LpSolver>(
    solver: &S,
    j: usize,
    lp: &LinearProgram,
    dir: f64,
    basis: Option<S::Basis>,
) -> Probe<S::Basis> {
    let n = lp.n_vars();
    let mut c = vec![0.0; n];
    c[j] = -dir;
    let probe = Probe::from_outcome(
        solver.solve(&lp.with_objective(c, Direction::Minimize), basis),
        n,
    );
    if probe.status != LpStatus::Unbounded {
        return probe;
    }

    let mut feas = lp.with_objective(vec![0.0; n], Direction::Minimize);
    if dir > 0.0 {
        feas.lb[j] = feas.lb[j].max(UNBOUNDED_PUSH);
    } else {
        feas.ub[j] = feas.ub[j].min(-UNBOUNDED_PUSH);
    }
    tracing::trace!(var = j, dir, "push unbounded, solving for a finite witness");
    Probe::from_outcome(solver.solve(&feas, probe.basis), n)
}
