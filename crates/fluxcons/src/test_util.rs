//! Shared fixtures for unit tests.

use std::cell::{Cell, RefCell};

use nalgebra::DVector;

use crate::lp::{LinearProgram, LpOutcome, LpSolver, LpStatus, MicroLp};
use crate::model::Model;

/// `MicroLp` wrapper that counts solves.
#[derive(Debug, Default)]
pub(crate) struct CountingLp {
    pub inner: MicroLp,
    pub calls: Cell<usize>,
}

impl LpSolver for CountingLp {
    type Basis = ();

    fn feasibility_tolerance(&self) -> f64 {
        self.inner.feasibility_tolerance()
    }

    fn solve(&self, lp: &LinearProgram, basis: Option<()>) -> LpOutcome<()> {
        self.calls.set(self.calls.get() + 1);
        self.inner.solve(lp, basis)
    }
}

/// `MicroLp` wrapper that hands out the call index as basis, records the
/// basis each call received, and shifts optimal column `i` by
/// `(i + 1) * offset` so that returned vectors are slightly infeasible.
#[derive(Debug, Default)]
pub(crate) struct SkewedLp {
    pub inner: MicroLp,
    pub offset: f64,
    pub received: RefCell<Vec<Option<usize>>>,
}

impl LpSolver for SkewedLp {
    type Basis = usize;

    fn feasibility_tolerance(&self) -> f64 {
        self.inner.feasibility_tolerance()
    }

    fn solve(&self, lp: &LinearProgram, basis: Option<usize>) -> LpOutcome<usize> {
        let call = {
            let mut received = self.received.borrow_mut();
            received.push(basis);
            received.len() - 1
        };
        let out = self.inner.solve(lp, None);
        let x = out.x.map(|mut x| {
            for (i, xi) in x.iter_mut().enumerate() {
                *xi += (i + 1) as f64 * self.offset;
            }
            x
        });
        LpOutcome {
            status: out.status,
            x,
            basis: Some(call),
        }
    }
}

/// Replays a fixed list of optimal points (cycling), ignoring the program.
#[derive(Debug)]
pub(crate) struct ScriptedLp {
    pub points: Vec<DVector<f64>>,
    pub calls: Cell<usize>,
}

impl ScriptedLp {
    pub fn new(points: Vec<Vec<f64>>) -> Self {
        Self {
            points: points.into_iter().map(DVector::from_vec).collect(),
            calls: Cell::new(0),
        }
    }
}

impl LpSolver for ScriptedLp {
    type Basis = ();

    fn feasibility_tolerance(&self) -> f64 {
        1e-9
    }

    fn solve(&self, _lp: &LinearProgram, _basis: Option<()>) -> LpOutcome<()> {
        let k = self.calls.get();
        self.calls.set(k + 1);
        LpOutcome {
            status: LpStatus::Optimal,
            x: Some(self.points[k % self.points.len()].clone()),
            basis: None,
        }
    }
}

/// `v0 − v1 = 0`, both in `[0, 10]`.
pub(crate) fn two_step() -> Model {
    Model::from_triplets(
        1,
        &[(0, 0, 1.0), (0, 1, -1.0)],
        vec![0.0],
        vec![0.0, 0.0],
        vec![10.0, 10.0],
    )
    .unwrap()
}

/// `two_step` plus `v2 ∈ [0, 10]` sitting alone in its own balance row, so
/// `v2 = 0` is forced.
pub(crate) fn with_dead_end() -> Model {
    Model::from_triplets(
        2,
        &[(0, 0, 1.0), (0, 1, -1.0), (1, 2, 1.0)],
        vec![0.0, 0.0],
        vec![0.0; 3],
        vec![10.0; 3],
    )
    .unwrap()
}

/// One reversible variable in `[-10, 10]` pinned to `-1`.
pub(crate) fn pinned_negative() -> Model {
    Model::from_triplets(1, &[(0, 0, 1.0)], vec![-1.0], vec![-10.0], vec![10.0]).unwrap()
}

/// `v0 + v1 + v2 = 0` with every bound infinite.
pub(crate) fn free_triangle() -> Model {
    Model::from_triplets(
        1,
        &[(0, 0, 1.0), (0, 1, 1.0), (0, 2, 1.0)],
        vec![0.0],
        vec![f64::NEG_INFINITY; 3],
        vec![f64::INFINITY; 3],
    )
    .unwrap()
}

/// `v0 − v1 = 0`, both in `[0, ∞)`.
pub(crate) fn open_pathway() -> Model {
    Model::from_triplets(
        1,
        &[(0, 0, 1.0), (0, 1, -1.0)],
        vec![0.0],
        vec![0.0, 0.0],
        vec![f64::INFINITY; 2],
    )
    .unwrap()
}
