//! LP construction: `Model → LinearProgram` and auxiliary-column extension.

use sprs::{CsMat, TriMat};

use super::{Direction, LinearProgram};
use crate::model::{entries, Model, Sense};

/// A row added on top of an existing program, over the extended column space.
#[derive(Clone, Debug)]
pub struct ExtraRow {
    pub coeffs: Vec<(usize, f64)>,
    pub sense: Sense,
    pub rhs: f64,
}

/// Canonical LP of a model: balance rows first, then (optionally) the extra
/// inequality block. Zero objective, minimize.
pub fn build_lp(model: &Model, include_extra: bool) -> LinearProgram {
    let n = model.n_vars();
    let m = model.n_rows();
    let extra = model.extra().filter(|_| include_extra);
    let extra_rows = extra.map_or(0, |e| e.n_rows());

    let mut tri = TriMat::new((m + extra_rows, n));
    for (i, j, v) in entries(model.s()) {
        tri.add_triplet(i, j, v);
    }
    let mut b = model.b().to_vec();
    let mut sense = model.csense().to_vec();
    if let Some(e) = extra {
        for (i, j, v) in entries(&e.c) {
            tri.add_triplet(m + i, j, v);
        }
        b.extend_from_slice(&e.d);
        sense.extend_from_slice(&e.dsense);
    }
    let a: CsMat<f64> = tri.to_csc();
    LinearProgram {
        a,
        b,
        sense,
        lb: model.lb().to_vec(),
        ub: model.ub().to_vec(),
        c: vec![0.0; n],
        direction: Direction::Minimize,
    }
}

impl LinearProgram {
    /// Append columns with box `[lb_new, ub_new]` (absent from existing rows)
    /// and the rows `new_rows`, which may reference any column of the result.
    /// The objective is reset to zero.
    pub fn extended(&self, lb_new: &[f64], ub_new: &[f64], new_rows: &[ExtraRow]) -> Self {
        debug_assert_eq!(lb_new.len(), ub_new.len());
        let n = self.n_vars() + lb_new.len();
        let m = self.n_rows();
        let mut tri = TriMat::new((m + new_rows.len(), n));
        for (i, j, v) in entries(&self.a) {
            tri.add_triplet(i, j, v);
        }
        let mut b = self.b.clone();
        let mut sense = self.sense.clone();
        for (k, row) in new_rows.iter().enumerate() {
            for &(j, v) in &row.coeffs {
                if v != 0.0 {
                    tri.add_triplet(m + k, j, v);
                }
            }
            b.push(row.rhs);
            sense.push(row.sense);
        }
        let mut lb = self.lb.clone();
        lb.extend_from_slice(lb_new);
        let mut ub = self.ub.clone();
        ub.extend_from_slice(ub_new);
        Self {
            a: tri.to_csc(),
            b,
            sense,
            lb,
            ub,
            c: vec![0.0; n],
            direction: Direction::Minimize,
        }
    }
}
