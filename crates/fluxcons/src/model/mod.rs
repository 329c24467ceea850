//! Constraint-based flux model.
//!
//! - `Model`: stoichiometric matrix `S`, rhs `b`, row senses, variable box and
//!   identifiers, plus an optional block of extra inequality rows `C v (dsense) d`.
//! - `Sense`: row relation, parsed from the usual `E`/`L`/`G` letters.
//! - Small CSC helpers shared with the LP layer.
//!
//! Matrices are kept in CSC storage throughout; constructors convert if needed.

mod types;

pub use types::{ExtraConstraints, Model, Sense};

use sprs::{CsMat, TriMat};

use crate::error::{FluxError, Result};

/// Build a CSC matrix from `(row, col, value)` triplets. Duplicates are summed,
/// explicit zeros dropped.
pub fn triplets_to_csc(
    rows: usize,
    cols: usize,
    entries: &[(usize, usize, f64)],
) -> Result<CsMat<f64>> {
    let mut tri = TriMat::new((rows, cols));
    for &(i, j, v) in entries {
        if i >= rows || j >= cols {
            return Err(FluxError::shape(format!(
                "entry ({i}, {j}) outside a {rows}x{cols} matrix"
            )));
        }
        if !v.is_finite() {
            return Err(FluxError::shape(format!("entry ({i}, {j}) is not finite")));
        }
        if v != 0.0 {
            tri.add_triplet(i, j, v);
        }
    }
    Ok(tri.to_csc())
}

/// All stored entries as `(row, col, value)`.
pub(crate) fn entries(a: &CsMat<f64>) -> Vec<(usize, usize, f64)> {
    let mut out = Vec::with_capacity(a.nnz());
    let csc = a.is_csc();
    for (outer, lane) in a.outer_iterator().enumerate() {
        for (inner, &v) in lane.iter() {
            if csc {
                out.push((inner, outer, v));
            } else {
                out.push((outer, inner, v));
            }
        }
    }
    out
}

/// Nonzeros grouped by row.
pub(crate) fn row_entries(a: &CsMat<f64>) -> Vec<Vec<(usize, f64)>> {
    let mut rows = vec![Vec::new(); a.rows()];
    for (i, j, v) in entries(a) {
        rows[i].push((j, v));
    }
    rows
}

pub(crate) fn to_csc(a: CsMat<f64>) -> CsMat<f64> {
    if a.is_csc() {
        a
    } else {
        a.to_other_storage()
    }
}
