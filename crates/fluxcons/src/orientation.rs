//! Variable orientation: two flip layers composed into one effective sign.
//!
//! - Layer 1 (`initial`) is set once by `normalize`: reverse-only variables
//!   (`lower < 0 && upper <= 0`) are turned into forward ones.
//! - Layer 2 (`iterative`) is toggled by the orchestrator when a stuck probe is
//!   retried in the opposite direction.
//!
//! The working LP is always `orientation.apply(base)`: the base program is never
//! mutated, so the composed flip of a column is by construction the net flip
//! applied to it.

use nalgebra::DVector;
use sprs::TriMat;

use crate::lp::LinearProgram;
use crate::model::entries;

/// One flip layer entry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Flip {
    #[default]
    NotFlipped,
    Flipped,
}

impl Flip {
    #[inline]
    pub fn toggled(self) -> Self {
        match self {
            Self::NotFlipped => Self::Flipped,
            Self::Flipped => Self::NotFlipped,
        }
    }

    /// Composition of two layers (XOR).
    #[inline]
    pub fn compose(self, other: Self) -> Self {
        if self == other {
            Self::NotFlipped
        } else {
            Self::Flipped
        }
    }

    #[inline]
    pub fn sign(self) -> f64 {
        match self {
            Self::NotFlipped => 1.0,
            Self::Flipped => -1.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Orientation {
    initial: Vec<Flip>,
    iterative: Vec<Flip>,
}

impl Orientation {
    pub fn identity(n: usize) -> Self {
        Self {
            initial: vec![Flip::NotFlipped; n],
            iterative: vec![Flip::NotFlipped; n],
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.initial.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.initial.is_empty()
    }

    #[inline]
    pub fn initial(&self, j: usize) -> Flip {
        self.initial[j]
    }

    #[inline]
    pub fn iterative(&self, j: usize) -> Flip {
        self.iterative[j]
    }

    /// Net flip of column `j` relative to the caller's model.
    #[inline]
    pub fn effective(&self, j: usize) -> Flip {
        self.initial[j].compose(self.iterative[j])
    }

    /// Toggle the layer-2 entry of `j`.
    pub fn flip(&mut self, j: usize) {
        self.iterative[j] = self.iterative[j].toggled();
    }

    /// Effective orientation as ±1 per variable.
    pub fn signs(&self) -> Vec<i8> {
        (0..self.len())
            .map(|j| match self.effective(j) {
                Flip::NotFlipped => 1,
                Flip::Flipped => -1,
            })
            .collect()
    }

    /// Map a flux solved in the working orientation back to the caller's sign
    /// convention (the map is an involution, so it also goes the other way).
    pub fn to_original(&self, v: &DVector<f64>) -> DVector<f64> {
        DVector::from_iterator(
            v.len(),
            v.iter()
                .enumerate()
                .map(|(j, &x)| self.effective(j).sign() * x),
        )
    }

    /// Working program: `base` with every flipped column negated and its box
    /// swapped-and-negated. Extra columns beyond `self.len()` are left alone.
    pub fn apply(&self, base: &LinearProgram) -> LinearProgram {
        let flipped = |j: usize| j < self.len() && self.effective(j) == Flip::Flipped;
        let mut tri = TriMat::new((base.n_rows(), base.n_vars()));
        for (i, j, v) in entries(&base.a) {
            tri.add_triplet(i, j, if flipped(j) { -v } else { v });
        }
        let mut lp = base.clone();
        lp.a = tri.to_csc();
        for j in (0..base.n_vars()).filter(|&j| flipped(j)) {
            lp.lb[j] = -base.ub[j];
            lp.ub[j] = -base.lb[j];
            lp.c[j] = -base.c[j];
        }
        lp
    }
}

/// Initial orientation of `lp`: reverse-only variables are flipped in layer 1.
pub fn normalize(lp: &LinearProgram) -> Orientation {
    let mut o = Orientation::identity(lp.n_vars());
    for j in 0..lp.n_vars() {
        if lp.lb[j] < 0.0 && lp.ub[j] <= 0.0 {
            o.initial[j] = Flip::Flipped;
        }
    }
    o
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lp::build_lp;
    use crate::model::Model;

    fn mixed() -> LinearProgram {
        // v0 forward, v1 reverse-only, v2 reversible: v0 + v1 - v2 = 0
        let model = Model::from_triplets(
            1,
            &[(0, 0, 1.0), (0, 1, 1.0), (0, 2, -1.0)],
            vec![0.0],
            vec![0.0, -4.0, -3.0],
            vec![5.0, 0.0, 3.0],
        )
        .unwrap();
        build_lp(&model, false)
    }

    #[test]
    fn flip_layers_compose_by_xor() {
        use Flip::*;
        assert_eq!(NotFlipped.compose(NotFlipped), NotFlipped);
        assert_eq!(Flipped.compose(NotFlipped), Flipped);
        assert_eq!(NotFlipped.compose(Flipped), Flipped);
        assert_eq!(Flipped.compose(Flipped), NotFlipped);
        assert_eq!(Flipped.toggled(), NotFlipped);
        assert_eq!(Flipped.sign(), -1.0);
    }

    #[test]
    fn normalize_flips_only_reverse_only_columns() {
        let lp = mixed();
        let o = normalize(&lp);
        assert_eq!(o.signs(), vec![1, -1, 1]);
        let w = o.apply(&lp);
        assert_eq!(w.lb, vec![0.0, 0.0, -3.0]);
        assert_eq!(w.ub, vec![5.0, 4.0, 3.0]);
        assert_eq!(w.row_entries()[0], vec![(0, 1.0), (1, -1.0), (2, -1.0)]);
    }

    #[test]
    fn double_flip_restores_the_base_program() {
        let lp = mixed();
        let mut o = normalize(&lp);
        o.flip(1);
        assert_eq!(o.initial(1), Flip::Flipped);
        assert_eq!(o.iterative(1), Flip::Flipped);
        assert_eq!(o.effective(1), Flip::NotFlipped);
        let w = o.apply(&lp);
        assert_eq!(w.lb, lp.lb);
        assert_eq!(w.ub, lp.ub);
        assert_eq!(w.row_entries(), lp.row_entries());
    }

    #[test]
    fn to_original_undoes_the_working_orientation() {
        let lp = mixed();
        let mut o = normalize(&lp);
        o.flip(2);
        // feasible in the working program: v0=1, v1'=2 (v1=-2), v2'=1 (v2=-1)
        let working = DVector::from_vec(vec![1.0, 2.0, 1.0]);
        assert!(o.apply(&lp).residual(&working) < 1e-12);
        let original = o.to_original(&working);
        assert_eq!(original.as_slice(), &[1.0, -2.0, -1.0]);
        assert!(lp.residual(&original) < 1e-12);
        assert_eq!(o.to_original(&original), working);
    }
}
