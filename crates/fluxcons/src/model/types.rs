//! Model data types and validation.

use std::fmt;
use std::str::FromStr;

use sprs::CsMat;

use super::{entries, to_csc, triplets_to_csc};
use crate::error::{FluxError, Result};

/// Relation of a constraint row: `lhs (sense) rhs`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Sense {
    Eq,
    Le,
    Ge,
}

impl Sense {
    pub fn from_char(c: char) -> Result<Self> {
        match c.to_ascii_uppercase() {
            'E' | '=' => Ok(Self::Eq),
            'L' | '<' => Ok(Self::Le),
            'G' | '>' => Ok(Self::Ge),
            _ => Err(FluxError::Parse {
                what: "constraint sense",
                value: c.to_string(),
            }),
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Self::Eq => 'E',
            Self::Le => 'L',
            Self::Ge => 'G',
        }
    }

    /// Parse a sense string such as `"EELG"`, one letter per row.
    pub fn parse_all(s: &str) -> Result<Vec<Self>> {
        s.chars()
            .filter(|c| !c.is_whitespace())
            .map(Self::from_char)
            .collect()
    }

    /// Non-negative amount by which `lhs (sense) rhs` is violated.
    #[inline]
    pub fn violation(self, lhs: f64, rhs: f64) -> f64 {
        match self {
            Self::Eq => (lhs - rhs).abs(),
            Self::Le => (lhs - rhs).max(0.0),
            Self::Ge => (rhs - lhs).max(0.0),
        }
    }
}

impl fmt::Display for Sense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl FromStr for Sense {
    type Err = FluxError;

    fn from_str(s: &str) -> Result<Self> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::from_char(c),
            _ => Err(FluxError::Parse {
                what: "constraint sense",
                value: s.to_string(),
            }),
        }
    }
}

/// Extra inequality block `C v (dsense) d`, appended below the balance rows.
#[derive(Clone, Debug)]
pub struct ExtraConstraints {
    pub c: CsMat<f64>,
    pub d: Vec<f64>,
    pub dsense: Vec<Sense>,
}

impl ExtraConstraints {
    pub fn new(c: CsMat<f64>, d: Vec<f64>, dsense: Vec<Sense>) -> Result<Self> {
        if c.rows() != d.len() || d.len() != dsense.len() {
            return Err(FluxError::shape(format!(
                "extra block has {} rows, {} rhs entries and {} senses",
                c.rows(),
                d.len(),
                dsense.len()
            )));
        }
        Ok(Self {
            c: to_csc(c),
            d,
            dsense,
        })
    }

    #[inline]
    pub fn n_rows(&self) -> usize {
        self.c.rows()
    }

    /// Stored entries of `C` as `(row, col, value)`.
    pub fn triplets(&self) -> Vec<(usize, usize, f64)> {
        entries(&self.c)
    }
}

/// Flux-balance model `S v (csense) b`, `lb <= v <= ub`.
#[derive(Clone, Debug)]
pub struct Model {
    s: CsMat<f64>,
    b: Vec<f64>,
    csense: Vec<Sense>,
    lb: Vec<f64>,
    ub: Vec<f64>,
    ids: Vec<String>,
    extra: Option<ExtraConstraints>,
}

impl Model {
    /// Model with all-equality rows and generated identifiers `R0, R1, ...`.
    pub fn new(s: CsMat<f64>, b: Vec<f64>, lb: Vec<f64>, ub: Vec<f64>) -> Result<Self> {
        let s = to_csc(s);
        let (m, n) = (s.rows(), s.cols());
        if b.len() != m {
            return Err(FluxError::shape(format!(
                "S has {m} rows but b has {} entries",
                b.len()
            )));
        }
        if lb.len() != n || ub.len() != n {
            return Err(FluxError::shape(format!(
                "S has {n} columns but bounds have {} / {} entries",
                lb.len(),
                ub.len()
            )));
        }
        for (var, (&lower, &upper)) in lb.iter().zip(&ub).enumerate() {
            if lower.is_nan() || upper.is_nan() || lower > upper {
                return Err(FluxError::Bounds { var, lower, upper });
            }
        }
        Ok(Self {
            s,
            b,
            csense: vec![Sense::Eq; m],
            lb,
            ub,
            ids: (0..n).map(|j| format!("R{j}")).collect(),
            extra: None,
        })
    }

    /// Convenience constructor from `(row, col, value)` triplets.
    pub fn from_triplets(
        rows: usize,
        entries: &[(usize, usize, f64)],
        b: Vec<f64>,
        lb: Vec<f64>,
        ub: Vec<f64>,
    ) -> Result<Self> {
        let s = triplets_to_csc(rows, lb.len(), entries)?;
        Self::new(s, b, lb, ub)
    }

    pub fn with_sense(mut self, csense: Vec<Sense>) -> Result<Self> {
        if csense.len() != self.s.rows() {
            return Err(FluxError::shape(format!(
                "{} senses for {} rows",
                csense.len(),
                self.s.rows()
            )));
        }
        self.csense = csense;
        Ok(self)
    }

    pub fn with_ids(mut self, ids: Vec<String>) -> Result<Self> {
        if ids.len() != self.n_vars() {
            return Err(FluxError::shape(format!(
                "{} identifiers for {} variables",
                ids.len(),
                self.n_vars()
            )));
        }
        self.ids = ids;
        Ok(self)
    }

    pub fn with_extra(mut self, extra: ExtraConstraints) -> Result<Self> {
        if extra.c.cols() != self.n_vars() {
            return Err(FluxError::shape(format!(
                "extra block has {} columns for {} variables",
                extra.c.cols(),
                self.n_vars()
            )));
        }
        self.extra = Some(extra);
        Ok(self)
    }

    #[inline]
    pub fn n_vars(&self) -> usize {
        self.s.cols()
    }
    #[inline]
    pub fn n_rows(&self) -> usize {
        self.s.rows()
    }
    pub fn s(&self) -> &CsMat<f64> {
        &self.s
    }
    pub fn b(&self) -> &[f64] {
        &self.b
    }
    pub fn csense(&self) -> &[Sense] {
        &self.csense
    }
    pub fn lb(&self) -> &[f64] {
        &self.lb
    }
    pub fn ub(&self) -> &[f64] {
        &self.ub
    }
    pub fn ids(&self) -> &[String] {
        &self.ids
    }
    pub fn extra(&self) -> Option<&ExtraConstraints> {
        self.extra.as_ref()
    }

    /// Stored entries of `S` as `(row, col, value)`, column by column.
    pub fn triplets(&self) -> Vec<(usize, usize, f64)> {
        entries(&self.s)
    }

    /// Model restricted to the columns `cols` (in that order). Rows are kept.
    pub fn submodel(&self, cols: &[usize]) -> Result<Self> {
        let mut new_of_old = vec![None; self.n_vars()];
        for (new, &old) in cols.iter().enumerate() {
            if old >= self.n_vars() {
                return Err(FluxError::shape(format!(
                    "column {old} out of range for {} variables",
                    self.n_vars()
                )));
            }
            new_of_old[old] = Some(new);
        }
        let pick = |a: &CsMat<f64>| -> Result<CsMat<f64>> {
            let kept: Vec<_> = entries(a)
                .into_iter()
                .filter_map(|(i, j, v)| new_of_old[j].map(|jn| (i, jn, v)))
                .collect();
            triplets_to_csc(a.rows(), cols.len(), &kept)
        };
        let mut sub = Self::new(
            pick(&self.s)?,
            self.b.clone(),
            cols.iter().map(|&j| self.lb[j]).collect(),
            cols.iter().map(|&j| self.ub[j]).collect(),
        )?
        .with_sense(self.csense.clone())?
        .with_ids(cols.iter().map(|&j| self.ids[j].clone()).collect())?;
        if let Some(extra) = &self.extra {
            sub = sub.with_extra(ExtraConstraints::new(
                pick(&extra.c)?,
                extra.d.clone(),
                extra.dsense.clone(),
            )?)?;
        }
        Ok(sub)
    }
}
