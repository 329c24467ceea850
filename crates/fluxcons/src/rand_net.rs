//! Random stoichiometric networks.
//!
//! Purpose
//! - Reproducible test and benchmark inputs: a seed fully determines the model.
//! - Networks mix forward, reversible and reverse-only reactions. Metabolites
//!   without an exchange reaction easily become dead ends, so both consistent
//!   and inconsistent variables occur.
//!
//! Model
//! - Internal reactions draw 1–3 substrates and 1–3 products with small integer
//!   coefficients; each metabolite gets an exchange reaction with probability
//!   `exchange_prob`. Bounds are `[0, cap]`, `[-cap, cap]` or `[-cap, 0]`.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt;

use crate::model::Model;

/// Error for invalid generator parameters.
#[derive(Debug)]
pub enum GeneratorError {
    InvalidParams { reason: String },
}

impl GeneratorError {
    fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidParams {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for GeneratorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidParams { reason } => write!(f, "invalid generator params: {reason}"),
        }
    }
}

impl std::error::Error for GeneratorError {}

/// Parameters of a random network.
#[derive(Clone, Copy, Debug)]
pub struct NetworkParams {
    pub metabolites: usize,
    pub reactions: usize,
    /// Probability that a metabolite gets an exchange reaction.
    pub exchange_prob: f64,
    /// Probability that an internal reaction is reversible.
    pub reversible_prob: f64,
    /// Probability that an internal reaction is reverse-only.
    pub reverse_only_prob: f64,
    /// Flux bound magnitude.
    pub cap: f64,
}

impl Default for NetworkParams {
    fn default() -> Self {
        Self {
            metabolites: 8,
            reactions: 12,
            exchange_prob: 0.5,
            reversible_prob: 0.3,
            reverse_only_prob: 0.1,
            cap: 10.0,
        }
    }
}

impl NetworkParams {
    fn validate(&self) -> Result<(), GeneratorError> {
        if self.metabolites == 0 {
            return Err(GeneratorError::invalid("need at least one metabolite"));
        }
        if self.reactions == 0 {
            return Err(GeneratorError::invalid("need at least one internal reaction"));
        }
        for (name, p) in [
            ("exchange_prob", self.exchange_prob),
            ("reversible_prob", self.reversible_prob),
            ("reverse_only_prob", self.reverse_only_prob),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(GeneratorError::invalid(format!("{name} must lie in [0, 1]")));
            }
        }
        if self.reversible_prob + self.reverse_only_prob > 1.0 {
            return Err(GeneratorError::invalid(
                "reversible_prob + reverse_only_prob must not exceed 1",
            ));
        }
        if !(self.cap.is_finite() && self.cap > 0.0) {
            return Err(GeneratorError::invalid("cap must be finite and positive"));
        }
        Ok(())
    }
}

/// Draw a network with `S v = 0`. Identifiers are `R*` for internal and
/// `EX_M*` for exchange reactions.
pub fn random_network(params: &NetworkParams, seed: u64) -> Result<Model, GeneratorError> {
    params.validate()?;
    let mut rng = StdRng::seed_from_u64(seed);
    let m = params.metabolites;
    let cap = params.cap;

    let mut entries = Vec::new();
    let mut lb = Vec::new();
    let mut ub = Vec::new();
    let mut ids = Vec::new();

    for r in 0..params.reactions {
        let col = lb.len();
        let mut used = vec![false; m];
        let n_sub = rng.gen_range(1..=3usize.min(m));
        let n_prod = rng.gen_range(1..=3usize.min(m));
        for (count, sign) in [(n_sub, -1.0), (n_prod, 1.0)] {
            for _ in 0..count {
                let met = rng.gen_range(0..m);
                if used[met] {
                    continue;
                }
                used[met] = true;
                let coeff = f64::from(rng.gen_range(1..=2u8));
                entries.push((met, col, sign * coeff));
            }
        }
        let u: f64 = rng.gen();
        let (lo, hi) = if u < params.reverse_only_prob {
            (-cap, 0.0)
        } else if u < params.reverse_only_prob + params.reversible_prob {
            (-cap, cap)
        } else {
            (0.0, cap)
        };
        lb.push(lo);
        ub.push(hi);
        ids.push(format!("R{r}"));
    }

    for met in 0..m {
        if rng.gen_bool(params.exchange_prob) {
            let col = lb.len();
            entries.push((met, col, -1.0));
            lb.push(-cap);
            ub.push(cap);
            ids.push(format!("EX_M{met}"));
        }
    }

    let model = Model::from_triplets(m, &entries, vec![0.0; m], lb, ub)
        .and_then(|model| model.with_ids(ids))
        .map_err(|e| GeneratorError::invalid(e.to_string()))?;
    Ok(model)
}
