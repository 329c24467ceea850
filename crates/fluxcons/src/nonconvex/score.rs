use nalgebra::DVector;

/// Saturating cardinality of `v` over `support`: `Σ_j w_j · min(|v_j| / ε, 1)`.
#[inline]
pub fn score(v: &DVector<f64>, weights: &DVector<f64>, support: &[usize], epsilon: f64) -> f64 {
    support
        .iter()
        .map(|&j| weights[j] * (v[j].abs() / epsilon).min(1.0))
        .sum()
}
