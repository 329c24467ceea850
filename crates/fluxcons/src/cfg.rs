//! Fixed algorithm constants (internal).
//!
//! Policy
//! - These govern termination and support detection and are part of the
//!   observable behaviour; they are deliberately not user-configurable.

/// Round cap for the DCA cardinality maximizer.
pub(crate) const DCA_MAX_ROUNDS: usize = 10;
/// Magnitude substituted for infinite flux bounds inside the DCA's auxiliary
/// program. `microlp` stalls on free columns under the large `1/ε` weights.
pub(crate) const FREE_BOUND_BOX: f64 = 1e4;
/// When a single-variable push is unbounded, `|v_j| >= UNBOUNDED_PUSH` is
/// feasible and is solved for instead.
pub(crate) const UNBOUNDED_PUSH: f64 = 1.0;
/// A variable is in the support of a probe when `|v_j| >= SUPPORT_FRACTION * epsilon`.
pub(crate) const SUPPORT_FRACTION: f64 = 0.99;
/// Witness residuals may exceed the feasibility tolerance by this factor before warning.
pub(crate) const RESIDUAL_SLACK: f64 = 1.1;
/// Default primal feasibility tolerance of the bundled LP backend.
pub(crate) const DEFAULT_FEAS_TOL: f64 = 1e-9;
