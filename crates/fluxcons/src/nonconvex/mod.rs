//! Self-contained probes of the nonconvex method.
//!
//! - `score`: saturating cardinality surrogate `Σ w_j min(|v_j|/ε, 1)`.
//! - `dca`: Difference-of-Convex majorize-minimize maximizer of the number of
//!   candidates carrying `|v_j| >= ε`. Sound, not complete: it returns a
//!   stationary point, and callers only read off which fluxes cleared ε.
//! - `single`: exact feasibility oracle for one variable (both directions when
//!   its sign is free).

mod dca;
mod score;
mod single;

pub use dca::maximize_cardinality;
pub use score::score;
pub use single::check_single;
