//! Parallel reduction over a float slice.
//!
//! Used for sanity-checking histogram aggregates and by the external
//! grower to precompute total gradient/hessian. A thin `rayon` wrapper,
//! consistent with every other data-parallel region in this crate.

use rayon::prelude::*;

/// Sum a slice of `f64` using a statically scheduled parallel reduction.
pub fn parallel_sum(values: &[f64]) -> f64 {
    values.par_iter().copied().sum()
}
