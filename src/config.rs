//! Validated builder for a histogram splitter's hyperparameters.
//!
//! This crate's construction input has several cross-field shape
//! invariants (one entry per feature across several parallel arrays, a
//! monotonic-constraint map keyed by feature index, a shared
//! `missing_values_bin_idx`), so those get checked once here rather than
//! re-checked inside the per-node hot loop.

use crate::constraints::ConstraintMap;
use crate::dispatcher::HistogramSplitter;
use crate::error::SplitterError;
use crate::matrix::ColMajorMatrix;
use crate::partition::Partitioner;

/// Builder for [`HistogramSplitter`]. Defaults match the external contract's
/// documented defaults: `min_hessian_to_split = 1e-3`, `min_samples_leaf =
/// 20`, `min_gain_to_split = 0.0`, `hessians_are_constant = false`.
#[derive(Debug, Clone)]
pub struct SplitterConfig {
    l2_regularization: f64,
    min_hessian_to_split: f64,
    min_samples_leaf: u32,
    min_gain_to_split: f64,
    hessians_are_constant: bool,
    monotonic_constraints: ConstraintMap,
    /// Raw `{-1, 0, +1}` contract set via `with_monotonic_csts`, validated
    /// and folded into `monotonic_constraints` during `build`. Kept
    /// separate from `monotonic_constraints` so an out-of-contract value
    /// surfaces as a `SplitterError` at `build()` time instead of a panic
    /// at the point this builder method is called.
    pending_monotonic_csts: Option<Vec<i8>>,
}

impl Default for SplitterConfig {
    fn default() -> Self {
        Self {
            l2_regularization: 0.0,
            min_hessian_to_split: 1e-3,
            min_samples_leaf: 20,
            min_gain_to_split: 0.0,
            hessians_are_constant: false,
            monotonic_constraints: ConstraintMap::new(),
            pending_monotonic_csts: None,
        }
    }
}

impl SplitterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_l2_regularization(mut self, l2: f64) -> Self {
        self.l2_regularization = l2;
        self
    }

    pub fn with_min_hessian_to_split(mut self, min_hessian: f64) -> Self {
        self.min_hessian_to_split = min_hessian;
        self
    }

    pub fn with_min_samples_leaf(mut self, min_samples: u32) -> Self {
        self.min_samples_leaf = min_samples;
        self
    }

    pub fn with_min_gain_to_split(mut self, min_gain: f64) -> Self {
        self.min_gain_to_split = min_gain;
        self
    }

    pub fn with_hessians_are_constant(mut self, constant: bool) -> Self {
        self.hessians_are_constant = constant;
        self
    }

    pub fn with_monotonic_constraints(mut self, constraints: ConstraintMap) -> Self {
        self.monotonic_constraints = constraints;
        self.pending_monotonic_csts = None;
        self
    }

    /// Set per-feature monotonic constraints from the external `{-1, 0, +1}`
    /// contract, one entry per feature in `monotonic_cst`. Values outside
    /// that contract are reported as a `SplitterError` from `build`, not
    /// here, so every boundary check lands in one place.
    pub fn with_monotonic_csts(mut self, monotonic_cst: &[i8]) -> Self {
        self.pending_monotonic_csts = Some(monotonic_cst.to_vec());
        self
    }

    /// Validate shapes once and build the long-lived [`HistogramSplitter`]
    /// used for every `find_node_split`/`split_indices` call in the tree.
    pub fn build(
        self,
        binned: ColMajorMatrix<u8>,
        n_bins_non_missing: Vec<usize>,
        missing_values_bin_idx: u8,
        has_missing_values: Vec<bool>,
        is_categorical: Vec<bool>,
    ) -> Result<HistogramSplitter, SplitterError> {
        let n_features = binned.cols;
        for (name, len) in [
            ("n_bins_non_missing", n_bins_non_missing.len()),
            ("has_missing_values", has_missing_values.len()),
            ("is_categorical", is_categorical.len()),
        ] {
            if len != n_features {
                log::warn!("SplitterConfig::build: {name} length mismatch");
                return Err(SplitterError::ColumnLengthMismatch {
                    feature: 0,
                    expected: n_features,
                    actual: len,
                });
            }
        }

        for (feature, &n_bins) in n_bins_non_missing.iter().enumerate() {
            if n_bins > missing_values_bin_idx as usize {
                return Err(SplitterError::BinCountMismatch {
                    feature,
                    expected: missing_values_bin_idx as usize,
                    actual: n_bins,
                });
            }
        }

        let monotonic_constraints = match self.pending_monotonic_csts {
            Some(csts) => ConstraintMap::from_csts(&csts)?,
            None => self.monotonic_constraints,
        };

        let n_samples = binned.rows;
        let partitioner = Partitioner::new(n_samples);

        Ok(HistogramSplitter::new(
            binned,
            partitioner,
            n_bins_non_missing,
            missing_values_bin_idx,
            has_missing_values,
            is_categorical,
            monotonic_constraints,
            self.l2_regularization,
            self.min_hessian_to_split,
            self.min_samples_leaf,
            self.min_gain_to_split,
            self.hessians_are_constant,
        ))
    }
}
