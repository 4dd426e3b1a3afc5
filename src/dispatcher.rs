//! Per-feature parallel split evaluation and best-feature selection.
//!
//! Fans features out over a `rayon`-parallel region, dispatching each one
//! to the numeric or categorical scan, and reduces the per-feature results
//! down to a single winning split.

use rayon::prelude::*;

use crate::categorical_split::{find_categorical_split, CategoricalSplitParams};
use crate::constraints::ConstraintMap;
use crate::error::SplitterError;
use crate::histogram::HistogramMatrix;
use crate::kernel::loss_from_value;
use crate::matrix::ColMajorMatrix;
use crate::numeric_split::{find_numeric_split, NumericSplitParams};
use crate::partition::Partitioner;
use crate::split_info::SplitInfo;

/// Owns the binned matrix, the partition array and its scratch buffers,
/// and the per-feature metadata and hyperparameters for one tree.
/// Constructed once via [`crate::config::SplitterConfig::build`].
pub struct HistogramSplitter {
    binned: ColMajorMatrix<u8>,
    partitioner: Partitioner,
    n_bins_non_missing: Vec<usize>,
    missing_values_bin_idx: u8,
    has_missing_values: Vec<bool>,
    is_categorical: Vec<bool>,
    monotonic_constraints: ConstraintMap,
    l2_regularization: f64,
    min_hessian_to_split: f64,
    min_samples_leaf: u32,
    min_gain_to_split: f64,
    hessians_are_constant: bool,
}

impl HistogramSplitter {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        binned: ColMajorMatrix<u8>,
        partitioner: Partitioner,
        n_bins_non_missing: Vec<usize>,
        missing_values_bin_idx: u8,
        has_missing_values: Vec<bool>,
        is_categorical: Vec<bool>,
        monotonic_constraints: ConstraintMap,
        l2_regularization: f64,
        min_hessian_to_split: f64,
        min_samples_leaf: u32,
        min_gain_to_split: f64,
        hessians_are_constant: bool,
    ) -> Self {
        Self {
            binned,
            partitioner,
            n_bins_non_missing,
            missing_values_bin_idx,
            has_missing_values,
            is_categorical,
            monotonic_constraints,
            l2_regularization,
            min_hessian_to_split,
            min_samples_leaf,
            min_gain_to_split,
            hessians_are_constant,
        }
    }

    pub fn n_features(&self) -> usize {
        self.n_bins_non_missing.len()
    }

    pub fn n_samples(&self) -> usize {
        self.partitioner.len()
    }

    pub fn partition(&self) -> &[u32] {
        self.partitioner.as_slice()
    }

    /// Evaluate every feature's best split in parallel and return the
    /// overall winner. Never errors on an ordinary "nothing admissible"
    /// outcome, that comes back as a sentinel `SplitInfo` with `gain ==
    /// -1.0` (see [`SplitInfo::is_no_split`]).
    #[allow(clippy::too_many_arguments)]
    pub fn find_node_split(
        &self,
        n_samples: u32,
        histograms: &HistogramMatrix,
        sum_gradients: f64,
        sum_hessians: f64,
        value: f64,
        lower_bound: f64,
        upper_bound: f64,
    ) -> Result<SplitInfo, SplitterError> {
        if lower_bound > upper_bound {
            return Err(SplitterError::InvalidBounds {
                lower_bound,
                upper_bound,
            });
        }
        let expected_bins = self.missing_values_bin_idx as usize + 1;
        if histograms.n_features() != self.n_features() || histograms.max_bins() != expected_bins
        {
            return Err(SplitterError::HistogramShapeMismatch {
                expected_features: self.n_features(),
                expected_bins,
                actual_features: histograms.n_features(),
                actual_bins: histograms.max_bins(),
            });
        }

        let parent_loss = loss_from_value(value, sum_gradients);

        let split_infos: Vec<SplitInfo> = (0..self.n_features())
            .into_par_iter()
            .map(|feature| {
                let histogram = histograms.get_col(feature);
                let constraint = self.monotonic_constraints.get(&feature);
                let is_categorical = self.is_categorical[feature];

                let found = if is_categorical {
                    find_categorical_split(CategoricalSplitParams {
                        feature_idx: feature,
                        histogram,
                        n_bins_non_missing: self.n_bins_non_missing[feature],
                        has_missing_values: self.has_missing_values[feature],
                        missing_values_bin_idx: self.missing_values_bin_idx,
                        sum_gradients,
                        sum_hessians,
                        n_samples,
                        hessians_are_constant: self.hessians_are_constant,
                        min_samples_leaf: self.min_samples_leaf,
                        min_hessian_to_split: self.min_hessian_to_split,
                        min_gain_to_split: self.min_gain_to_split,
                        constraint,
                        lower_bound,
                        upper_bound,
                        l2_regularization: self.l2_regularization,
                        parent_loss,
                    })
                } else {
                    find_numeric_split(NumericSplitParams {
                        feature_idx: feature,
                        histogram,
                        n_bins_non_missing: self.n_bins_non_missing[feature],
                        has_missing_values: self.has_missing_values[feature],
                        missing_values_bin_idx: self.missing_values_bin_idx,
                        sum_gradients,
                        sum_hessians,
                        n_samples,
                        hessians_are_constant: self.hessians_are_constant,
                        min_samples_leaf: self.min_samples_leaf,
                        min_hessian_to_split: self.min_hessian_to_split,
                        min_gain_to_split: self.min_gain_to_split,
                        constraint,
                        lower_bound,
                        upper_bound,
                        l2_regularization: self.l2_regularization,
                        parent_loss,
                    })
                };

                found.unwrap_or_else(|| SplitInfo::no_split(feature, is_categorical))
            })
            .collect();

        // Linear max over features in ascending order: a strict `>` keeps
        // the first maximum, so ties break toward the lower feature index.
        let mut best = SplitInfo::no_split(0, false);
        for info in split_infos {
            if info.gain > best.gain {
                best = info;
            }
        }

        log::debug!(
            "find_node_split: n_samples={} winning feature={} gain={:.6} categorical={}",
            n_samples,
            best.feature_idx,
            best.gain,
            best.is_categorical
        );

        Ok(best)
    }

    /// Permute `partition[lo..hi]` about `split_info`, delegating to the
    /// owned [`Partitioner`] with this splitter's binned matrix and
    /// missing-values bin index.
    pub fn split_indices(
        &mut self,
        split_info: &SplitInfo,
        lo: usize,
        hi: usize,
    ) -> Result<(&mut [u32], &mut [u32], usize), SplitterError> {
        self.partitioner
            .split_indices(split_info, &self.binned, self.missing_values_bin_idx, lo, hi)
    }
}
