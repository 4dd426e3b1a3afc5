//! Maps a raw row-major feature matrix to a column-major matrix of bin
//! codes.
//!
//! The per-feature fit (computing `thresholds[f]` from training data) is an
//! external collaborator; `quantile_thresholds` below is a reference
//! implementation used only by this crate's own tests/benches to exercise
//! `map_to_bins` end to end, in the spirit of a `percentiles`-style
//! weighted-quantile threshold builder over a row-major `f64` matrix.

use rayon::prelude::*;

use crate::error::SplitterError;
use crate::matrix::{ColMajorMatrix, RowMajorMatrix};

/// Binary search for the smallest index `k` with `value <= thresholds[k]`,
/// or `thresholds.len()` if no such index exists.
///
/// The midpoint `left + (right - left - 1) / 2` is not incidental: it
/// biases the search toward the lower half so that the `<=` comparison
/// above collapses the *upper* bound on a match, which is what makes a
/// value exactly equal to a threshold land in that threshold's bin rather
/// than one past it.
fn upper_bound_inclusive(thresholds: &[f64], value: f64) -> usize {
    let mut left = 0usize;
    let mut right = thresholds.len();
    while left < right {
        let mid = left + (right - left - 1) / 2;
        if value <= thresholds[mid] {
            right = mid;
        } else {
            left = mid + 1;
        }
    }
    left
}

/// Bin a single raw value against one feature's thresholds, per the
/// per-value binning rule.
pub fn bin_value(
    value: f64,
    thresholds: &[f64],
    is_categorical: bool,
    missing_values_bin_idx: u8,
) -> u8 {
    if value.is_nan() {
        return missing_values_bin_idx;
    }
    let k = upper_bound_inclusive(thresholds, value);
    if is_categorical {
        // Unseen category: `thresholds[k]` either doesn't exist (k == len)
        // or doesn't exactly equal `value`.
        match thresholds.get(k) {
            Some(&t) if t == value => k as u8,
            _ => missing_values_bin_idx,
        }
    } else {
        k as u8
    }
}

/// Map a raw row-major matrix to a column-major matrix of bin codes.
///
/// Each column is processed independently; rows
/// within a column are bucketed with a `rayon` static-scheduled `par_iter`.
pub fn map_to_bins(
    data: &RowMajorMatrix<f64>,
    thresholds: &[Vec<f64>],
    is_categorical: &[bool],
    missing_values_bin_idx: u8,
) -> Result<ColMajorMatrix<u8>, SplitterError> {
    if thresholds.len() != data.cols || is_categorical.len() != data.cols {
        return Err(SplitterError::ColumnLengthMismatch {
            feature: 0,
            expected: data.cols,
            actual: thresholds.len().min(is_categorical.len()),
        });
    }
    for (f, t) in thresholds.iter().enumerate() {
        if !t.windows(2).all(|w| w[0] <= w[1]) {
            return Err(SplitterError::ThresholdsNotAscending { feature: f });
        }
    }

    let mut out: ColMajorMatrix<u8> = ColMajorMatrix::zeroed(data.rows, data.cols);
    out.data
        .par_chunks_mut(data.rows)
        .enumerate()
        .for_each(|(col, out_col)| {
            let col_thresholds = &thresholds[col];
            let categorical = is_categorical[col];
            out_col.par_iter_mut().enumerate().for_each(|(row, slot)| {
                let value = data.get(row, col);
                *slot = bin_value(value, col_thresholds, categorical, missing_values_bin_idx);
            });
        });

    log::debug!(
        "map_to_bins: {} rows x {} cols, missing_values_bin_idx={}",
        data.rows,
        data.cols,
        missing_values_bin_idx
    );

    Ok(out)
}

/// Reference quantile threshold builder for numeric features, used by this
/// crate's own tests/benches. Not part of the hard-scoped split/bin
/// kernels; threshold discovery itself is an external input.
pub fn quantile_thresholds(values: &[f64], n_bins: usize) -> Vec<f64> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
    sorted.dedup();

    if sorted.len() <= 1 {
        return sorted;
    }

    let n_bins = n_bins.max(1).min(sorted.len());
    let mut cuts = Vec::with_capacity(n_bins);
    for i in 1..n_bins {
        let pos = i * (sorted.len() - 1) / n_bins;
        cuts.push(sorted[pos]);
    }
    cuts.push(*sorted.last().unwrap());
    cuts.dedup();
    cuts
}
