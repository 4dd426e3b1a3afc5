//! Per-feature, per-bin histogram storage: the `(sum_gradients,
//! sum_hessians, count)` triples the split kernels scan.
//!
//! Laid out column-major for the same reason the binned matrix is
//! (`crate::matrix::ColMajorMatrix`): a split scan walks one feature's
//! bins in order and wants them contiguous. Each bin carries an explicit
//! sample count alongside its gradient/hessian sums, needed for
//! `min_samples_leaf` pruning and the categorical support filter.

use crate::matrix::ColMajorMatrix;

/// One bin's aggregate: summed gradient, summed hessian, and sample count.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HistogramBin {
    pub sum_gradient: f64,
    pub sum_hessian: f64,
    pub count: u32,
}

impl HistogramBin {
    pub fn new(sum_gradient: f64, sum_hessian: f64, count: u32) -> Self {
        Self {
            sum_gradient,
            sum_hessian,
            count,
        }
    }

    /// The hessian to use in pruning/gain math: `sum_hessian` unless
    /// hessians are constant, in which case it is synthesized from `count`
    /// at read time.
    #[inline]
    pub fn effective_hessian(&self, hessians_are_constant: bool) -> f64 {
        if hessians_are_constant {
            self.count as f64
        } else {
            self.sum_hessian
        }
    }
}

/// `(n_features, max_bins)` column-major histogram matrix for a single
/// node, supplied by the external grower and read-only during split search.
#[derive(Debug, Clone)]
pub struct HistogramMatrix {
    inner: ColMajorMatrix<HistogramBin>,
}

impl HistogramMatrix {
    pub fn new(n_features: usize, max_bins: usize) -> Self {
        Self {
            inner: ColMajorMatrix::zeroed(max_bins, n_features),
        }
    }

    pub fn from_data(data: Vec<HistogramBin>, max_bins: usize, n_features: usize) -> Self {
        Self {
            inner: ColMajorMatrix::new(data, max_bins, n_features),
        }
    }

    pub fn n_features(&self) -> usize {
        self.inner.cols
    }

    pub fn max_bins(&self) -> usize {
        self.inner.rows
    }

    /// The bin row for one feature, contiguous in bin index order.
    pub fn get_col(&self, feature: usize) -> &[HistogramBin] {
        self.inner.get_col(feature)
    }

    pub fn get_col_mut(&mut self, feature: usize) -> &mut [HistogramBin] {
        self.inner.get_col_mut(feature)
    }
}
