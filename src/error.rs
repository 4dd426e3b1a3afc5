use thiserror::Error;

/// Errors surfaced at the boundary of the numeric core, where a caller-side
/// precondition documented on the entry point itself has been violated.
///
/// Nothing inside a split scan, a binning pass, or a partition phase ever
/// constructs one of these: by the time those loops run, the shapes below
/// have already been checked once at construction or call time.
#[derive(Error, Debug, PartialEq)]
pub enum SplitterError {
    #[error("thresholds for feature {feature} are not monotonically ascending")]
    ThresholdsNotAscending { feature: usize },

    #[error(
        "feature {feature}: n_bins_non_missing is {expected}, but thresholds imply {actual}"
    )]
    BinCountMismatch {
        feature: usize,
        expected: usize,
        actual: usize,
    },

    #[error(
        "histogram matrix shape ({actual_features}, {actual_bins}) does not match \
         expected ({expected_features}, {expected_bins})"
    )]
    HistogramShapeMismatch {
        expected_features: usize,
        expected_bins: usize,
        actual_features: usize,
        actual_bins: usize,
    },

    #[error("lower_bound ({lower_bound}) is greater than upper_bound ({upper_bound})")]
    InvalidBounds { lower_bound: f64, upper_bound: f64 },

    #[error("partition range [{lo}, {hi}) is out of bounds for a partition of length {len}")]
    PartitionRangeOutOfBounds { lo: usize, hi: usize, len: usize },

    #[error("column length mismatch: feature {feature} has {actual} rows, expected {expected}")]
    ColumnLengthMismatch {
        feature: usize,
        expected: usize,
        actual: usize,
    },

    #[error("feature {feature}: monotonic_cst must be in {{-1, 0, 1}}, got {value}")]
    InvalidMonotonicConstraint { feature: usize, value: i8 },
}
