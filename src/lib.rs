//! Histogram binning, split search, and parallel index partitioning for a
//! histogram-based gradient boosted decision tree learner.
//!
//! This crate is the numeric core a tree grower calls into once per node:
//! it does not decide which node to expand, does not run the boosting
//! loop, and does not compute gradients/hessians from a loss function. It
//! owns exactly three things: turning raw feature values into bin codes
//! ([`binning::map_to_bins`]), finding the best admissible split at a node
//! given its per-feature histograms ([`dispatcher::HistogramSplitter::find_node_split`]),
//! and rewriting a contiguous slice of sample indices into `[left | right]`
//! once a split is chosen ([`dispatcher::HistogramSplitter::split_indices`]).
//!
//! Construct a splitter through [`config::SplitterConfig`], which validates
//! the per-feature shapes once up front rather than on every node.

pub mod bitset;
pub mod binning;
pub mod categorical_split;
pub mod config;
pub mod constraints;
pub mod dispatcher;
pub mod error;
pub mod histogram;
pub mod kernel;
pub mod matrix;
pub mod numeric_split;
pub mod parallel_sum;
pub mod partition;
pub mod split_info;

pub use bitset::CategoryBitset;
pub use binning::map_to_bins;
pub use config::SplitterConfig;
pub use constraints::{Constraint, ConstraintMap};
pub use dispatcher::HistogramSplitter;
pub use error::SplitterError;
pub use histogram::{HistogramBin, HistogramMatrix};
pub use matrix::{ColMajorMatrix, RowMajorMatrix};
pub use parallel_sum::parallel_sum;
pub use split_info::SplitInfo;
