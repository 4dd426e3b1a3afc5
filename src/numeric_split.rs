//! Numeric split search: left-to-right and right-to-left scans over a
//! per-feature histogram.
//!
//! A cumulative-scan search over bin boundaries, run twice when a feature
//! has missing values: once sending missing right, once sending it left,
//! since the missing bin sits at the end of each histogram column here.

use crate::constraints::Constraint;
use crate::histogram::HistogramBin;
use crate::kernel::split_gain;
use crate::split_info::SplitInfo;

#[allow(clippy::too_many_arguments)]
pub struct NumericSplitParams<'a> {
    pub feature_idx: usize,
    pub histogram: &'a [HistogramBin],
    pub n_bins_non_missing: usize,
    pub has_missing_values: bool,
    pub missing_values_bin_idx: u8,
    pub sum_gradients: f64,
    pub sum_hessians: f64,
    pub n_samples: u32,
    pub hessians_are_constant: bool,
    pub min_samples_leaf: u32,
    pub min_hessian_to_split: f64,
    pub min_gain_to_split: f64,
    pub constraint: Option<&'a Constraint>,
    pub lower_bound: f64,
    pub upper_bound: f64,
    pub l2_regularization: f64,
    pub parent_loss: f64,
}

struct Candidate {
    gain: f64,
    bin_idx: u8,
    missing_go_to_left: bool,
    sum_gradient_left: f64,
    sum_hessian_left: f64,
    n_samples_left: u32,
    sum_gradient_right: f64,
    sum_hessian_right: f64,
    n_samples_right: u32,
}

#[inline]
fn hess_of(bin: &HistogramBin, hessians_are_constant: bool) -> f64 {
    bin.effective_hessian(hessians_are_constant)
}

/// Left-to-right scan: missing (if any) goes right. Iterates real bins
/// `0..end` where `end = n_bins_non_missing - 1 + has_missing` (the `+1`
/// lets missing stand alone as the sole right-child bin when present).
fn scan_left_to_right(p: &NumericSplitParams, best: &mut Option<Candidate>) {
    let end = p.n_bins_non_missing - 1 + p.has_missing_values as usize;

    let mut gl = 0.0_f64;
    let mut hl = 0.0_f64;
    let mut nl = 0_u32;

    for b in 0..end {
        let bin = &p.histogram[b];
        gl += bin.sum_gradient;
        hl += hess_of(bin, p.hessians_are_constant);
        nl += bin.count;

        let gr = p.sum_gradients - gl;
        let hr = p.sum_hessians - hl;
        let nr = p.n_samples - nl;

        if nl < p.min_samples_leaf || hl < p.min_hessian_to_split {
            continue;
        }
        if nr < p.min_samples_leaf || hr < p.min_hessian_to_split {
            break;
        }

        let gain = split_gain(
            gl,
            hl,
            gr,
            hr,
            p.parent_loss,
            p.constraint,
            p.lower_bound,
            p.upper_bound,
            p.l2_regularization,
        );

        let is_better = gain > p.min_gain_to_split && best.as_ref().map_or(true, |c| gain > c.gain);
        if is_better {
            *best = Some(Candidate {
                gain,
                bin_idx: b as u8,
                missing_go_to_left: false,
                sum_gradient_left: gl,
                sum_hessian_left: hl,
                n_samples_left: nl,
                sum_gradient_right: gr,
                sum_hessian_right: hr,
                n_samples_right: nr,
            });
        }
    }
}

/// Right-to-left scan: missing goes left. Only meaningful when the feature
/// has missing values. Builds the *right* child cumulatively from the top
/// bin down, so the left child (`total - right`) automatically folds in
/// the missing aggregate the same way the left-to-right scan's right child
/// does.
fn scan_right_to_left(p: &NumericSplitParams, best: &mut Option<Candidate>) {
    if p.n_bins_non_missing < 2 {
        return;
    }

    let mut gr = 0.0_f64;
    let mut hr = 0.0_f64;
    let mut nr = 0_u32;

    for b in (0..=p.n_bins_non_missing - 2).rev() {
        let above = &p.histogram[b + 1];
        gr += above.sum_gradient;
        hr += hess_of(above, p.hessians_are_constant);
        nr += above.count;

        let gl = p.sum_gradients - gr;
        let hl = p.sum_hessians - hr;
        let nl = p.n_samples - nr;

        if nr < p.min_samples_leaf || hr < p.min_hessian_to_split {
            continue;
        }
        if nl < p.min_samples_leaf || hl < p.min_hessian_to_split {
            break;
        }

        let gain = split_gain(
            gl,
            hl,
            gr,
            hr,
            p.parent_loss,
            p.constraint,
            p.lower_bound,
            p.upper_bound,
            p.l2_regularization,
        );

        let is_better = gain > p.min_gain_to_split && best.as_ref().map_or(true, |c| gain > c.gain);
        if is_better {
            *best = Some(Candidate {
                gain,
                bin_idx: b as u8,
                missing_go_to_left: true,
                sum_gradient_left: gl,
                sum_hessian_left: hl,
                n_samples_left: nl,
                sum_gradient_right: gr,
                sum_hessian_right: hr,
                n_samples_right: nr,
            });
        }
    }
}

/// Evaluate both numeric scans for one feature and return the best
/// `SplitInfo`, or `None` if no admissible split was found.
pub fn find_numeric_split(p: NumericSplitParams) -> Option<SplitInfo> {
    let mut best: Option<Candidate> = None;
    scan_left_to_right(&p, &mut best);
    if p.has_missing_values {
        scan_right_to_left(&p, &mut best);
    }

    best.map(|c| {
        let value_left = crate::kernel::value(
            c.sum_gradient_left,
            c.sum_hessian_left,
            p.lower_bound,
            p.upper_bound,
            p.l2_regularization,
        );
        let value_right = crate::kernel::value(
            c.sum_gradient_right,
            c.sum_hessian_right,
            p.lower_bound,
            p.upper_bound,
            p.l2_regularization,
        );
        SplitInfo {
            gain: c.gain,
            feature_idx: p.feature_idx,
            bin_idx: c.bin_idx,
            is_categorical: false,
            missing_go_to_left: c.missing_go_to_left,
            left_cat_bitset: crate::bitset::CategoryBitset::new(),
            sum_gradient_left: c.sum_gradient_left,
            sum_hessian_left: c.sum_hessian_left,
            n_samples_left: c.n_samples_left,
            value_left,
            sum_gradient_right: c.sum_gradient_right,
            sum_hessian_right: c.sum_hessian_right,
            n_samples_right: c.n_samples_right,
            value_right,
        }
    })
}
