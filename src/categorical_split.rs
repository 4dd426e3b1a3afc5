//! Categorical split search: rank categories, scan as if ordered, build a
//! bitset, and infer the missing-value direction.
//!
//! Built on the Fisher (1958) ordering-by-ratio idea, and reuses this
//! crate's own numeric scan shape (`crate::numeric_split`) for the "scan
//! the sorted list left-to-right" step, so every feature kind funnels
//! through one cumulative-scan shape.

use crate::bitset::CategoryBitset;
use crate::constraints::Constraint;
use crate::histogram::HistogramBin;
use crate::kernel::{split_gain, value};
use crate::split_info::SplitInfo;

/// Fisher (1958) smoothing constant. Not a tunable hyperparameter at this
/// layer.
const MIN_CAT_SUPPORT: f64 = 10.0;

struct CatInfo {
    bin: u8,
    key: f64,
}

#[allow(clippy::too_many_arguments)]
pub struct CategoricalSplitParams<'a> {
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

#[inline]
fn hess_of(bin: &HistogramBin, hessians_are_constant: bool) -> f64 {
    bin.effective_hessian(hessians_are_constant)
}

pub fn find_categorical_split(p: CategoricalSplitParams) -> Option<SplitInfo> {
    let support_factor = if p.sum_hessians > 0.0 {
        p.n_samples as f64 / p.sum_hessians
    } else {
        1.0
    };

    let mut cat_infos: Vec<CatInfo> = Vec::with_capacity(p.n_bins_non_missing + 1);
    for b in 0..p.n_bins_non_missing {
        let bin = &p.histogram[b];
        let h = hess_of(bin, p.hessians_are_constant);
        if h * support_factor >= MIN_CAT_SUPPORT {
            cat_infos.push(CatInfo {
                bin: b as u8,
                key: bin.sum_gradient / (h + MIN_CAT_SUPPORT),
            });
        }
    }
    if p.has_missing_values {
        let missing = &p.histogram[p.missing_values_bin_idx as usize];
        let h = hess_of(missing, p.hessians_are_constant);
        if h * support_factor >= MIN_CAT_SUPPORT {
            cat_infos.push(CatInfo {
                bin: p.missing_values_bin_idx,
                key: missing.sum_gradient / (h + MIN_CAT_SUPPORT),
            });
        }
    }

    if cat_infos.len() < 2 {
        return None;
    }

    cat_infos.sort_by(|a, b| a.key.partial_cmp(&b.key).unwrap());

    let mut gl = 0.0_f64;
    let mut hl = 0.0_f64;
    let mut nl = 0_u32;

    let mut best_gain = 0.0_f64;
    let mut found_better = false;
    let mut best_t = 0usize;
    let mut best_left = (0.0_f64, 0.0_f64, 0_u32);
    let mut best_right = (0.0_f64, 0.0_f64, 0_u32);

    // Scan the sorted list left-to-right exactly like the numeric scan,
    // except the last prefix (t == len - 1, which would make the right
    // side empty) is still a legal stopping point to inspect since there is
    // no "extra missing bin" trick here: missing is already one of the
    // ranked entries when present.
    for (t, info) in cat_infos.iter().enumerate() {
        let bin = if info.bin == p.missing_values_bin_idx {
            &p.histogram[p.missing_values_bin_idx as usize]
        } else {
            &p.histogram[info.bin as usize]
        };
        gl += bin.sum_gradient;
        hl += hess_of(bin, p.hessians_are_constant);
        nl += bin.count;

        let gr = p.sum_gradients - gl;
        let hr = p.sum_hessians - hl;
        let nr = p.n_samples - nl;

        if t == cat_infos.len() - 1 {
            // The complement would be empty.
            break;
        }

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

        if gain > p.min_gain_to_split && (!found_better || gain > best_gain) {
            found_better = true;
            best_gain = gain;
            best_t = t;
            best_left = (gl, hl, nl);
            best_right = (gr, hr, nr);
        }
    }

    if !found_better {
        return None;
    }

    let mut left_cat_bitset = CategoryBitset::new();
    for info in &cat_infos[0..=best_t] {
        left_cat_bitset.set(info.bin);
    }
    let missing_go_to_left = left_cat_bitset.test(p.missing_values_bin_idx);

    let (sum_gradient_left, sum_hessian_left, n_samples_left) = best_left;
    let (sum_gradient_right, sum_hessian_right, n_samples_right) = best_right;

    Some(SplitInfo {
        gain: best_gain,
        feature_idx: p.feature_idx,
        bin_idx: 0,
        is_categorical: true,
        missing_go_to_left,
        left_cat_bitset,
        sum_gradient_left,
        sum_hessian_left,
        n_samples_left,
        value_left: value(
            sum_gradient_left,
            sum_hessian_left,
            p.lower_bound,
            p.upper_bound,
            p.l2_regularization,
        ),
        sum_gradient_right,
        sum_hessian_right,
        n_samples_right,
        value_right: value(
            sum_gradient_right,
            sum_hessian_right,
            p.lower_bound,
            p.upper_bound,
            p.l2_regularization,
        ),
    })
}
