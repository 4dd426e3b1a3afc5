//! Parallel partitioner: rewrite a contiguous index range into
//! `[left | right]` using per-thread scratch buffers.
//!
//! A two-phase parallel partition: each thread compacts its region's
//! left-going and right-going samples into scratch buffers, then a serial
//! prefix sum hands each thread its final write offset for a second
//! parallel copy. Uses `rayon` the same way the rest of this crate does
//! for every other data-parallel region.

use rayon::prelude::*;

use crate::error::SplitterError;
use crate::matrix::ColMajorMatrix;
use crate::split_info::SplitInfo;

struct Region {
    /// Offset of this region's start within the node slice, 0-based.
    start: usize,
    len: usize,
}

fn regions_for(len: usize, n_threads: usize) -> Vec<Region> {
    if len == 0 {
        return Vec::new();
    }
    let n_threads = n_threads.max(1).min(len);
    let base = len / n_threads;
    let remainder = len % n_threads;
    let mut regions = Vec::with_capacity(n_threads);
    let mut start = 0;
    for t in 0..n_threads {
        let this_len = base + usize::from(t < remainder);
        regions.push(Region { start, len: this_len });
        start += this_len;
    }
    regions
}

/// Owns the partition array and the two scratch buffers for the lifetime
/// of one tree.
pub struct Partitioner {
    partition: Vec<u32>,
    left_scratch: Vec<u32>,
    right_scratch: Vec<u32>,
}

impl Partitioner {
    pub fn new(n_samples: usize) -> Self {
        Self {
            partition: (0..n_samples as u32).collect(),
            left_scratch: vec![0; n_samples],
            right_scratch: vec![0; n_samples],
        }
    }

    pub fn len(&self) -> usize {
        self.partition.len()
    }

    pub fn is_empty(&self) -> bool {
        self.partition.is_empty()
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.partition
    }

    /// Permute `partition[lo..hi]` in place so left-going samples occupy
    /// the front and right-going samples the back, per `split_info`'s
    /// `sample_goes_left` predicate. Returns the left/right slices and the
    /// absolute index where the right child begins.
    pub fn split_indices(
        &mut self,
        split_info: &SplitInfo,
        binned: &ColMajorMatrix<u8>,
        missing_values_bin_idx: u8,
        lo: usize,
        hi: usize,
    ) -> Result<(&mut [u32], &mut [u32], usize), SplitterError> {
        if hi < lo || hi > self.partition.len() {
            return Err(SplitterError::PartitionRangeOutOfBounds {
                lo,
                hi,
                len: self.partition.len(),
            });
        }
        let len = hi - lo;
        if len == 0 {
            let (left, right) = self.partition[lo..hi].split_at_mut(0);
            return Ok((left, right, lo));
        }

        let feature_col = binned.get_col(split_info.feature_idx);
        let n_threads = rayon::current_num_threads();
        let regions = regions_for(len, n_threads);

        // Phase A: each region compacts its left-going and right-going
        // sample indices into the scratch buffers at its own absolute
        // offset (node-local origin, same as the partition slice itself,
        // scratch buffer).
        let partition_ref = &self.partition[lo..hi];
        let counts: Vec<(usize, usize)>;
        {
            let left_scratch = &mut self.left_scratch[lo..hi];
            let right_scratch = &mut self.right_scratch[lo..hi];
            // Split the two scratch buffers into per-region disjoint
            // sub-slices up front so Phase A can run with `par_iter_mut`.
            let mut left_rest: &mut [u32] = left_scratch;
            let mut right_rest: &mut [u32] = right_scratch;
            let mut left_parts = Vec::with_capacity(regions.len());
            let mut right_parts = Vec::with_capacity(regions.len());
            for r in &regions {
                let (head, tail) = left_rest.split_at_mut(r.len);
                left_parts.push(head);
                left_rest = tail;
                let (head, tail) = right_rest.split_at_mut(r.len);
                right_parts.push(head);
                right_rest = tail;
            }

            counts = regions
                .par_iter()
                .zip(left_parts.into_par_iter())
                .zip(right_parts.into_par_iter())
                .map(|((region, left_part), right_part)| {
                    let mut n_left = 0usize;
                    let mut n_right = 0usize;
                    for &sample in &partition_ref[region.start..region.start + region.len] {
                        let bin_value = feature_col[sample as usize];
                        if split_info.sample_goes_left(bin_value, missing_values_bin_idx) {
                            left_part[n_left] = sample;
                            n_left += 1;
                        } else {
                            right_part[n_right] = sample;
                            n_right += 1;
                        }
                    }
                    (n_left, n_right)
                })
                .collect();
        }

        // `k`, the total left count, is where the right half begins.
        let k: usize = counts.iter().map(|(l, _)| *l).sum();

        // Phase B: memcpy each region's compacted fragments to their final
        // resting place in `partition`. Each region's write offset is just
        // the running total of the left/right counts ahead of it, so the
        // destination halves can be carved into disjoint per-region
        // `&mut [u32]` slices with plain sequential `split_at_mut`, no
        // separate offset table needed.
        let (left_dest, right_dest) = self.partition[lo..hi].split_at_mut(k);

        let mut left_dest_parts = Vec::with_capacity(regions.len());
        let mut rest = left_dest;
        for &(n_left, _) in &counts {
            let (head, tail) = rest.split_at_mut(n_left);
            left_dest_parts.push(head);
            rest = tail;
        }
        let mut right_dest_parts = Vec::with_capacity(regions.len());
        let mut rest = right_dest;
        for &(_, n_right) in &counts {
            let (head, tail) = rest.split_at_mut(n_right);
            right_dest_parts.push(head);
            rest = tail;
        }

        let left_scratch = &self.left_scratch[lo..hi];
        let right_scratch = &self.right_scratch[lo..hi];
        let fragments: Vec<(usize, usize, usize)> = regions
            .iter()
            .zip(counts.iter())
            .map(|(region, &(n_left, n_right))| (region.start, n_left, n_right))
            .collect();

        fragments
            .into_par_iter()
            .zip(left_dest_parts.into_par_iter())
            .zip(right_dest_parts.into_par_iter())
            .for_each(|(((region_start, n_left, n_right), left_dest), right_dest)| {
                left_dest.copy_from_slice(&left_scratch[region_start..region_start + n_left]);
                right_dest.copy_from_slice(&right_scratch[region_start..region_start + n_right]);
            });

        log::debug!(
            "split_indices: feature={} lo={} hi={} k={} (left={}, right={})",
            split_info.feature_idx,
            lo,
            hi,
            lo + k,
            k,
            len - k
        );

        let (left, right) = self.partition[lo..hi].split_at_mut(k);
        Ok((left, right, lo + k))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitset::CategoryBitset;

    fn numeric_split(feature_idx: usize, bin_idx: u8, missing_go_to_left: bool) -> SplitInfo {
        SplitInfo {
            gain: 1.0,
            feature_idx,
            bin_idx,
            is_categorical: false,
            missing_go_to_left,
            left_cat_bitset: CategoryBitset::new(),
            sum_gradient_left: 0.0,
            sum_hessian_left: 0.0,
            n_samples_left: 0,
            value_left: 0.0,
            sum_gradient_right: 0.0,
            sum_hessian_right: 0.0,
            n_samples_right: 0,
            value_right: 0.0,
        }
    }

    #[test]
    fn partition_conservation_and_correctness_numeric() {
        // 16 samples, bins 0..3 repeating, split at bin_idx=1.
        let n = 16;
        let bins: Vec<u8> = (0..n as u8).map(|i| i % 4).collect();
        let binned = ColMajorMatrix::new(bins.clone(), n, 1);
        let mut p = Partitioner::new(n);
        let before: std::collections::BTreeSet<u32> = p.as_slice().iter().copied().collect();

        let split = numeric_split(0, 1, false);
        let (left, right, k) = p.split_indices(&split, &binned, 255, 0, n).unwrap();
        assert_eq!(k, left.len());
        assert_eq!(left.len() + right.len(), n);

        for &sample in left.iter() {
            assert!(bins[sample as usize] <= 1);
        }
        for &sample in right.iter() {
            assert!(bins[sample as usize] > 1);
        }

        let after: std::collections::BTreeSet<u32> = p.as_slice().iter().copied().collect();
        assert_eq!(before, after, "partition must conserve the multiset of indices");
    }

    #[test]
    fn partition_by_bitset_categorical() {
        // left_cat_bitset bits {1, 3, 7}.
        let n = 16;
        let bins: Vec<u8> = (0..n as u8).map(|i| i % 8).collect();
        let binned = ColMajorMatrix::new(bins.clone(), n, 1);
        let mut p = Partitioner::new(n);

        let mut split = numeric_split(0, 0, false);
        split.is_categorical = true;
        split.left_cat_bitset.set(1);
        split.left_cat_bitset.set(3);
        split.left_cat_bitset.set(7);

        let (left, right, _k) = p.split_indices(&split, &binned, 255, 0, n).unwrap();
        for &sample in left.iter() {
            assert!([1u8, 3, 7].contains(&bins[sample as usize]));
        }
        for &sample in right.iter() {
            assert!(![1u8, 3, 7].contains(&bins[sample as usize]));
        }
        assert_eq!(left.len(), 6); // three bin values x 2 occurrences each in 0..16
    }

    #[test]
    fn out_of_bounds_range_is_rejected() {
        let n = 8;
        let bins = vec![0u8; n];
        let binned = ColMajorMatrix::new(bins, n, 1);
        let mut p = Partitioner::new(n);
        let split = numeric_split(0, 0, false);
        let err = p.split_indices(&split, &binned, 255, 0, n + 1).unwrap_err();
        assert_eq!(
            err,
            SplitterError::PartitionRangeOutOfBounds { lo: 0, hi: n + 1, len: n }
        );
    }

    #[test]
    fn sub_range_partition_leaves_the_rest_of_the_array_untouched() {
        let n = 20;
        let bins: Vec<u8> = (0..n as u8).map(|i| i % 2).collect();
        let binned = ColMajorMatrix::new(bins.clone(), n, 1);
        let mut p = Partitioner::new(n);
        let outside_before: Vec<u32> = p.as_slice()[10..].to_vec();

        let split = numeric_split(0, 0, false);
        let (_left, _right, k) = p.split_indices(&split, &binned, 255, 0, 10).unwrap();
        assert!(k <= 10);
        assert_eq!(&p.as_slice()[10..], outside_before.as_slice());
    }
}
