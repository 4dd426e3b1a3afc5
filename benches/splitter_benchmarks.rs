//! Benchmarks for the binning, split-search, and partitioning hot paths.
//!
//! Run with: cargo bench --bench splitter_benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use histosplit::binning::quantile_thresholds;
use histosplit::histogram::{HistogramBin, HistogramMatrix};
use histosplit::{map_to_bins, ColMajorMatrix, RowMajorMatrix, SplitterConfig};

/// Deterministic pseudo-random f64 generator, avoiding a `rand` dependency
/// for a benchmark that only needs varied, non-degenerate input.
fn lcg_values(n: usize, seed: u64, scale: f64) -> Vec<f64> {
    let mut state = seed;
    (0..n)
        .map(|_| {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            ((state >> 11) as f64 / (1u64 << 53) as f64) * scale
        })
        .collect()
}

fn bench_map_to_bins(c: &mut Criterion) {
    let mut group = c.benchmark_group("map_to_bins");

    for &(n_rows, n_cols) in &[(10_000usize, 20usize), (100_000, 50)] {
        let raw = lcg_values(n_rows * n_cols, 7, 1000.0);
        let data = RowMajorMatrix::new(raw, n_rows, n_cols);
        let thresholds: Vec<Vec<f64>> = (0..n_cols)
            .map(|c| quantile_thresholds(&data.col(c), 64))
            .collect();
        let is_categorical = vec![false; n_cols];

        group.throughput(Throughput::Elements((n_rows * n_cols) as u64));
        group.bench_with_input(
            BenchmarkId::new("rows_x_cols", format!("{n_rows}x{n_cols}")),
            &data,
            |b, data| {
                b.iter(|| {
                    let out = map_to_bins(
                        black_box(data),
                        black_box(&thresholds),
                        black_box(&is_categorical),
                        black_box(255),
                    );
                    black_box(out)
                });
            },
        );
    }

    group.finish();
}

fn synthetic_splitter(n_features: usize, max_bins: usize) -> (SplitterConfig, ColMajorMatrix<u8>, HistogramMatrix) {
    let n_samples = 50_000;
    let bins: Vec<u8> = lcg_values(n_samples * n_features, 11, max_bins as f64)
        .into_iter()
        .map(|v| (v as usize).min(max_bins - 1) as u8)
        .collect();
    let binned = ColMajorMatrix::new(bins, n_samples, n_features);

    let mut hist_data = Vec::with_capacity(n_features * max_bins);
    for g in lcg_values(n_features * max_bins, 13, 2.0) {
        let grad = g - 1.0;
        hist_data.push(HistogramBin::new(grad, 1.0, 10));
    }
    let histograms = HistogramMatrix::from_data(hist_data, max_bins, n_features);

    let config = SplitterConfig::new().with_min_samples_leaf(5);
    (config, binned, histograms)
}

fn bench_find_node_split(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_node_split");

    for &n_features in &[10usize, 50, 200] {
        let max_bins = 64;
        let (config, binned, histograms) = synthetic_splitter(n_features, max_bins);
        let n_samples = binned.rows as u32;
        let splitter = config
            .build(
                binned,
                vec![max_bins - 1; n_features],
                (max_bins - 1) as u8,
                vec![true; n_features],
                vec![false; n_features],
            )
            .unwrap();

        let sum_gradients: f64 = (0..n_features)
            .map(|f| histograms.get_col(f).iter().map(|b| b.sum_gradient).sum::<f64>())
            .sum::<f64>()
            / n_features as f64;
        let sum_hessians: f64 = (0..n_features)
            .map(|f| histograms.get_col(f).iter().map(|b| b.sum_hessian).sum::<f64>())
            .sum::<f64>()
            / n_features as f64;

        group.throughput(Throughput::Elements(n_features as u64));
        group.bench_with_input(BenchmarkId::new("n_features", n_features), &n_features, |b, _| {
            b.iter(|| {
                let result = splitter.find_node_split(
                    black_box(n_samples),
                    black_box(&histograms),
                    black_box(sum_gradients),
                    black_box(sum_hessians),
                    black_box(0.0),
                    black_box(f64::NEG_INFINITY),
                    black_box(f64::INFINITY),
                );
                black_box(result)
            });
        });
    }

    group.finish();
}

fn bench_split_indices(c: &mut Criterion) {
    let mut group = c.benchmark_group("split_indices");

    for &n_samples in &[10_000usize, 100_000, 1_000_000] {
        let bins: Vec<u8> = (0..n_samples as u64)
            .map(|i| if i % 3 == 0 { 1 } else { 0 })
            .collect();
        let binned = ColMajorMatrix::new(bins, n_samples, 1);
        let mut splitter = SplitterConfig::new()
            .with_min_samples_leaf(1)
            .with_hessians_are_constant(true)
            .build(binned, vec![2], 2, vec![false], vec![false])
            .unwrap();

        let mut hist_data = vec![HistogramBin::default(); 3];
        hist_data[0] = HistogramBin::new(1.0, 1.0, (n_samples as u32 * 2).div_ceil(3));
        hist_data[1] = HistogramBin::new(-1.0, 1.0, n_samples as u32 / 3);
        let histograms = HistogramMatrix::from_data(hist_data, 3, 1);

        let split = splitter
            .find_node_split(
                n_samples as u32,
                &histograms,
                0.0,
                n_samples as f64,
                0.0,
                f64::NEG_INFINITY,
                f64::INFINITY,
            )
            .unwrap();

        group.throughput(Throughput::Elements(n_samples as u64));
        group.bench_with_input(BenchmarkId::new("n_samples", n_samples), &n_samples, |b, &n| {
            b.iter(|| {
                let result = splitter.split_indices(black_box(&split), black_box(0), black_box(n));
                black_box(result)
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_map_to_bins,
    bench_find_node_split,
    bench_split_indices,
);
criterion_main!(benches);
