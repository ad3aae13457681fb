use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use irregular_ts::dataset::preprocessing::{missing_mask, simulate_missing, time_delta};
use irregular_ts::*;
use ndarray::{Array2, Array3};

fn series(n: usize) -> Array3<f32> {
    Array3::from_shape_fn((n, 100, 8), |(i, t, c)| ((i + t * c) % 17) as f32 * 0.5)
}

fn bench_dropout(c: &mut Criterion) {
    for size in [10, 100, 1000].iter() {
        c.bench_with_input(BenchmarkId::new("dropout", size), size, |b, &n| {
            let x = series(n);
            let rate = MissingRate::Global(0.5);
            b.iter(|| {
                let out = simulate_missing(black_box(x.view()), &rate, Some(123)).unwrap();
                black_box(out);
            });
        });
    }
}

fn bench_mask_delta(c: &mut Criterion) {
    for size in [10, 100, 1000].iter() {
        c.bench_with_input(BenchmarkId::new("mask_delta", size), size, |b, &n| {
            let x = simulate_missing(series(n).view(), &MissingRate::Global(0.5), Some(1)).unwrap();
            let times = Array2::from_shape_fn((n, 100), |(_, t)| t as f32);
            b.iter(|| {
                let mask = missing_mask(black_box(x.view()));
                let delta = time_delta(mask.view(), times.view()).unwrap();
                black_box(delta);
            });
        });
    }
}

fn bench_full_pipeline(c: &mut Criterion) {
    for method in [ImputeMethod::Zero, ImputeMethod::Mean, ImputeMethod::Forward].iter() {
        c.bench_with_input(BenchmarkId::new("pipeline", method), method, |b, &impute| {
            let x = series(200);
            let config = ConfigBuilder::new()
                .missing(0.5)
                .seed(123)
                .mask(true)
                .delta(true)
                .impute(impute)
                .build()
                .unwrap();
            b.iter(|| {
                let dataset = TimeSeriesDataset::builder()
                    .series(black_box(x.clone()))
                    .config(config.clone())
                    .build()
                    .unwrap();
                black_box(dataset);
            });
        });
    }
}

criterion_group!(benches, bench_dropout, bench_mask_delta, bench_full_pipeline);
criterion_main!(benches);
