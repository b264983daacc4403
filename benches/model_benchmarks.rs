//! Performance benchmarks for training and classification
//!
//! Run with: cargo bench --bench model_benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use gaussian_discriminant::{synthetic, BlobConfig, GaussianDiscriminant, LabeledDataset, ModelConfig};
use ndarray::Array1;

fn blob_dataset(num_classes: usize, dim: usize, samples_per_class: usize) -> LabeledDataset {
    let centers: Vec<Vec<f64>> = (0..num_classes)
        .map(|c| (0..dim).map(|j| ((c + j) % num_classes) as f64 * 6.0).collect())
        .collect();
    let config = BlobConfig {
        spread: 0.7,
        samples_per_class,
        seed: 1234,
    };
    synthetic::gaussian_blobs(&centers, &config).unwrap()
}

/// Benchmark training across dataset sizes, serial vs parallel
fn bench_fit(c: &mut Criterion) {
    let mut group = c.benchmark_group("fit");

    for samples in [100, 500, 2000].iter() {
        let dataset = blob_dataset(4, 8, *samples);

        let mut serial = GaussianDiscriminant::new(ModelConfig {
            parallel: false,
            ..ModelConfig::default()
        });
        group.bench_with_input(BenchmarkId::new("serial", samples), samples, |b, _| {
            b.iter(|| {
                serial.fit(black_box(&dataset)).unwrap();
            });
        });

        let mut parallel = GaussianDiscriminant::new(ModelConfig {
            parallel: true,
            ..ModelConfig::default()
        });
        group.bench_with_input(BenchmarkId::new("parallel", samples), samples, |b, _| {
            b.iter(|| {
                parallel.fit(black_box(&dataset)).unwrap();
            });
        });
    }

    group.finish();
}

/// Benchmark single-query scoring across feature dimensions
fn bench_predict(c: &mut Criterion) {
    let mut group = c.benchmark_group("predict");

    for dim in [4, 16, 64].iter() {
        let dataset = blob_dataset(3, *dim, 200);
        let mut model = GaussianDiscriminant::new(ModelConfig::default());
        model.fit(&dataset).unwrap();

        let query = Array1::from_elem(*dim, 0.5);
        group.bench_with_input(BenchmarkId::new("dim", dim), dim, |b, _| {
            b.iter(|| {
                black_box(model.predict(query.view()).unwrap());
            });
        });
    }

    group.finish();
}

/// Benchmark batch classification throughput
fn bench_predict_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("predict_batch");

    let train = blob_dataset(4, 8, 200);
    let mut model = GaussianDiscriminant::new(ModelConfig::default());
    model.fit(&train).unwrap();

    for batch in [100, 1000, 10_000].iter() {
        let queries = blob_dataset(4, 8, batch / 4);

        group.bench_with_input(BenchmarkId::new("queries", batch), batch, |b, _| {
            b.iter(|| {
                black_box(model.predict_batch(queries.features()).unwrap());
            });
        });
    }

    group.finish();
}

/// Benchmark floor retuning, which rebuilds operators without refitting
fn bench_set_tau(c: &mut Criterion) {
    let dataset = blob_dataset(5, 16, 300);
    let mut model = GaussianDiscriminant::new(ModelConfig::default());
    model.fit(&dataset).unwrap();

    let mut toggle = false;
    c.bench_function("set_tau", |b| {
        b.iter(|| {
            toggle = !toggle;
            let tau = if toggle { 1e-3 } else { 1e-2 };
            model.set_tau(black_box(tau)).unwrap();
        });
    });
}

criterion_group!(
    benches,
    bench_fit,
    bench_predict,
    bench_predict_batch,
    bench_set_tau,
);

criterion_main!(benches);
