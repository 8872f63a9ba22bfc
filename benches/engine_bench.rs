use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use keigen::{DoubleEngine, MatrixHandle};
use rand::{rngs::StdRng, Rng, SeedableRng};
use rand_distr::StandardNormal;
use std::time::Duration;

fn make_random(
    engine: &mut DoubleEngine,
    rows: usize,
    cols: usize,
    (outer, inner): (isize, isize),
    seed: u64,
) -> MatrixHandle {
    let mut rng = StdRng::seed_from_u64(seed);
    let data: Vec<f64> = (0..rows * cols).map(|_| rng.sample(StandardNormal)).collect();
    match engine.initialize_with_data(rows, cols, &data, outer, inner) {
        Ok(h) => h,
        Err(err) => panic!("initialize_with_data failed: {err}"),
    }
}

fn bench_plus_mixed_layouts(c: &mut Criterion) {
    let mut group = c.benchmark_group("plus_assign");
    for size in [100usize, 500, 1000] {
        group.throughput(Throughput::Elements((size * size) as u64));
        let mut engine = DoubleEngine::new();
        let row = (size as isize, 1);
        let col = (1, size as isize);

        let a = make_random(&mut engine, size, size, row, 1);
        let b = make_random(&mut engine, size, size, row, 2);
        group.bench_with_input(BenchmarkId::new("row_major", size), &size, |bench, _| {
            bench.iter(|| engine.plus_assign(a, b).unwrap())
        });

        let b_cm = make_random(&mut engine, size, size, col, 3);
        group.bench_with_input(BenchmarkId::new("mixed", size), &size, |bench, _| {
            bench.iter(|| engine.plus_assign(a, b_cm).unwrap())
        });
    }
    group.finish();
}

fn bench_times(c: &mut Criterion) {
    let mut group = c.benchmark_group("times_into");
    group.measurement_time(Duration::from_secs(5));
    for size in [32usize, 128, 256] {
        group.throughput(Throughput::Elements((size * size * size) as u64));
        let mut engine = DoubleEngine::new();
        let row = (size as isize, 1);

        let a = make_random(&mut engine, size, size, row, 10);
        let b = make_random(&mut engine, size, size, row, 11);
        let dst = engine.initialize_fill(size, size, 0.0).unwrap();
        group.bench_with_input(BenchmarkId::new("row_major", size), &size, |bench, _| {
            bench.iter(|| engine.times_into(a, b, dst).unwrap())
        });

        let a_cm = make_random(&mut engine, size, size, (1, size as isize), 12);
        group.bench_with_input(BenchmarkId::new("strided", size), &size, |bench, _| {
            bench.iter(|| engine.times_into(a_cm, b, dst).unwrap())
        });
    }
    group.finish();
}

fn bench_transpose(c: &mut Criterion) {
    let mut group = c.benchmark_group("transpose");
    for size in [100usize, 500, 1000] {
        group.throughput(Throughput::Elements((size * size) as u64));
        let mut engine = DoubleEngine::new();
        let a = make_random(&mut engine, size, size, (size as isize, 1), 20);
        group.bench_with_input(BenchmarkId::new("allocating", size), &size, |bench, _| {
            bench.iter(|| {
                let t = engine.transpose(a).unwrap();
                engine.dispose(t).unwrap();
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_plus_mixed_layouts, bench_times, bench_transpose);
criterion_main!(benches);
