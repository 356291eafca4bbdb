//! Sequential vs Rayon scheduling of a large broadcast multiply.
//!
//! Run with: cargo bench --features parallel_proc --bench multiply_nd_parallel

use std::hint::black_box;
use std::time::Duration;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use ndbinary::{Context, Operator, RayonScheduler, SequentialScheduler, TaskScheduler};

fn run_once<S: TaskScheduler>(op: &mut Operator, a: &[f32], b: &[f32], y: &mut [f32], n: usize, scheduler: &S) {
    op.setup_multiply_nd_f32(&[8, n, n], &[n, 1], a, b, y)
        .unwrap()
        .run(scheduler);
}

fn bench_schedulers(c: &mut Criterion) {
    let mut group = c.benchmark_group("multiply_nd_schedulers");
    group.sample_size(10);
    group.warm_up_time(Duration::from_secs(1));
    group.measurement_time(Duration::from_secs(3));

    let ctx = Context::init();
    let mut op = Operator::create_multiply_nd_f32(&ctx, f32::NEG_INFINITY, f32::INFINITY).unwrap();
    let rayon = RayonScheduler::new();

    for n in [128, 512, 1024] {
        let a = vec![1.5f32; 8 * n * n];
        let b: Vec<f32> = (0..n).map(|i| i as f32).collect();
        let mut y = vec![0.0f32; 8 * n * n];
        group.throughput(Throughput::Elements(y.len() as u64));

        group.bench_with_input(BenchmarkId::new("sequential", n), &n, |bench, &n| {
            bench.iter(|| {
                run_once(&mut op, &a, &b, &mut y, n, &SequentialScheduler);
                black_box(&y);
            })
        });
        group.bench_with_input(BenchmarkId::new("rayon", n), &n, |bench, &n| {
            bench.iter(|| {
                run_once(&mut op, &a, &b, &mut y, n, &rayon);
                black_box(&y);
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_schedulers);
criterion_main!(benches);
