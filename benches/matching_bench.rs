//! Benchmarks for order submission throughput and latency distribution.

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use hdrhistogram::Histogram;
use matching_core::prelude::*;
use std::hint::black_box;
use std::time::Instant;

fn fresh_gateway() -> Gateway {
    Gateway::new(["BENCH"], None)
}

/// Resting non-crossing limit orders: every submit only pushes onto a heap,
/// never matches.
fn bench_resting_limit_orders(c: &mut Criterion) {
    let mut group = c.benchmark_group("submit_resting_limit");

    for &count in &[100usize, 1_000, 10_000] {
        group.bench_with_input(BenchmarkId::new("orders", count), &count, |b, &count| {
            b.iter_batched(
                fresh_gateway,
                |gateway| {
                    for i in 0..count {
                        let price = 100.0 + (i % 500) as f64;
                        let order = gateway.factory().limit("BENCH", Side::Buy, price, 10);
                        black_box(gateway.submit(order).unwrap());
                    }
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

/// Fully crossing limit orders against a pre-populated opposite side, the
/// matching loop's hot path.
fn bench_crossing_limit_orders(c: &mut Criterion) {
    let mut group = c.benchmark_group("submit_crossing_limit");

    for &depth in &[100usize, 1_000, 10_000] {
        group.bench_with_input(BenchmarkId::new("book_depth", depth), &depth, |b, &depth| {
            b.iter_batched(
                || {
                    let gateway = fresh_gateway();
                    for i in 0..depth {
                        let order = gateway.factory().limit("BENCH", Side::Sell, 190.0, 10);
                        let _ = i;
                        gateway.submit(order).unwrap();
                    }
                    gateway
                },
                |gateway| {
                    let order = gateway.factory().limit("BENCH", Side::Buy, 190.0, 10);
                    black_box(gateway.submit(order).unwrap());
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

/// Records a latency histogram (not a criterion-managed timing loop) for
/// single-order submit calls against a book already holding 10,000 resting
/// orders, reporting p50/p99/p999 once per benchmark run.
fn bench_submit_latency_distribution(c: &mut Criterion) {
    c.bench_function("submit_latency_distribution", |b| {
        b.iter_batched(
            || {
                let gateway = fresh_gateway();
                for i in 0..10_000 {
                    let price = 100.0 + (i % 1000) as f64;
                    let order = gateway.factory().limit("BENCH", Side::Buy, price, 10);
                    gateway.submit(order).unwrap();
                }
                (gateway, Histogram::<u64>::new(3).expect("valid histogram config"))
            },
            |(gateway, mut hist)| {
                for i in 0..1_000 {
                    let price = 100.0 + (i % 1000) as f64;
                    let order = gateway.factory().limit("BENCH", Side::Sell, price, 1);
                    let start = Instant::now();
                    black_box(gateway.submit(order).unwrap());
                    hist.record(start.elapsed().as_nanos() as u64).expect("value within histogram range");
                }
                black_box(hist.value_at_quantile(0.99));
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(
    benches,
    bench_resting_limit_orders,
    bench_crossing_limit_orders,
    bench_submit_latency_distribution,
);
criterion_main!(benches);
