// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Date formatter sharing-strategy benchmarks.
//!
//! Each strategy is measured at 1, 2, 4 and 8 worker threads. Every worker
//! performs the full iteration count; the reported time is the mean of the
//! workers' elapsed times, i.e. average time per call as seen by one worker.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use dateformat_core::{
    CalendarFormatter, DateFormat, FormatInput, ImmutableFormatter, Instant, Pattern,
    SharedFormatter, Strategy,
};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

/// Thread counts to test.
const THREAD_COUNTS: &[usize] = &[1, 2, 4, 8];

fn bench_input() -> FormatInput {
    FormatInput::new(Instant::from_ymd_hms(2024, 1, 15, 12, 0, 0).expect("valid instant"))
}

/// Run `iters` calls on each of `threads` workers; mean elapsed per worker.
fn run_workers(shared: &SharedFormatter, input: &FormatInput, threads: usize, iters: u64) -> Duration {
    run_threads(threads, iters, || shared.worker(), |worker| worker.format_input(input))
}

/// Build one worker state per thread, release them together, and time
/// `iters` calls of `operation` on each.
fn run_threads<W, M, O>(threads: usize, iters: u64, make_worker: M, operation: O) -> Duration
where
    M: Fn() -> W + Sync,
    O: Fn(&W) -> String + Sync,
{
    let barrier = Barrier::new(threads);

    let total: Duration = thread::scope(|scope| {
        let handles: Vec<_> = (0..threads)
            .map(|_| {
                let barrier = &barrier;
                let make_worker = &make_worker;
                let operation = &operation;
                scope.spawn(move || {
                    let worker = make_worker();
                    barrier.wait();
                    let start = std::time::Instant::now();
                    for _ in 0..iters {
                        black_box(operation(black_box(&worker)));
                    }
                    start.elapsed()
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|h| h.join().expect("worker panicked"))
            .sum()
    });

    total / threads as u32
}

/// Benchmark every strategy across thread counts.
fn bench_strategies(c: &mut Criterion) {
    let pattern = Pattern::month_year();
    let input = bench_input();

    for strategy in Strategy::ALL {
        let mut group = c.benchmark_group(format!("dateformat_{}", strategy));
        group.measurement_time(Duration::from_secs(5));

        for &threads in THREAD_COUNTS {
            group.bench_with_input(
                BenchmarkId::new("threads", threads),
                &threads,
                |b, &threads| {
                    b.iter_custom(|iters| {
                        // Fresh shared state per sample, as a new benchmark-scoped state.
                        let shared = SharedFormatter::new(strategy, &pattern);
                        run_workers(&shared, &input, threads, iters)
                    });
                },
            );
        }

        group.finish();
    }
}

/// Benchmark the immutable handle fed a plain instant across thread counts.
///
/// The `dateformat_immutable` groups feed the calendar variant; this one
/// converts from the timestamp on every call.
fn bench_immutable_instant(c: &mut Criterion) {
    let mut group = c.benchmark_group("dateformat_immutable_instant");
    group.measurement_time(Duration::from_secs(5));
    let input = bench_input();

    for &threads in THREAD_COUNTS {
        group.bench_with_input(
            BenchmarkId::new("threads", threads),
            &threads,
            |b, &threads| {
                b.iter_custom(|iters| {
                    let shared = Arc::new(ImmutableFormatter::new(Pattern::month_year()));
                    run_threads(
                        threads,
                        iters,
                        || Arc::clone(&shared),
                        |formatter| formatter.format(input.instant()),
                    )
                });
            },
        );
    }

    group.finish();
}

/// Benchmark the immutable handle on a plain instant vs a calendar instant.
fn bench_immutable_inputs(c: &mut Criterion) {
    let mut group = c.benchmark_group("immutable_input");
    let formatter = ImmutableFormatter::new(Pattern::month_year());
    let input = bench_input();
    let calendar = input.instant().to_calendar();

    group.bench_function("instant", |b| {
        b.iter(|| black_box(formatter.format(black_box(input.instant()))));
    });

    group.bench_function("calendar", |b| {
        b.iter(|| black_box(formatter.format_calendar(black_box(&calendar))));
    });

    group.finish();
}

/// Benchmark handle construction, the per-worker cost of confined strategies.
fn bench_handle_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("handle_construction");

    group.bench_function("compile_pattern", |b| {
        b.iter(|| Pattern::new(black_box("%B, %Y")).expect("valid pattern"));
    });

    let pattern = Pattern::month_year();
    group.bench_function("calendar_formatter", |b| {
        b.iter(|| CalendarFormatter::new(black_box(pattern.clone())));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_strategies,
    bench_immutable_instant,
    bench_immutable_inputs,
    bench_handle_construction,
);

criterion_main!(benches);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_benchmark_can_run() {
        let input = bench_input();
        for strategy in Strategy::ALL {
            let shared = SharedFormatter::new(strategy, &Pattern::month_year());
            let elapsed = run_workers(&shared, &input, 2, 10);
            assert!(elapsed > Duration::ZERO);
            assert_eq!(shared.worker().format_input(&input), "January, 2024");
        }

        let shared = Arc::new(ImmutableFormatter::new(Pattern::month_year()));
        let elapsed = run_threads(
            4,
            10,
            || Arc::clone(&shared),
            |formatter| formatter.format(input.instant()),
        );
        assert!(elapsed > Duration::ZERO);
    }
}
