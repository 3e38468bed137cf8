//! Event aggregator microbenchmarks using Criterion.
//!
//! These benchmarks measure individual registry operations in isolation:
//! - Publish fan-out to N handlers
//! - Publish with no subscribers
//! - Subscribe (including the duplicate check) and unsubscribe
//! - Shared (thread-safe) publish
//! - Seeded churn of mixed operations

use aggregator_bench::{
    churn::Churn,
    events::{Message, Source, Tick, Unobserved},
};
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use event_aggregator::{EventAggregator, Handler, SharedAggregator, SharedHandler};

// =============================================================================
// Publish Benchmarks
// =============================================================================

fn bench_publish(c: &mut Criterion) {
    let mut group = c.benchmark_group("publish");

    for count in [1, 10, 100] {
        group.throughput(Throughput::Elements(count as u64));

        group.bench_with_input(BenchmarkId::new("copy_event", count), &count, |b, &n| {
            let aggregator = EventAggregator::new();
            let handlers: Vec<_> = (0..n)
                .map(|_| {
                    Handler::new(|source: &Source, event: &Tick| {
                        black_box((source.id, event.frame));
                    })
                })
                .collect();
            for handler in &handlers {
                aggregator.subscribe(handler);
            }

            let source = Source { id: 1 };
            b.iter(|| aggregator.publish(&source, black_box(&Tick { frame: 7 })));
        });

        group.bench_with_input(BenchmarkId::new("owned_event", count), &count, |b, &n| {
            let aggregator = EventAggregator::new();
            let handlers: Vec<_> = (0..n)
                .map(|_| {
                    Handler::new(|_: &Source, event: &Message| {
                        black_box(event.text.len());
                    })
                })
                .collect();
            for handler in &handlers {
                aggregator.subscribe(handler);
            }

            let source = Source { id: 1 };
            let message = Message {
                text: "TestMessage".to_string(),
                time: 42,
            };
            b.iter(|| aggregator.publish(&source, black_box(&message)));
        });
    }

    group.bench_function("no_subscribers", |b| {
        let aggregator: EventAggregator<Source> = EventAggregator::new();
        let handler = Handler::new(|_: &Source, _: &Tick| {});
        aggregator.subscribe(&handler);

        let source = Source { id: 1 };
        b.iter(|| aggregator.publish(&source, black_box(&Unobserved)));
    });

    group.finish();
}

// =============================================================================
// Subscription Benchmarks
// =============================================================================

fn bench_subscribe(c: &mut Criterion) {
    let mut group = c.benchmark_group("subscribe");

    for count in [10, 100] {
        group.throughput(Throughput::Elements(count as u64));

        let handlers: Vec<_> = (0..count)
            .map(|_| Handler::new(|_: &Source, _: &Tick| {}))
            .collect();

        group.bench_with_input(BenchmarkId::new("fresh", count), &handlers, |b, handlers| {
            b.iter(|| {
                let aggregator = EventAggregator::new();
                for handler in handlers {
                    black_box(aggregator.subscribe(handler));
                }
            });
        });

        // Every call after the first hits the duplicate check.
        group.bench_with_input(BenchmarkId::new("duplicate", count), &handlers, |b, handlers| {
            let aggregator = EventAggregator::new();
            for handler in handlers {
                aggregator.subscribe(handler);
            }
            b.iter(|| {
                for handler in handlers {
                    black_box(aggregator.subscribe(handler));
                }
            });
        });

        group.bench_with_input(
            BenchmarkId::new("subscribe_unsubscribe", count),
            &handlers,
            |b, handlers| {
                let aggregator = EventAggregator::new();
                b.iter(|| {
                    for handler in handlers {
                        aggregator.subscribe(handler);
                    }
                    for handler in handlers.iter().rev() {
                        black_box(aggregator.unsubscribe(handler));
                    }
                });
            },
        );
    }

    group.finish();
}

// =============================================================================
// Shared Aggregator Benchmarks
// =============================================================================

fn bench_shared(c: &mut Criterion) {
    let mut group = c.benchmark_group("shared_publish");

    for count in [1, 10, 100] {
        group.throughput(Throughput::Elements(count as u64));

        group.bench_with_input(BenchmarkId::new("copy_event", count), &count, |b, &n| {
            let aggregator = SharedAggregator::new();
            let handlers: Vec<_> = (0..n)
                .map(|_| {
                    SharedHandler::new(|source: &Source, event: &Tick| {
                        black_box((source.id, event.frame));
                    })
                })
                .collect();
            for handler in &handlers {
                aggregator.subscribe(handler);
            }

            let source = Source { id: 1 };
            b.iter(|| aggregator.publish(&source, black_box(&Tick { frame: 7 })));
        });
    }

    group.finish();
}

// =============================================================================
// Churn Benchmarks
// =============================================================================

fn bench_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("churn");
    let steps = 1_000;
    group.throughput(Throughput::Elements(steps as u64));

    for pool in [8, 64] {
        group.bench_with_input(BenchmarkId::new("mixed", pool), &pool, |b, &pool| {
            b.iter(|| {
                let mut churn = Churn::new(pool, 42);
                churn.run(steps);
                black_box(churn.delivered())
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_publish,
    bench_subscribe,
    bench_shared,
    bench_churn
);
criterion_main!(benches);
