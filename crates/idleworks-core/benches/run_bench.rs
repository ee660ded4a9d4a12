//! Criterion benchmarks for the Idleworks simulation engine.
//!
//! Two benchmark groups:
//! - `single_tick`: one tick of a full twelve-factory engine
//! - `full_run`: a complete 1000-minute run with builds and upgrades queued

use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use idleworks_core::engine::{Engine, MAX_FACTORIES};
use idleworks_core::factory::UpgradeKind;
use idleworks_core::test_utils::*;

// ===========================================================================
// Engine builders
// ===========================================================================

/// Twelve factories, each with a production and a capacity upgrade queued.
fn build_upgraded_engine() -> Engine {
    let mut engine = build_mixed_engine(MAX_FACTORIES);
    let ids: Vec<_> = engine.factories().map(|(id, _)| id).collect();
    for id in ids {
        engine.upgrade_factory(id, UpgradeKind::Production);
        engine.upgrade_factory(id, UpgradeKind::Capacity);
    }
    engine
}

// ===========================================================================
// Benchmarks
// ===========================================================================

fn bench_single_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_tick");
    group.sample_size(100);

    let mut engine = build_upgraded_engine();
    group.bench_function("12_factories", |b| {
        b.iter(|| {
            engine.tick();
        });
    });
    group.finish();
}

fn bench_full_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_run");
    group.sample_size(30);

    group.bench_function("1000_minutes_12_factories", |b| {
        b.iter_batched(
            build_upgraded_engine,
            |mut engine| engine.run(1000),
            BatchSize::SmallInput,
        );
    });

    group.bench_function("1000_minutes_stock_opening", |b| {
        b.iter_batched(
            || build_mixed_engine(2),
            |mut engine| engine.run(1000),
            BatchSize::SmallInput,
        );
    });
    group.finish();
}

criterion_group!(benches, bench_single_tick, bench_full_run);
criterion_main!(benches);
