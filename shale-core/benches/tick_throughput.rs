#![allow(missing_docs)]
//! Benchmarks for the tick scheduler, the random tier and cascade waves.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use std::sync::Arc;

use shale_core::behavior::BehaviorRegistry;
use shale_core::behavior::blocks::{SignalSource, SignalWire};
use shale_core::level::Level;
use shale_core::settings::EngineSettings;
use shale_core::ticks::{RandomTickSampler, TickScheduler};
use shale_registry::{BlockBuilder, Registry};
use shale_utils::{BlockId, BlockPos, Identifier, UpdateFlags};

const SEED: i64 = 12345;

/// Creates a level with an always-lit signal source and a wire kind.
fn signal_level() -> (Level, BlockId, BlockId) {
    let mut registry = Registry::new();
    let emitter = registry
        .register(
            BlockBuilder::new(Identifier::shale("emitter"))
                .property(&SignalSource::LIT)
                .default_value(&SignalSource::LIT, true)
                .signal_source(),
        )
        .unwrap();
    let wire = registry
        .register(
            BlockBuilder::new(Identifier::shale("wire"))
                .property(&SignalWire::POWER)
                .default_value(&SignalWire::POWER, 0)
                .conductive(),
        )
        .unwrap();

    let mut behaviors = BehaviorRegistry::new();
    behaviors.set(emitter, Arc::new(SignalSource::new(15)));
    behaviors.set(wire, Arc::new(SignalWire));

    let settings = EngineSettings {
        random_tick_speed: 0,
        ..EngineSettings::default()
    };
    let level = Level::new(Arc::new(registry), Arc::new(behaviors), settings);
    (level, emitter, wire)
}

/// Creates a level filled with a 16x16 layer of randomly ticking blocks.
fn random_tick_level() -> Level {
    let mut registry = Registry::new();
    let pebble = registry
        .register(BlockBuilder::new(Identifier::shale("pebble")).random_ticks())
        .unwrap();

    let level = Level::new(
        Arc::new(registry),
        Arc::new(BehaviorRegistry::new()),
        EngineSettings {
            seed: SEED,
            ..EngineSettings::default()
        },
    );
    for x in 0..16 {
        for z in 0..16 {
            level.set_block(
                BlockPos::new(x, 0, z),
                level.registry().default_state(pebble),
                UpdateFlags::empty(),
            );
        }
    }
    level
}

fn bench_schedule_and_drain(c: &mut Criterion) {
    let mut group = c.benchmark_group("schedule_and_drain");

    for size in [1_000i32, 10_000, 100_000] {
        group.bench_with_input(BenchmarkId::new("ticks", size), &size, |b, &size| {
            b.iter(|| {
                let mut scheduler: TickScheduler<BlockId> = TickScheduler::new();
                for i in 0..size {
                    let pos = BlockPos::new(i * 7 % 1024, 0, i * 13 % 1024);
                    scheduler.schedule(BlockId(1), pos, 0, (i % 4) as u32);
                }
                // Everything scheduled above is due by tick 4.
                let fired = scheduler.drain(black_box(4), usize::MAX, |_| true);
                black_box(fired);
            });
        });
    }

    group.finish();
}

fn bench_wire_cascade(c: &mut Criterion) {
    let mut group = c.benchmark_group("wire_cascade");

    for length in [8i32, 16, 32] {
        group.bench_with_input(BenchmarkId::new("chain", length), &length, |b, &length| {
            b.iter(|| {
                let (level, emitter, wire) = signal_level();
                level.set_block(
                    BlockPos::new(0, 0, 0),
                    level.registry().default_state(emitter),
                    UpdateFlags::UPDATE_ALL,
                );
                for x in 1..=length {
                    level.set_block(
                        BlockPos::new(x, 0, 0),
                        level.registry().default_state(wire),
                        UpdateFlags::UPDATE_ALL,
                    );
                }
                black_box(level);
            });
        });
    }

    group.finish();
}

fn bench_random_sampling(c: &mut Criterion) {
    let sampler = RandomTickSampler::new(SEED);

    c.bench_function("random_tick_sampling_4096", |b| {
        b.iter(|| {
            let mut winners = 0u32;
            for x in 0..16 {
                for y in 0..16 {
                    for z in 0..16 {
                        let pos = BlockPos::new(x, y, z);
                        if sampler.should_tick(black_box(pos), black_box(7), 3) {
                            winners += 1;
                        }
                    }
                }
            }
            black_box(winners);
        });
    });
}

fn bench_level_tick(c: &mut Criterion) {
    let level = random_tick_level();

    c.bench_function("level_tick_256_blocks", |b| {
        b.iter(|| {
            level.tick();
        });
    });
}

criterion_group!(
    benches,
    bench_schedule_and_drain,
    bench_wire_cascade,
    bench_random_sampling,
    bench_level_tick,
);
criterion_main!(benches);
