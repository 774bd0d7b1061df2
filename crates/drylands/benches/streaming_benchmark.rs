//! Benchmark for streaming and the per-tick passes.
//!
//! TARGET: a border-crossing tick (7 new chunks, 7 evictions) under 1ms
//!
//! Run with: cargo bench --package drylands --bench streaming_benchmark

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use drylands::shared::constants::CHUNK_SIZE;
use drylands::shared::{ChunkCoord, Vec3};
use drylands::world::{ChunkRegistry, EntityRegistries, StreamingController};
use drylands::{Engine, EngineConfig, EventBus, FrameInput};

fn benchmark_initial_window(c: &mut Criterion) {
    let mut group = c.benchmark_group("initial_window");
    group.throughput(Throughput::Elements(49));

    for (name, threshold) in [("sequential", usize::MAX), ("parallel", 1)] {
        group.bench_function(name, |b| {
            b.iter_batched(
                || {
                    let config = EngineConfig {
                        parallel_threshold: threshold,
                        ..EngineConfig::default()
                    };
                    (
                        StreamingController::new(&config),
                        ChunkRegistry::new(),
                        EntityRegistries::new(),
                        EventBus::new(1 << 12),
                    )
                },
                |(mut streaming, mut chunks, mut entities, bus)| {
                    black_box(
                        streaming
                            .update(Vec3::ZERO, &mut chunks, &mut entities, &bus.sender())
                            .unwrap(),
                    )
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn benchmark_border_crossing(c: &mut Criterion) {
    c.bench_function("border_crossing_walk", |b| {
        let config = EngineConfig::default();
        let mut streaming = StreamingController::new(&config);
        let mut chunks = ChunkRegistry::new();
        let mut entities = EntityRegistries::new();
        let bus = EventBus::new(1 << 16);
        let receiver = bus.receiver();
        let sender = bus.sender();
        let mut step = 0i32;

        b.iter(|| {
            // Walk east one chunk at a time so every update crosses a border.
            step = step.wrapping_add(1);
            let x = (step % 10_000) as f32 * CHUNK_SIZE + 1.0;
            let report = streaming
                .update(Vec3::ground(x, 0.0), &mut chunks, &mut entities, &sender)
                .unwrap();
            receiver.drain();
            black_box(report)
        });
    });
}

fn benchmark_idle_tick(c: &mut Criterion) {
    c.bench_function("idle_tick_loaded_window", |b| {
        let mut engine = Engine::with_default();
        let events = engine.events();
        engine.tick(FrameInput::default()).unwrap();
        engine.entities_mut().hostiles.clear();
        events.drain();

        b.iter(|| {
            // Keep the run from starving into a terminal state.
            engine.player_mut().set_hunger(100.0);
            let report = engine.tick(FrameInput::default()).unwrap();
            events.drain();
            black_box(report)
        });
    });
}

fn benchmark_chunk_churn(c: &mut Criterion) {
    c.bench_function("load_unload_single_chunk", |b| {
        let mut chunks = ChunkRegistry::new();
        let mut entities = EntityRegistries::new();
        let bus = EventBus::new(16);
        let receiver = bus.receiver();
        let sender = bus.sender();
        let coord = ChunkCoord::new(7, -3);

        b.iter(|| {
            chunks.ensure_loaded(coord, &mut entities, &sender).unwrap();
            let removed = chunks.unload(coord, &mut entities, &sender);
            receiver.drain();
            black_box(removed)
        });
    });
}

criterion_group!(
    benches,
    benchmark_initial_window,
    benchmark_border_crossing,
    benchmark_idle_tick,
    benchmark_chunk_churn,
);
criterion_main!(benches);
