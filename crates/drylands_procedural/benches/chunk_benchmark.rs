//! Benchmark for chunk content generation.
//!
//! TARGET: a full render window (7x7 chunks) well under one frame
//!
//! Run with: cargo bench --package drylands_procedural --bench chunk_benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use drylands_procedural::{seeded_random, ChunkGenerator};
use drylands_shared::ChunkCoord;

fn benchmark_single_chunk(c: &mut Criterion) {
    let gen = ChunkGenerator::new();

    c.bench_function("single_chunk_generation", |b| {
        let mut coord = 0i32;
        b.iter(|| {
            coord = coord.wrapping_add(1);
            black_box(gen.generate(ChunkCoord::new(coord, coord / 2)))
        });
    });
}

fn benchmark_render_window(c: &mut Criterion) {
    let gen = ChunkGenerator::new();

    let mut group = c.benchmark_group("render_window");
    group.throughput(Throughput::Elements(49));
    group.bench_function("7x7_chunks", |b| {
        b.iter(|| {
            for coord in ChunkCoord::new(0, 0).neighbourhood(3) {
                black_box(gen.generate(coord));
            }
        });
    });

    group.finish();
}

fn benchmark_large_area(c: &mut Criterion) {
    let gen = ChunkGenerator::new();

    let mut group = c.benchmark_group("world_generation");
    group.sample_size(10);
    group.throughput(Throughput::Elements(100 * 100));

    group.bench_function("100x100_chunks", |b| {
        b.iter(|| {
            for z in 0..100i32 {
                for x in 0..100i32 {
                    black_box(gen.generate(ChunkCoord::new(x, z)));
                }
            }
        });
    });

    group.finish();
}

fn benchmark_seeded_draw(c: &mut Criterion) {
    c.bench_function("seeded_random_draw", |b| {
        let mut s = 0.0f64;
        b.iter(|| {
            s += 1.0;
            black_box(seeded_random(black_box(s)))
        });
    });
}

criterion_group!(
    benches,
    benchmark_single_chunk,
    benchmark_render_window,
    benchmark_large_area,
    benchmark_seeded_draw,
);
criterion_main!(benches);
