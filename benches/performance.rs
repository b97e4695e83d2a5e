//! Performance benchmarks for the automaton engine.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use recur::{snapshot, Automaton, EngineConfig};

/// Deterministic pseudo-random lowercase text.
fn text(len: usize, alphabet: u8) -> String {
    let mut seed = 0x2545_F491_4F6C_DD1Du64;
    (0..len)
        .map(|_| {
            seed ^= seed << 13;
            seed ^= seed >> 7;
            seed ^= seed << 17;
            (b'a' + (seed % alphabet as u64) as u8) as char
        })
        .collect()
}

/// Benchmark building an automaton over strings of increasing length
fn bench_append(c: &mut Criterion) {
    let mut group = c.benchmark_group("append");

    for len in [1_000, 10_000, 100_000] {
        let input = text(len, 4);
        group.bench_with_input(BenchmarkId::new("random_4", len), &input, |b, input| {
            b.iter(|| {
                let mut automaton = Automaton::with_config(EngineConfig {
                    capacity_hint: input.len(),
                    ..EngineConfig::default()
                });
                black_box(automaton.extend(input).unwrap());
            });
        });
    }

    group.finish();
}

/// Benchmark append/undo pairs on top of an existing string
fn bench_append_undo(c: &mut Criterion) {
    let mut group = c.benchmark_group("append_undo");

    for len in [1_000, 100_000] {
        let mut automaton = Automaton::new();
        automaton.extend(&text(len, 2)).unwrap();

        group.bench_function(BenchmarkId::new("binary", len), |b| {
            b.iter(|| {
                black_box(automaton.append('a').unwrap());
                black_box(automaton.undo().unwrap());
            });
        });
    }

    group.finish();
}

/// Benchmark snapshot encoding and decoding
fn bench_snapshot(c: &mut Criterion) {
    let mut group = c.benchmark_group("snapshot");

    let mut automaton = Automaton::new();
    automaton.extend(&text(10_000, 4)).unwrap();
    let frame = snapshot::encode(&automaton).unwrap();

    group.bench_function("encode_10k", |b| {
        b.iter(|| black_box(snapshot::encode(&automaton).unwrap()));
    });
    group.bench_function("decode_10k", |b| {
        b.iter(|| black_box(snapshot::decode(&frame).unwrap()));
    });

    group.finish();
}

criterion_group!(benches, bench_append, bench_append_undo, bench_snapshot);
criterion_main!(benches);
