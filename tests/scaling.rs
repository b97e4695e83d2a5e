//! Scaling tests: long sessions stay linear in states and field entries.
//!
//! Run with `cargo test --release --test scaling -- --nocapture` to see timings.

use recur::{Alphabet, Automaton, EngineConfig};
use std::time::Instant;

const APPEND_COUNT: usize = 100_000;

struct Timer {
    name: &'static str,
    start: Instant,
}

impl Timer {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            start: Instant::now(),
        }
    }

    fn report_with_count(&self, count: usize) {
        let ms = self.start.elapsed().as_secs_f64() * 1000.0;
        println!(
            "  {}: {:.2}ms ({:.0} ops/sec)",
            self.name,
            ms,
            if ms > 0.0 { count as f64 / (ms / 1000.0) } else { 0.0 }
        );
    }
}

/// Deterministic pseudo-random symbols (xorshift).
fn symbols(count: usize, alphabet: u8, mut seed: u64) -> Vec<char> {
    (0..count)
        .map(|_| {
            seed ^= seed << 13;
            seed ^= seed >> 7;
            seed ^= seed << 17;
            (b'a' + (seed % alphabet as u64) as u8) as char
        })
        .collect()
}

#[test]
fn test_scaling_random_appends() {
    println!("\n=== {} random appends ===", APPEND_COUNT);

    let text = symbols(APPEND_COUNT, 4, 0x9E37_79B9_7F4A_7C15);
    let mut automaton = Automaton::with_config(EngineConfig {
        alphabet: Alphabet::Lowercase,
        capacity_hint: APPEND_COUNT,
    });

    let timer = Timer::new("Append");
    for c in &text {
        automaton.append(*c).unwrap();
    }
    timer.report_with_count(APPEND_COUNT);

    let stats = automaton.stats().unwrap();
    println!("  {:?}", stats);
    assert!(stats.states_allocated <= 2 * APPEND_COUNT as u64);
    assert_eq!(stats.stale_states, 0);

    let timer = Timer::new("Undo all");
    for _ in 0..APPEND_COUNT {
        automaton.undo().unwrap();
    }
    timer.report_with_count(APPEND_COUNT);
    assert_eq!(automaton.total(), 0);
    assert!(automaton.is_empty());
}

#[test]
fn test_scaling_unary_string() {
    let mut automaton = Automaton::new();
    for i in 0..APPEND_COUNT {
        assert_eq!(automaton.append('a').unwrap(), i as u64);
    }
    // a^n never splits: one state per append.
    let stats = automaton.stats().unwrap();
    assert_eq!(stats.states_allocated, APPEND_COUNT as u64 + 1);
}

#[test]
fn test_scaling_undo_churn() {
    println!("\n=== Undo churn ===");

    let text = symbols(APPEND_COUNT, 3, 42);
    let mut automaton = Automaton::new();

    // Every third step undoes the previous append, then redoes it.
    let timer = Timer::new("Churn");
    let mut ops = 0;
    for (i, c) in text.iter().enumerate() {
        let total = automaton.append(*c).unwrap();
        ops += 1;
        if i % 3 == 2 {
            automaton.undo().unwrap();
            assert_eq!(automaton.append(*c).unwrap(), total);
            ops += 2;
        }
    }
    timer.report_with_count(ops);

    let mut direct = Automaton::new();
    for c in &text {
        direct.append(*c).unwrap();
    }
    assert_eq!(automaton.total(), direct.total());

    // Each append allocates at most two states, undone ones included.
    let stats = automaton.stats().unwrap();
    assert!(stats.states_allocated <= 2 * ops as u64 + 1);
}
