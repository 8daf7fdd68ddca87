//! Benchmarks for history store throughput.
//!
//! Run with: cargo bench -p retouch-runtime --bench history_bench
//!
//! Covers the hot paths of an edit session:
//! - recording discrete commands under the default count cap (pruning included)
//! - a continuous rotate gesture that coalesces into a single entry
//! - walking the full undo stack and back

use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use std::sync::Arc;

use retouch_runtime::{
    Clock, GeometricTransformState, HistoryConfig, HistoryStore, ManualClock, Rect,
    TransformCommand,
};

const EDITS: usize = 500;

fn quiet_store(config: HistoryConfig) -> (HistoryStore, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new());
    let store = HistoryStore::with_clock(config.without_background_cleanup(), clock.clone());
    (store, clock)
}

fn record_flips(store: &mut HistoryStore, clock: &ManualClock, step_ms: u64) {
    let mut state = GeometricTransformState::IDENTITY;
    for _ in 0..EDITS {
        clock.advance_ms(step_ms);
        let next = state.with_toggled_horizontal_flip();
        let command = TransformCommand::new_at(state.clone(), next, clock.now());
        command.apply(&mut state);
        store.add_command(command);
    }
}

fn bench_add_command(c: &mut Criterion) {
    let mut group = c.benchmark_group("history/add_command");

    // Rapid edits hit the churn trigger repeatedly
    group.bench_function("rapid_flips", |b| {
        b.iter_batched(
            || quiet_store(HistoryConfig::default()),
            |(mut store, clock)| {
                record_flips(&mut store, &clock, 50);
                black_box(store.undo_depth())
            },
            BatchSize::SmallInput,
        )
    });

    // Spaced edits only hit the hard cap
    group.bench_function("spaced_flips", |b| {
        b.iter_batched(
            || quiet_store(HistoryConfig::default()),
            |(mut store, clock)| {
                record_flips(&mut store, &clock, 2_000);
                black_box(store.undo_depth())
            },
            BatchSize::SmallInput,
        )
    });

    group.bench_function("rotate_gesture_coalesced", |b| {
        b.iter_batched(
            || quiet_store(HistoryConfig::default()),
            |(mut store, clock)| {
                let mut state = GeometricTransformState::IDENTITY;
                for i in 0..EDITS {
                    clock.advance_ms(16);
                    let next = state.with_rotation(i as f64 * 0.001);
                    let command = TransformCommand::new_at(state.clone(), next, clock.now());
                    command.apply(&mut state);
                    store.add_command(command);
                }
                black_box(store.undo_depth())
            },
            BatchSize::SmallInput,
        )
    });

    group.finish();
}

fn bench_undo_redo(c: &mut Criterion) {
    let mut group = c.benchmark_group("history/undo_redo");

    group.bench_function("walk_full_stack", |b| {
        b.iter_batched(
            || {
                let (mut store, clock) = quiet_store(HistoryConfig::unlimited());
                let mut state = GeometricTransformState::IDENTITY;
                for i in 0..EDITS {
                    clock.advance_ms(2_000);
                    let inset = (i % 40) as f64 * 0.01;
                    let next = state.with_crop_rect(Rect::new(inset, inset, 0.5, 0.5));
                    let command = TransformCommand::new_at(state.clone(), next, clock.now());
                    command.apply(&mut state);
                    store.add_command(command);
                }
                (store, state)
            },
            |(mut store, mut state)| {
                while store.undo(&mut state).is_some() {}
                while store.redo(&mut state).is_some() {}
                black_box(state)
            },
            BatchSize::SmallInput,
        )
    });

    group.finish();
}

criterion_group!(benches, bench_add_command, bench_undo_redo);
criterion_main!(benches);
