#![no_main]

use std::sync::Arc;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use retouch_core::{GeometricTransformState, Rect};
use retouch_runtime::{Clock, Command, HistoryConfig, HistoryStore, ManualClock, TransformCommand};

#[derive(Debug, Arbitrary)]
enum Op {
    Crop(u8, u8, u8, u8),
    Rotate(i16),
    FlipH,
    FlipV,
    Reset,
    Undo,
    Redo,
    Wait(u32),
    Cleanup,
    Enforce,
}

#[derive(Debug, Arbitrary)]
struct Input {
    max_entries: u8,
    max_bytes: u16,
    ops: Vec<Op>,
}

fuzz_target!(|input: Input| {
    let max_entries = usize::from(input.max_entries).max(1);
    let max_bytes = usize::from(input.max_bytes).max(1);
    let clock = Arc::new(ManualClock::new());
    let config = HistoryConfig::new(max_entries, max_bytes).without_background_cleanup();
    let mut history = HistoryStore::with_clock(config, clock.clone());
    let mut state = GeometricTransformState::IDENTITY;

    for op in input.ops.iter().take(512) {
        let next = match *op {
            Op::Crop(x, y, w, h) => Some(state.with_crop_rect(Rect::new(
                f64::from(x) / 255.0,
                f64::from(y) / 255.0,
                f64::from(w) / 255.0,
                f64::from(h) / 255.0,
            ))),
            Op::Rotate(deg) => Some(state.rotated_by(f64::from(deg).to_radians())),
            Op::FlipH => Some(state.with_toggled_horizontal_flip()),
            Op::FlipV => Some(state.with_toggled_vertical_flip()),
            Op::Reset => Some(GeometricTransformState::IDENTITY),
            Op::Undo => {
                history.undo(&mut state);
                None
            }
            Op::Redo => {
                history.redo(&mut state);
                None
            }
            Op::Wait(ms) => {
                clock.advance_ms(u64::from(ms));
                None
            }
            Op::Cleanup => {
                history.perform_memory_cleanup();
                None
            }
            Op::Enforce => {
                history.enforce_limits();
                None
            }
        };

        if let Some(next) = next {
            let command = TransformCommand::new_at(state.clone(), next, clock.now());
            command.apply(&mut state);
            history.add_command(command);
            assert!(history.undo_depth() <= max_entries, "count cap exceeded");
            assert!(history.memory_usage() <= max_bytes, "byte cap exceeded");
        }

        let snapshot = history.history_snapshot();
        let recount: usize = snapshot
            .undo_stack()
            .iter()
            .chain(snapshot.redo_stack())
            .map(Command::size_bytes)
            .sum();
        assert_eq!(history.memory_usage(), recount, "byte accounting drifted");
    }
});
