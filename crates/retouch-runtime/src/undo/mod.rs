#![forbid(unsafe_code)]

//! Undo/redo history for crop, rotate and flip edits.
//!
//! Implements the Command Pattern over [`GeometricTransformState`] with:
//!
//! - **Reversibility**: every command restores its previous state on undo
//! - **Coalescing**: a slider drag records one step, not one per frame
//! - **Bounded memory**: count, byte and churn limits evict the oldest entries
//! - **Batching**: several commands undo as one
//! - **Idle cleanup**: stale entries drop away when the user stops editing
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        HistoryStore                              │
//! │  ┌──────────────────┐          ┌──────────────────┐             │
//! │  │   Undo Stack     │          │   Redo Stack     │             │
//! │  │  ┌────────────┐  │          │  ┌────────────┐  │             │
//! │  │  │ CommandN   │  │  undo()  │  │ Command1   │  │             │
//! │  │  ├────────────┤  │ ──────►  │  ├────────────┤  │             │
//! │  │  │ Command2   │  │          │  │ Command2   │  │             │
//! │  │  ├────────────┤  │  ◄────── │  ├────────────┤  │             │
//! │  │  │ Command1   │  │  redo()  │  │ CommandN   │  │             │
//! │  │  └────────────┘  │          │  └────────────┘  │             │
//! │  └──────────────────┘          └──────────────────┘             │
//! │        ▲ evict oldest                   ▲ trim oldest            │
//! └────────┼────────────────────────────────┼───────────────────────┘
//!          └──── prune() / perform_memory_cleanup() ◄── CleanupTimer tick
//! ```
//!
//! # Quick Start
//!
//! ```ignore
//! use retouch_runtime::undo::{HistoryStore, TransformCommand};
//! use retouch_runtime::HistoryConfig;
//!
//! let mut history = HistoryStore::new(HistoryConfig::default());
//! let mut state = GeometricTransformState::default();
//!
//! let rotated = state.rotated_by(std::f64::consts::FRAC_PI_2);
//! let cmd = TransformCommand::new(state.clone(), rotated);
//! cmd.apply(&mut state);
//! history.add_command(cmd);
//!
//! history.undo(&mut state); // back to identity
//! ```
//!
//! # Module Structure
//!
//! - [`command`]: `Command`, `TransformCommand`, `CompositeCommand`, kinds
//! - [`history`]: `HistoryStore` and its pruning policy
//! - [`transient`]: live edits that are not yet recorded
//! - [`snapshot`], [`stats`]: read-only projections for observers
//! - [`clock`], [`cleanup`]: time source and background cleanup ticks
//!
//! # Design Notes
//!
//! ## Threading
//!
//! The store is single-writer. The cleanup timer runs on its own thread but
//! only posts ticks; the owner drains them with `run_pending_cleanup()`, so
//! no history mutation ever runs off the owner's thread. When applying a
//! command drives slow rendering, that work belongs to the
//! [`TransformTarget`]; the stack bookkeeping around it is one `&mut self`
//! call.
//!
//! ## Memory Budget
//!
//! Each command reports `size_bytes()`: two encoded states, a fixed
//! overhead and its description. Above 80% of the byte budget the
//! memory-pressure handler fires; above the budget the oldest entries go.
//!
//! [`GeometricTransformState`]: retouch_core::GeometricTransformState

pub mod cleanup;
pub mod clock;
pub mod command;
pub mod history;
pub mod snapshot;
pub mod stats;
pub mod transient;

// Re-export commonly used types
pub use cleanup::CleanupTimer;
pub use clock::{Clock, ManualClock, SystemClock};
pub use command::{
    COMMAND_OVERHEAD, Command, CommandId, CommandKind, CompositeCommand, MergeConfig,
    TransformCommand, TransformTarget,
};
pub use history::HistoryStore;
pub use snapshot::{HistorySnapshot, HistoryStatus};
pub use stats::HistoryStatistics;
pub use transient::TransientEdit;
