#![forbid(unsafe_code)]

//! Retouch Runtime
//!
//! Bounded edit history for the crop/rotate/flip tool.
//!
//! # Key Components
//!
//! - [`HistoryStore`] - Undo/redo stacks with coalescing and eviction
//! - [`Command`] - Reversible transform or batch of transforms
//! - [`TransientEdit`] - Live gesture edits committed as one command
//! - [`HistoryConfig`] - Limits, loadable from TOML/JSON with `history-config`
//!
//! # Role in Retouch
//! `retouch-runtime` owns time and mutation. It takes the immutable values
//! from `retouch-core`, wraps before/after pairs into commands, and keeps a
//! bounded timeline of them that the editor can walk back and forth.
//!
//! # Logging
//! Events are emitted through `tracing` under the `retouch.undo` target:
//! `debug` for individual operations, `info` for pruning and cleanup,
//! `warn` for memory pressure.

pub mod history_config;
pub mod undo;

pub use history_config::{CleanupConfig, HistoryConfig, HistoryConfigError, PruneConfig};
pub use undo::{
    Clock, Command, CommandId, CommandKind, CompositeCommand, HistorySnapshot, HistoryStatistics,
    HistoryStatus, HistoryStore, ManualClock, MergeConfig, SystemClock, TransformCommand,
    TransformTarget, TransientEdit,
};

pub use retouch_core::{AspectRatio, GeometricTransformState, Rect, Size};
