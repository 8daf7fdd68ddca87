#![forbid(unsafe_code)]

//! Read-only views of history state.
//!
//! [`HistoryStatus`] is the small, comparable summary a UI binds to (undo
//! button enabled, tooltip text). [`HistorySnapshot`] is a full copy of both
//! stacks for inspection and debugging; it never aliases the live store.

use super::command::Command;

/// What a toolbar needs to render undo/redo controls.
///
/// Published to the status handler only when it differs from the
/// previously published value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HistoryStatus {
    pub can_undo: bool,
    pub can_redo: bool,
    /// Description of the command the next undo would revert.
    pub undo_description: Option<String>,
    /// Description of the command the next redo would reapply.
    pub redo_description: Option<String>,
    /// Number of undoable steps (the position in the timeline).
    pub current_position: usize,
    /// Undo depth plus redo depth.
    pub total_commands: usize,
}

/// Point-in-time copy of the history stacks.
#[derive(Debug, Clone)]
pub struct HistorySnapshot {
    undo_stack: Vec<Command>,
    redo_stack: Vec<Command>,
    memory_usage: usize,
}

impl HistorySnapshot {
    pub(crate) fn new(undo_stack: Vec<Command>, redo_stack: Vec<Command>, memory_usage: usize) -> Self {
        Self {
            undo_stack,
            redo_stack,
            memory_usage,
        }
    }

    /// Undo entries, oldest first.
    #[must_use]
    pub fn undo_stack(&self) -> &[Command] {
        &self.undo_stack
    }

    /// Redo entries, oldest first; the last one is the next redo.
    #[must_use]
    pub fn redo_stack(&self) -> &[Command] {
        &self.redo_stack
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    #[must_use]
    pub fn total_commands(&self) -> usize {
        self.undo_stack.len() + self.redo_stack.len()
    }

    #[must_use]
    pub fn current_position(&self) -> usize {
        self.undo_stack.len()
    }

    /// Accounted bytes across both stacks when the snapshot was taken.
    #[must_use]
    pub fn memory_usage(&self) -> usize {
        self.memory_usage
    }
}
