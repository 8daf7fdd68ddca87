#![forbid(unsafe_code)]

//! Live, unrecorded edits during a gesture.
//!
//! While the user drags a crop handle the target is updated every frame,
//! but history should only see the gesture as a whole. A [`TransientEdit`]
//! remembers where the gesture started; `cancel` rolls back to it and
//! `commit` turns start → current into one command.

use retouch_core::GeometricTransformState;
use web_time::Instant;

use super::command::{Command, TransformCommand, TransformTarget};

/// An in-progress edit that has not been recorded.
#[derive(Debug, Clone, PartialEq)]
pub struct TransientEdit {
    start: GeometricTransformState,
}

impl TransientEdit {
    /// Capture the target's current state as the gesture start.
    #[must_use]
    pub fn begin<T: TransformTarget + ?Sized>(target: &T) -> Self {
        Self {
            start: target.transform_state().clone(),
        }
    }

    /// Apply `state` live without recording it.
    pub fn update<T: TransformTarget + ?Sized>(&self, target: &mut T, state: GeometricTransformState) {
        target.set_transform_state(state);
    }

    /// Whether the target has moved away from the start state.
    #[must_use]
    pub fn is_dirty<T: TransformTarget + ?Sized>(&self, target: &T) -> bool {
        target.transform_state() != &self.start
    }

    /// Restore the start state.
    pub fn cancel<T: TransformTarget + ?Sized>(self, target: &mut T) {
        target.set_transform_state(self.start);
    }

    /// Command spanning start → current, or `None` if nothing changed.
    #[must_use]
    pub fn commit<T: TransformTarget + ?Sized>(self, target: &T) -> Option<Command> {
        self.commit_at(target, Instant::now())
    }

    /// [`commit`](Self::commit) with an explicit timestamp.
    #[must_use]
    pub fn commit_at<T: TransformTarget + ?Sized>(self, target: &T, now: Instant) -> Option<Command> {
        let current = target.transform_state();
        if current == &self.start {
            return None;
        }
        Some(TransformCommand::new_at(self.start, current.clone(), now).into())
    }
}
