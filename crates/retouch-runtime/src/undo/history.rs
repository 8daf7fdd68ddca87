#![forbid(unsafe_code)]

//! Bounded undo/redo history for transform edits.
//!
//! [`HistoryStore`] keeps dual stacks of [`Command`]s with:
//!
//! - **Count and byte caps**: exceeding either prunes the oldest entries
//! - **Churn pruning**: bursts of edits prune early, before the caps hit
//! - **Branching**: a new command clears the redo stack
//! - **Coalescing**: continuous gestures collapse into one entry
//! - **Idle cleanup**: stale entries are dropped after a quiet period
//!
//! # Invariants
//!
//! 1. `total_bytes` equals the sum of `size_bytes()` over both stacks
//! 2. `undo_stack.len() <= max_entries` after `add_command`
//! 3. `total_bytes <= max_bytes` after `add_command`
//! 4. Eviction only ever removes from the front (oldest) of the undo stack
//!
//! # Pruning
//!
//! A pass is triggered when the undo stack exceeds `max_entries`, when
//! bytes exceed `max_bytes`, or when the stack is above the watermark
//! (`max_entries / 4`) during high churn. The pass evicts from the front
//! until both count and bytes are at or below `retain_ratio` of their caps,
//! then trims the redo stack if it grew past `redo_trim_threshold`.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};
use web_time::Instant;

use super::cleanup::CleanupTimer;
use super::clock::{Clock, SystemClock};
use super::command::{Command, CompositeCommand, TransformTarget};
use super::snapshot::{HistorySnapshot, HistoryStatus};
use super::stats::HistoryStatistics;
use crate::history_config::HistoryConfig;

type MemoryPressureHandler = Box<dyn FnMut(usize) + Send>;
type StatusHandler = Box<dyn FnMut(&HistoryStatus) + Send>;

/// Undo/redo history for one edit session.
///
/// Single-writer: every mutation takes `&mut self`. Periodic cleanup is
/// requested by a background timer but only runs when the owner calls
/// [`run_pending_cleanup`](Self::run_pending_cleanup).
pub struct HistoryStore {
    /// Commands available for undo (newest at back).
    undo_stack: VecDeque<Command>,
    /// Commands available for redo (next redo at back).
    redo_stack: VecDeque<Command>,
    config: HistoryConfig,
    /// Accounted bytes across both stacks.
    total_bytes: usize,
    last_mutation: Instant,
    /// Timestamps of recent adds inside the churn window.
    recent_adds: VecDeque<Instant>,
    statistics: HistoryStatistics,
    status: HistoryStatus,
    clock: Arc<dyn Clock>,
    cleanup_timer: Option<CleanupTimer>,
    on_memory_pressure: Option<MemoryPressureHandler>,
    on_status_change: Option<StatusHandler>,
}

impl fmt::Debug for HistoryStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HistoryStore")
            .field("undo_depth", &self.undo_stack.len())
            .field("redo_depth", &self.redo_stack.len())
            .field("total_bytes", &self.total_bytes)
            .field("config", &self.config)
            .field("cleanup_timer", &self.cleanup_timer.is_some())
            .finish()
    }
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::new(HistoryConfig::default())
    }
}

impl HistoryStore {
    /// Create a store on the system clock.
    #[must_use]
    pub fn new(config: HistoryConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create a store on an explicit clock.
    #[must_use]
    pub fn with_clock(config: HistoryConfig, clock: Arc<dyn Clock>) -> Self {
        let now = clock.now();
        let cleanup_timer = if config.cleanup.enabled && config.cleanup.interval_ms > 0 {
            CleanupTimer::start(config.cleanup.interval())
        } else {
            None
        };

        Self {
            undo_stack: VecDeque::new(),
            redo_stack: VecDeque::new(),
            config,
            total_bytes: 0,
            last_mutation: now,
            recent_adds: VecDeque::new(),
            statistics: HistoryStatistics::new(now),
            status: HistoryStatus::default(),
            clock,
            cleanup_timer,
            on_memory_pressure: None,
            on_status_change: None,
        }
    }

    // ========================================================================
    // Core Operations
    // ========================================================================

    /// Record a command that has already been applied.
    ///
    /// Clears the redo stack, coalesces with the newest undo entry when
    /// eligible, and prunes if a trigger fires. Never fails.
    pub fn add_command(&mut self, command: impl Into<Command>) {
        let command = command.into();
        let now = self.clock.now();
        let kind = command.kind();

        // Clear redo stack (new branch)
        self.clear_redo();

        let coalesced = match self.try_coalesce(command) {
            Ok(()) => true,
            Err(command) => {
                self.total_bytes += command.size_bytes();
                self.undo_stack.push_back(command);
                false
            }
        };

        self.statistics.record_command(kind, coalesced);
        self.last_mutation = now;
        self.note_add(now);

        if let Some(top) = self.undo_stack.back() {
            debug!(
                target: "retouch.undo",
                id = %top.id(),
                kind = %kind,
                coalesced,
                undo_depth = self.undo_stack.len(),
                total_bytes = self.total_bytes,
                "command recorded"
            );
        }

        self.check_memory_pressure();

        if self.should_prune() {
            self.prune();
        }

        self.debug_check_bytes();
        self.publish_status();
    }

    /// Revert the newest command against `target`.
    ///
    /// Returns the command's description, or `None` if there is nothing to
    /// undo. Pop, apply and push happen under one exclusive borrow.
    pub fn undo<T: TransformTarget + ?Sized>(&mut self, target: &mut T) -> Option<String> {
        let command = self.undo_stack.pop_back()?;
        command.invert_and_apply(target);
        let description = command.description().to_string();
        self.redo_stack.push_back(command);

        self.statistics.record_undo();
        self.last_mutation = self.clock.now();
        debug!(
            target: "retouch.undo",
            description = %description,
            undo_depth = self.undo_stack.len(),
            redo_depth = self.redo_stack.len(),
            "undo"
        );

        self.publish_status();
        Some(description)
    }

    /// Reapply the most recently undone command against `target`.
    ///
    /// Returns the command's description, or `None` if there is nothing to
    /// redo.
    pub fn redo<T: TransformTarget + ?Sized>(&mut self, target: &mut T) -> Option<String> {
        let command = self.redo_stack.pop_back()?;
        command.apply(target);
        let description = command.description().to_string();
        self.undo_stack.push_back(command);

        self.statistics.record_redo();
        self.last_mutation = self.clock.now();
        debug!(
            target: "retouch.undo",
            description = %description,
            undo_depth = self.undo_stack.len(),
            redo_depth = self.redo_stack.len(),
            "redo"
        );

        self.publish_status();
        Some(description)
    }

    /// Drop both stacks and start fresh statistics.
    pub fn clear_history(&mut self) {
        let now = self.clock.now();
        let dropped = self.undo_stack.len() + self.redo_stack.len();

        self.undo_stack.clear();
        self.redo_stack.clear();
        self.total_bytes = 0;
        self.recent_adds.clear();
        self.statistics = HistoryStatistics::new(now);
        self.last_mutation = now;

        debug!(target: "retouch.undo", dropped, "history cleared");
        self.publish_status();
    }

    /// Wrap already-built commands into one batch without applying or
    /// recording it.
    #[must_use]
    pub fn create_batch_command(
        &self,
        commands: Vec<Command>,
        description: impl Into<String>,
    ) -> Command {
        CompositeCommand::new_at(commands, description, self.clock.now()).into()
    }

    // ========================================================================
    // Maintenance
    // ========================================================================

    /// Run a pruning pass now, whether or not a trigger has fired.
    ///
    /// Returns the number of undo entries evicted.
    pub fn enforce_limits(&mut self) -> usize {
        let evicted = self.prune();
        self.debug_check_bytes();
        self.publish_status();
        evicted
    }

    /// Drop stale entries if the history has been idle long enough.
    ///
    /// After `idle_after` without a mutation, undo entries older than
    /// `max_age` are evicted from the front while more than `min_retained`
    /// remain, and redo entries older than `max_age` are dropped. Tracked
    /// bytes are then recomputed from scratch. Returns the number of entries
    /// removed from both stacks.
    pub fn perform_memory_cleanup(&mut self) -> usize {
        let now = self.clock.now();
        let cleanup = self.config.cleanup;

        if now.saturating_duration_since(self.last_mutation) < cleanup.idle_after() {
            return 0;
        }

        let max_age = cleanup.max_age();
        let mut undo_removed = 0;
        while self.undo_stack.len() > cleanup.min_retained {
            match self.undo_stack.front() {
                Some(oldest) if oldest.age(now) > max_age => {
                    self.undo_stack.pop_front();
                    undo_removed += 1;
                }
                _ => break,
            }
        }

        let redo_before = self.redo_stack.len();
        self.redo_stack.retain(|command| command.age(now) <= max_age);
        let redo_removed = redo_before - self.redo_stack.len();

        self.total_bytes = self.recount_bytes();
        self.statistics.pruned_count += undo_removed as u64;

        let removed = undo_removed + redo_removed;
        if removed > 0 {
            info!(
                target: "retouch.undo",
                undo_removed,
                redo_removed,
                total_bytes = self.total_bytes,
                "idle cleanup"
            );
            self.publish_status();
        }
        removed
    }

    /// Run idle cleanup if the background timer has ticked.
    ///
    /// Call this from the thread that owns the store (an event loop tick,
    /// for example). Returns `true` if a tick was pending.
    pub fn run_pending_cleanup(&mut self) -> bool {
        let fired = self
            .cleanup_timer
            .as_ref()
            .is_some_and(CleanupTimer::take_pending);
        if fired {
            self.perform_memory_cleanup();
        }
        fired
    }

    /// Called with the current usage whenever an add leaves bytes above the
    /// pressure threshold.
    pub fn set_memory_pressure_handler(&mut self, handler: impl FnMut(usize) + Send + 'static) {
        self.on_memory_pressure = Some(Box::new(handler));
    }

    /// Called whenever [`status`](Self::status) changes.
    pub fn set_status_handler(&mut self, handler: impl FnMut(&HistoryStatus) + Send + 'static) {
        self.on_status_change = Some(Box::new(handler));
    }

    // ========================================================================
    // Info
    // ========================================================================

    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    #[must_use]
    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    /// Get descriptions for undo commands (most recent first).
    pub fn undo_descriptions(&self, limit: usize) -> Vec<&str> {
        self.undo_stack
            .iter()
            .rev()
            .take(limit)
            .map(Command::description)
            .collect()
    }

    /// Get descriptions for redo commands (next redo first).
    pub fn redo_descriptions(&self, limit: usize) -> Vec<&str> {
        self.redo_stack
            .iter()
            .rev()
            .take(limit)
            .map(Command::description)
            .collect()
    }

    #[must_use]
    pub fn next_undo_description(&self) -> Option<&str> {
        self.undo_stack.back().map(Command::description)
    }

    #[must_use]
    pub fn next_redo_description(&self) -> Option<&str> {
        self.redo_stack.back().map(Command::description)
    }

    /// Accounted bytes across both stacks.
    #[must_use]
    pub fn memory_usage(&self) -> usize {
        self.total_bytes
    }

    #[must_use]
    pub fn config(&self) -> &HistoryConfig {
        &self.config
    }

    #[must_use]
    pub fn statistics(&self) -> &HistoryStatistics {
        &self.statistics
    }

    /// The last published status.
    #[must_use]
    pub fn status(&self) -> &HistoryStatus {
        &self.status
    }

    /// Owned copy of both stacks.
    #[must_use]
    pub fn history_snapshot(&self) -> HistorySnapshot {
        HistorySnapshot::new(
            self.undo_stack.iter().cloned().collect(),
            self.redo_stack.iter().cloned().collect(),
            self.total_bytes,
        )
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn clear_redo(&mut self) {
        for command in self.redo_stack.drain(..) {
            self.total_bytes = self.total_bytes.saturating_sub(command.size_bytes());
        }
    }

    /// Fold `command` into the newest undo entry.
    ///
    /// Returns `Err(command)` if not merged.
    fn try_coalesce(&mut self, command: Command) -> Result<(), Command> {
        let Command::Transform(newer) = &command else {
            return Err(command);
        };
        let Some(Command::Transform(last)) = self.undo_stack.back_mut() else {
            return Err(command);
        };
        if !last.can_coalesce(newer, &self.config.merge) {
            return Err(command);
        }

        let merged = last.coalesce(newer);
        let old_size = last.size_bytes();
        let new_size = merged.size_bytes();
        *last = merged;
        self.total_bytes = self.total_bytes.saturating_sub(old_size) + new_size;
        Ok(())
    }

    fn note_add(&mut self, now: Instant) {
        let window = self.config.prune.churn_window();
        while let Some(&oldest) = self.recent_adds.front() {
            if now.saturating_duration_since(oldest) > window {
                self.recent_adds.pop_front();
            } else {
                break;
            }
        }
        self.recent_adds.push_back(now);
    }

    fn is_high_churn(&self) -> bool {
        self.recent_adds.len() > self.config.prune.churn_threshold
    }

    fn should_prune(&self) -> bool {
        let depth = self.undo_stack.len();
        depth > self.config.max_entries
            || self.total_bytes > self.config.max_bytes
            || (depth > self.config.watermark() && self.is_high_churn())
    }

    /// Evict oldest undo entries down to the retained targets, then trim
    /// redo. Returns the number of undo entries evicted.
    fn prune(&mut self) -> usize {
        let target_entries = self.config.retained_entries();
        let target_bytes = self.config.retained_bytes();

        let mut evicted = 0;
        while self.undo_stack.len() > target_entries || self.total_bytes > target_bytes {
            let Some(command) = self.undo_stack.pop_front() else {
                break;
            };
            self.total_bytes = self.total_bytes.saturating_sub(command.size_bytes());
            evicted += 1;
        }
        self.statistics.pruned_count += evicted as u64;

        let mut redo_trimmed = 0;
        if self.redo_stack.len() > self.config.prune.redo_trim_threshold {
            while self.redo_stack.len() > self.config.prune.redo_trim_target {
                if let Some(command) = self.redo_stack.pop_front() {
                    self.total_bytes = self.total_bytes.saturating_sub(command.size_bytes());
                    redo_trimmed += 1;
                }
            }
        }

        if evicted > 0 || redo_trimmed > 0 {
            info!(
                target: "retouch.undo",
                evicted,
                redo_trimmed,
                undo_depth = self.undo_stack.len(),
                total_bytes = self.total_bytes,
                "history pruned"
            );
        }
        evicted
    }

    fn check_memory_pressure(&mut self) {
        let threshold = self.config.pressure_bytes();
        if self.total_bytes <= threshold {
            return;
        }
        warn!(
            target: "retouch.undo",
            total_bytes = self.total_bytes,
            threshold,
            max_bytes = self.config.max_bytes,
            "history memory pressure"
        );
        if let Some(handler) = self.on_memory_pressure.as_mut() {
            handler(self.total_bytes);
        }
    }

    fn compute_status(&self) -> HistoryStatus {
        HistoryStatus {
            can_undo: self.can_undo(),
            can_redo: self.can_redo(),
            undo_description: self.next_undo_description().map(str::to_string),
            redo_description: self.next_redo_description().map(str::to_string),
            current_position: self.undo_stack.len(),
            total_commands: self.undo_stack.len() + self.redo_stack.len(),
        }
    }

    /// Recompute status and notify only if it changed.
    fn publish_status(&mut self) {
        let status = self.compute_status();
        if status == self.status {
            return;
        }
        self.status = status;
        if let Some(handler) = self.on_status_change.as_mut() {
            handler(&self.status);
        }
    }

    fn recount_bytes(&self) -> usize {
        self.undo_stack
            .iter()
            .chain(self.redo_stack.iter())
            .map(Command::size_bytes)
            .sum()
    }

    fn debug_check_bytes(&self) {
        debug_assert_eq!(
            self.total_bytes,
            self.recount_bytes(),
            "tracked history bytes drifted from recount"
        );
    }
}

// ============================================================================
// Tests
// ============================================================================
