#![forbid(unsafe_code)]

//! Running counters for history activity.

use std::collections::BTreeMap;

use web_time::Instant;

use super::command::CommandKind;

/// Counters accumulated since the store was created (or last cleared).
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryStatistics {
    /// Commands handed to `add_command`, merged or not.
    pub total_commands: u64,
    /// Commands folded into the previous undo entry.
    pub coalesced_count: u64,
    /// Successful undo operations.
    pub undo_count: u64,
    /// Successful redo operations.
    pub redo_count: u64,
    /// Undo entries removed by pruning or idle cleanup.
    pub pruned_count: u64,
    /// Adds, undos and redos.
    pub operations: u64,
    /// Recorded commands per kind.
    pub by_kind: BTreeMap<CommandKind, u64>,
    /// When counting started.
    pub session_start: Instant,
}

impl HistoryStatistics {
    /// Fresh counters starting at `session_start`.
    #[must_use]
    pub fn new(session_start: Instant) -> Self {
        Self {
            total_commands: 0,
            coalesced_count: 0,
            undo_count: 0,
            redo_count: 0,
            pruned_count: 0,
            operations: 0,
            by_kind: BTreeMap::new(),
            session_start,
        }
    }

    pub(crate) fn record_command(&mut self, kind: CommandKind, coalesced: bool) {
        self.total_commands += 1;
        self.operations += 1;
        if coalesced {
            self.coalesced_count += 1;
        }
        *self.by_kind.entry(kind).or_insert(0) += 1;
    }

    pub(crate) fn record_undo(&mut self) {
        self.undo_count += 1;
        self.operations += 1;
    }

    pub(crate) fn record_redo(&mut self) {
        self.redo_count += 1;
        self.operations += 1;
    }

    /// Commands recorded for `kind`.
    #[must_use]
    pub fn count_for(&self, kind: CommandKind) -> u64 {
        self.by_kind.get(&kind).copied().unwrap_or(0)
    }

    /// `undo_count / redo_count`, or `None` before the first redo.
    #[must_use]
    pub fn undo_redo_ratio(&self) -> Option<f64> {
        if self.redo_count == 0 {
            None
        } else {
            Some(self.undo_count as f64 / self.redo_count as f64)
        }
    }

    /// Recorded commands per minute of session time.
    ///
    /// Returns 0 when no time has elapsed.
    #[must_use]
    pub fn commands_per_minute(&self, now: Instant) -> f64 {
        let minutes = now.saturating_duration_since(self.session_start).as_secs_f64() / 60.0;
        if minutes <= 0.0 {
            0.0
        } else {
            self.total_commands as f64 / minutes
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use web_time::Duration;

    #[test]
    fn ratio_undefined_without_redo() {
        let mut stats = HistoryStatistics::new(Instant::now());
        for _ in 0..3 {
            stats.record_undo();
        }
        assert_eq!(stats.undo_redo_ratio(), None);
        stats.record_redo();
        stats.record_redo();
        assert_eq!(stats.undo_redo_ratio(), Some(1.5));
    }

    #[test]
    fn rate_over_session() {
        let start = Instant::now();
        let mut stats = HistoryStatistics::new(start);
        for _ in 0..30 {
            stats.record_command(CommandKind::Rotate, false);
        }
        stats.record_command(CommandKind::Crop, true);
        assert_eq!(stats.commands_per_minute(start), 0.0);
        let rate = stats.commands_per_minute(start + Duration::from_secs(31));
        assert!((rate - 60.0).abs() < 1e-9);
        assert_eq!(stats.count_for(CommandKind::Rotate), 30);
        assert_eq!(stats.count_for(CommandKind::Flip), 0);
        assert_eq!(stats.coalesced_count, 1);
        assert_eq!(stats.operations, 31);
    }
}
