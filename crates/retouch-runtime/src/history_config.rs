#![forbid(unsafe_code)]

//! Tunable limits for the edit history, loadable from TOML or JSON.
//!
//! # Loading
//!
//! ```toml
//! # retouch-history.toml
//! max_entries = 80
//!
//! [merge]
//! window_ms = 750
//!
//! [cleanup]
//! idle_after_ms = 120000
//! ```
//!
//! ```rust,ignore
//! let config = HistoryConfig::from_toml_file("retouch-history.toml")?.validated()?;
//! let store = HistoryStore::new(config);
//! ```
//!
//! # Defaults
//!
//! `HistoryConfig::default()` is 50 entries, 100 MB, a one second merge
//! window, churn pruning above 20 adds in 10 s, and idle cleanup of entries
//! older than five minutes after one minute without edits.

#[cfg(feature = "history-config")]
use std::path::Path;

#[cfg(feature = "history-config")]
use serde::{Deserialize, Serialize};

use web_time::Duration;

use crate::undo::MergeConfig;

// ---------------------------------------------------------------------------
// Top-level HistoryConfig
// ---------------------------------------------------------------------------

/// Limits and policies for a [`HistoryStore`](crate::undo::HistoryStore).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "history-config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "history-config", serde(default))]
pub struct HistoryConfig {
    /// Maximum number of undo entries.
    pub max_entries: usize,
    /// Maximum accounted bytes across both stacks.
    pub max_bytes: usize,
    /// Command coalescing.
    pub merge: MergeConfig,
    /// Eviction policy.
    pub prune: PruneConfig,
    /// Idle cleanup policy.
    pub cleanup: CleanupConfig,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_entries: 50,
            max_bytes: 100_000_000,
            merge: MergeConfig::default(),
            prune: PruneConfig::default(),
            cleanup: CleanupConfig::default(),
        }
    }
}

impl HistoryConfig {
    /// Create a configuration with custom hard limits.
    #[must_use]
    pub fn new(max_entries: usize, max_bytes: usize) -> Self {
        Self {
            max_entries,
            max_bytes,
            ..Self::default()
        }
    }

    /// No count or byte cap; churn and idle cleanup still apply.
    #[must_use]
    pub fn unlimited() -> Self {
        Self::new(usize::MAX, usize::MAX)
    }

    #[must_use]
    pub fn with_merge_config(mut self, merge: MergeConfig) -> Self {
        self.merge = merge;
        self
    }

    #[must_use]
    pub fn with_prune_config(mut self, prune: PruneConfig) -> Self {
        self.prune = prune;
        self
    }

    #[must_use]
    pub fn with_cleanup_config(mut self, cleanup: CleanupConfig) -> Self {
        self.cleanup = cleanup;
        self
    }

    /// Disable the background cleanup timer.
    ///
    /// `perform_memory_cleanup()` can still be called directly.
    #[must_use]
    pub fn without_background_cleanup(mut self) -> Self {
        self.cleanup.enabled = false;
        self
    }

    /// Entry count above which churn alone triggers pruning.
    #[must_use]
    pub fn watermark(&self) -> usize {
        self.max_entries / 4
    }

    /// Undo entries kept after a pruning pass, rounded up.
    #[must_use]
    pub fn retained_entries(&self) -> usize {
        scaled_ceil(self.max_entries, self.prune.retain_ratio)
    }

    /// Accounted bytes kept after a pruning pass, rounded up.
    #[must_use]
    pub fn retained_bytes(&self) -> usize {
        scaled_ceil(self.max_bytes, self.prune.retain_ratio)
    }

    /// Usage above which the memory-pressure handler fires.
    #[must_use]
    pub fn pressure_bytes(&self) -> usize {
        (self.max_bytes as f64 * self.prune.pressure_ratio) as usize
    }

    /// Load from a TOML string.
    #[cfg(feature = "history-config")]
    pub fn from_toml_str(s: &str) -> Result<Self, HistoryConfigError> {
        toml::from_str(s).map_err(HistoryConfigError::Toml)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "history-config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, HistoryConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(HistoryConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "history-config")]
    pub fn from_json_str(s: &str) -> Result<Self, HistoryConfigError> {
        serde_json::from_str(s).map_err(HistoryConfigError::Json)
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "history-config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, HistoryConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(HistoryConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Validate all parameters are within acceptable ranges.
    ///
    /// Returns a list of validation errors. An empty list means the config
    /// is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.max_entries == 0 {
            errors.push("max_entries must be > 0".into());
        }
        if self.max_bytes == 0 {
            errors.push("max_bytes must be > 0".into());
        }

        let retain = self.prune.retain_ratio;
        if !(retain > 0.0 && retain <= 1.0) {
            errors.push(format!("prune.retain_ratio must be in (0, 1], got {retain}"));
        }
        let pressure = self.prune.pressure_ratio;
        if !(pressure > 0.0 && pressure <= 1.0) {
            errors.push(format!(
                "prune.pressure_ratio must be in (0, 1], got {pressure}"
            ));
        }
        if self.prune.churn_window_ms == 0 {
            errors.push("prune.churn_window_ms must be > 0".into());
        }
        if self.prune.redo_trim_target > self.prune.redo_trim_threshold {
            errors.push(format!(
                "prune.redo_trim_target ({}) must be <= prune.redo_trim_threshold ({})",
                self.prune.redo_trim_target, self.prune.redo_trim_threshold
            ));
        }

        if self.cleanup.enabled && self.cleanup.interval_ms == 0 {
            errors.push("cleanup.interval_ms must be > 0 when cleanup is enabled".into());
        }

        errors
    }

    /// Return `self` if [`validate`](Self::validate) finds nothing.
    pub fn validated(self) -> Result<Self, HistoryConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(HistoryConfigError::Validation(errors))
        }
    }
}

fn scaled_ceil(limit: usize, ratio: f64) -> usize {
    (limit as f64 * ratio).ceil() as usize
}

// ---------------------------------------------------------------------------
// Sub-configs (flat, serde-friendly)
// ---------------------------------------------------------------------------

/// When and how far pruning evicts.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "history-config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "history-config", serde(default))]
pub struct PruneConfig {
    /// Window for the high-churn heuristic (milliseconds).
    pub churn_window_ms: u64,
    /// Adds within the window above which churn is declared.
    pub churn_threshold: usize,
    /// Fraction of each cap that survives a pruning pass.
    pub retain_ratio: f64,
    /// Redo depth above which the redo stack is trimmed.
    pub redo_trim_threshold: usize,
    /// Redo depth after trimming.
    pub redo_trim_target: usize,
    /// Fraction of `max_bytes` above which memory pressure is reported.
    pub pressure_ratio: f64,
}

impl Default for PruneConfig {
    fn default() -> Self {
        Self {
            churn_window_ms: 10_000,
            churn_threshold: 20,
            retain_ratio: 0.75,
            redo_trim_threshold: 20,
            redo_trim_target: 15,
            pressure_ratio: 0.8,
        }
    }
}

impl PruneConfig {
    #[must_use]
    pub fn churn_window(&self) -> Duration {
        Duration::from_millis(self.churn_window_ms)
    }
}

/// Idle-time cleanup of stale history.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "history-config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "history-config", serde(default))]
pub struct CleanupConfig {
    /// Run the background timer.
    pub enabled: bool,
    /// Timer period (milliseconds).
    pub interval_ms: u64,
    /// Quiet time before cleanup does anything (milliseconds).
    pub idle_after_ms: u64,
    /// Entries older than this are eligible for removal (milliseconds).
    pub max_age_ms: u64,
    /// Undo entries that survive cleanup regardless of age.
    pub min_retained: usize,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_ms: 30_000,
            idle_after_ms: 60_000,
            max_age_ms: 300_000,
            min_retained: 5,
        }
    }
}

impl CleanupConfig {
    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    #[must_use]
    pub fn idle_after(&self) -> Duration {
        Duration::from_millis(self.idle_after_ms)
    }

    #[must_use]
    pub fn max_age(&self) -> Duration {
        Duration::from_millis(self.max_age_ms)
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors from loading or validating a [`HistoryConfig`].
#[derive(Debug)]
pub enum HistoryConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "history-config")]
    Toml(toml::de::Error),
    /// JSON parse error.
    #[cfg(feature = "history-config")]
    Json(serde_json::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl std::fmt::Display for HistoryConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "history-config")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            #[cfg(feature = "history-config")]
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for HistoryConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "history-config")]
            Self::Toml(e) => Some(e),
            #[cfg(feature = "history-config")]
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
