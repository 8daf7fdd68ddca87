#![forbid(unsafe_code)]

//! Undoable command infrastructure for the edit history.
//!
//! A [`Command`] is a closed set of reversible operations over a
//! [`TransformTarget`]:
//!
//! - [`TransformCommand`]: one before/after pair of
//!   [`GeometricTransformState`] values.
//! - [`CompositeCommand`]: an ordered batch applied front-to-back and
//!   inverted back-to-front.
//!
//! # Invariants
//!
//! - `apply()` followed by `invert_and_apply()` restores the prior state
//! - `invert_and_apply()` followed by `apply()` restores the applied state
//! - `size_bytes()` is deterministic for a given command
//! - Commands own deep copies of their states; nothing aliases live state
//!
//! # Coalescing
//!
//! Two transform commands merge when the newer one continues exactly where
//! the older one left off, both carry the same continuous [`CommandKind`],
//! and they were created within [`MergeConfig::window_ms`] of each other.
//! Dragging a rotation slider therefore produces one undo step, not sixty.

use std::f64::consts::PI;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

#[cfg(feature = "history-config")]
use serde::{Deserialize, Serialize};

use retouch_core::transform::normalize_angle;
use retouch_core::{AspectRatio, GeometricTransformState};
use web_time::{Duration, Instant};

/// Per-command bookkeeping overhead charged against the byte budget.
pub const COMMAND_OVERHEAD: usize = 64;

static NEXT_COMMAND_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique command identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommandId(u64);

impl CommandId {
    /// Allocate the next identifier.
    #[must_use]
    pub fn next() -> Self {
        Self(NEXT_COMMAND_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Handle to the live edit state that commands are applied against.
pub trait TransformTarget {
    /// The current transform state.
    fn transform_state(&self) -> &GeometricTransformState;

    /// Replace the current transform state.
    fn set_transform_state(&mut self, state: GeometricTransformState);
}

impl TransformTarget for GeometricTransformState {
    fn transform_state(&self) -> &GeometricTransformState {
        self
    }

    fn set_transform_state(&mut self, state: GeometricTransformState) {
        *self = state;
    }
}

/// Semantic kind of a command, fixed at construction.
///
/// Drives coalescing eligibility and statistics keying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CommandKind {
    Crop,
    Rotate,
    Flip,
    AspectRatio,
    Reset,
    /// Several fields changed at once.
    Adjust,
    /// A [`CompositeCommand`].
    Batch,
}

impl CommandKind {
    /// Every kind, in declaration order.
    pub const ALL: [Self; 7] = [
        Self::Crop,
        Self::Rotate,
        Self::Flip,
        Self::AspectRatio,
        Self::Reset,
        Self::Adjust,
        Self::Batch,
    ];

    /// Generic label, used when a diff has nothing more specific to say.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Crop => "Crop",
            Self::Rotate => "Rotate",
            Self::Flip => "Flip",
            Self::AspectRatio => "Aspect Ratio",
            Self::Reset => "Reset Crop & Rotate",
            Self::Adjust => "Adjust Crop & Rotate",
            Self::Batch => "Batch",
        }
    }

    /// Kinds produced by continuous gestures (sliders, drag handles).
    ///
    /// Only these coalesce; flips and resets are discrete steps.
    #[must_use]
    pub const fn is_continuous(self) -> bool {
        matches!(self, Self::Crop | Self::Rotate | Self::AspectRatio)
    }

    /// Classify the change from `previous` to `new`.
    #[must_use]
    pub fn classify(previous: &GeometricTransformState, new: &GeometricTransformState) -> Self {
        let diff = StateDiff::between(previous, new);
        if diff.flip_only() {
            Self::Flip
        } else if diff.rotation_only() {
            Self::Rotate
        } else if diff.crop_only() {
            Self::Crop
        } else if diff.aspect_only() {
            Self::AspectRatio
        } else {
            Self::Adjust
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Configuration for command coalescing.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "history-config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "history-config", serde(default))]
pub struct MergeConfig {
    /// Whether coalescing is attempted at all.
    pub enabled: bool,
    /// Maximum time between commands to allow merging (milliseconds).
    pub window_ms: u64,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            window_ms: 1000,
        }
    }
}

impl MergeConfig {
    /// Never coalesce.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// The merge window as a [`Duration`].
    #[must_use]
    pub fn window(&self) -> Duration {
        Duration::from_millis(self.window_ms)
    }
}

/// Which fields differ between two states.
#[derive(Debug, Clone, Copy)]
struct StateDiff {
    crop: bool,
    rotation: bool,
    flip_h: bool,
    flip_v: bool,
    aspect: bool,
}

impl StateDiff {
    fn between(a: &GeometricTransformState, b: &GeometricTransformState) -> Self {
        Self {
            crop: a.crop_rect != b.crop_rect,
            rotation: a.rotation_angle != b.rotation_angle,
            flip_h: a.flipped_horizontally != b.flipped_horizontally,
            flip_v: a.flipped_vertically != b.flipped_vertically,
            aspect: a.aspect_ratio != b.aspect_ratio,
        }
    }

    fn is_empty(self) -> bool {
        !(self.crop || self.rotation || self.flip_h || self.flip_v || self.aspect)
    }

    fn flip_only(self) -> bool {
        (self.flip_h || self.flip_v) && !(self.crop || self.rotation || self.aspect)
    }

    fn rotation_only(self) -> bool {
        self.rotation && !(self.crop || self.flip_h || self.flip_v || self.aspect)
    }

    fn crop_only(self) -> bool {
        self.crop && !(self.rotation || self.flip_h || self.flip_v || self.aspect)
    }

    fn aspect_only(self) -> bool {
        self.aspect && !(self.crop || self.rotation || self.flip_h || self.flip_v)
    }
}

/// Human-readable description of the change from `previous` to `new`.
///
/// Checked in order: reset, flip-only, rotation-only, crop-only,
/// aspect-only, then the combined fallback.
fn describe(
    previous: &GeometricTransformState,
    new: &GeometricTransformState,
    kind: CommandKind,
) -> String {
    if kind == CommandKind::Reset {
        return CommandKind::Reset.label().to_string();
    }

    let diff = StateDiff::between(previous, new);
    if diff.is_empty() {
        return kind.label().to_string();
    }
    if diff.flip_only() {
        return match (diff.flip_h, diff.flip_v) {
            (true, false) => "Flip Horizontal".to_string(),
            (false, true) => "Flip Vertical".to_string(),
            _ => "Flip Horizontal & Vertical".to_string(),
        };
    }
    if diff.rotation_only() {
        return describe_rotation(new.rotation_angle - previous.rotation_angle);
    }
    if diff.crop_only() {
        return "Crop".to_string();
    }
    if diff.aspect_only() {
        let label = new
            .aspect_ratio
            .map_or_else(|| AspectRatio::FreeForm.label(), AspectRatio::label);
        return format!("Aspect Ratio {label}");
    }
    CommandKind::Adjust.label().to_string()
}

/// "Rotate +90°" for recognizable quarter turns, "Rotate" otherwise.
fn describe_rotation(delta: f64) -> String {
    let quarters = normalize_angle(delta) / (PI / 2.0);
    let rounded = quarters.round();
    if rounded == 0.0 || (quarters - rounded).abs() > 1e-6 {
        return "Rotate".to_string();
    }
    match rounded as i64 {
        2 | -2 => "Rotate 180°".to_string(),
        q => format!("Rotate {:+}°", q * 90),
    }
}

// ============================================================================
// TransformCommand
// ============================================================================

/// A single before/after transform change.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformCommand {
    previous_state: GeometricTransformState,
    new_state: GeometricTransformState,
    id: CommandId,
    created_at: Instant,
    kind: CommandKind,
    description: String,
}

impl TransformCommand {
    /// Create a command timestamped now.
    #[must_use]
    pub fn new(previous_state: GeometricTransformState, new_state: GeometricTransformState) -> Self {
        Self::new_at(previous_state, new_state, Instant::now())
    }

    /// Create a command with an explicit timestamp.
    #[must_use]
    pub fn new_at(
        previous_state: GeometricTransformState,
        new_state: GeometricTransformState,
        created_at: Instant,
    ) -> Self {
        let kind = CommandKind::classify(&previous_state, &new_state);
        Self::with_kind(previous_state, new_state, kind, created_at)
    }

    /// Reset `previous_state` back to identity, timestamped now.
    #[must_use]
    pub fn reset(previous_state: GeometricTransformState) -> Self {
        Self::reset_at(previous_state, Instant::now())
    }

    /// Reset `previous_state` back to identity with an explicit timestamp.
    #[must_use]
    pub fn reset_at(previous_state: GeometricTransformState, created_at: Instant) -> Self {
        Self::with_kind(
            previous_state,
            GeometricTransformState::IDENTITY,
            CommandKind::Reset,
            created_at,
        )
    }

    fn with_kind(
        previous_state: GeometricTransformState,
        new_state: GeometricTransformState,
        kind: CommandKind,
        created_at: Instant,
    ) -> Self {
        let description = describe(&previous_state, &new_state, kind);
        Self {
            previous_state,
            new_state,
            id: CommandId::next(),
            created_at,
            kind,
            description,
        }
    }

    #[must_use]
    pub fn previous_state(&self) -> &GeometricTransformState {
        &self.previous_state
    }

    #[must_use]
    pub fn new_state(&self) -> &GeometricTransformState {
        &self.new_state
    }

    #[must_use]
    pub fn id(&self) -> CommandId {
        self.id
    }

    #[must_use]
    pub fn created_at(&self) -> Instant {
        self.created_at
    }

    #[must_use]
    pub fn kind(&self) -> CommandKind {
        self.kind
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Set the target to `new_state`.
    pub fn apply<T: TransformTarget + ?Sized>(&self, target: &mut T) {
        target.set_transform_state(self.new_state.clone());
    }

    /// Set the target back to `previous_state`.
    pub fn invert_and_apply<T: TransformTarget + ?Sized>(&self, target: &mut T) {
        target.set_transform_state(self.previous_state.clone());
    }

    /// Size in bytes for memory accounting.
    #[must_use]
    pub fn size_bytes(&self) -> usize {
        2 * GeometricTransformState::ENCODED_SIZE + COMMAND_OVERHEAD + self.description.len()
    }

    /// Whether `newer` may be folded into `self`.
    #[must_use]
    pub fn can_coalesce(&self, newer: &Self, config: &MergeConfig) -> bool {
        if !config.enabled {
            return false;
        }

        // Must continue exactly where this command left off
        if newer.previous_state != self.new_state {
            return false;
        }

        if self.kind != newer.kind || !self.kind.is_continuous() {
            return false;
        }

        let elapsed = newer.created_at.saturating_duration_since(self.created_at);
        elapsed <= config.window()
    }

    /// Merge `newer` into a fresh command spanning `self.previous` → `newer.new`.
    ///
    /// Eligibility is checked by [`can_coalesce`](Self::can_coalesce); this
    /// only builds the merged value.
    #[must_use]
    pub fn coalesce(&self, newer: &Self) -> Self {
        Self::with_kind(
            self.previous_state.clone(),
            newer.new_state.clone(),
            self.kind,
            newer.created_at,
        )
    }
}

// ============================================================================
// CompositeCommand
// ============================================================================

/// An ordered batch of commands that undo and redo as one step.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeCommand {
    commands: Vec<Command>,
    description: String,
    id: CommandId,
    created_at: Instant,
}

impl CompositeCommand {
    /// Create a batch timestamped now.
    #[must_use]
    pub fn new(commands: Vec<Command>, description: impl Into<String>) -> Self {
        Self::new_at(commands, description, Instant::now())
    }

    /// Create a batch with an explicit timestamp.
    #[must_use]
    pub fn new_at(commands: Vec<Command>, description: impl Into<String>, created_at: Instant) -> Self {
        Self {
            commands,
            description: description.into(),
            id: CommandId::next(),
            created_at,
        }
    }

    /// Sub-commands in application order.
    #[must_use]
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Number of commands in the batch.
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Check if the batch is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    #[must_use]
    pub fn id(&self) -> CommandId {
        self.id
    }

    #[must_use]
    pub fn created_at(&self) -> Instant {
        self.created_at
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Apply every sub-command in order.
    pub fn apply<T: TransformTarget + ?Sized>(&self, target: &mut T) {
        for command in &self.commands {
            command.apply(target);
        }
    }

    /// Invert every sub-command, last-applied first.
    pub fn invert_and_apply<T: TransformTarget + ?Sized>(&self, target: &mut T) {
        for command in self.commands.iter().rev() {
            command.invert_and_apply(target);
        }
    }

    /// Size in bytes for memory accounting.
    #[must_use]
    pub fn size_bytes(&self) -> usize {
        COMMAND_OVERHEAD
            + self.description.len()
            + self.commands.iter().map(Command::size_bytes).sum::<usize>()
    }
}

// ============================================================================
// Command
// ============================================================================

/// A reversible unit of work recorded in history.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Transform(TransformCommand),
    Composite(CompositeCommand),
}

impl Command {
    /// Apply the command's forward effect.
    pub fn apply<T: TransformTarget + ?Sized>(&self, target: &mut T) {
        match self {
            Self::Transform(cmd) => cmd.apply(target),
            Self::Composite(cmd) => cmd.apply(target),
        }
    }

    /// Apply the command's inverse effect.
    pub fn invert_and_apply<T: TransformTarget + ?Sized>(&self, target: &mut T) {
        match self {
            Self::Transform(cmd) => cmd.invert_and_apply(target),
            Self::Composite(cmd) => cmd.invert_and_apply(target),
        }
    }

    /// Human-readable description for UI display.
    #[must_use]
    pub fn description(&self) -> &str {
        match self {
            Self::Transform(cmd) => cmd.description(),
            Self::Composite(cmd) => cmd.description(),
        }
    }

    /// Approximate footprint for budget accounting.
    #[must_use]
    pub fn size_bytes(&self) -> usize {
        match self {
            Self::Transform(cmd) => cmd.size_bytes(),
            Self::Composite(cmd) => cmd.size_bytes(),
        }
    }

    #[must_use]
    pub fn created_at(&self) -> Instant {
        match self {
            Self::Transform(cmd) => cmd.created_at(),
            Self::Composite(cmd) => cmd.created_at(),
        }
    }

    #[must_use]
    pub fn id(&self) -> CommandId {
        match self {
            Self::Transform(cmd) => cmd.id(),
            Self::Composite(cmd) => cmd.id(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> CommandKind {
        match self {
            Self::Transform(cmd) => cmd.kind(),
            Self::Composite(_) => CommandKind::Batch,
        }
    }

    /// Age relative to `now`; zero if `now` precedes creation.
    #[must_use]
    pub fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.created_at())
    }
}

impl From<TransformCommand> for Command {
    fn from(cmd: TransformCommand) -> Self {
        Self::Transform(cmd)
    }
}

impl From<CompositeCommand> for Command {
    fn from(cmd: CompositeCommand) -> Self {
        Self::Composite(cmd)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use retouch_core::Rect;

    fn id() -> GeometricTransformState {
        GeometricTransformState::IDENTITY
    }

    #[test]
    fn ids_are_unique() {
        let a = CommandId::next();
        let b = CommandId::next();
        assert_ne!(a, b);
        assert!(b.raw() > a.raw());
    }

    #[test]
    fn apply_and_invert_transform() {
        let after = id().with_rotation(0.5);
        let cmd = TransformCommand::new(id(), after.clone());
        let mut target = id();

        cmd.apply(&mut target);
        assert_eq!(target, after);

        cmd.invert_and_apply(&mut target);
        assert_eq!(target, id());
    }

    #[test]
    fn describe_crop_only() {
        let cmd = TransformCommand::new(id(), id().with_crop_rect(Rect::new(0.1, 0.1, 0.5, 0.5)));
        assert_eq!(cmd.description(), "Crop");
        assert_eq!(cmd.kind(), CommandKind::Crop);
    }

    #[test]
    fn describe_quarter_turns() {
        let cw = TransformCommand::new(id(), id().with_rotation(PI / 2.0));
        assert_eq!(cw.description(), "Rotate +90°");
        assert_eq!(cw.kind(), CommandKind::Rotate);

        let ccw = TransformCommand::new(id(), id().with_rotation(-PI / 2.0));
        assert_eq!(ccw.description(), "Rotate -90°");

        let half = TransformCommand::new(id(), id().with_rotation(PI));
        assert_eq!(half.description(), "Rotate 180°");

        // 270° clockwise is a quarter turn counter-clockwise
        let three = TransformCommand::new(id(), id().with_rotation(3.0 * PI / 2.0));
        assert_eq!(three.description(), "Rotate -90°");
    }

    #[test]
    fn describe_free_rotation() {
        let cmd = TransformCommand::new(id(), id().with_rotation(0.1));
        assert_eq!(cmd.description(), "Rotate");
    }

    #[test]
    fn describe_flips() {
        let h = TransformCommand::new(id(), id().with_toggled_horizontal_flip());
        assert_eq!(h.description(), "Flip Horizontal");
        assert_eq!(h.kind(), CommandKind::Flip);

        let v = TransformCommand::new(id(), id().with_toggled_vertical_flip());
        assert_eq!(v.description(), "Flip Vertical");

        let both = TransformCommand::new(
            id(),
            id().with_toggled_vertical_flip().with_toggled_horizontal_flip(),
        );
        assert_eq!(both.description(), "Flip Horizontal & Vertical");
    }

    #[test]
    fn describe_aspect_only() {
        let cmd = TransformCommand::new(id(), id().with_aspect_ratio(Some(AspectRatio::Widescreen)));
        assert_eq!(cmd.description(), "Aspect Ratio 16:9");
        assert_eq!(cmd.kind(), CommandKind::AspectRatio);
    }

    #[test]
    fn describe_combined_falls_back() {
        let cmd = TransformCommand::new(
            id(),
            id().with_rotation(PI / 2.0).with_crop_rect(Rect::new(0.0, 0.0, 0.5, 0.5)),
        );
        assert_eq!(cmd.description(), "Adjust Crop & Rotate");
        assert_eq!(cmd.kind(), CommandKind::Adjust);
    }

    #[test]
    fn reset_wins_over_diff() {
        // Flip-only diff, but built through the reset path
        let flipped = id().with_toggled_horizontal_flip();
        let cmd = TransformCommand::reset(flipped.clone());
        assert_eq!(cmd.description(), "Reset Crop & Rotate");
        assert_eq!(cmd.kind(), CommandKind::Reset);
        assert_eq!(cmd.new_state(), &GeometricTransformState::IDENTITY);
        assert_eq!(cmd.previous_state(), &flipped);
    }

    #[test]
    fn composite_inverts_in_reverse_order() {
        // Non-commutative pair: rotate then reset.
        let s0 = id().with_crop_rect(Rect::new(0.2, 0.2, 0.5, 0.5));
        let s1 = s0.with_rotation(1.0);
        let first = TransformCommand::new(s0.clone(), s1.clone());
        let second = TransformCommand::reset(s1);
        let batch = CompositeCommand::new(vec![first.into(), second.into()], "Straighten & Reset");

        let mut target = s0.clone();
        batch.apply(&mut target);
        assert_eq!(target, GeometricTransformState::IDENTITY);

        batch.invert_and_apply(&mut target);
        assert_eq!(target, s0);
    }

    #[test]
    fn composite_metadata() {
        let a = TransformCommand::new(id(), id().with_rotation(0.2));
        let a_size = a.size_bytes();
        let batch: Command = CompositeCommand::new(vec![a.into()], "Batch edit").into();
        assert_eq!(batch.kind(), CommandKind::Batch);
        assert_eq!(batch.description(), "Batch edit");
        assert_eq!(batch.size_bytes(), COMMAND_OVERHEAD + "Batch edit".len() + a_size);
    }

    #[test]
    fn size_is_deterministic() {
        let cmd = TransformCommand::new(id(), id().with_rotation(0.3));
        assert_eq!(
            cmd.size_bytes(),
            2 * GeometricTransformState::ENCODED_SIZE + COMMAND_OVERHEAD + "Rotate".len()
        );
    }

    #[test]
    fn coalesce_continuous_rotation() {
        let t0 = Instant::now();
        let s1 = id().with_rotation(0.1);
        let s2 = id().with_rotation(0.2);
        let a = TransformCommand::new_at(id(), s1.clone(), t0);
        let b = TransformCommand::new_at(s1, s2.clone(), t0 + Duration::from_millis(200));

        let config = MergeConfig::default();
        assert!(a.can_coalesce(&b, &config));

        let merged = a.coalesce(&b);
        assert_eq!(merged.previous_state(), &id());
        assert_eq!(merged.new_state(), &s2);
        assert_eq!(merged.created_at(), b.created_at());
        assert_ne!(merged.id(), a.id());
        assert_ne!(merged.id(), b.id());
        assert_eq!(merged.kind(), CommandKind::Rotate);
    }

    #[test]
    fn coalesced_description_is_recomputed() {
        let t0 = Instant::now();
        let s1 = id().with_rotation(PI / 4.0);
        let s2 = id().with_rotation(PI / 2.0);
        let a = TransformCommand::new_at(id(), s1.clone(), t0);
        let b = TransformCommand::new_at(s1, s2, t0);
        assert_eq!(a.description(), "Rotate");
        assert_eq!(a.coalesce(&b).description(), "Rotate +90°");
    }

    #[test]
    fn no_coalesce_outside_window() {
        let t0 = Instant::now();
        let s1 = id().with_rotation(0.1);
        let a = TransformCommand::new_at(id(), s1.clone(), t0);
        let b = TransformCommand::new_at(s1, id().with_rotation(0.2), t0 + Duration::from_millis(1500));
        assert!(!a.can_coalesce(&b, &MergeConfig::default()));
    }

    #[test]
    fn no_coalesce_when_discontinuous() {
        let t0 = Instant::now();
        let a = TransformCommand::new_at(id(), id().with_rotation(0.1), t0);
        let b = TransformCommand::new_at(id().with_rotation(0.5), id().with_rotation(0.6), t0);
        assert!(!a.can_coalesce(&b, &MergeConfig::default()));
    }

    #[test]
    fn no_coalesce_across_kinds() {
        let t0 = Instant::now();
        let s1 = id().with_rotation(0.1);
        let a = TransformCommand::new_at(id(), s1.clone(), t0);
        let b = TransformCommand::new_at(s1.clone(), s1.with_crop_rect(Rect::new(0.0, 0.0, 0.5, 0.5)), t0);
        assert!(!a.can_coalesce(&b, &MergeConfig::default()));
    }

    #[test]
    fn flips_never_coalesce() {
        let t0 = Instant::now();
        let s1 = id().with_toggled_horizontal_flip();
        let a = TransformCommand::new_at(id(), s1.clone(), t0);
        let b = TransformCommand::new_at(s1.clone(), s1.with_toggled_vertical_flip(), t0);
        assert!(!a.can_coalesce(&b, &MergeConfig::default()));
    }

    #[test]
    fn disabled_merge_config() {
        let t0 = Instant::now();
        let s1 = id().with_rotation(0.1);
        let a = TransformCommand::new_at(id(), s1.clone(), t0);
        let b = TransformCommand::new_at(s1, id().with_rotation(0.2), t0);
        assert!(!a.can_coalesce(&b, &MergeConfig::disabled()));
    }

    #[test]
    fn kind_labels_are_distinct() {
        let mut labels: Vec<_> = CommandKind::ALL.iter().map(|k| k.label()).collect();
        labels.sort_unstable();
        labels.dedup();
        assert_eq!(labels.len(), CommandKind::ALL.len());
    }
}
