#![forbid(unsafe_code)]

//! Crop / rotate / flip / aspect-ratio state.
//!
//! [`GeometricTransformState`] is an immutable value: every `with_*` method
//! returns a new state with exactly one field changed and performs no
//! validation. Validation is deferred to [`GeometricTransformState::normalized`]
//! (which repairs) and [`GeometricTransformState::is_valid`] (which reports).
//!
//! # Coordinate spaces
//!
//! The crop rectangle lives in *unit space*: `[0,1]×[0,1]` relative to the
//! source image extent. Pixel space is reached through
//! [`pixel_crop_rect`](GeometricTransformState::pixel_crop_rect) and back
//! through [`from_pixel_crop_rect`](GeometricTransformState::from_pixel_crop_rect).
//!
//! ```text
//!   unit space                      pixel space (1000 x 800)
//!   (0,0)───────────┐               (0,0)─────────────────┐
//!   │  ┌─────┐      │   × size      │   ┌──────────┐      │
//!   │  │crop │      │  ───────►     │   │   crop   │      │
//!   │  └─────┘      │  ◄───────     │   └──────────┘      │
//!   └───────────(1,1)   ÷ size      └──────────(1000,800)
//! ```
//!
//! # Invariants (normalized states)
//!
//! 1. `crop_rect ⊆ [0,1]²`
//! 2. `crop_rect.width > 0 && crop_rect.height > 0`
//! 3. `rotation_angle ∈ (−π, π]`
//! 4. a custom aspect ratio, if present, has a finite positive ratio

use std::f64::consts::{PI, TAU};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::geometry::{EPSILON, Rect, Size};

/// Fixed aspect-ratio constraint applied to the crop rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AspectRatio {
    /// No constraint.
    FreeForm,
    /// 1:1.
    Square,
    /// 4:3.
    Traditional,
    /// 16:9.
    Widescreen,
    /// 3:4.
    Portrait,
    /// The source image's own ratio.
    Original,
    /// Arbitrary `width:height`.
    Custom { width: f64, height: f64 },
}

impl AspectRatio {
    /// Width-over-height ratio for an image of `image_size`.
    ///
    /// `None` for [`FreeForm`](Self::FreeForm), degenerate custom ratios,
    /// and [`Original`](Self::Original) over an empty image.
    #[must_use]
    pub fn ratio(self, image_size: Size) -> Option<f64> {
        match self {
            Self::FreeForm => None,
            Self::Square => Some(1.0),
            Self::Traditional => Some(4.0 / 3.0),
            Self::Widescreen => Some(16.0 / 9.0),
            Self::Portrait => Some(3.0 / 4.0),
            Self::Original => image_size.aspect(),
            Self::Custom { width, height } => Size::new(width, height).aspect(),
        }
    }

    /// Short label for UI and history descriptions.
    #[must_use]
    pub fn label(self) -> String {
        match self {
            Self::FreeForm => "Free".to_string(),
            Self::Square => "1:1".to_string(),
            Self::Traditional => "4:3".to_string(),
            Self::Widescreen => "16:9".to_string(),
            Self::Portrait => "3:4".to_string(),
            Self::Original => "Original".to_string(),
            Self::Custom { width, height } => format!("{width}:{height}"),
        }
    }

    /// False only for a custom ratio with no usable width:height (zero,
    /// negative, non-finite, or overflowing).
    #[must_use]
    pub fn is_well_formed(self) -> bool {
        match self {
            Self::Custom { width, height } => Size::new(width, height).aspect().is_some(),
            _ => true,
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Reduce an angle in radians into `(−π, π]`.
///
/// Uses `rem_euclid`, so arbitrarily large inputs (e.g. `100π`) cost O(1).
/// Non-finite input maps to `0.0`.
#[must_use]
pub fn normalize_angle(angle: f64) -> f64 {
    if !angle.is_finite() {
        return 0.0;
    }
    if angle > -PI && angle <= PI {
        return angle;
    }
    let mut reduced = angle.rem_euclid(TAU);
    if reduced > PI {
        reduced -= TAU;
    }
    if reduced <= -PI {
        reduced += TAU;
    }
    reduced
}

/// Clamp a unit-space rectangle into `[0,1]²`.
///
/// Axes whose extent fits are slid back inside so their size survives.
/// Oversized axes are intersected with the unit square. Degenerate,
/// non-finite, or fully outside input falls back to the full unit rectangle.
///
/// The result satisfies `Rect::unit().contains_rect(..)` exactly.
#[must_use]
pub fn clamp_unit_rect(rect: Rect) -> Rect {
    if !rect.is_finite() || rect.is_empty() {
        return Rect::unit();
    }
    let slid = slide_into_unit(rect);
    if rect.width <= 1.0 && rect.height <= 1.0 {
        return slid;
    }
    match slid.intersection_opt(&Rect::unit()) {
        // Clipped extents are <= 1, so this slide only absorbs rounding
        Some(clipped) => slide_into_unit(clipped),
        None => Rect::unit(),
    }
}

fn slide_into_unit(rect: Rect) -> Rect {
    let slide = |pos: f64, extent: f64| {
        if extent <= 1.0 {
            pos.clamp(0.0, 1.0 - extent)
        } else {
            pos
        }
    };
    Rect::new(
        slide(rect.x, rect.width),
        slide(rect.y, rect.height),
        rect.width,
        rect.height,
    )
}

/// Immutable crop/rotate/flip/aspect-ratio state for one image.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GeometricTransformState {
    /// Crop in unit coordinates.
    pub crop_rect: Rect,
    /// Rotation in radians.
    pub rotation_angle: f64,
    pub flipped_horizontally: bool,
    pub flipped_vertically: bool,
    /// Optional aspect-ratio lock for the crop.
    pub aspect_ratio: Option<AspectRatio>,
}

impl Default for GeometricTransformState {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl GeometricTransformState {
    /// Full crop, no rotation, no flips, no aspect constraint.
    pub const IDENTITY: Self = Self {
        crop_rect: Rect::unit(),
        rotation_angle: 0.0,
        flipped_horizontally: false,
        flipped_vertically: false,
        aspect_ratio: None,
    };

    /// Fixed encoded size of one state, used for history budget accounting.
    ///
    /// Crop (4 × f64) + rotation (f64) + two flags + aspect tag with an
    /// optional custom pair (1 + 2 × f64).
    pub const ENCODED_SIZE: usize = 4 * 8 + 8 + 2 + (1 + 2 * 8);

    /// Create a state from raw parts. No validation is performed.
    #[must_use]
    pub const fn new(
        crop_rect: Rect,
        rotation_angle: f64,
        flipped_horizontally: bool,
        flipped_vertically: bool,
        aspect_ratio: Option<AspectRatio>,
    ) -> Self {
        Self {
            crop_rect,
            rotation_angle,
            flipped_horizontally,
            flipped_vertically,
            aspect_ratio,
        }
    }

    // ========================================================================
    // Single-field mutation
    // ========================================================================

    #[must_use]
    pub fn with_crop_rect(&self, crop_rect: Rect) -> Self {
        Self {
            crop_rect,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn with_rotation(&self, rotation_angle: f64) -> Self {
        Self {
            rotation_angle,
            ..self.clone()
        }
    }

    /// Add `delta` radians to the current rotation (not normalized).
    #[must_use]
    pub fn rotated_by(&self, delta: f64) -> Self {
        self.with_rotation(self.rotation_angle + delta)
    }

    #[must_use]
    pub fn with_toggled_horizontal_flip(&self) -> Self {
        self.with_horizontal_flip(!self.flipped_horizontally)
    }

    #[must_use]
    pub fn with_toggled_vertical_flip(&self) -> Self {
        self.with_vertical_flip(!self.flipped_vertically)
    }

    #[must_use]
    pub fn with_horizontal_flip(&self, flipped: bool) -> Self {
        Self {
            flipped_horizontally: flipped,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn with_vertical_flip(&self, flipped: bool) -> Self {
        Self {
            flipped_vertically: flipped,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn with_aspect_ratio(&self, aspect_ratio: Option<AspectRatio>) -> Self {
        Self {
            aspect_ratio,
            ..self.clone()
        }
    }

    // ========================================================================
    // Normalization and validation
    // ========================================================================

    /// Repair the state so that every invariant holds.
    ///
    /// A malformed custom aspect ratio is dropped (no constraint).
    /// Idempotent: `x.normalized().normalized() == x.normalized()`.
    #[must_use]
    pub fn normalized(&self) -> Self {
        Self {
            crop_rect: clamp_unit_rect(self.crop_rect),
            rotation_angle: normalize_angle(self.rotation_angle),
            flipped_horizontally: self.flipped_horizontally,
            flipped_vertically: self.flipped_vertically,
            aspect_ratio: self.aspect_ratio.filter(|a| a.is_well_formed()),
        }
    }

    /// Whether every field is finite and within its domain.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        let rotation_ok = self.rotation_angle.is_finite()
            && self.rotation_angle > -PI
            && self.rotation_angle <= PI;
        let crop_ok = self.crop_rect.is_finite()
            && !self.crop_rect.is_empty()
            && Rect::unit().contains_rect(&self.crop_rect);
        let aspect_ok = self.aspect_ratio.is_none_or(AspectRatio::is_well_formed);
        rotation_ok && crop_ok && aspect_ok
    }

    // ========================================================================
    // Coordinate conversion
    // ========================================================================

    /// Map the unit-space crop into pixel space for an image of `image_size`.
    #[must_use]
    pub fn pixel_crop_rect(&self, image_size: Size) -> Rect {
        unit_to_pixel(self.crop_rect, image_size)
    }

    /// Build a state whose crop is `pixel_rect` expressed in unit space.
    ///
    /// An empty `image_size` yields the full unit crop.
    #[must_use]
    pub fn from_pixel_crop_rect(pixel_rect: Rect, image_size: Size) -> Self {
        Self::IDENTITY.with_crop_rect(pixel_to_unit(pixel_rect, image_size))
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// True iff the state differs from [`IDENTITY`](Self::IDENTITY).
    #[must_use]
    pub fn has_transformations(&self) -> bool {
        *self != Self::IDENTITY
    }

    /// True iff rotation or either flip is present, regardless of crop.
    #[must_use]
    pub fn has_geometric_transformations(&self) -> bool {
        self.rotation_angle != 0.0 || self.flipped_horizontally || self.flipped_vertically
    }

    /// True iff the crop is the only field that differs from identity.
    #[must_use]
    pub fn has_crop_only(&self) -> bool {
        self.crop_rect != Rect::unit()
            && !self.has_geometric_transformations()
            && self.aspect_ratio.is_none()
    }

    // ========================================================================
    // Aspect-ratio fitting
    // ========================================================================

    /// Largest rectangle of the constrained ratio centered in the current crop.
    ///
    /// The ratio is evaluated in pixel space. When the crop is wider than the
    /// target the width shrinks and the rect is re-centered horizontally; when
    /// taller the height shrinks and it is re-centered vertically. The result
    /// is clamped back into the unit square. Without a usable ratio the
    /// (clamped) crop is returned unchanged.
    #[must_use]
    pub fn constrained_crop_rect(&self, image_size: Size) -> Rect {
        let crop = clamp_unit_rect(self.crop_rect);
        let Some(target) = self.aspect_ratio.and_then(|a| a.ratio(image_size)) else {
            return crop;
        };
        if image_size.is_empty() {
            return crop;
        }

        let px = unit_to_pixel(crop, image_size);
        let current = px.width / px.height;
        let (width, height) = if current > target + EPSILON {
            (px.height * target, px.height)
        } else if current < target - EPSILON {
            (px.width, px.width / target)
        } else {
            return crop;
        };

        let (cx, cy) = px.center();
        let fitted = Rect::new(cx - width / 2.0, cy - height / 2.0, width, height);
        clamp_unit_rect(pixel_to_unit(fitted, image_size))
    }

    /// Replace the crop with [`constrained_crop_rect`](Self::constrained_crop_rect).
    #[must_use]
    pub fn with_aspect_ratio_applied(&self, image_size: Size) -> Self {
        self.with_crop_rect(self.constrained_crop_rect(image_size))
    }
}

fn unit_to_pixel(rect: Rect, image_size: Size) -> Rect {
    Rect::new(
        rect.x * image_size.width,
        rect.y * image_size.height,
        rect.width * image_size.width,
        rect.height * image_size.height,
    )
}

fn pixel_to_unit(rect: Rect, image_size: Size) -> Rect {
    if image_size.is_empty() {
        return Rect::unit();
    }
    Rect::new(
        rect.x / image_size.width,
        rect.y / image_size.height,
        rect.width / image_size.width,
        rect.height / image_size.height,
    )
}
