#![forbid(unsafe_code)]

//! Property tests for [`GeometricTransformState`] invariants.
//!
//! Validates:
//! - `normalized()` is idempotent for arbitrary (including non-finite) input.
//! - Normalized states always satisfy `is_valid()`, including inputs with
//!   malformed custom aspect ratios.
//! - Unit → pixel → unit round-trips within floating tolerance.
//! - Aspect fitting stays inside the unit square and inside the prior crop.

use proptest::prelude::*;
use std::f64::consts::PI;

use retouch_core::{AspectRatio, GeometricTransformState, Rect, Size};

// ============================================================================
// Strategy helpers
// ============================================================================

fn any_f64() -> impl Strategy<Value = f64> {
    prop_oneof![
        8 => -10.0f64..10.0,
        2 => -1e6f64..1e6,
        1 => Just(f64::NAN),
        1 => Just(f64::INFINITY),
        1 => Just(f64::NEG_INFINITY),
        1 => Just(100.0 * PI),
    ]
}

fn aspect_strategy() -> impl Strategy<Value = Option<AspectRatio>> {
    prop_oneof![
        Just(None),
        Just(Some(AspectRatio::FreeForm)),
        Just(Some(AspectRatio::Square)),
        Just(Some(AspectRatio::Traditional)),
        Just(Some(AspectRatio::Widescreen)),
        Just(Some(AspectRatio::Portrait)),
        Just(Some(AspectRatio::Original)),
        (0.1f64..10.0, 0.1f64..10.0)
            .prop_map(|(width, height)| Some(AspectRatio::Custom { width, height })),
        (malformed_side(), any_f64())
            .prop_map(|(width, height)| Some(AspectRatio::Custom { width, height })),
    ]
}

fn malformed_side() -> impl Strategy<Value = f64> {
    prop_oneof![
        Just(f64::NAN),
        Just(f64::INFINITY),
        Just(f64::NEG_INFINITY),
        Just(0.0),
        Just(-0.0),
        -10.0f64..0.0,
    ]
}

/// `outer` contains `inner` allowing `tol` of rounding on every edge.
fn contains_within(outer: &Rect, inner: &Rect, tol: f64) -> bool {
    inner.x >= outer.x - tol
        && inner.y >= outer.y - tol
        && inner.right() <= outer.right() + tol
        && inner.bottom() <= outer.bottom() + tol
}

fn state_strategy() -> impl Strategy<Value = GeometricTransformState> {
    (
        any_f64(),
        any_f64(),
        any_f64(),
        any_f64(),
        any_f64(),
        any::<bool>(),
        any::<bool>(),
        aspect_strategy(),
    )
        .prop_map(|(x, y, w, h, angle, fh, fv, aspect)| {
            GeometricTransformState::new(Rect::new(x, y, w, h), angle, fh, fv, aspect)
        })
}

fn unit_rect_strategy() -> impl Strategy<Value = Rect> {
    (0.0f64..0.9, 0.0f64..0.9, 0.01f64..1.0, 0.01f64..1.0).prop_map(|(x, y, w, h)| {
        Rect::new(x, y, w.min(1.0 - x), h.min(1.0 - y))
    })
}

fn image_size_strategy() -> impl Strategy<Value = Size> {
    (1.0f64..20_000.0, 1.0f64..20_000.0).prop_map(|(w, h)| Size::new(w, h))
}

// ============================================================================
// Invariant 1: normalization is idempotent
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn normalization_is_idempotent(state in state_strategy()) {
        let once = state.normalized();
        prop_assert_eq!(once.normalized(), once);
    }
}

// ============================================================================
// Invariant 2: normalized states are valid
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn normalized_state_is_valid(state in state_strategy()) {
        let n = state.normalized();
        prop_assert!(n.rotation_angle > -PI && n.rotation_angle <= PI);
        prop_assert!(n.crop_rect.width > 0.0 && n.crop_rect.height > 0.0);
        prop_assert!(Rect::unit().contains_rect(&n.crop_rect));
        prop_assert!(n.aspect_ratio.is_none_or(AspectRatio::is_well_formed));
        prop_assert!(n.is_valid());
    }
}

// ============================================================================
// Invariant 3: pixel mapping round-trips
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn pixel_round_trip(rect in unit_rect_strategy(), size in image_size_strategy()) {
        let state = GeometricTransformState::IDENTITY.with_crop_rect(rect);
        let px = state.pixel_crop_rect(size);
        let back = GeometricTransformState::from_pixel_crop_rect(px, size);
        prop_assert!(back.crop_rect.approx_eq(&rect, 1e-9), "{:?} != {:?}", back.crop_rect, rect);
    }
}

// ============================================================================
// Invariant 4: aspect fitting stays in bounds and matches the ratio
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn aspect_fit_stays_inside_crop(
        rect in unit_rect_strategy(),
        size in image_size_strategy(),
        aspect in aspect_strategy(),
    ) {
        let state = GeometricTransformState::IDENTITY
            .with_crop_rect(rect)
            .with_aspect_ratio(aspect);
        let fitted = state.constrained_crop_rect(size);

        prop_assert!(Rect::unit().contains_rect(&fitted));
        prop_assert!(contains_within(&rect, &fitted, 1e-9));

        if let Some(target) = aspect.and_then(|a| a.ratio(size)) {
            let px = GeometricTransformState::IDENTITY
                .with_crop_rect(fitted)
                .pixel_crop_rect(size);
            let actual = px.width / px.height;
            prop_assert!((actual - target).abs() / target < 1e-6, "ratio {} vs {}", actual, target);
        }
    }
}
