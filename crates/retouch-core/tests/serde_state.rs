#![cfg(feature = "serde")]
#![forbid(unsafe_code)]

//! Serialized form of transform state for callers that persist edits.

use retouch_core::{AspectRatio, GeometricTransformState, Rect};

#[test]
fn state_survives_json() {
    let state = GeometricTransformState::IDENTITY
        .with_crop_rect(Rect::new(0.1, 0.2, 0.6, 0.4))
        .with_rotation(0.25)
        .with_toggled_vertical_flip()
        .with_aspect_ratio(Some(AspectRatio::Custom {
            width: 5.0,
            height: 4.0,
        }));

    let json = serde_json::to_string(&state).unwrap();
    let back: GeometricTransformState = serde_json::from_str(&json).unwrap();
    assert_eq!(back, state);
}

#[test]
fn unit_aspect_variants_use_names() {
    let json = serde_json::to_string(&AspectRatio::Widescreen).unwrap();
    assert_eq!(json, "\"Widescreen\"");
}
