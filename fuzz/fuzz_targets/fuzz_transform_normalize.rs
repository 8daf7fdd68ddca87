#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use retouch_core::{AspectRatio, GeometricTransformState, Rect, Size};

#[derive(Debug, Arbitrary)]
struct Input {
    crop: (f64, f64, f64, f64),
    angle: f64,
    flip_h: bool,
    flip_v: bool,
    aspect: u8,
    custom: (f64, f64),
    image: (f64, f64),
}

fn aspect_from(tag: u8, custom: (f64, f64)) -> Option<AspectRatio> {
    match tag % 8 {
        0 => None,
        1 => Some(AspectRatio::FreeForm),
        2 => Some(AspectRatio::Square),
        3 => Some(AspectRatio::Traditional),
        4 => Some(AspectRatio::Widescreen),
        5 => Some(AspectRatio::Portrait),
        6 => Some(AspectRatio::Original),
        _ => Some(AspectRatio::Custom {
            width: custom.0,
            height: custom.1,
        }),
    }
}

fuzz_target!(|input: Input| {
    let (x, y, w, h) = input.crop;
    let state = GeometricTransformState::new(
        Rect::new(x, y, w, h),
        input.angle,
        input.flip_h,
        input.flip_v,
        aspect_from(input.aspect, input.custom),
    );

    // Normalization is total and idempotent.
    let normalized = state.normalized();
    assert_eq!(normalized.normalized(), normalized, "normalize not idempotent");
    assert!(normalized.rotation_angle.is_finite(), "non-finite rotation");
    assert!(
        normalized.rotation_angle > -std::f64::consts::PI
            && normalized.rotation_angle <= std::f64::consts::PI,
        "rotation out of range: {}",
        normalized.rotation_angle
    );
    assert!(Rect::unit().contains_rect(&normalized.crop_rect), "crop escaped unit square");
    assert!(normalized.is_valid(), "normalized state invalid: {normalized:?}");

    // Pixel mapping and aspect fitting never panic and stay in bounds.
    let image = Size::new(input.image.0, input.image.1);
    let _ = normalized.pixel_crop_rect(image);
    let fitted = normalized.constrained_crop_rect(image);
    assert!(Rect::unit().contains_rect(&fitted), "aspect fit escaped unit square");
    if !image.is_empty() && image.width.is_finite() && image.height.is_finite() {
        let px = normalized.pixel_crop_rect(image);
        let _ = GeometricTransformState::from_pixel_crop_rect(px, image);
    }
});
