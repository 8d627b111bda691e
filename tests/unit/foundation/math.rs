use super::*;

#[test]
fn luminance_weights_sum_to_white() {
    assert!((luminance(255, 255, 255) - 255.0).abs() < 1e-3);
    assert_eq!(luminance(0, 0, 0), 0.0);
    assert!((luminance(255, 0, 0) - 76.245).abs() < 1e-3);
}

#[test]
fn clamp_to_u8_saturates_and_rounds() {
    assert_eq!(clamp_to_u8(-4.0), 0);
    assert_eq!(clamp_to_u8(300.0), 255);
    assert_eq!(clamp_to_u8(12.5), 13);
    assert_eq!(clamp_to_u8(f32::NAN), 0);
}

#[test]
fn hsl_primaries() {
    assert_eq!(hsl_to_rgb(0.0, 1.0, 0.5), [255, 0, 0]);
    assert_eq!(hsl_to_rgb(120.0, 1.0, 0.5), [0, 255, 0]);
    assert_eq!(hsl_to_rgb(240.0, 1.0, 0.5), [0, 0, 255]);
    assert_eq!(hsl_to_rgb(-120.0, 1.0, 0.5), [0, 0, 255]);
    assert_eq!(hsl_to_rgb(42.0, 0.0, 1.0), [255, 255, 255]);
}

#[test]
fn premultiply_roundtrip_keeps_opaque_and_clears_transparent() {
    let mut px = vec![10u8, 20, 30, 255, 200, 100, 50, 0, 200, 100, 50, 128];
    premultiply_rgba8_in_place(&mut px);
    assert_eq!(&px[..4], &[10, 20, 30, 255]);
    assert_eq!(&px[4..8], &[0, 0, 0, 0]);
    unpremultiply_rgba8_in_place(&mut px);
    assert_eq!(&px[..4], &[10, 20, 30, 255]);
    for (got, want) in px[8..11].iter().zip([200u8, 100, 50]) {
        assert!((i16::from(*got) - i16::from(want)).abs() <= 1);
    }
}

#[test]
fn mix64_is_stable() {
    assert_eq!(mix64(1), mix64(1));
    assert_ne!(mix64(1), mix64(2));
}
