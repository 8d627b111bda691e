use super::*;

fn gradient(w: u32, h: u32) -> PixelBuffer {
    let mut data = Vec::with_capacity((w * h * 4) as usize);
    for y in 0..h {
        for x in 0..w {
            data.extend_from_slice(&[(x * 20) as u8, (y * 20) as u8, 7, 255]);
        }
    }
    PixelBuffer::from_raw(w, h, data).unwrap()
}

#[test]
fn default_params_are_identity() {
    let dims = Dimensions::new(7, 5).unwrap();
    assert_eq!(AffineParams::default().to_affine(dims), Affine::IDENTITY);
}

#[test]
fn identity_reproduces_input_exactly() {
    let src = gradient(9, 6);
    let out = affine_transform(&src, &AffineParams::default());
    assert_eq!(out, src);
}

#[test]
fn translation_shifts_and_leaves_uncovered_pixels_transparent() {
    let src = gradient(4, 3);
    let params = AffineParams {
        translate: Vec2::new(1.0, 0.0),
        ..AffineParams::default()
    };
    let out = affine_transform(&src, &params);
    assert_eq!(out.pixel(0, 0), Some([0, 0, 0, 0]));
    assert_eq!(out.pixel(1, 0), src.pixel(0, 0));
    assert_eq!(out.pixel(3, 2), src.pixel(2, 2));
}

#[test]
fn positive_rotation_is_clockwise_on_screen() {
    // 3x3 with a marker right of center; 90 degrees clockwise moves it below center.
    let dims = Dimensions::new(3, 3).unwrap();
    let mut src = PixelBuffer::filled(dims, [0, 0, 0, 255]).unwrap();
    let i = src.offset(2, 1);
    src.make_mut()[i..i + 4].copy_from_slice(&[255, 255, 255, 255]);

    let params = AffineParams {
        rotation_deg: 90.0,
        ..AffineParams::default()
    };
    let out = affine_transform(&src, &params);
    assert_eq!(out.pixel(1, 2), Some([255, 255, 255, 255]));
    assert_eq!(out.pixel(2, 1), Some([0, 0, 0, 255]));
}

#[test]
fn zero_scale_yields_transparent_frame() {
    let src = gradient(3, 3);
    let params = AffineParams {
        scale: Vec2::new(0.0, 1.0),
        ..AffineParams::default()
    };
    let out = affine_transform(&src, &params);
    assert_eq!(out.dims(), src.dims());
    assert!(out.data().iter().all(|&b| b == 0));
}

#[test]
fn params_deserialize_with_defaults() {
    let p: AffineParams = serde_json::from_str(r#"{ "rotation_deg": 15.0 }"#).unwrap();
    assert_eq!(p.rotation_deg, 15.0);
    assert_eq!(p.scale, Vec2::new(1.0, 1.0));
}
