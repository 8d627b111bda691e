use super::*;
use crate::foundation::math::mix64;

fn noise(w: u32, h: u32, shift_x: i64, shift_y: i64) -> PixelBuffer {
    let mut data = Vec::with_capacity((w * h * 4) as usize);
    for y in 0..i64::from(h) {
        for x in 0..i64::from(w) {
            let sx = (x - shift_x) as u64;
            let sy = (y - shift_y) as u64;
            let v = mix64(sx.wrapping_mul(0x1_0000) ^ sy) as u8;
            data.extend_from_slice(&[v, v.wrapping_mul(3), v ^ 0x5a, 255]);
        }
    }
    PixelBuffer::from_raw(w, h, data).unwrap()
}

#[test]
fn identical_frames_report_nothing_for_any_threshold() {
    let a = noise(32, 32, 0, 0);
    for threshold in [-5.0, 0.0, 0.5, 100.0] {
        for gate in [MotionGate::BestMatch, MotionGate::ZeroOffset] {
            let params = MotionParams {
                block_size: 8,
                threshold,
                gate,
                ..MotionParams::default()
            };
            let field = estimate_motion(&a, &a, &params).unwrap();
            assert!(field.vectors.is_empty(), "threshold {threshold} gate {gate:?}");
        }
    }
}

#[test]
fn translated_texture_is_tracked_with_zero_offset_gate() {
    let prev = noise(32, 32, 0, 0);
    let cur = noise(32, 32, 2, 1);
    let params = MotionParams {
        block_size: 8,
        search_radius: 3,
        sample_step: 1,
        threshold: 1.0,
        gate: MotionGate::ZeroOffset,
    };
    let field = estimate_motion(&prev, &cur, &params).unwrap();

    // 4x4 blocks; the top row and left column can't reach their source inside the frame.
    let interior: Vec<_> = field
        .vectors
        .iter()
        .filter(|v| v.origin_x > 8.0 && v.origin_y > 8.0)
        .collect();
    assert_eq!(interior.len(), 9);
    for v in interior {
        assert_eq!((v.dx, v.dy), (2.0, 1.0));
        assert!((v.magnitude - 5.0f32.sqrt()).abs() < 1e-6);
    }
}

#[test]
fn best_match_gate_reports_blocks_that_no_offset_explains() {
    let prev = noise(16, 16, 0, 0);
    let unrelated = noise(16, 16, 1000, 1000);
    let params = MotionParams {
        block_size: 8,
        search_radius: 1,
        threshold: 1.0,
        ..MotionParams::default()
    };
    let field = estimate_motion(&prev, &unrelated, &params).unwrap();
    assert_eq!(field.vectors.len(), 4);
}

#[test]
fn partial_blocks_are_skipped_and_oversized_blocks_yield_nothing() {
    let a = noise(20, 12, 0, 0);
    let b = noise(20, 12, 0, 500);
    let params = MotionParams {
        block_size: 8,
        search_radius: 0,
        threshold: 0.0,
        ..MotionParams::default()
    };
    let field = estimate_motion(&a, &b, &params).unwrap();
    assert_eq!(field.vectors.len(), 2);
    assert_eq!(field.max_magnitude(), 0.0);

    let huge = MotionParams {
        block_size: 64,
        ..params
    };
    assert!(estimate_motion(&a, &b, &huge).unwrap().vectors.is_empty());
}

#[test]
fn mismatched_dimensions_are_an_error() {
    let a = noise(8, 8, 0, 0);
    let b = noise(8, 9, 0, 0);
    assert!(estimate_motion(&a, &b, &MotionParams::default()).is_err());
}

#[test]
fn search_offsets_start_at_zero() {
    let offsets = search_offsets(2);
    assert_eq!(offsets.len(), 25);
    assert_eq!(offsets[0], (0, 0));
    assert_eq!(offsets[24].0.abs() + offsets[24].1.abs(), 4);
}

#[test]
fn search_radius_is_limited_to_the_frame() {
    let a = noise(4, 4, 0, 0);
    let b = noise(4, 4, 1, 0);
    let params = MotionParams {
        block_size: 2,
        search_radius: 3_000_000_000,
        threshold: 0.0,
        ..MotionParams::default()
    };
    let field = estimate_motion(&a, &b, &params).unwrap();
    assert_eq!(field.search_radius, 3_000_000_000);
    for v in &field.vectors {
        assert!(v.dx.abs() <= 2.0 && v.dy.abs() <= 2.0, "{v:?}");
    }

    let single_block = MotionParams {
        block_size: 4,
        ..params
    };
    let field = estimate_motion(&a, &b, &single_block).unwrap();
    assert!(field.vectors.iter().all(|v| v.magnitude == 0.0));
}
