use super::*;
use crate::foundation::core::Dimensions;

fn gray(v: u8) -> PixelBuffer {
    PixelBuffer::filled(Dimensions::new(4, 3).unwrap(), [v, v, v, 200]).unwrap()
}

fn ring_of(values: &[u8]) -> FrameRing {
    let mut ring = FrameRing::new(8).unwrap();
    for &v in values {
        ring.push(gray(v)).unwrap();
    }
    ring
}

#[test]
fn needs_three_frames() {
    let params = BandPassParams::default();
    assert!(band_pass_amplify(&ring_of(&[]), &params).is_none());
    assert!(band_pass_amplify(&ring_of(&[10, 10]), &params).is_none());
    assert!(band_pass_amplify(&ring_of(&[10, 10, 10]), &params).is_some());
}

#[test]
fn static_history_passes_latest_frame_through() {
    let ring = ring_of(&[50, 50, 50, 50]);
    let out = band_pass_amplify(&ring, &BandPassParams::default()).unwrap();
    assert_eq!(&out, ring.latest().unwrap());
}

#[test]
fn step_change_is_filtered_amplified_and_added() {
    let ring = ring_of(&[100, 100, 120]);
    let params = BandPassParams {
        amplification: 2.0,
        high_pass_alpha: 0.9,
        roi: None,
    };
    let out = band_pass_amplify(&ring, &params).unwrap();
    // hp = [0, 0, 18], band = 0.25 * 18 = 4.5, delta = 9.
    assert_eq!(out.pixel(0, 0), Some([129, 129, 129, 200]));
    assert_eq!(out.pixel(3, 2), Some([129, 129, 129, 200]));
}

#[test]
fn output_is_clamped_and_alpha_untouched() {
    let ring = ring_of(&[0, 0, 250]);
    let params = BandPassParams {
        amplification: 100.0,
        ..BandPassParams::default()
    };
    let out = band_pass_amplify(&ring, &params).unwrap();
    assert!(out.data().chunks_exact(4).all(|px| px == [255, 255, 255, 200]));
}

#[test]
fn roi_limits_the_processed_area() {
    let ring = ring_of(&[100, 100, 120]);
    let params = BandPassParams {
        amplification: 2.0,
        high_pass_alpha: 0.9,
        roi: Some(Roi {
            x: 1,
            y: 1,
            width: 1,
            height: 1,
        }),
    };
    let out = band_pass_amplify(&ring, &params).unwrap();
    assert_eq!(out.pixel(1, 1), Some([129, 129, 129, 200]));
    assert_eq!(out.pixel(0, 0), Some([120, 120, 120, 200]));
}

#[test]
fn empty_roi_means_full_frame() {
    let ring = ring_of(&[100, 100, 120]);
    let params = BandPassParams {
        amplification: 2.0,
        high_pass_alpha: 0.9,
        roi: Some(Roi {
            x: 0,
            y: 0,
            width: 0,
            height: 0,
        }),
    };
    let out = band_pass_amplify(&ring, &params).unwrap();
    assert_eq!(out.pixel(0, 0), Some([129, 129, 129, 200]));
}

#[test]
fn source_frames_are_not_mutated() {
    let ring = ring_of(&[100, 100, 120]);
    let before = ring.latest().unwrap().clone();
    let _ = band_pass_amplify(&ring, &BandPassParams::default()).unwrap();
    assert_eq!(ring.latest().unwrap(), &before);
}
