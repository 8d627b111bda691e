use super::*;
use crate::{foundation::core::Dimensions, render::cpu::CpuSurface};

fn vector(x: f32, y: f32, dx: f32, dy: f32) -> MotionVector {
    MotionVector {
        origin_x: x,
        origin_y: y,
        dx,
        dy,
        magnitude: dx.hypot(dy),
    }
}

fn field(vectors: Vec<MotionVector>) -> MotionField {
    MotionField {
        dims: Dimensions::new(32, 32).unwrap(),
        block_size: 8,
        search_radius: 4,
        vectors,
    }
}

#[test]
fn summary_reports_count_average_and_dominant_direction() {
    let f = field(vec![vector(4.0, 4.0, 2.0, 0.0), vector(12.0, 4.0, 0.0, 2.0)]);
    let s = summarize(&f);
    assert_eq!(s.count, 2);
    assert!((s.average_magnitude - 2.0).abs() < 1e-6);
    assert!((s.dominant_angle_deg.unwrap() - 45.0).abs() < 1e-4);
}

#[test]
fn opposing_vectors_have_no_dominant_direction() {
    let f = field(vec![vector(4.0, 4.0, 1.0, 0.0), vector(12.0, 4.0, -1.0, 0.0)]);
    assert_eq!(summarize(&f).dominant_angle_deg, None);
    assert_eq!(summarize(&field(vec![])), MotionSummary::default());
}

#[test]
fn arrow_color_hue_follows_direction() {
    let right = arrow_color(0.0, 1.0);
    let down = arrow_color(std::f32::consts::FRAC_PI_2, 1.0);
    assert!(right[0] > right[1] && right[0] > right[2], "{right:?}");
    assert_ne!(right, down);
    assert!(arrow_color(0.0, 1.0)[0] > arrow_color(0.0, 0.0)[0]);
}

#[test]
fn arrow_path_ends_at_tip_and_skips_zero_length() {
    assert!(arrow_path(Point::new(1.0, 1.0), Vec2::ZERO, 1.5).is_none());
    let path = arrow_path(Point::new(2.0, 2.0), Vec2::new(10.0, 0.0), 2.0).unwrap();
    let bbox = kurbo::Shape::bounding_box(&path);
    assert!((bbox.x1 - 12.0).abs() < 1e-9);
    assert!((bbox.x0 - 2.0).abs() < 1e-9);
}

#[test]
fn small_vectors_are_not_drawn_but_still_counted() {
    let mut s = CpuSurface::new(Dimensions::new(32, 32).unwrap()).unwrap();
    let style = RenderStyle {
        min_normalized_magnitude: 0.5,
        fade_alpha: 0.0,
        ..RenderStyle::default()
    };
    let f = field(vec![vector(16.0, 16.0, 1.0, 0.0)]);
    let summary = render_motion(&mut s, Some(&f), &style).unwrap();
    s.present();
    assert_eq!(summary.count, 1);
    assert!(s.snapshot().data().iter().all(|&b| b == 0));
    assert_eq!(s.labels()[0].text, "vectors: 1");
}

#[test]
fn significant_vectors_draw_arrows() {
    let mut s = CpuSurface::new(Dimensions::new(32, 32).unwrap()).unwrap();
    let f = field(vec![vector(8.0, 16.0, 4.0, 0.0)]);
    render_motion(&mut s, Some(&f), &RenderStyle::default()).unwrap();
    s.present();
    let px = s.snapshot().pixel(13, 16).unwrap();
    assert_eq!(px[3], 255);
}

#[test]
fn empty_input_draws_only_chrome() {
    let mut s = CpuSurface::new(Dimensions::new(16, 16).unwrap()).unwrap();
    let summary = render_motion(&mut s, None, &RenderStyle::default()).unwrap();
    s.present();
    assert_eq!(summary, MotionSummary::default());
    assert_eq!(s.labels().len(), 3);
    assert_eq!(s.labels()[2].text, "dir: -");
}
