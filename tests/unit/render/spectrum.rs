use super::*;
use crate::{foundation::core::Dimensions, render::cpu::CpuSurface};

fn field(w: u32, h: u32, values: Vec<f32>) -> ScalarField {
    ScalarField::new(Dimensions::new(w, h).unwrap(), values).unwrap()
}

#[test]
fn grayscale_normalizes_by_field_maximum() {
    let f = field(4, 1, vec![0.0, 2.0, 4.0, 1.0]);
    let px = colorize_field(&f, &Gradient::Grayscale);
    let reds: Vec<u8> = px.data().chunks_exact(4).map(|p| p[0]).collect();
    assert_eq!(reds, vec![0, 128, 255, 64]);
    assert!(px.data().chunks_exact(4).all(|p| p[3] == 255));
}

#[test]
fn all_zero_field_maps_to_low_end() {
    let g = Gradient::TwoColor {
        low: [0, 0, 128],
        high: [255, 255, 0],
    };
    let px = colorize_field(&field(2, 2, vec![0.0; 4]), &g);
    assert!(px.data().chunks_exact(4).all(|p| p == [0, 0, 128, 255]));
}

#[test]
fn two_color_gradient_interpolates() {
    let g = Gradient::TwoColor {
        low: [0, 0, 0],
        high: [200, 100, 50],
    };
    assert_eq!(g.map(0.5), [100, 50, 25, 255]);
    assert_eq!(g.map(f32::NAN), [0, 0, 0, 255]);
    assert_eq!(g.map(3.0), [200, 100, 50, 255]);
}

#[test]
fn crosshair_passes_through_zero_frequency_bin() {
    let dims = Dimensions::new(9, 7).unwrap();
    let mut s = CpuSurface::new(dims).unwrap();
    let style = RenderStyle {
        crosshair_color: [255, 0, 0, 255],
        ..RenderStyle::default()
    };
    render_spectrum(&mut s, Some(&field(9, 7, vec![0.0; 63])), &style).unwrap();
    s.present();
    let snap = s.snapshot();
    assert_eq!(snap.pixel(0, 3), Some([255, 0, 0, 255]));
    assert_eq!(snap.pixel(4, 0), Some([255, 0, 0, 255]));
    assert_eq!(snap.pixel(0, 0), Some([0, 0, 0, 255]));
    assert_eq!(s.labels().len(), 3);
}

#[test]
fn missing_field_draws_only_chrome() {
    let mut s = CpuSurface::new(Dimensions::new(8, 8).unwrap()).unwrap();
    render_spectrum(&mut s, None, &RenderStyle::default()).unwrap();
    s.present();
    assert_eq!(s.snapshot().pixel(1, 1), Some([0, 0, 0, 0]));
    assert!(!s.labels().is_empty());
}
