use super::*;
use crate::{
    frame::buffer::PixelBuffer,
    transform::{
        affine::AffineParams, bandpass::BandPassParams, motion::MotionParams,
        spectrum::SpectrumParams,
    },
};

fn dims() -> Dimensions {
    Dimensions::new(16, 16).unwrap()
}

fn ring_with(n: usize) -> FrameRing {
    let mut ring = FrameRing::new(8).unwrap();
    for i in 0..n {
        ring.push(PixelBuffer::filled(dims(), [i as u8 * 10, 0, 0, 255]).unwrap())
            .unwrap();
    }
    ring
}

fn all_specs() -> Vec<TransformSpec> {
    vec![
        TransformSpec::Affine(AffineParams::default()),
        TransformSpec::Spectrum(SpectrumParams::default()),
        TransformSpec::Motion(MotionParams {
            block_size: 8,
            search_radius: 2,
            ..MotionParams::default()
        }),
        TransformSpec::BandPass(BandPassParams::default()),
    ]
}

#[test]
fn compute_skips_transforms_lacking_history() {
    let outputs = compute_frame(&all_specs(), &ring_with(1));
    let produced: Vec<_> = outputs
        .iter()
        .map(|o| (o.kind, o.output.is_some()))
        .collect();
    assert_eq!(
        produced,
        vec![
            (TransformKind::Affine, true),
            (TransformKind::Spectrum, true),
            (TransformKind::Motion, false),
            (TransformKind::BandPass, false),
        ]
    );

    let outputs = compute_frame(&all_specs(), &ring_with(3));
    assert!(outputs.iter().all(|o| o.output.is_some()));
}

#[test]
fn compute_is_repeatable_for_the_same_input() {
    let ring = ring_with(3);
    assert_eq!(
        compute_frame(&all_specs(), &ring),
        compute_frame(&all_specs(), &ring)
    );
}

#[test]
fn outputs_keep_frame_dimensions() {
    for out in compute_frame(&all_specs(), &ring_with(3)) {
        let out = out.output.unwrap();
        assert_eq!((out.width(), out.height()), (16, 16));
    }
}

#[test]
fn present_creates_one_surface_per_view() {
    let mut surfaces = SurfaceSet::cpu();
    let outputs = compute_frame(&all_specs(), &ring_with(1));
    let reports = present_frame(&mut surfaces, dims(), &outputs, &RenderStyle::default());
    assert_eq!(reports.len(), 4);
    assert_eq!(surfaces.iter().count(), 4);

    let affine = surfaces.get(TransformKind::Affine).unwrap();
    assert_eq!(affine.snapshot().pixel(3, 3), Some([0, 0, 0, 255]));
}

#[test]
fn new_dimensions_replace_surfaces() {
    let mut surfaces = SurfaceSet::cpu();
    let outputs = compute_frame(&all_specs()[..1], &ring_with(1));
    present_frame(&mut surfaces, dims(), &outputs, &RenderStyle::default());
    assert_eq!(surfaces.dims(), Some(dims()));

    let small = Dimensions::new(4, 4).unwrap();
    present_frame(&mut surfaces, small, &[], &RenderStyle::default());
    assert_eq!(surfaces.dims(), Some(dims()), "no views drawn, nothing resized");

    let skipped = [ComputedOutput {
        kind: TransformKind::Motion,
        output: None,
    }];
    present_frame(&mut surfaces, small, &skipped, &RenderStyle::default());
    assert_eq!(surfaces.dims(), Some(small));
    assert_eq!(surfaces.iter().count(), 1);
}

#[test]
fn present_failures_are_contained() {
    let mut surfaces = SurfaceSet::cpu();
    let outputs = compute_frame(&all_specs()[..1], &ring_with(1));
    let wrong = Dimensions::new(8, 8).unwrap();
    let reports = present_frame(&mut surfaces, wrong, &outputs, &RenderStyle::default());
    assert!(reports.is_empty());
}
