use super::*;
use crate::foundation::core::Dimensions;

fn ring_with(n: usize) -> FrameRing {
    let mut ring = FrameRing::new(5).unwrap();
    for i in 0..n {
        let v = (i * 40) as u8;
        ring.push(PixelBuffer::filled(Dimensions::new(16, 16).unwrap(), [v, v, v, 255]).unwrap())
            .unwrap();
    }
    ring
}

#[test]
fn spec_json_is_tagged_by_kind() {
    let spec: TransformSpec =
        serde_json::from_str(r#"{ "kind": "motion", "block_size": 8, "gate": "zero_offset" }"#)
            .unwrap();
    let TransformSpec::Motion(p) = &spec else {
        panic!("expected motion spec, got {spec:?}");
    };
    assert_eq!(p.block_size, 8);
    assert_eq!(p.gate, motion::MotionGate::ZeroOffset);
    assert_eq!(spec.kind(), TransformKind::Motion);

    let band: TransformSpec = serde_json::from_str(r#"{ "kind": "band_pass" }"#).unwrap();
    assert_eq!(band.kind(), TransformKind::BandPass);
}

#[test]
fn each_kind_skips_until_it_has_enough_history() {
    let specs = [
        TransformSpec::Affine(AffineParams::default()),
        TransformSpec::Spectrum(SpectrumParams::default()),
        TransformSpec::Motion(MotionParams::default()),
        TransformSpec::BandPass(BandPassParams::default()),
    ];
    for spec in &specs {
        let need = spec.kind().min_history();
        for n in 0..need {
            assert!(apply_transform(spec, &ring_with(n)).unwrap().is_none());
        }
        let out = apply_transform(spec, &ring_with(need)).unwrap().unwrap();
        assert_eq!((out.width(), out.height()), (16, 16));
    }
}

#[test]
fn validate_rejects_non_finite_parameters() {
    let bad = TransformSpec::Affine(AffineParams {
        rotation_deg: f64::NAN,
        ..AffineParams::default()
    });
    assert!(bad.validate().is_err());
    assert!(
        TransformSpec::BandPass(BandPassParams {
            amplification: f32::INFINITY,
            ..BandPassParams::default()
        })
        .validate()
        .is_err()
    );
    assert!(TransformSpec::Spectrum(SpectrumParams::default()).validate().is_ok());
}

#[test]
fn kind_names_are_stable() {
    let names: Vec<_> = TransformKind::ALL.iter().map(|k| k.as_str()).collect();
    assert_eq!(names, vec!["affine", "spectrum", "motion", "band_pass"]);
}
