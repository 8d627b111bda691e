pub(crate) mod affine;
pub(crate) mod bandpass;
pub(crate) mod motion;
pub(crate) mod spectrum;

use crate::{
    foundation::error::{FramelabError, FramelabResult},
    frame::{buffer::PixelBuffer, ring::FrameRing},
};

use affine::{AffineParams, affine_transform};
use bandpass::{BandPassParams, MIN_BAND_PASS_HISTORY, band_pass_amplify};
use motion::{MotionField, MotionParams, estimate_motion};
use spectrum::{ScalarField, SpectrumParams, magnitude_spectrum};

/// The four per-frame transforms. Ordering is the order they run and present within a tick.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum TransformKind {
    Affine,
    Spectrum,
    Motion,
    BandPass,
}

impl TransformKind {
    pub const ALL: [TransformKind; 4] = [
        TransformKind::Affine,
        TransformKind::Spectrum,
        TransformKind::Motion,
        TransformKind::BandPass,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TransformKind::Affine => "affine",
            TransformKind::Spectrum => "spectrum",
            TransformKind::Motion => "motion",
            TransformKind::BandPass => "band_pass",
        }
    }

    /// Frames that must be buffered (including the current one) before output is produced.
    pub fn min_history(self) -> usize {
        match self {
            TransformKind::Affine | TransformKind::Spectrum => 1,
            TransformKind::Motion => 2,
            TransformKind::BandPass => MIN_BAND_PASS_HISTORY,
        }
    }
}

/// A transform together with its parameter snapshot.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransformSpec {
    Affine(AffineParams),
    Spectrum(SpectrumParams),
    Motion(MotionParams),
    BandPass(BandPassParams),
}

impl TransformSpec {
    pub fn kind(&self) -> TransformKind {
        match self {
            TransformSpec::Affine(_) => TransformKind::Affine,
            TransformSpec::Spectrum(_) => TransformKind::Spectrum,
            TransformSpec::Motion(_) => TransformKind::Motion,
            TransformSpec::BandPass(_) => TransformKind::BandPass,
        }
    }

    /// Reject parameters that cannot be degraded into something meaningful.
    pub fn validate(&self) -> FramelabResult<()> {
        match self {
            TransformSpec::Affine(p) => {
                let finite = [
                    p.scale.x,
                    p.scale.y,
                    p.rotation_deg,
                    p.shear.x,
                    p.shear.y,
                    p.translate.x,
                    p.translate.y,
                ]
                .iter()
                .all(|v| v.is_finite());
                if !finite {
                    return Err(FramelabError::validation(
                        "affine parameters must be finite",
                    ));
                }
            }
            TransformSpec::Spectrum(_) => {}
            TransformSpec::Motion(p) => {
                if p.search_radius > 64 {
                    return Err(FramelabError::validation(
                        "motion search_radius must be <= 64",
                    ));
                }
            }
            TransformSpec::BandPass(p) => {
                if !p.amplification.is_finite() || !p.high_pass_alpha.is_finite() {
                    return Err(FramelabError::validation(
                        "band-pass parameters must be finite",
                    ));
                }
            }
        }
        Ok(())
    }
}

/// What a transform produced for one tick.
#[derive(Clone, Debug, PartialEq)]
pub enum TransformOutput {
    Pixels(PixelBuffer),
    Field(ScalarField),
    Motion(MotionField),
}

impl TransformOutput {
    pub fn width(&self) -> u32 {
        match self {
            TransformOutput::Pixels(p) => p.width(),
            TransformOutput::Field(f) => f.dims().width,
            TransformOutput::Motion(m) => m.dims.width,
        }
    }

    pub fn height(&self) -> u32 {
        match self {
            TransformOutput::Pixels(p) => p.height(),
            TransformOutput::Field(f) => f.dims().height,
            TransformOutput::Motion(m) => m.dims.height,
        }
    }
}

/// Run one transform against the newest frame of `history`.
///
/// `Ok(None)` means the tick is skipped for this transform: not enough history yet.
pub fn apply_transform(
    spec: &TransformSpec,
    history: &FrameRing,
) -> FramelabResult<Option<TransformOutput>> {
    if history.len() < spec.kind().min_history() {
        return Ok(None);
    }
    let Some(current) = history.latest() else {
        return Ok(None);
    };

    let out = match spec {
        TransformSpec::Affine(p) => TransformOutput::Pixels(affine_transform(current, p)),
        TransformSpec::Spectrum(p) => TransformOutput::Field(magnitude_spectrum(current, p)),
        TransformSpec::Motion(p) => {
            let Some(previous) = history.previous() else {
                return Ok(None);
            };
            TransformOutput::Motion(estimate_motion(previous, current, p)?)
        }
        TransformSpec::BandPass(p) => match band_pass_amplify(history, p) {
            Some(frame) => TransformOutput::Pixels(frame),
            None => return Ok(None),
        },
    };
    Ok(Some(out))
}

#[cfg(test)]
#[path = "../tests/unit/transform/mod_tests.rs"]
mod tests;
