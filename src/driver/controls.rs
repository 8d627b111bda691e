//! Transform parameters as an immutable snapshot plus a pure reducer over user input.
//!
//! The driver holds the current state behind an `Arc` and swaps it between ticks, so a tick that
//! is already running keeps reading the snapshot it started with.

use std::collections::BTreeMap;

use crate::{
    foundation::core::{Point, Roi},
    transform::{
        TransformKind, TransformSpec, affine::AffineParams, bandpass::BandPassParams,
        motion::{MotionGate, MotionParams},
        spectrum::SpectrumParams,
    },
};

/// Largest motion search radius a slider may set.
pub const MAX_SEARCH_RADIUS: u32 = 64;

#[derive(Clone, Debug, PartialEq)]
pub struct TransformEntry {
    pub spec: TransformSpec,
    pub enabled: bool,
}

/// One numeric parameter a host slider can drive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SliderParam {
    ScaleX,
    ScaleY,
    RotationDeg,
    ShearX,
    ShearY,
    TranslateX,
    TranslateY,
    BlockSize,
    SearchRadius,
    SampleStep,
    Threshold,
    Amplification,
    HighPassAlpha,
}

impl SliderParam {
    pub fn target(self) -> TransformKind {
        match self {
            SliderParam::ScaleX
            | SliderParam::ScaleY
            | SliderParam::RotationDeg
            | SliderParam::ShearX
            | SliderParam::ShearY
            | SliderParam::TranslateX
            | SliderParam::TranslateY => TransformKind::Affine,
            SliderParam::BlockSize
            | SliderParam::SearchRadius
            | SliderParam::SampleStep
            | SliderParam::Threshold => TransformKind::Motion,
            SliderParam::Amplification | SliderParam::HighPassAlpha => TransformKind::BandPass,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ControlEvent {
    Toggle { kind: TransformKind },
    SetEnabled { kind: TransformKind, enabled: bool },
    Slider { param: SliderParam, value: f64 },
    /// Pointer pressed on the band-pass view, in frame pixel coordinates.
    DragStart { x: f64, y: f64 },
    /// Pointer released; the drag rectangle becomes the band-pass ROI.
    DragEnd { x: f64, y: f64 },
    ClearRoi,
    SetLogScale { enabled: bool },
    SetMotionGate { gate: MotionGate },
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ControlState {
    entries: BTreeMap<TransformKind, TransformEntry>,
    drag_origin: Option<Point>,
}

impl ControlState {
    /// All given transforms, enabled. A later spec of the same kind replaces an earlier one.
    pub fn new(specs: impl IntoIterator<Item = TransformSpec>) -> Self {
        let entries = specs
            .into_iter()
            .map(|spec| {
                (
                    spec.kind(),
                    TransformEntry {
                        spec,
                        enabled: true,
                    },
                )
            })
            .collect();
        Self {
            entries,
            drag_origin: None,
        }
    }

    /// Every transform kind with default parameters, all disabled.
    pub fn with_all_disabled() -> Self {
        let mut state = Self::new([
            TransformSpec::Affine(AffineParams::default()),
            TransformSpec::Spectrum(SpectrumParams::default()),
            TransformSpec::Motion(MotionParams::default()),
            TransformSpec::BandPass(BandPassParams::default()),
        ]);
        for entry in state.entries.values_mut() {
            entry.enabled = false;
        }
        state
    }

    pub fn entry(&self, kind: TransformKind) -> Option<&TransformEntry> {
        self.entries.get(&kind)
    }

    /// Every configured transform, enabled or not, in run order.
    pub fn entries(&self) -> impl Iterator<Item = &TransformEntry> {
        self.entries.values()
    }

    pub fn is_enabled(&self, kind: TransformKind) -> bool {
        self.entries.get(&kind).is_some_and(|e| e.enabled)
    }

    pub fn drag_origin(&self) -> Option<Point> {
        self.drag_origin
    }

    /// Enabled transforms in run order.
    pub fn snapshot(&self) -> Vec<TransformSpec> {
        self.entries
            .values()
            .filter(|e| e.enabled)
            .map(|e| e.spec.clone())
            .collect()
    }

    pub fn enabled_kinds(&self) -> Vec<TransformKind> {
        self.entries
            .iter()
            .filter(|(_, e)| e.enabled)
            .map(|(k, _)| *k)
            .collect()
    }
}

/// Apply one input event. Events addressing a transform that is not configured, and non-finite
/// slider values, leave the state unchanged.
pub fn reduce(state: &ControlState, event: &ControlEvent) -> ControlState {
    let mut next = state.clone();
    match *event {
        ControlEvent::Toggle { kind } => {
            if let Some(e) = next.entries.get_mut(&kind) {
                e.enabled = !e.enabled;
            }
        }
        ControlEvent::SetEnabled { kind, enabled } => {
            if let Some(e) = next.entries.get_mut(&kind) {
                e.enabled = enabled;
            }
        }
        ControlEvent::Slider { param, value } => {
            if value.is_finite()
                && let Some(e) = next.entries.get_mut(&param.target())
            {
                apply_slider(&mut e.spec, param, value);
            }
        }
        ControlEvent::DragStart { x, y } => {
            if x.is_finite() && y.is_finite() {
                next.drag_origin = Some(Point::new(x, y));
            }
        }
        ControlEvent::DragEnd { x, y } => {
            if let Some(origin) = next.drag_origin.take()
                && x.is_finite()
                && y.is_finite()
                && let Some(TransformSpec::BandPass(p)) = next
                    .entries
                    .get_mut(&TransformKind::BandPass)
                    .map(|e| &mut e.spec)
            {
                let roi = Roi::from_corners(origin, Point::new(x, y));
                p.roi = (!roi.is_empty()).then_some(roi);
            }
        }
        ControlEvent::ClearRoi => {
            next.drag_origin = None;
            if let Some(TransformSpec::BandPass(p)) = next
                .entries
                .get_mut(&TransformKind::BandPass)
                .map(|e| &mut e.spec)
            {
                p.roi = None;
            }
        }
        ControlEvent::SetLogScale { enabled } => {
            if let Some(TransformSpec::Spectrum(p)) = next
                .entries
                .get_mut(&TransformKind::Spectrum)
                .map(|e| &mut e.spec)
            {
                p.log_scale = enabled;
            }
        }
        ControlEvent::SetMotionGate { gate } => {
            if let Some(TransformSpec::Motion(p)) = next
                .entries
                .get_mut(&TransformKind::Motion)
                .map(|e| &mut e.spec)
            {
                p.gate = gate;
            }
        }
    }
    next
}

fn apply_slider(spec: &mut TransformSpec, param: SliderParam, value: f64) {
    let whole = |v: f64, lo: u32, hi: u32| v.round().clamp(f64::from(lo), f64::from(hi)) as u32;
    match spec {
        TransformSpec::Affine(p) => match param {
            SliderParam::ScaleX => p.scale.x = value,
            SliderParam::ScaleY => p.scale.y = value,
            SliderParam::RotationDeg => p.rotation_deg = value,
            SliderParam::ShearX => p.shear.x = value,
            SliderParam::ShearY => p.shear.y = value,
            SliderParam::TranslateX => p.translate.x = value,
            SliderParam::TranslateY => p.translate.y = value,
            _ => {}
        },
        TransformSpec::Motion(p) => match param {
            SliderParam::BlockSize => p.block_size = whole(value, 1, u32::MAX),
            SliderParam::SearchRadius => p.search_radius = whole(value, 0, MAX_SEARCH_RADIUS),
            SliderParam::SampleStep => p.sample_step = whole(value, 1, u32::MAX),
            SliderParam::Threshold => p.threshold = value.max(0.0) as f32,
            _ => {}
        },
        TransformSpec::BandPass(p) => match param {
            SliderParam::Amplification => p.amplification = value as f32,
            SliderParam::HighPassAlpha => p.high_pass_alpha = value.clamp(0.0, 1.0) as f32,
            _ => {}
        },
        TransformSpec::Spectrum(_) => {}
    }
}

#[cfg(test)]
#[path = "../../tests/unit/driver/controls.rs"]
mod tests;
