pub(crate) mod composite;
pub(crate) mod cpu;
pub(crate) mod motion;
pub(crate) mod spectrum;

use crate::{
    foundation::{
        core::{BezPath, Dimensions, Rect},
        error::{FramelabError, FramelabResult},
    },
    frame::buffer::PixelBuffer,
    transform::{TransformKind, TransformOutput},
};

use motion::{MotionSummary, render_motion};
use spectrum::{Gradient, render_spectrum};

/// Text annotation a host draws on top of a surface.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Label {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub color: [u8; 4],
}

/// A 2D drawing target the renderer paints into. Colors are straight-alpha RGBA8.
pub trait DisplaySurface {
    fn dims(&self) -> Dimensions;

    /// Replace the surface contents with `frame`, which must match the surface dimensions.
    fn blit(&mut self, frame: &PixelBuffer) -> FramelabResult<()>;

    /// Composite `color` at `alpha` over everything drawn so far.
    fn fade(&mut self, color: [u8; 4], alpha: f32);

    fn fill_path(&mut self, path: &BezPath, color: [u8; 4]) -> FramelabResult<()>;

    fn fill_rect(&mut self, rect: Rect, color: [u8; 4]) -> FramelabResult<()>;

    fn draw_label(&mut self, label: Label);

    fn clear_labels(&mut self);

    /// Make the pending drawing visible.
    fn present(&mut self);

    /// Copy of what was last presented.
    fn snapshot(&self) -> PixelBuffer;

    /// Labels that were last presented.
    fn labels(&self) -> &[Label];
}

/// How scalar fields and motion fields are drawn.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RenderStyle {
    pub gradient: Gradient,
    pub crosshair_color: [u8; 4],
    pub label_color: [u8; 4],
    /// Color and opacity washed over the motion view each tick, leaving a trail.
    pub fade_color: [u8; 4],
    pub fade_alpha: f32,
    /// Arrow length per pixel of displacement.
    pub arrow_scale: f64,
    pub arrow_width: f64,
    /// Vectors whose magnitude, relative to the largest possible displacement, falls below this
    /// are not drawn.
    pub min_normalized_magnitude: f32,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            gradient: Gradient::Grayscale,
            crosshair_color: [255, 64, 64, 200],
            label_color: [255, 255, 255, 255],
            fade_color: [0, 0, 0, 255],
            fade_alpha: 0.2,
            arrow_scale: 2.0,
            arrow_width: 1.5,
            min_normalized_magnitude: 0.1,
        }
    }
}

impl RenderStyle {
    pub fn validate(&self) -> FramelabResult<()> {
        if !(0.0..=1.0).contains(&self.fade_alpha) {
            return Err(FramelabError::validation("fade_alpha must be in [0, 1]"));
        }
        if !self.arrow_scale.is_finite() || self.arrow_scale <= 0.0 {
            return Err(FramelabError::validation("arrow_scale must be > 0"));
        }
        if !self.arrow_width.is_finite() || self.arrow_width <= 0.0 {
            return Err(FramelabError::validation("arrow_width must be > 0"));
        }
        if !self.min_normalized_magnitude.is_finite() {
            return Err(FramelabError::validation(
                "min_normalized_magnitude must be finite",
            ));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PresentReport {
    pub kind: TransformKind,
    /// Set for motion views.
    pub motion: Option<MotionSummary>,
}

/// Draw one transform output (or only the static chrome, when there is none) and present it.
pub fn present_output(
    surface: &mut dyn DisplaySurface,
    kind: TransformKind,
    output: Option<&TransformOutput>,
    style: &RenderStyle,
) -> FramelabResult<PresentReport> {
    let mut motion = None;
    match (kind, output) {
        (_, Some(TransformOutput::Pixels(frame))) => surface.blit(frame)?,
        (TransformKind::Spectrum, Some(TransformOutput::Field(field))) => {
            render_spectrum(surface, Some(field), style)?;
        }
        (TransformKind::Spectrum, None) => render_spectrum(surface, None, style)?,
        (TransformKind::Motion, Some(TransformOutput::Motion(field))) => {
            motion = Some(render_motion(surface, Some(field), style)?);
        }
        (TransformKind::Motion, None) => motion = Some(render_motion(surface, None, style)?),
        (_, Some(other)) => {
            return Err(FramelabError::evaluation(format!(
                "{} view cannot present {}x{} output of another kind",
                kind.as_str(),
                other.width(),
                other.height()
            )));
        }
        (TransformKind::Affine | TransformKind::BandPass, None) => {}
    }
    surface.present();
    Ok(PresentReport { kind, motion })
}

#[cfg(test)]
#[path = "../tests/unit/render/mod_tests.rs"]
mod tests;
