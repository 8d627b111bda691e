use crate::{
    foundation::{core::Rect, error::FramelabResult, math::clamp_to_u8},
    frame::buffer::PixelBuffer,
    render::{DisplaySurface, Label, RenderStyle},
    transform::spectrum::ScalarField,
};

/// Maps a normalized value in [0, 1] to a color.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Gradient {
    #[default]
    Grayscale,
    TwoColor { low: [u8; 3], high: [u8; 3] },
}

impl Gradient {
    pub fn map(&self, t: f32) -> [u8; 4] {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        match self {
            Gradient::Grayscale => {
                let v = clamp_to_u8(t * 255.0);
                [v, v, v, 255]
            }
            Gradient::TwoColor { low, high } => {
                let lerp =
                    |a: u8, b: u8| clamp_to_u8(f32::from(a) + (f32::from(b) - f32::from(a)) * t);
                [
                    lerp(low[0], high[0]),
                    lerp(low[1], high[1]),
                    lerp(low[2], high[2]),
                    255,
                ]
            }
        }
    }
}

/// Normalize by the field maximum and map every value through `gradient`. An all-zero field maps
/// to the low end.
pub fn colorize_field(field: &ScalarField, gradient: &Gradient) -> PixelBuffer {
    let max = field.max();
    let inv = if max > 0.0 { 1.0 / max } else { 0.0 };
    let mut data = Vec::with_capacity(field.values().len() * 4);
    for &v in field.values() {
        data.extend_from_slice(&gradient.map(v * inv));
    }
    PixelBuffer::from_parts(field.dims(), data)
}

/// Colorized spectrum with a crosshair through the zero-frequency bin and axis labels.
pub fn render_spectrum(
    surface: &mut dyn DisplaySurface,
    field: Option<&ScalarField>,
    style: &RenderStyle,
) -> FramelabResult<()> {
    if let Some(field) = field {
        surface.blit(&colorize_field(field, &style.gradient))?;
    }

    let dims = surface.dims();
    let (w, h) = (f64::from(dims.width), f64::from(dims.height));
    let cx = f64::from(dims.width / 2);
    let cy = f64::from(dims.height / 2);
    surface.fill_rect(Rect::new(0.0, cy, w, cy + 1.0), style.crosshair_color)?;
    surface.fill_rect(Rect::new(cx, 0.0, cx + 1.0, h), style.crosshair_color)?;

    surface.clear_labels();
    let axes = [
        ("fx", w - 12.0, cy - 4.0),
        ("fy", cx + 4.0, 10.0),
        ("0", cx + 3.0, cy - 3.0),
    ];
    for (text, x, y) in axes {
        surface.draw_label(Label {
            text: text.to_string(),
            x,
            y,
            color: style.label_color,
        });
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/spectrum.rs"]
mod tests;
