//! Motion-vector view: fading trail, angle-colored arrows and a summary readout.

use crate::{
    foundation::{
        core::{BezPath, Point, Vec2},
        error::FramelabResult,
        math::hsl_to_rgb,
    },
    render::{DisplaySurface, Label, RenderStyle},
    transform::motion::{MotionField, MotionVector},
};

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MotionSummary {
    pub count: usize,
    pub average_magnitude: f32,
    /// Direction of the vector sum in degrees, y-down; `None` when nothing moved on balance.
    pub dominant_angle_deg: Option<f32>,
}

pub fn summarize(field: &MotionField) -> MotionSummary {
    let count = field.vectors.len();
    if count == 0 {
        return MotionSummary::default();
    }
    let (mut sx, mut sy, mut total) = (0.0f32, 0.0f32, 0.0f32);
    for v in &field.vectors {
        sx += v.dx;
        sy += v.dy;
        total += v.magnitude;
    }
    let dominant_angle_deg = (sx != 0.0 || sy != 0.0).then(|| sy.atan2(sx).to_degrees());
    MotionSummary {
        count,
        average_magnitude: total / count as f32,
        dominant_angle_deg,
    }
}

/// Hue from direction, lightness from normalized magnitude.
pub fn arrow_color(angle_rad: f32, normalized: f32) -> [u8; 4] {
    let n = normalized.clamp(0.0, 1.0);
    let [r, g, b] = hsl_to_rgb(angle_rad.to_degrees(), 1.0, 0.35 + 0.4 * n);
    [r, g, b, 255]
}

/// Closed arrow outline from `origin` along `delta`, shaft `width` wide with a triangular head.
/// `None` for a zero-length arrow.
pub fn arrow_path(origin: Point, delta: Vec2, width: f64) -> Option<BezPath> {
    let len = delta.hypot();
    if !len.is_finite() || len <= f64::EPSILON {
        return None;
    }
    let dir = delta / len;
    let normal = Vec2::new(-dir.y, dir.x);
    let head_len = (width * 3.0).min(len * 0.5);
    let half = width * 0.5;
    let head_half = width * 1.5;
    let neck = origin + dir * (len - head_len);
    let tip = origin + delta;

    let mut path = BezPath::new();
    path.move_to(origin + normal * half);
    path.line_to(neck + normal * half);
    path.line_to(neck + normal * head_half);
    path.line_to(tip);
    path.line_to(neck - normal * head_half);
    path.line_to(neck - normal * half);
    path.line_to(origin - normal * half);
    path.close_path();
    Some(path)
}

fn normalized_magnitude(v: &MotionVector, field: &MotionField) -> f32 {
    let max = field.max_magnitude();
    if max > 0.0 { v.magnitude / max } else { 0.0 }
}

/// Fade the previous content, draw arrows for significant vectors and the summary labels.
/// Without a field only the fade and the labels are drawn.
pub fn render_motion(
    surface: &mut dyn DisplaySurface,
    field: Option<&MotionField>,
    style: &RenderStyle,
) -> FramelabResult<MotionSummary> {
    surface.fade(style.fade_color, style.fade_alpha);

    let summary = field.map(summarize).unwrap_or_default();
    if let Some(field) = field {
        for v in &field.vectors {
            let norm = normalized_magnitude(v, field);
            if norm < style.min_normalized_magnitude {
                continue;
            }
            let origin = Point::new(f64::from(v.origin_x), f64::from(v.origin_y));
            let delta = Vec2::new(f64::from(v.dx), f64::from(v.dy)) * style.arrow_scale;
            if let Some(path) = arrow_path(origin, delta, style.arrow_width) {
                surface.fill_path(&path, arrow_color(v.angle(), norm))?;
            }
        }
    }

    surface.clear_labels();
    let direction = match summary.dominant_angle_deg {
        Some(a) => format!("dir: {a:.0} deg"),
        None => "dir: -".to_string(),
    };
    let lines = [
        format!("vectors: {}", summary.count),
        format!("avg: {:.2} px", summary.average_magnitude),
        direction,
    ];
    for (i, text) in lines.into_iter().enumerate() {
        surface.draw_label(Label {
            text,
            x: 4.0,
            y: 12.0 + 12.0 * i as f64,
            color: style.label_color,
        });
    }
    Ok(summary)
}

#[cfg(test)]
#[path = "../../tests/unit/render/motion.rs"]
mod tests;
