//! Exhaustive block-matching motion estimation between two consecutive frames.

use crate::{
    foundation::{
        core::Dimensions,
        error::{FramelabError, FramelabResult},
    },
    frame::buffer::PixelBuffer,
};

/// Which block difference is compared against [`MotionParams::threshold`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotionGate {
    /// Difference at the best-matching offset.
    #[default]
    BestMatch,
    /// Difference at zero displacement, i.e. how much the block changed in place.
    ZeroOffset,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MotionParams {
    /// Edge length of the square analysis blocks, in pixels.
    pub block_size: u32,
    /// Largest displacement searched along each axis.
    pub search_radius: u32,
    /// Only every `sample_step`-th pixel of a block (on both axes) is compared.
    pub sample_step: u32,
    /// Blocks whose gated mean difference does not exceed this are treated as static.
    pub threshold: f32,
    pub gate: MotionGate,
}

impl Default for MotionParams {
    fn default() -> Self {
        Self {
            block_size: 16,
            search_radius: 4,
            sample_step: 2,
            threshold: 8.0,
            gate: MotionGate::BestMatch,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MotionVector {
    /// Block center in the current frame.
    pub origin_x: f32,
    pub origin_y: f32,
    /// Displacement from the previous frame to the current one.
    pub dx: f32,
    pub dy: f32,
    pub magnitude: f32,
}

impl MotionVector {
    /// Direction in radians, y-down screen space.
    pub fn angle(&self) -> f32 {
        self.dy.atan2(self.dx)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MotionField {
    pub dims: Dimensions,
    pub block_size: u32,
    pub search_radius: u32,
    pub vectors: Vec<MotionVector>,
}

impl MotionField {
    /// Largest displacement the search could have produced.
    pub fn max_magnitude(&self) -> f32 {
        self.search_radius as f32 * std::f32::consts::SQRT_2
    }
}

/// Estimate one motion vector per block of `current` against `previous`.
///
/// Only blocks that lie entirely inside the frame are analyzed. Degenerate parameters are
/// clamped (`block_size`, `sample_step` >= 1, `threshold` >= 0, `search_radius` to the largest
/// shift that keeps a block inside the frame) rather than rejected.
#[tracing::instrument(skip(previous, current), fields(w = current.width(), h = current.height()))]
pub fn estimate_motion(
    previous: &PixelBuffer,
    current: &PixelBuffer,
    params: &MotionParams,
) -> FramelabResult<MotionField> {
    if previous.dims() != current.dims() {
        return Err(FramelabError::evaluation(
            "motion estimation expects frames of equal dimensions",
        ));
    }

    let dims = current.dims();
    let block = params.block_size.max(1);
    let step = params.sample_step.max(1);
    // Offsets past the frame leave every shifted block out of bounds.
    let max_shift = i64::from(dims.width.max(dims.height)) - i64::from(block);
    let radius = i64::from(params.search_radius).min(max_shift.max(0));
    let threshold = if params.threshold.is_nan() {
        f32::INFINITY
    } else {
        params.threshold.max(0.0)
    };

    let offsets = search_offsets(radius);
    let mut vectors = Vec::new();

    let mut by = 0u32;
    while by + block <= dims.height {
        let mut bx = 0u32;
        while bx + block <= dims.width {
            let zero = block_mad(previous, current, bx, by, block, step, 0, 0);
            let mut best = (0i64, 0i64, zero);
            for &(ox, oy) in &offsets[1..] {
                let px = i64::from(bx) + ox;
                let py = i64::from(by) + oy;
                if px < 0
                    || py < 0
                    || px + i64::from(block) > i64::from(dims.width)
                    || py + i64::from(block) > i64::from(dims.height)
                {
                    continue;
                }
                let mad = block_mad(previous, current, bx, by, block, step, ox, oy);
                if mad < best.2 {
                    best = (ox, oy, mad);
                }
            }

            let gated = match params.gate {
                MotionGate::BestMatch => best.2,
                MotionGate::ZeroOffset => zero,
            };
            if gated > threshold {
                let dx = -(best.0 as f32);
                let dy = -(best.1 as f32);
                vectors.push(MotionVector {
                    origin_x: bx as f32 + block as f32 / 2.0,
                    origin_y: by as f32 + block as f32 / 2.0,
                    dx,
                    dy,
                    magnitude: dx.hypot(dy),
                });
            }
            bx += block;
        }
        by += block;
    }

    Ok(MotionField {
        dims,
        block_size: block,
        search_radius: params.search_radius,
        vectors,
    })
}

/// Candidate offsets, zero first, then by increasing displacement so ties favour small motion.
fn search_offsets(radius: i64) -> Vec<(i64, i64)> {
    let side = usize::try_from(2 * radius + 1).unwrap_or(1);
    let mut offsets = Vec::with_capacity(side.saturating_mul(side));
    for oy in -radius..=radius {
        for ox in -radius..=radius {
            offsets.push((ox, oy));
        }
    }
    offsets.sort_by_key(|&(ox, oy)| (ox * ox + oy * oy, oy, ox));
    offsets
}

/// Mean over sampled pixels of |dR| + |dG| + |dB| between the block at `(bx, by)` in `current`
/// and the block shifted by `(ox, oy)` in `previous`. The shifted block must be in bounds.
#[allow(clippy::too_many_arguments)]
fn block_mad(
    previous: &PixelBuffer,
    current: &PixelBuffer,
    bx: u32,
    by: u32,
    block: u32,
    step: u32,
    ox: i64,
    oy: i64,
) -> f32 {
    let cur = current.data();
    let prev = previous.data();
    let mut sum = 0u64;
    let mut samples = 0u64;

    let mut y = 0u32;
    while y < block {
        let mut x = 0u32;
        while x < block {
            let cx = bx + x;
            let cy = by + y;
            let px = (i64::from(cx) + ox) as u32;
            let py = (i64::from(cy) + oy) as u32;
            let ci = current.offset(cx, cy);
            let pi = previous.offset(px, py);
            for c in 0..3 {
                sum += u64::from(cur[ci + c].abs_diff(prev[pi + c]));
            }
            samples += 1;
            x += step;
        }
        y += step;
    }

    if samples == 0 {
        0.0
    } else {
        sum as f32 / samples as f32
    }
}

#[cfg(test)]
#[path = "../../tests/unit/transform/motion.rs"]
mod tests;
