//! 2D frequency-domain magnitude of a frame's luminance.

use rustfft::{FftPlanner, num_complex::Complex32};

use crate::{
    foundation::{core::Dimensions, math::luminance},
    frame::buffer::PixelBuffer,
};

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SpectrumParams {
    /// Compress magnitudes with `ln(1 + x)`.
    pub log_scale: bool,
}

impl Default for SpectrumParams {
    fn default() -> Self {
        Self { log_scale: true }
    }
}

/// Dense per-pixel scalar values, row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct ScalarField {
    dims: Dimensions,
    values: Vec<f32>,
}

impl ScalarField {
    pub fn new(dims: Dimensions, values: Vec<f32>) -> Option<Self> {
        (values.len() == dims.pixel_count()).then_some(Self { dims, values })
    }

    pub fn dims(&self) -> Dimensions {
        self.dims
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn get(&self, x: u32, y: u32) -> Option<f32> {
        if x >= self.dims.width || y >= self.dims.height {
            return None;
        }
        Some(self.values[y as usize * self.dims.width as usize + x as usize])
    }

    /// Largest finite value, or 0 for a field without positive finite values.
    pub fn max(&self) -> f32 {
        self.values
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(0.0f32, f32::max)
    }

    /// Location of the zero-frequency bin after the quadrant swap.
    pub fn center(&self) -> (u32, u32) {
        (self.dims.width / 2, self.dims.height / 2)
    }
}

/// Magnitude spectrum of `src`'s luminance with the zero frequency moved to the center.
#[tracing::instrument(skip(src), fields(w = src.width(), h = src.height()))]
pub fn magnitude_spectrum(src: &PixelBuffer, params: &SpectrumParams) -> ScalarField {
    let dims = src.dims();
    let w = dims.width as usize;
    let h = dims.height as usize;

    let mut rows: Vec<Complex32> = src
        .data()
        .chunks_exact(4)
        .map(|px| Complex32::new(luminance(px[0], px[1], px[2]), 0.0))
        .collect();

    let mut planner = FftPlanner::<f32>::new();

    // Row pass: the buffer holds `h` rows of length `w` back to back.
    planner.plan_fft_forward(w).process(&mut rows);

    // Column pass on the transposed data.
    let mut cols = vec![Complex32::new(0.0, 0.0); w * h];
    for y in 0..h {
        for x in 0..w {
            cols[x * h + y] = rows[y * w + x];
        }
    }
    planner.plan_fft_forward(h).process(&mut cols);

    let mut values = vec![0.0f32; w * h];
    let (half_w, half_h) = (w / 2, h / 2);
    for x in 0..w {
        for y in 0..h {
            let mut m = cols[x * h + y].norm();
            if params.log_scale {
                m = m.ln_1p();
            }
            let sx = (x + half_w) % w;
            let sy = (y + half_h) % h;
            values[sy * w + sx] = m;
        }
    }

    ScalarField { dims, values }
}

#[cfg(test)]
#[path = "../../tests/unit/transform/spectrum.rs"]
mod tests;
