//! Temporal band-pass amplification over the frame ring.

use crate::{
    foundation::{
        core::{Roi, resolve_roi},
        math::{clamp_to_u8, luminance},
    },
    frame::{buffer::PixelBuffer, ring::FrameRing},
};

/// Fewest buffered frames the filter needs to produce output.
pub const MIN_BAND_PASS_HISTORY: usize = 3;

const SMOOTHING_TAPS: [f32; 3] = [0.25, 0.5, 0.25];

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BandPassParams {
    /// Gain applied to the filtered luminance before it is added back.
    pub amplification: f32,
    /// Feedback coefficient of the recursive high-pass stage, in [0, 1).
    pub high_pass_alpha: f32,
    /// Restrict processing to this region. Absent or empty means the full frame.
    pub roi: Option<Roi>,
}

impl Default for BandPassParams {
    fn default() -> Self {
        Self {
            amplification: 10.0,
            high_pass_alpha: 0.9,
            roi: None,
        }
    }
}

/// Amplify subtle periodic luminance changes of the newest frame in `history`.
///
/// Returns `None` while fewer than [`MIN_BAND_PASS_HISTORY`] frames are buffered.
#[tracing::instrument(skip(history), fields(frames = history.len()))]
pub fn band_pass_amplify(history: &FrameRing, params: &BandPassParams) -> Option<PixelBuffer> {
    if history.len() < MIN_BAND_PASS_HISTORY {
        return None;
    }
    let latest = history.latest()?;
    let dims = latest.dims();
    let roi = resolve_roi(params.roi, dims);
    let alpha = if params.high_pass_alpha.is_finite() {
        params.high_pass_alpha.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let gain = if params.amplification.is_finite() {
        params.amplification
    } else {
        0.0
    };

    let frames: Vec<&[u8]> = history.iter().map(PixelBuffer::data).collect();
    let mut out = latest.clone();
    let data = out.make_mut();
    let mut hp = vec![0.0f32; frames.len()];

    for y in roi.y..roi.y + roi.height {
        for x in roi.x..roi.x + roi.width {
            let i = latest.offset(x, y);

            let mut prev_l = luma_at(frames[0], i);
            hp[0] = 0.0;
            for (t, frame) in frames.iter().enumerate().skip(1) {
                let l = luma_at(frame, i);
                hp[t] = alpha * (hp[t - 1] + l - prev_l);
                prev_l = l;
            }

            let n = hp.len();
            let band = SMOOTHING_TAPS[0] * hp[n - 3]
                + SMOOTHING_TAPS[1] * hp[n - 2]
                + SMOOTHING_TAPS[2] * hp[n - 1];
            let delta = band * gain;
            if delta == 0.0 {
                continue;
            }
            for c in 0..3 {
                data[i + c] = clamp_to_u8(f32::from(data[i + c]) + delta);
            }
        }
    }

    Some(out)
}

#[inline]
fn luma_at(frame: &[u8], i: usize) -> f32 {
    luminance(frame[i], frame[i + 1], frame[i + 2])
}

#[cfg(test)]
#[path = "../../tests/unit/transform/bandpass.rs"]
mod tests;
