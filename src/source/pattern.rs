use crate::{
    foundation::{
        core::Dimensions,
        error::{FramelabError, FramelabResult},
        math::{clamp_to_u8, mix64},
    },
    frame::buffer::PixelBuffer,
    source::FrameSource,
};

/// Deterministic moving-noise generator settings.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PatternParams {
    pub width: u32,
    pub height: u32,
    /// Whole-pixel displacement per frame, `[dx, dy]`.
    pub velocity: [i32; 2],
    /// Edge length of one noise cell. Larger cells give block matching more texture to lock on to.
    pub cell: u32,
    pub seed: u64,
    /// Brightness pulse period in frames; `None` disables the pulse.
    pub pulse_period: Option<u32>,
    /// Pulse amplitude as a fraction of brightness.
    pub pulse_depth: f32,
    /// Stop producing frames after this many; `None` runs forever.
    pub frame_limit: Option<u64>,
}

impl Default for PatternParams {
    fn default() -> Self {
        Self {
            width: 64,
            height: 64,
            velocity: [1, 0],
            cell: 4,
            seed: 0x5EED,
            pulse_period: None,
            pulse_depth: 0.1,
            frame_limit: None,
        }
    }
}

/// Synthetic source used for headless runs and tests. Frame `t` is the noise field shifted by
/// `t * velocity`, so consecutive frames differ by an exact translation.
#[derive(Debug)]
pub struct PatternSource {
    params: PatternParams,
    dims: Dimensions,
    frame_index: u64,
    open: bool,
}

impl PatternSource {
    pub fn new(params: PatternParams) -> FramelabResult<Self> {
        let dims = Dimensions::new(params.width, params.height)?;
        if params.cell == 0 {
            return Err(FramelabError::validation("pattern cell must be non-zero"));
        }
        if params.pulse_period == Some(0) {
            return Err(FramelabError::validation(
                "pattern pulse_period must be non-zero",
            ));
        }
        Ok(Self {
            params,
            dims,
            frame_index: 0,
            open: false,
        })
    }

    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// Render frame `t` without advancing the source.
    pub fn render_frame(&self, t: u64) -> PixelBuffer {
        let p = &self.params;
        let cell = i64::from(p.cell);
        let t = t as i64;
        let shift_x = i64::from(p.velocity[0]).wrapping_mul(t);
        let shift_y = i64::from(p.velocity[1]).wrapping_mul(t);
        let gain = match p.pulse_period {
            Some(period) => {
                let phase = (t as f64 / f64::from(period)) * std::f64::consts::TAU;
                1.0 + p.pulse_depth * phase.sin() as f32
            }
            None => 1.0,
        };

        let mut data = Vec::with_capacity(self.dims.pixel_count() * 4);
        for y in 0..i64::from(self.dims.height) {
            let cy = (y - shift_y).div_euclid(cell);
            for x in 0..i64::from(self.dims.width) {
                let cx = (x - shift_x).div_euclid(cell);
                let h = mix64(
                    p.seed
                        ^ (cx as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
                        ^ (cy as u64).wrapping_mul(0xC2B2_AE3D_27D4_EB4F),
                );
                data.push(clamp_to_u8(f32::from(h as u8) * gain));
                data.push(clamp_to_u8(f32::from((h >> 8) as u8) * gain));
                data.push(clamp_to_u8(f32::from((h >> 16) as u8) * gain));
                data.push(255);
            }
        }
        PixelBuffer::from_parts(self.dims, data)
    }
}

impl FrameSource for PatternSource {
    fn name(&self) -> &str {
        "pattern"
    }

    fn open(&mut self) -> FramelabResult<()> {
        self.open = true;
        Ok(())
    }

    fn read(&mut self) -> FramelabResult<Option<PixelBuffer>> {
        if !self.open {
            return Err(FramelabError::acquisition("pattern source is not open"));
        }
        if let Some(limit) = self.params.frame_limit
            && self.frame_index >= limit
        {
            return Ok(None);
        }
        let frame = self.render_frame(self.frame_index);
        self.frame_index += 1;
        Ok(Some(frame))
    }

    fn close(&mut self) {
        self.open = false;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/source/pattern.rs"]
mod tests;
