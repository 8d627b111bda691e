use std::path::Path;

use anyhow::Context;

use crate::{
    foundation::{
        core::Dimensions,
        error::{FramelabError, FramelabResult},
        math::unpremultiply_rgba8_in_place,
    },
    frame::buffer::PixelBuffer,
    source::FrameSource,
};

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SvgParams {
    pub width: u32,
    pub height: u32,
    /// Radius of the circular drift, in output pixels.
    pub drift_radius: f32,
    /// Frames per drift revolution.
    pub drift_period: u32,
    /// Straight RGBA drawn behind the document.
    pub background: [u8; 4],
}

impl Default for SvgParams {
    fn default() -> Self {
        Self {
            width: 128,
            height: 128,
            drift_radius: 4.0,
            drift_period: 60,
            background: [0, 0, 0, 255],
        }
    }
}

/// An SVG document parsed once and re-rasterized every frame at a drifting offset.
pub struct SvgSource {
    name: String,
    tree: usvg::Tree,
    params: SvgParams,
    dims: Dimensions,
    frame_index: u64,
    open: bool,
}

impl std::fmt::Debug for SvgSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SvgSource")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("frame_index", &self.frame_index)
            .finish_non_exhaustive()
    }
}

impl SvgSource {
    pub fn from_data(
        name: impl Into<String>,
        bytes: &[u8],
        params: SvgParams,
    ) -> FramelabResult<Self> {
        let dims = Dimensions::new(params.width, params.height)?;
        if params.drift_period == 0 {
            return Err(FramelabError::validation("svg drift_period must be non-zero"));
        }
        let opts = usvg::Options::default();
        let tree = usvg::Tree::from_data(bytes, &opts).context("parse svg tree")?;
        Ok(Self {
            name: name.into(),
            tree,
            params,
            dims,
            frame_index: 0,
            open: false,
        })
    }

    pub fn from_path(path: &Path, params: SvgParams) -> FramelabResult<Self> {
        let bytes =
            std::fs::read(path).with_context(|| format!("read svg '{}'", path.display()))?;
        Self::from_data(path.display().to_string(), &bytes, params)
    }

    /// Drift offset for frame `t`.
    pub fn drift(&self, t: u64) -> (f32, f32) {
        let theta =
            (t % u64::from(self.params.drift_period)) as f32 / self.params.drift_period as f32;
        let theta = theta * std::f32::consts::TAU;
        (
            self.params.drift_radius * theta.cos(),
            self.params.drift_radius * theta.sin(),
        )
    }

    pub fn render_frame(&self, t: u64) -> FramelabResult<PixelBuffer> {
        let mut pixmap = resvg::tiny_skia::Pixmap::new(self.dims.width, self.dims.height)
            .ok_or_else(|| FramelabError::evaluation("failed to allocate svg pixmap"))?;
        let [r, g, b, a] = self.params.background;
        pixmap.fill(resvg::tiny_skia::Color::from_rgba8(r, g, b, a));

        let size = self.tree.size();
        let sx = self.dims.width as f32 / size.width().max(f32::EPSILON);
        let sy = self.dims.height as f32 / size.height().max(f32::EPSILON);
        let (ox, oy) = self.drift(t);
        let xform = resvg::tiny_skia::Transform::from_row(sx, 0.0, 0.0, sy, ox, oy);
        resvg::render(&self.tree, xform, &mut pixmap.as_mut());

        let mut data = pixmap.take();
        unpremultiply_rgba8_in_place(&mut data);
        PixelBuffer::from_raw(self.dims.width, self.dims.height, data)
    }
}

impl FrameSource for SvgSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn open(&mut self) -> FramelabResult<()> {
        self.open = true;
        Ok(())
    }

    fn read(&mut self) -> FramelabResult<Option<PixelBuffer>> {
        if !self.open {
            return Err(FramelabError::acquisition("svg source is not open"));
        }
        let frame = self.render_frame(self.frame_index)?;
        self.frame_index += 1;
        Ok(Some(frame))
    }

    fn close(&mut self) {
        self.open = false;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/source/svg.rs"]
mod tests;
