use crate::foundation::error::{FramelabError, FramelabResult};

pub use kurbo::{Affine, BezPath, Point, Rect, Vec2};

/// Width and height of a frame in pixels. Both are non-zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> FramelabResult<Self> {
        if width == 0 || height == 0 {
            return Err(FramelabError::validation(format!(
                "frame dimensions must be non-zero, got {width}x{height}"
            )));
        }
        Ok(Self { width, height })
    }

    pub fn pixel_count(self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Byte length of a tightly packed RGBA8 buffer with these dimensions.
    pub fn byte_len(self) -> FramelabResult<usize> {
        (self.width as usize)
            .checked_mul(self.height as usize)
            .and_then(|v| v.checked_mul(4))
            .ok_or_else(|| FramelabError::validation("frame buffer size overflow"))
    }

    pub fn contains(self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && x < i64::from(self.width) && y < i64::from(self.height)
    }

    /// Pixel-grid center, i.e. the point equidistant from the first and last pixel.
    pub fn center(self) -> Point {
        Point::new(
            (f64::from(self.width) - 1.0) / 2.0,
            (f64::from(self.height) - 1.0) / 2.0,
        )
    }

    pub fn full_roi(self) -> Roi {
        Roi {
            x: 0,
            y: 0,
            width: self.width,
            height: self.height,
        }
    }
}

/// Rectangular region of interest in pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Roi {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Roi {
    /// Region spanned by two drag points, in any order. Negative coordinates clamp to 0.
    pub fn from_corners(a: Point, b: Point) -> Self {
        let x0 = a.x.min(b.x).max(0.0).floor();
        let y0 = a.y.min(b.y).max(0.0).floor();
        let x1 = a.x.max(b.x).max(0.0).floor();
        let y1 = a.y.max(b.y).max(0.0).floor();
        Self {
            x: x0 as u32,
            y: y0 as u32,
            width: (x1 - x0) as u32,
            height: (y1 - y0) as u32,
        }
    }

    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Intersect with the frame. `None` when nothing of the region is inside it.
    pub fn clip_to(self, dims: Dimensions) -> Option<Roi> {
        if self.is_empty() || self.x >= dims.width || self.y >= dims.height {
            return None;
        }
        let x_end = self.x.saturating_add(self.width).min(dims.width);
        let y_end = self.y.saturating_add(self.height).min(dims.height);
        Some(Roi {
            x: self.x,
            y: self.y,
            width: x_end - self.x,
            height: y_end - self.y,
        })
    }

    pub fn contains(self, x: u32, y: u32) -> bool {
        x >= self.x
            && y >= self.y
            && x - self.x < self.width
            && y - self.y < self.height
    }
}

/// Effective processing region: a usable ROI, or the full frame when the ROI is absent,
/// zero-sized or entirely outside the frame.
pub fn resolve_roi(roi: Option<Roi>, dims: Dimensions) -> Roi {
    roi.and_then(|r| r.clip_to(dims))
        .unwrap_or_else(|| dims.full_roi())
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
