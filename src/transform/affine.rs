//! Affine spatial transform with nearest-neighbour inverse mapping.

use crate::{
    foundation::core::{Affine, Dimensions, Point, Vec2},
    frame::buffer::PixelBuffer,
};

/// Scale, rotation, shear and translation applied about the frame center.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AffineParams {
    pub scale: Vec2,
    /// Degrees, clockwise-positive in y-down screen space.
    pub rotation_deg: f64,
    /// Skew factors along x and y.
    pub shear: Vec2,
    pub translate: Vec2,
}

impl Default for AffineParams {
    fn default() -> Self {
        Self {
            scale: Vec2::new(1.0, 1.0),
            rotation_deg: 0.0,
            shear: Vec2::ZERO,
            translate: Vec2::ZERO,
        }
    }
}

impl AffineParams {
    /// Forward matrix mapping source pixel coordinates to destination pixel coordinates.
    pub fn to_affine(&self, dims: Dimensions) -> Affine {
        let center = dims.center().to_vec2();

        // Canonical order:
        // T(center + translate) * R(rot) * Skew(shear) * S(scale) * T(-center)
        Affine::translate(center + self.translate)
            * Affine::rotate(self.rotation_deg.to_radians())
            * Affine::skew(self.shear.x, self.shear.y)
            * Affine::scale_non_uniform(self.scale.x, self.scale.y)
            * Affine::translate(-center)
    }
}

/// Resample `src` through the transform described by `params`.
///
/// Each destination pixel is inverse-mapped into the source and rounded to the nearest pixel.
/// Destinations whose source falls outside the frame are not written and stay transparent
/// black. A non-invertible matrix produces an entirely transparent frame.
pub fn affine_transform(src: &PixelBuffer, params: &AffineParams) -> PixelBuffer {
    let dims = src.dims();
    let mut out = vec![0u8; src.data().len()];

    let forward = params.to_affine(dims);
    let det = forward.determinant();
    if !det.is_finite() || det.abs() < 1e-12 {
        tracing::debug!(det, "affine transform is not invertible; emitting empty frame");
        return PixelBuffer::from_parts(dims, out);
    }
    let inverse = forward.inverse();

    let data = src.data();
    for y in 0..dims.height {
        for x in 0..dims.width {
            let p = inverse * Point::new(f64::from(x), f64::from(y));
            if !p.x.is_finite() || !p.y.is_finite() {
                continue;
            }
            let sx = p.x.round() as i64;
            let sy = p.y.round() as i64;
            if !dims.contains(sx, sy) {
                continue;
            }
            let si = src.offset(sx as u32, sy as u32);
            let di = src.offset(x, y);
            out[di..di + 4].copy_from_slice(&data[si..si + 4]);
        }
    }

    PixelBuffer::from_parts(dims, out)
}

#[cfg(test)]
#[path = "../../tests/unit/transform/affine.rs"]
mod tests;
