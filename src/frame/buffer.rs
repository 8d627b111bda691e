use std::sync::Arc;

use crate::foundation::{
    core::Dimensions,
    error::{FramelabError, FramelabResult},
};

/// Straight-alpha RGBA8 raster, row-major, tightly packed.
///
/// Storage is shared between clones. A buffer handed to the next pipeline stage is never written
/// through a shared handle: [`PixelBuffer::make_mut`] detaches the storage first, so a renderer
/// holding an older clone keeps seeing the pixels it was given.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    dims: Dimensions,
    data: Arc<Vec<u8>>,
}

impl PixelBuffer {
    /// Fully transparent black buffer.
    pub fn new(dims: Dimensions) -> FramelabResult<Self> {
        let len = dims.byte_len()?;
        Ok(Self {
            dims,
            data: Arc::new(vec![0u8; len]),
        })
    }

    pub fn filled(dims: Dimensions, rgba: [u8; 4]) -> FramelabResult<Self> {
        let len = dims.byte_len()?;
        let mut data = Vec::with_capacity(len);
        for _ in 0..dims.pixel_count() {
            data.extend_from_slice(&rgba);
        }
        Ok(Self {
            dims,
            data: Arc::new(data),
        })
    }

    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> FramelabResult<Self> {
        let dims = Dimensions::new(width, height)?;
        let expected = dims.byte_len()?;
        if data.len() != expected {
            return Err(FramelabError::validation(format!(
                "pixel buffer expects {expected} bytes for {width}x{height}, got {}",
                data.len()
            )));
        }
        Ok(Self {
            dims,
            data: Arc::new(data),
        })
    }

    /// Wrap bytes produced from a buffer of the same dimensions.
    pub(crate) fn from_parts(dims: Dimensions, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), dims.pixel_count() * 4);
        Self {
            dims,
            data: Arc::new(data),
        }
    }

    pub fn dims(&self) -> Dimensions {
        self.dims
    }

    pub fn width(&self) -> u32 {
        self.dims.width
    }

    pub fn height(&self) -> u32 {
        self.dims.height
    }

    pub fn data(&self) -> &[u8] {
        self.data.as_slice()
    }

    /// Byte offset of pixel `(x, y)`. Caller guarantees the coordinate is in bounds.
    #[inline]
    pub fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.dims.width as usize + x as usize) * 4
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.dims.width || y >= self.dims.height {
            return None;
        }
        let i = self.offset(x, y);
        let d = &self.data[i..i + 4];
        Some([d[0], d[1], d[2], d[3]])
    }

    /// Mutable pixel bytes, cloning the storage if another handle still shares it.
    pub fn make_mut(&mut self) -> &mut [u8] {
        Arc::make_mut(&mut self.data).as_mut_slice()
    }

    pub fn shares_storage_with(&self, other: &PixelBuffer) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }

    pub fn into_raw(self) -> Vec<u8> {
        Arc::try_unwrap(self.data).unwrap_or_else(|shared| shared.as_ref().clone())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/frame/buffer.rs"]
mod tests;
