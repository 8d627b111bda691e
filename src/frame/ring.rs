use std::collections::VecDeque;

use crate::{
    foundation::{
        core::Dimensions,
        error::{FramelabError, FramelabResult},
    },
    frame::buffer::PixelBuffer,
};

/// Default number of frames kept for temporal filters.
pub const DEFAULT_RING_CAPACITY: usize = 30;

/// Largest accepted ring capacity.
pub const MAX_RING_CAPACITY: usize = 1024;

/// Fixed-capacity FIFO of the most recent frames, oldest first.
#[derive(Clone, Debug)]
pub struct FrameRing {
    frames: VecDeque<PixelBuffer>,
    capacity: usize,
}

impl FrameRing {
    pub fn new(capacity: usize) -> FramelabResult<Self> {
        if capacity == 0 {
            return Err(FramelabError::validation("frame ring capacity must be >= 1"));
        }
        if capacity > MAX_RING_CAPACITY {
            return Err(FramelabError::validation(format!(
                "frame ring capacity must be <= {MAX_RING_CAPACITY}"
            )));
        }
        Ok(Self {
            frames: VecDeque::with_capacity(capacity.min(DEFAULT_RING_CAPACITY)),
            capacity,
        })
    }

    /// Append `frame`, returning the evicted oldest frame when the ring was full.
    ///
    /// Every frame of a session shares the dimensions of the first one; a mismatching frame is
    /// rejected and leaves the ring untouched.
    pub fn push(&mut self, frame: PixelBuffer) -> FramelabResult<Option<PixelBuffer>> {
        if let Some(dims) = self.dims()
            && dims != frame.dims()
        {
            return Err(FramelabError::validation(format!(
                "frame {}x{} does not match ring dimensions {}x{}",
                frame.width(),
                frame.height(),
                dims.width,
                dims.height
            )));
        }

        let evicted = if self.frames.len() == self.capacity {
            self.frames.pop_front()
        } else {
            None
        };
        self.frames.push_back(frame);
        Ok(evicted)
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn dims(&self) -> Option<Dimensions> {
        self.frames.front().map(PixelBuffer::dims)
    }

    pub fn latest(&self) -> Option<&PixelBuffer> {
        self.frames.back()
    }

    /// The frame pushed just before [`FrameRing::latest`].
    pub fn previous(&self) -> Option<&PixelBuffer> {
        let n = self.frames.len();
        if n < 2 { None } else { self.frames.get(n - 2) }
    }

    /// Index 0 is the oldest frame.
    pub fn get(&self, index: usize) -> Option<&PixelBuffer> {
        self.frames.get(index)
    }

    /// Oldest to newest.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &PixelBuffer> + '_ {
        self.frames.iter()
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/frame/ring.rs"]
mod tests;
