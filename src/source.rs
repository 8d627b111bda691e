pub(crate) mod image_seq;
pub(crate) mod live;
pub(crate) mod pattern;
pub(crate) mod slot;
pub(crate) mod svg;
pub(crate) mod video;

use crate::{
    driver::scheduler::CancelToken, foundation::error::FramelabResult,
    frame::buffer::PixelBuffer,
};

/// A producer of raster frames: camera feed, video file, generator.
///
/// Implementations never block waiting for readiness. `read` returns `Ok(None)` while the
/// underlying device or decoder has nothing to hand out yet, and `Err` once the source has
/// failed for good.
pub trait FrameSource {
    /// Short human-readable label used in logs and notices.
    fn name(&self) -> &str;

    /// Acquire the underlying resources. Called once before the first `read`.
    fn open(&mut self) -> FramelabResult<()>;

    /// Snapshot of the next frame, if one is ready.
    fn read(&mut self) -> FramelabResult<Option<PixelBuffer>>;

    /// Release the underlying resources. Must be idempotent.
    fn close(&mut self);

    /// Token tripped when the owning driver is torn down. Long-running extraction checks it.
    fn bind_cancel(&mut self, _token: CancelToken) {}
}

impl<T: FrameSource + ?Sized> FrameSource for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn open(&mut self) -> FramelabResult<()> {
        (**self).open()
    }

    fn read(&mut self) -> FramelabResult<Option<PixelBuffer>> {
        (**self).read()
    }

    fn close(&mut self) {
        (**self).close()
    }

    fn bind_cancel(&mut self, token: CancelToken) {
        (**self).bind_cancel(token)
    }
}
