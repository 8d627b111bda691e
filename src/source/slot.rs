use crate::{
    driver::scheduler::CancelToken,
    foundation::error::{FramelabError, FramelabResult},
    frame::buffer::PixelBuffer,
    source::FrameSource,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AcquisitionState {
    /// No source installed, or the installed one is released.
    Closed,
    Open,
    /// The source failed. Acquisition yields nothing until [`AcquisitionSlot::reopen`] or a new
    /// source is installed.
    Failed { reason: String },
}

/// Owner of at most one [`FrameSource`].
///
/// Installing a source always releases the previous one first, so two devices are never held at
/// the same time. Failures are reported exactly once: a `warn!` and a notice the host can show.
pub struct AcquisitionSlot {
    source: Option<Box<dyn FrameSource>>,
    state: AcquisitionState,
    notice: Option<String>,
    cancel: CancelToken,
}

impl AcquisitionSlot {
    pub fn new(cancel: CancelToken) -> Self {
        Self {
            source: None,
            state: AcquisitionState::Closed,
            notice: None,
            cancel,
        }
    }

    pub fn state(&self) -> &AcquisitionState {
        &self.state
    }

    pub fn source_name(&self) -> Option<&str> {
        self.source.as_deref().map(|s| s.name())
    }

    pub fn has_source(&self) -> bool {
        self.source.is_some()
    }

    /// Replace the current source without opening the new one.
    pub fn install(&mut self, mut source: Box<dyn FrameSource>) {
        self.release();
        source.bind_cancel(self.cancel.clone());
        self.source = Some(source);
        self.state = AcquisitionState::Closed;
        self.notice = None;
    }

    /// Open the installed source. A failure is recorded and reported once, then returned.
    pub fn open(&mut self) -> FramelabResult<()> {
        let Some(source) = self.source.as_mut() else {
            return Err(FramelabError::acquisition("no frame source installed"));
        };
        if self.state == AcquisitionState::Open {
            return Ok(());
        }
        match source.open() {
            Ok(()) => {
                tracing::info!(source = source.name(), "frame source opened");
                self.state = AcquisitionState::Open;
                Ok(())
            }
            Err(err) => {
                let reason = err.to_string();
                self.fail(reason.clone());
                Err(FramelabError::acquisition(reason))
            }
        }
    }

    /// Retry after a failure. This is the explicit user action that ends a failed state.
    pub fn reopen(&mut self) -> FramelabResult<()> {
        if let Some(source) = self.source.as_mut() {
            source.close();
        }
        self.state = AcquisitionState::Closed;
        self.notice = None;
        self.open()
    }

    /// Next frame if the source is open and ready. Never blocks.
    pub fn acquire(&mut self) -> Option<PixelBuffer> {
        if self.state != AcquisitionState::Open {
            return None;
        }
        let source = self.source.as_mut()?;
        match source.read() {
            Ok(frame) => frame,
            Err(err) => {
                source.close();
                self.fail(err.to_string());
                None
            }
        }
    }

    /// Close the source, keeping it installed so it can be opened again.
    pub fn release(&mut self) {
        if let Some(source) = self.source.as_mut() {
            source.close();
            if self.state == AcquisitionState::Open {
                tracing::info!(source = source.name(), "frame source released");
            }
        }
        if self.state == AcquisitionState::Open {
            self.state = AcquisitionState::Closed;
        }
    }

    /// One-shot user-facing failure message; `None` after the first call.
    pub fn take_failure_notice(&mut self) -> Option<String> {
        self.notice.take()
    }

    fn fail(&mut self, reason: String) {
        if matches!(self.state, AcquisitionState::Failed { .. }) {
            return;
        }
        let name = self.source_name().unwrap_or("unknown").to_string();
        tracing::warn!(source = %name, %reason, "frame source unavailable");
        self.notice = Some(format!("{name}: {reason}"));
        self.state = AcquisitionState::Failed { reason };
    }
}

impl Drop for AcquisitionSlot {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/source/slot.rs"]
mod tests;
