use std::{sync::Arc, time::Duration};

use crate::{
    driver::{
        controls::{ControlEvent, ControlState, reduce},
        pipeline::{SurfaceSet, compute_frame, present_frame},
        scheduler::{CallbackHandle, CancelToken, Scheduler},
        stats::{DriverStats, FrameRateEstimator},
    },
    foundation::error::FramelabResult,
    frame::ring::{DEFAULT_RING_CAPACITY, FrameRing},
    render::{PresentReport, RenderStyle, motion::MotionSummary},
    source::{
        FrameSource,
        slot::{AcquisitionSlot, AcquisitionState},
    },
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DriverState {
    Idle,
    Running,
    Paused,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DriverOptions {
    pub ring_capacity: usize,
    pub style: RenderStyle,
}

impl Default for DriverOptions {
    fn default() -> Self {
        Self {
            ring_capacity: DEFAULT_RING_CAPACITY,
            style: RenderStyle::default(),
        }
    }
}

/// What happened during one tick.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickReport {
    /// A frame was acquired and processed.
    pub processed: bool,
    /// The tick asked the scheduler for another callback.
    pub rescheduled: bool,
    pub presented: Vec<PresentReport>,
    pub fps: f64,
}

/// Cooperative frame loop: acquire, transform, present, reschedule.
///
/// The driver owns the acquisition slot, the frame ring, the current control snapshot and the
/// view surfaces. It never runs a tick on its own; the host calls [`LoopDriver::tick`] when the
/// callback requested through the [`Scheduler`] fires.
pub struct LoopDriver<S: Scheduler> {
    state: DriverState,
    scheduler: S,
    pending: Option<CallbackHandle>,
    cancel: CancelToken,
    slot: AcquisitionSlot,
    ring: FrameRing,
    controls: Arc<ControlState>,
    surfaces: SurfaceSet,
    style: RenderStyle,
    fps: FrameRateEstimator,
    stats: DriverStats,
    last_motion: Option<MotionSummary>,
}

impl<S: Scheduler> LoopDriver<S> {
    pub fn new(
        scheduler: S,
        controls: ControlState,
        surfaces: SurfaceSet,
        options: DriverOptions,
    ) -> FramelabResult<Self> {
        options.style.validate()?;
        for entry in controls.entries() {
            entry.spec.validate()?;
        }
        let cancel = CancelToken::new();
        Ok(Self {
            state: DriverState::Idle,
            scheduler,
            pending: None,
            slot: AcquisitionSlot::new(cancel.clone()),
            cancel,
            ring: FrameRing::new(options.ring_capacity)?,
            controls: Arc::new(controls),
            surfaces,
            style: options.style,
            fps: FrameRateEstimator::new(),
            stats: DriverStats::default(),
            last_motion: None,
        })
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn stats(&self) -> &DriverStats {
        &self.stats
    }

    pub fn ring(&self) -> &FrameRing {
        &self.ring
    }

    pub fn controls(&self) -> Arc<ControlState> {
        Arc::clone(&self.controls)
    }

    pub fn surfaces(&self) -> &SurfaceSet {
        &self.surfaces
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn pending_callback(&self) -> Option<CallbackHandle> {
        self.pending
    }

    pub fn acquisition_state(&self) -> &AcquisitionState {
        self.slot.state()
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn last_motion(&self) -> Option<&MotionSummary> {
        self.last_motion.as_ref()
    }

    /// One-shot message describing the latest acquisition failure.
    pub fn take_failure_notice(&mut self) -> Option<String> {
        self.slot.take_failure_notice()
    }

    /// Swap the frame source. The previous source is released first; a running driver opens the
    /// new one immediately and starts a fresh session.
    pub fn set_source(&mut self, source: Box<dyn FrameSource>) {
        self.slot.install(source);
        self.reset_session();
        if self.state != DriverState::Idle {
            // The slot records the failure and surfaces it through the notice.
            if let Err(err) = self.slot.open() {
                tracing::debug!(%err, "new frame source failed to open");
            }
        }
    }

    /// Retry a failed source. An idle driver retries on the next `start`.
    pub fn reopen_source(&mut self) -> FramelabResult<()> {
        self.reset_session();
        if self.state == DriverState::Idle {
            return Ok(());
        }
        self.slot.reopen()
    }

    /// Idle -> Running. Opens the source and requests the first callback.
    pub fn start(&mut self) {
        if self.state != DriverState::Idle {
            return;
        }
        self.cancel.reset();
        if self.slot.has_source()
            && let Err(err) = self.slot.open()
        {
            tracing::debug!(%err, "frame source failed to open on start");
        }
        self.state = DriverState::Running;
        self.schedule();
        tracing::info!(
            source = self.slot.source_name().unwrap_or("none"),
            "driver started"
        );
    }

    pub fn pause(&mut self) {
        if self.state == DriverState::Running {
            self.state = DriverState::Paused;
            tracing::debug!("driver paused");
        }
    }

    /// Paused -> Running. Buffered history is kept.
    pub fn resume(&mut self) {
        if self.state == DriverState::Paused {
            self.state = DriverState::Running;
            if self.pending.is_none() {
                self.schedule();
            }
            tracing::debug!("driver resumed");
        }
    }

    /// Any state -> Idle: cancel the pending callback, trip the cancel token, release the source.
    pub fn stop(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel_frame(handle);
        }
        self.cancel.cancel();
        self.slot.release();
        if self.state != DriverState::Idle {
            tracing::info!(ticks = self.stats.ticks, "driver stopped");
        }
        self.state = DriverState::Idle;
        self.reset_session();
    }

    /// Apply a control event. Takes effect from the next tick.
    pub fn dispatch(&mut self, event: &ControlEvent) {
        self.controls = Arc::new(reduce(&self.controls, event));
    }

    /// Run the callback that the scheduler fired at `now` (monotonic host time).
    #[tracing::instrument(level = "trace", skip(self))]
    pub fn tick(&mut self, now: Duration) -> TickReport {
        self.pending = None;
        let mut report = TickReport::default();
        if self.cancel.is_cancelled() || self.state == DriverState::Idle {
            return report;
        }
        if self.state == DriverState::Paused {
            self.schedule();
            report.rescheduled = true;
            return report;
        }

        self.stats.ticks += 1;
        self.fps.observe(now);
        self.stats.fps = self.fps.fps();
        report.fps = self.stats.fps;

        match self.slot.acquire() {
            Some(frame) => {
                self.stats.frames_acquired += 1;
                let dims = frame.dims();
                if let Err(err) = self.ring.push(frame.clone()) {
                    tracing::warn!(%err, "frame size changed, starting a new session");
                    self.ring.clear();
                    self.surfaces.reset();
                    self.stats.ring_resets += 1;
                    if let Err(err) = self.ring.push(frame) {
                        tracing::warn!(%err, "frame dropped");
                    }
                }

                let controls = Arc::clone(&self.controls);
                let outputs = compute_frame(&controls.snapshot(), &self.ring);
                report.presented = present_frame(&mut self.surfaces, dims, &outputs, &self.style);
                if let Some(summary) = report.presented.iter().find_map(|r| r.motion.clone()) {
                    self.last_motion = Some(summary);
                }
                report.processed = true;
            }
            None => {
                self.stats.frames_skipped += 1;
                tracing::trace!("no frame ready");
            }
        }

        self.schedule();
        report.rescheduled = true;
        report
    }

    fn schedule(&mut self) {
        if let Some(old) = self.pending.take() {
            self.scheduler.cancel_frame(old);
        }
        self.pending = Some(self.scheduler.request_frame());
    }

    fn reset_session(&mut self) {
        self.ring.clear();
        self.fps.reset();
        self.last_motion = None;
    }
}

impl<S: Scheduler> Drop for LoopDriver<S> {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/driver/loop_driver.rs"]
mod tests;
