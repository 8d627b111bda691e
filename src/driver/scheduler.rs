use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

/// Opaque id of one requested frame callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CallbackHandle(pub u64);

/// Host-provided "call me before the next repaint" service.
pub trait Scheduler {
    fn request_frame(&mut self) -> CallbackHandle;
    fn cancel_frame(&mut self, handle: CallbackHandle);
}

/// Scheduler for headless hosts and tests: records requests, the host fires them by hand.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next_id: u64,
    pending: Option<CallbackHandle>,
    requested: u64,
    cancelled: u64,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> Option<CallbackHandle> {
        self.pending
    }

    /// Consume the pending callback, as a host does right before invoking the tick.
    pub fn fire(&mut self) -> Option<CallbackHandle> {
        self.pending.take()
    }

    pub fn requested_count(&self) -> u64 {
        self.requested
    }

    pub fn cancelled_count(&self) -> u64 {
        self.cancelled
    }
}

impl Scheduler for ManualScheduler {
    fn request_frame(&mut self) -> CallbackHandle {
        self.next_id += 1;
        let handle = CallbackHandle(self.next_id);
        self.pending = Some(handle);
        self.requested += 1;
        handle
    }

    fn cancel_frame(&mut self, handle: CallbackHandle) {
        if self.pending == Some(handle) {
            self.pending = None;
            self.cancelled += 1;
        }
    }
}

impl<S: Scheduler + ?Sized> Scheduler for &mut S {
    fn request_frame(&mut self) -> CallbackHandle {
        (**self).request_frame()
    }

    fn cancel_frame(&mut self, handle: CallbackHandle) {
        (**self).cancel_frame(handle)
    }
}

/// Shared cooperative cancellation flag.
///
/// The driver trips it on `stop`; sources doing slow extraction poll it between steps and drop
/// their result once it is set.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }

    /// Re-arm for a new session. Clones share the flag, so they are re-armed as well.
    pub fn reset(&self) {
        self.flag.store(false, Ordering::Release);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/driver/scheduler.rs"]
mod tests;
