//! Push-fed live source: the seam where a camera capture thread hands frames to the pipeline.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::{
    foundation::error::{FramelabError, FramelabResult},
    frame::buffer::PixelBuffer,
    source::FrameSource,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Permission {
    Pending,
    Granted,
    Denied(String),
}

#[derive(Debug)]
struct FeedState {
    permission: Permission,
    latest: Option<PixelBuffer>,
    generation: u64,
    consumed: u64,
    released: bool,
    open_requests: u64,
}

/// Producer side of a live feed, cloned into the capture thread.
#[derive(Clone, Debug)]
pub struct LiveFeed {
    state: Arc<Mutex<FeedState>>,
}

impl LiveFeed {
    /// Resolve the pending permission request.
    pub fn grant(&self) {
        self.lock().permission = Permission::Granted;
    }

    pub fn deny(&self, reason: impl Into<String>) {
        let mut st = self.lock();
        st.permission = Permission::Denied(reason.into());
        st.latest = None;
    }

    /// Replace the latest frame. Frames published after release are dropped.
    pub fn publish(&self, frame: PixelBuffer) {
        let mut st = self.lock();
        if st.released || st.permission != Permission::Granted {
            return;
        }
        st.latest = Some(frame);
        st.generation += 1;
    }

    /// Whether the consumer asked for the device to be stopped.
    pub fn is_released(&self) -> bool {
        self.lock().released
    }

    /// Times the consumer opened the feed. A capture thread starts its device on each new request.
    pub fn open_requests(&self) -> u64 {
        self.lock().open_requests
    }

    fn lock(&self) -> MutexGuard<'_, FeedState> {
        // A panicking producer leaves plain data behind; keep serving it.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Consumer side of a live feed. Reads take the most recent published frame without waiting;
/// a frame is handed out once.
#[derive(Debug)]
pub struct LiveFeedSource {
    name: String,
    feed: LiveFeed,
}

impl LiveFeedSource {
    /// A new feed in the `Pending` permission state, plus the producer handle.
    pub fn new(name: impl Into<String>) -> (Self, LiveFeed) {
        let feed = LiveFeed {
            state: Arc::new(Mutex::new(FeedState {
                permission: Permission::Pending,
                latest: None,
                generation: 0,
                consumed: 0,
                released: true,
                open_requests: 0,
            })),
        };
        (
            Self {
                name: name.into(),
                feed: feed.clone(),
            },
            feed,
        )
    }

    pub fn permission(&self) -> Permission {
        self.feed.lock().permission.clone()
    }
}

impl FrameSource for LiveFeedSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn open(&mut self) -> FramelabResult<()> {
        let mut st = self.feed.lock();
        if let Permission::Denied(reason) = &st.permission {
            return Err(FramelabError::acquisition(format!(
                "camera permission denied: {reason}"
            )));
        }
        st.released = false;
        st.open_requests += 1;
        Ok(())
    }

    fn read(&mut self) -> FramelabResult<Option<PixelBuffer>> {
        let mut st = self.feed.lock();
        match &st.permission {
            Permission::Pending => Ok(None),
            Permission::Denied(reason) => Err(FramelabError::acquisition(format!(
                "camera permission denied: {reason}"
            ))),
            Permission::Granted => {
                if st.generation == st.consumed {
                    return Ok(None);
                }
                st.consumed = st.generation;
                Ok(st.latest.clone())
            }
        }
    }

    fn close(&mut self) {
        let mut st = self.feed.lock();
        st.released = true;
        st.latest = None;
        st.consumed = st.generation;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/source/live.rs"]
mod tests;
