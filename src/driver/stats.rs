use std::time::Duration;

/// Weight of the running average in each update.
pub const FPS_SMOOTHING: f64 = 0.9;

/// Exponential moving average of the tick interval.
///
/// The first observed interval seeds the average, so a steady stream reports its true rate from
/// the second tick on.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameRateEstimator {
    last: Option<Duration>,
    avg_interval: Option<f64>,
}

impl FrameRateEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a tick at `now`. Non-increasing timestamps are ignored for the average.
    pub fn observe(&mut self, now: Duration) {
        if let Some(last) = self.last
            && now > last
        {
            let dt = (now - last).as_secs_f64();
            self.avg_interval = Some(match self.avg_interval {
                Some(avg) => FPS_SMOOTHING * avg + (1.0 - FPS_SMOOTHING) * dt,
                None => dt,
            });
        }
        self.last = Some(now);
    }

    pub fn fps(&self) -> f64 {
        match self.avg_interval {
            Some(avg) if avg > 0.0 => 1.0 / avg,
            _ => 0.0,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Counters the driver exposes to the host.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct DriverStats {
    pub ticks: u64,
    pub frames_acquired: u64,
    pub frames_skipped: u64,
    pub ring_resets: u64,
    pub fps: f64,
}

#[cfg(test)]
#[path = "../../tests/unit/driver/stats.rs"]
mod tests;
