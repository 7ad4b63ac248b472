//! Leading-edge rate limiter.
//!
//! The first call passes immediately; later calls inside the interval are
//! dropped, not queued. Timestamps come from the host (milliseconds, any
//! monotonic origin), which keeps the limiter deterministic under test.

#[derive(Debug, Clone)]
pub struct Throttle {
    interval_ms: f64,
    last: Option<f64>,
}

impl Throttle {
    pub fn new(interval_ms: f64) -> Self {
        Self {
            interval_ms,
            last: None,
        }
    }

    pub fn interval_ms(&self) -> f64 {
        self.interval_ms
    }

    /// Whether a call at `now_ms` may run. Admitting it starts a new interval.
    pub fn admit(&mut self, now_ms: f64) -> bool {
        if let Some(last) = self.last
            && now_ms - last < self.interval_ms
        {
            return false;
        }
        self.last = Some(now_ms);
        true
    }

    /// Forget the last admitted call.
    pub fn reset(&mut self) {
        self.last = None;
    }
}
