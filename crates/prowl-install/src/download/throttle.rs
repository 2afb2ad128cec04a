//! Progress throttling.
//!
//! Rate-limits progress updates so a fast chunk loop does not flood the
//! caller's sink. First and final emissions bypass the throttle.

use std::time::{Duration, Instant};

/// Rate-limiter for progress updates.
pub struct ProgressThrottle {
    last_emit: Option<Instant>,
    min_interval: Duration,
}

impl ProgressThrottle {
    /// Create a new throttle with the specified minimum interval.
    pub const fn new(min_interval: Duration) -> Self {
        Self {
            last_emit: None,
            min_interval,
        }
    }

    /// Create a throttle with the default 250ms interval.
    pub const fn default_interval() -> Self {
        Self::new(Duration::from_millis(250))
    }

    /// Check if enough time has passed to emit another progress update.
    pub fn should_emit(&mut self) -> bool {
        let now = Instant::now();
        match self.last_emit {
            Some(last) if now.duration_since(last) < self.min_interval => false,
            _ => {
                self.last_emit = Some(now);
                true
            }
        }
    }

    /// Mark an emission that bypassed the throttle (forced first/final
    /// events), so the debounce clock restarts from it.
    pub fn mark_forced(&mut self) {
        self.last_emit = Some(Instant::now());
    }
}

impl Default for ProgressThrottle {
    fn default() -> Self {
        Self::default_interval()
    }
}
