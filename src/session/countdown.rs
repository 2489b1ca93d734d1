use std::time::{Duration, Instant};

/// Answer timer owned by the UI. The puzzle itself has no notion of time.
#[derive(Clone, Copy, Debug)]
pub struct Countdown {
    duration: Duration,
    started_at: Instant,
}

impl Countdown {
    pub fn start(duration: Duration, now: Instant) -> Self {
        Self {
            duration,
            started_at: now,
        }
    }

    pub fn remaining(&self, now: Instant) -> Duration {
        self.duration
            .saturating_sub(now.saturating_duration_since(self.started_at))
    }

    /// Whole seconds left, rounded up so the display reads 30, 29, ... 1.
    pub fn remaining_secs(&self, now: Instant) -> u64 {
        let remaining = self.remaining(now);
        let secs = remaining.as_secs();
        if remaining.subsec_nanos() > 0 { secs + 1 } else { secs }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        self.remaining(now).is_zero()
    }

    pub fn ratio_left(&self, now: Instant) -> f64 {
        if self.duration.is_zero() {
            return 0.0;
        }
        self.remaining(now).as_secs_f64() / self.duration.as_secs_f64()
    }
}
