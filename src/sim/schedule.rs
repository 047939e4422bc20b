/// Cancellable fixed-period triggers polled by the main loop.
///
/// Two are used:
///   - the frame schedule (fires immediately, then every `frame_ms`)
///   - the countdown interval (first fire one period after start)
///
/// `cancel()` is final. A schedule that fell behind fires once and then
/// re-anchors on `now`, so a stalled loop never produces a burst.

use std::time::{Duration, Instant};

#[derive(Clone, Debug)]
pub struct Schedule {
    period: Duration,
    next_due: Instant,
    cancelled: bool,
}

impl Schedule {
    /// First fire on the next poll.
    pub fn immediate(period: Duration, now: Instant) -> Self {
        Schedule { period, next_due: now, cancelled: false }
    }

    /// First fire one `period` after `now`.
    pub fn after(period: Duration, now: Instant) -> Self {
        Schedule { period, next_due: now + period, cancelled: false }
    }

    /// Returns `true` when the schedule is due, and arms the next fire.
    pub fn poll(&mut self, now: Instant) -> bool {
        if self.cancelled || now < self.next_due {
            return false;
        }
        self.next_due += self.period;
        if self.next_due <= now {
            self.next_due = now + self.period;
        }
        true
    }

    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    /// Time left until the next fire; `None` once cancelled.
    pub fn time_until(&self, now: Instant) -> Option<Duration> {
        if self.cancelled {
            None
        } else {
            Some(self.next_due.saturating_duration_since(now))
        }
    }
}
