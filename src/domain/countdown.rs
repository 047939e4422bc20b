/// Countdown to a fixed deadline.
///
/// The deadline is captured once. Every tick recomputes the remaining time
/// from the wall clock; the first tick at or past the deadline pins the
/// state to 00:00:00 and stops the countdown for good.

use std::fmt;
use std::time::Duration;

use super::observable::Observable;

pub const SECOND_MS: i64 = 1_000;
pub const MINUTE_MS: i64 = 60 * SECOND_MS;
pub const HOUR_MS: i64 = 60 * MINUTE_MS;
pub const DAY_MS: i64 = 24 * HOUR_MS;

/// Default window between launch and deadline.
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct TimeLeft {
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
}

impl TimeLeft {
    pub const ZERO: TimeLeft = TimeLeft { hours: 0, minutes: 0, seconds: 0 };
    /// What the page shows before the first tick of a full-day window.
    pub const FULL_DAY: TimeLeft = TimeLeft { hours: 24, minutes: 0, seconds: 0 };

    pub const fn new(hours: u32, minutes: u32, seconds: u32) -> Self {
        TimeLeft { hours, minutes, seconds }
    }

    /// Split a positive remaining duration. Whole days are dropped.
    pub fn from_millis(remaining_ms: i64) -> Self {
        if remaining_ms <= 0 {
            return TimeLeft::ZERO;
        }
        TimeLeft::new(
            ((remaining_ms / HOUR_MS) % 24) as u32,
            ((remaining_ms / MINUTE_MS) % 60) as u32,
            ((remaining_ms / SECOND_MS) % 60) as u32,
        )
    }
}

impl fmt::Display for TimeLeft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hours, self.minutes, self.seconds)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TickOutcome {
    /// Recomputed; `true` when the displayed value changed.
    Updated(bool),
    /// Deadline reached on this tick.
    Expired,
    /// Already expired; nothing recomputed.
    Stopped,
}

pub struct Countdown {
    deadline_ms: i64,
    state: Observable<TimeLeft>,
    running: bool,
}

impl Countdown {
    /// Deadline = `now_ms + window`.
    pub fn starting_at(now_ms: i64, window: Duration) -> Self {
        let window_ms = i64::try_from(window.as_millis()).unwrap_or(i64::MAX);
        Self::with_deadline(now_ms.saturating_add(window_ms), now_ms)
    }

    pub fn with_deadline(deadline_ms: i64, now_ms: i64) -> Self {
        let remaining = deadline_ms - now_ms;
        let initial = if remaining >= DAY_MS {
            TimeLeft::FULL_DAY
        } else {
            TimeLeft::from_millis(remaining)
        };
        Countdown {
            deadline_ms,
            state: Observable::new(initial),
            running: true,
        }
    }

    pub fn deadline_ms(&self) -> i64 {
        self.deadline_ms
    }

    pub fn time_left(&self) -> TimeLeft {
        *self.state.get()
    }

    pub fn state(&self) -> &Observable<TimeLeft> {
        &self.state
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn tick(&mut self, now_ms: i64) -> TickOutcome {
        if !self.running {
            return TickOutcome::Stopped;
        }

        let remaining = self.deadline_ms - now_ms;
        if remaining <= 0 {
            self.running = false;
            self.state.set(TimeLeft::ZERO);
            return TickOutcome::Expired;
        }

        TickOutcome::Updated(self.state.set(TimeLeft::from_millis(remaining)))
    }
}
