use chrono::{Local, Timelike};
use std::time::{Duration, Instant};

/// Wall-clock reading as the clock hands consume it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeOfDay {
    pub hours: u32,   // 0-23
    pub minutes: u32, // 0-59
    pub seconds: u32, // 0-59
    pub millis: u32,  // 0-999
}

impl TimeOfDay {
    pub const fn new(hours: u32, minutes: u32, seconds: u32, millis: u32) -> Self {
        Self {
            hours,
            minutes,
            seconds,
            millis,
        }
    }

    pub fn hours_12(&self) -> u32 {
        self.hours % 12
    }

    pub fn fractional_minutes(&self) -> f64 {
        self.minutes as f64 + self.seconds as f64 / 60.0
    }

    pub fn fractional_hours(&self) -> f64 {
        self.hours_12() as f64 + self.fractional_minutes() / 60.0
    }

    /// Seconds including the sub-second part, so the second hand sweeps smoothly.
    pub fn fractional_seconds(&self) -> f64 {
        self.seconds as f64 + self.millis as f64 / 1000.0
    }
}

/// Provides the current time of day
pub trait TimeSource {
    fn now(&self) -> TimeOfDay;
}

/// Local wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn now(&self) -> TimeOfDay {
        let now = Local::now();
        // chrono reports leap seconds as nanos past 1_000_000_000
        let millis = (now.nanosecond() / 1_000_000).min(999);
        TimeOfDay::new(now.hour(), now.minute(), now.second(), millis)
    }
}

/// Always reports the same time
#[derive(Debug, Clone, Copy)]
pub struct FixedTime(pub TimeOfDay);

impl TimeSource for FixedTime {
    fn now(&self) -> TimeOfDay {
        self.0
    }
}

impl<F> TimeSource for F
where
    F: Fn() -> TimeOfDay,
{
    fn now(&self) -> TimeOfDay {
        self()
    }
}

/// A one-shot timer that is re-armed after each tick completes.
///
/// The next deadline is measured from when the previous tick finished, not from a
/// fixed origin, so the effective period is the interval plus the drawing cost.
#[derive(Debug, Clone)]
pub struct TickSchedule {
    interval: Duration,
    deadline: Option<Instant>,
    cancelled: bool,
}

impl TickSchedule {
    pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(100);

    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            deadline: None,
            cancelled: false,
        }
    }

    /// Schedules the next tick one interval after `completed_at`.
    pub fn arm(&mut self, completed_at: Instant) {
        if !self.cancelled {
            self.deadline = Some(completed_at + self.interval);
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_due(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|deadline| now >= deadline)
    }

    /// Consumes the pending deadline if it has passed.
    pub fn take_due(&mut self, now: Instant) -> bool {
        if self.is_due(now) {
            self.deadline = None;
            true
        } else {
            false
        }
    }

    /// Drops the pending deadline; later calls to [`arm`](Self::arm) are ignored.
    pub fn cancel(&mut self) {
        self.cancelled = true;
        self.deadline = None;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}

impl Default for TickSchedule {
    fn default() -> Self {
        Self::new(Self::DEFAULT_INTERVAL)
    }
}
