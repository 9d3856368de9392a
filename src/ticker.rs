use std::time::{Duration, Instant};

/// Periodic tick source the engine arms and disarms.
///
/// The environment owns the actual clock and calls the engine's `on_tick`
/// whenever an armed ticker fires.
pub trait Ticker {
    /// Starts (or restarts) periodic firing at `interval`.
    fn arm(&mut self, interval: Duration);

    /// Cancels any pending fire.
    fn disarm(&mut self);

    fn is_armed(&self) -> bool;
}

/// Wall-clock ticker polled by a frame loop.
#[derive(Debug, Clone, Default)]
pub struct IntervalTicker {
    schedule: Option<Schedule>,
}

#[derive(Debug, Clone, Copy)]
struct Schedule {
    interval: Duration,
    next_fire: Instant,
}

impl IntervalTicker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when a fire is due at `now` and schedules the next one.
    ///
    /// A loop that fell more than one interval behind fires once and
    /// re-anchors on `now` instead of replaying the missed ticks.
    pub fn poll_due(&mut self, now: Instant) -> bool {
        let Some(schedule) = self.schedule.as_mut() else {
            return false;
        };

        if now < schedule.next_fire {
            return false;
        }

        let following = schedule.next_fire + schedule.interval;
        schedule.next_fire = if following <= now {
            now + schedule.interval
        } else {
            following
        };
        true
    }

    fn arm_at(&mut self, interval: Duration, now: Instant) {
        self.schedule = Some(Schedule {
            interval,
            next_fire: now + interval,
        });
    }
}

impl Ticker for IntervalTicker {
    fn arm(&mut self, interval: Duration) {
        self.arm_at(interval, Instant::now());
    }

    fn disarm(&mut self) {
        self.schedule = None;
    }

    fn is_armed(&self) -> bool {
        self.schedule.is_some()
    }
}

/// Ticker for tests and scripted runs: it never fires on its own and records
/// every arm request so callers can drive ticks by hand.
#[derive(Debug, Clone, Default)]
pub struct ManualTicker {
    interval: Option<Duration>,
    arms: Vec<Duration>,
}

impl ManualTicker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Interval of the currently armed timer.
    #[must_use]
    pub fn interval(&self) -> Option<Duration> {
        self.interval
    }

    /// Every interval this ticker was armed with, oldest first.
    #[must_use]
    pub fn arm_history(&self) -> &[Duration] {
        &self.arms
    }
}

impl Ticker for ManualTicker {
    fn arm(&mut self, interval: Duration) {
        self.interval = Some(interval);
        self.arms.push(interval);
    }

    fn disarm(&mut self) {
        self.interval = None;
    }

    fn is_armed(&self) -> bool {
        self.interval.is_some()
    }
}
