//! Render-rate throttling of the sensor-rate point stream.
//!
//! `RenderSignalThrottle` is a sample-and-hold register: `feed` overwrites the
//! held point, and each render tick emits whatever is held. Once the first
//! point has arrived every tick emits exactly one point, repeating the held
//! value while the input is quiet. Before that, ticks emit nothing.
//!
//! `Ticker` decides when tick boundaries fall.

use std::time::{Duration, Instant};

use crate::types::Point2D;

#[derive(Debug, Clone)]
pub struct RenderSignalThrottle {
    period: Duration,
    held: Option<Point2D>,
    fed_since_tick: u64,
    stale_ticks: u64,
}

impl RenderSignalThrottle {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            held: None,
            fed_since_tick: 0,
            stale_ticks: 0,
        }
    }

    /// Replace the held point. O(1), never blocks.
    #[inline]
    pub fn feed(&mut self, point: Point2D) {
        self.held = Some(point);
        self.fed_since_tick = self.fed_since_tick.saturating_add(1);
    }

    /// Tick boundary: emit the latest point fed, or the held one if nothing new arrived.
    pub fn tick(&mut self) -> Option<Point2D> {
        let out = self.held?;
        if self.fed_since_tick == 0 {
            self.stale_ticks = self.stale_ticks.saturating_add(1);
        }
        self.fed_since_tick = 0;
        Some(out)
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Current hold register, without consuming a tick.
    pub fn held(&self) -> Option<Point2D> {
        self.held
    }

    /// Points fed since the previous tick; all but the latest are collapsed.
    pub fn pending(&self) -> u64 {
        self.fed_since_tick
    }

    /// Ticks that repeated the held value because no new point arrived.
    pub fn stale_ticks(&self) -> u64 {
        self.stale_ticks
    }
}

/// Deadline schedule for render ticks on a monotonic time base.
///
/// Boundaries fall at `start + k * period`. A consumer that overruns one or
/// more boundaries gets a single tick and is resynchronised; the skipped
/// boundaries are counted, never replayed.
#[derive(Debug, Clone)]
pub struct Ticker {
    period: Duration,
    next_at: Instant,
    skipped: u64,
}

impl Ticker {
    pub fn new(start: Instant, period: Duration) -> Self {
        let period = period.max(Duration::from_micros(1));
        Self {
            period,
            next_at: start + period,
            skipped: 0,
        }
    }

    /// Time left until the next boundary (zero when it is due).
    pub fn wait(&self, now: Instant) -> Duration {
        self.next_at.saturating_duration_since(now)
    }

    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.next_at
    }

    /// Move past the boundary that just fired; returns how many were skipped.
    pub fn advance(&mut self, now: Instant) -> u64 {
        self.next_at += self.period;
        if self.next_at > now {
            return 0;
        }
        let behind = now.saturating_duration_since(self.next_at);
        let missed = (behind.as_nanos() / self.period.as_nanos()) as u64 + 1;
        self.next_at = now + self.period;
        self.skipped = self.skipped.saturating_add(missed);
        missed
    }

    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    pub fn period(&self) -> Duration {
        self.period
    }
}
