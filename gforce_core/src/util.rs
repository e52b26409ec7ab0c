//! Common time/period helpers for gforce_core.

use std::time::Duration;

/// Number of microseconds in one second.
pub const MICROS_PER_SEC: u64 = 1_000_000;
/// Number of milliseconds in one second.
pub const MILLIS_PER_SEC: u64 = 1_000;

/// Compute the period in microseconds for a given rate in Hz.
/// - Clamps `hz` to at least 1 to avoid division by zero (debug builds assert instead).
/// - Ensures result is at least 1 microsecond.
#[inline]
pub fn period_us(hz: u32) -> u64 {
    debug_assert!(hz > 0, "rate_hz must be > 0");
    (MICROS_PER_SEC / u64::from(hz.max(1))).max(1)
}

/// Compute the period in milliseconds for a given rate in Hz.
/// - Clamps `hz` to at least 1 to avoid division by zero (debug builds assert instead).
/// - Ensures result is at least 1 millisecond.
#[inline]
pub fn period_ms(hz: u32) -> u64 {
    debug_assert!(hz > 0, "rate_hz must be > 0");
    (MILLIS_PER_SEC / u64::from(hz.max(1))).max(1)
}

/// Period of a rate in Hz as a `Duration` (microsecond resolution).
#[inline]
pub fn period(hz: u32) -> Duration {
    Duration::from_micros(period_us(hz))
}

/// Number of render ticks that fit in the retention window: `ceil(hz * secs)`, at least 1.
#[inline]
pub fn history_capacity(render_rate_hz: u32, retention_secs: f64) -> usize {
    let ticks = (f64::from(render_rate_hz) * retention_secs).ceil();
    if ticks.is_finite() && ticks >= 1.0 {
        ticks as usize
    } else {
        1
    }
}

/// Sample queue depth between producer and consumer: four render ticks' worth
/// of samples at the nominal ratio, at least 8.
#[inline]
pub fn queue_capacity(sensor_rate_hz: u32, render_rate_hz: u32) -> usize {
    let per_tick = u64::from(sensor_rate_hz).div_ceil(u64::from(render_rate_hz.max(1)));
    (per_tick.saturating_mul(4) as usize).max(8)
}
