//! Runtime configuration for the telemetry pipeline.
//!
//! These are the structs the core consumes. They are separate from the
//! TOML-deserialized config in `gforce_config`; see `conversions`.

use std::time::Duration;

use crate::axes::AxisMap;
use crate::error::BuildError;
use crate::util;

/// Rates and retention. Fixed for the lifetime of a `TelemetryState`.
#[derive(Debug, Clone)]
pub struct TelemetryCfg {
    /// Nominal sensor delivery rate; sets the trace interpolation density.
    pub sensor_rate_hz: u32,
    /// Render tick rate the throttle emits at.
    pub render_rate_hz: u32,
    /// Trailing window covered by the history buffer.
    pub retention_secs: f64,
    /// Sensor-axis to graph-axis sign convention.
    pub axes: AxisMap,
}

impl Default for TelemetryCfg {
    fn default() -> Self {
        Self {
            sensor_rate_hz: 100,
            render_rate_hz: 15,
            retention_secs: 2.0,
            axes: AxisMap::default(),
        }
    }
}

impl TelemetryCfg {
    pub fn history_capacity(&self) -> usize {
        util::history_capacity(self.render_rate_hz, self.retention_secs)
    }

    pub fn render_period(&self) -> Duration {
        util::period(self.render_rate_hz)
    }

    pub fn sample_period(&self) -> Duration {
        util::period(self.sensor_rate_hz)
    }

    /// Expected sensor samples per render tick.
    pub fn density_ratio(&self) -> f64 {
        f64::from(self.sensor_rate_hz) / f64::from(self.render_rate_hz.max(1))
    }

    pub fn validate(&self) -> Result<(), BuildError> {
        if self.sensor_rate_hz == 0 {
            return Err(BuildError::InvalidConfig("sensor_rate_hz must be > 0"));
        }
        if self.render_rate_hz == 0 {
            return Err(BuildError::InvalidConfig("render_rate_hz must be > 0"));
        }
        if !(self.retention_secs.is_finite() && self.retention_secs > 0.0) {
            return Err(BuildError::InvalidConfig("retention_secs must be > 0"));
        }
        if self.axes.lateral == self.axes.longitudinal {
            return Err(BuildError::InvalidConfig(
                "lateral and longitudinal axes must differ",
            ));
        }
        Ok(())
    }
}

/// Timeouts and watchdogs.
#[derive(Debug, Clone)]
pub struct Timeouts {
    /// Max sensor wait per read (ms).
    pub sensor_ms: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self { sensor_ms: 50 }
    }
}
