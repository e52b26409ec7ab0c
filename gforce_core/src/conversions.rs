//! `From` implementations bridging `gforce_config` types to `gforce_core` types.

use crate::axes::{Axis, AxisMap};
use crate::config::{TelemetryCfg, Timeouts};
use crate::graph::GraphGeometry;

// ── Axes ─────────────────────────────────────────────────────────────────────

impl From<gforce_config::AxisName> for Axis {
    fn from(a: gforce_config::AxisName) -> Self {
        match a {
            gforce_config::AxisName::X => Axis::X,
            gforce_config::AxisName::Y => Axis::Y,
            gforce_config::AxisName::Z => Axis::Z,
        }
    }
}

impl From<&gforce_config::AxesCfg> for AxisMap {
    fn from(c: &gforce_config::AxesCfg) -> Self {
        Self {
            lateral: c.lateral.into(),
            longitudinal: c.longitudinal.into(),
            invert_lateral: c.invert_lateral,
            invert_longitudinal: c.invert_longitudinal,
        }
    }
}

// ── TelemetryCfg ─────────────────────────────────────────────────────────────

impl From<&gforce_config::Config> for TelemetryCfg {
    fn from(c: &gforce_config::Config) -> Self {
        Self {
            sensor_rate_hz: c.sensor.rate_hz,
            render_rate_hz: c.render.rate_hz,
            retention_secs: c.render.retention_secs,
            axes: (&c.axes).into(),
        }
    }
}

// ── Timeouts ─────────────────────────────────────────────────────────────────

impl From<&gforce_config::SensorCfg> for Timeouts {
    fn from(c: &gforce_config::SensorCfg) -> Self {
        Self {
            sensor_ms: c.read_timeout_ms,
        }
    }
}

// ── GraphGeometry ────────────────────────────────────────────────────────────

impl From<&gforce_config::GraphCfg> for GraphGeometry {
    fn from(c: &gforce_config::GraphCfg) -> Self {
        Self {
            outer_edge_g: c.outer_edge_g,
            dot_ratio: c.dot_ratio,
        }
    }
}
