//! Sensor-axis to graph-axis mapping.
//!
//! Which physical direction reads as positive has flipped between device
//! mounts, so the mapping is configuration. Everything downstream (extrema,
//! throttle, trace) sees only the projected `Point2D`.

use crate::types::{AccelerationSample, Point2D};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    #[inline]
    fn pick(self, s: &AccelerationSample) -> f64 {
        match self {
            Axis::X => s.x,
            Axis::Y => s.y,
            Axis::Z => s.z,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisMap {
    /// Sensor axis read as left (+) / right (-).
    pub lateral: Axis,
    /// Sensor axis read as acceleration (+) / braking (-).
    pub longitudinal: Axis,
    pub invert_lateral: bool,
    pub invert_longitudinal: bool,
}

impl Default for AxisMap {
    fn default() -> Self {
        Self {
            lateral: Axis::X,
            longitudinal: Axis::Z,
            invert_lateral: false,
            invert_longitudinal: false,
        }
    }
}

impl AxisMap {
    #[inline]
    pub fn lateral(&self, s: &AccelerationSample) -> f64 {
        signed(self.lateral.pick(s), self.invert_lateral)
    }

    #[inline]
    pub fn longitudinal(&self, s: &AccelerationSample) -> f64 {
        signed(self.longitudinal.pick(s), self.invert_longitudinal)
    }

    /// Project a raw sample onto the graph plane.
    #[inline]
    pub fn project(&self, s: &AccelerationSample) -> Point2D {
        Point2D {
            x: self.lateral(s),
            y: self.longitudinal(s),
        }
    }
}

#[inline]
fn signed(v: f64, invert: bool) -> f64 {
    if invert { -v } else { v }
}
