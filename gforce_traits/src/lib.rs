//! Sensor-facing traits and the sample type shared across the gforce stack.
pub mod clock;

pub use clock::{Clock, MonotonicClock};

/// One raw acceleration reading, in G, as delivered by the motion sensor.
///
/// Axis semantics are not fixed here; which axis means "lateral" or
/// "longitudinal" is decided by the consumer's axis map.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct AccelerationSample {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl AccelerationSample {
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// True when no component is NaN or infinite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// Source of acceleration samples (accelerometer driver, simulator, replay).
pub trait MotionSensor {
    /// Whether the device can deliver samples at all. Checked once at startup.
    fn is_available(&self) -> bool {
        true
    }

    /// Block until the next sample is ready or `timeout` expires.
    fn read(
        &mut self,
        timeout: std::time::Duration,
    ) -> Result<AccelerationSample, Box<dyn std::error::Error + Send + Sync>>;
}

impl<T: MotionSensor + ?Sized> MotionSensor for Box<T> {
    fn is_available(&self) -> bool {
        (**self).is_available()
    }

    fn read(
        &mut self,
        timeout: std::time::Duration,
    ) -> Result<AccelerationSample, Box<dyn std::error::Error + Send + Sync>> {
        (**self).read(timeout)
    }
}
