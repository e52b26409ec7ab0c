//! Test and helper sensors for gforce_core.

use gforce_traits::{AccelerationSample, MotionSensor};

/// A sensor that always errors on read; useful when the pipeline is fed
/// externally through `Pipeline::sample_sink` but a sensor value is required.
pub struct NoopSensor;

impl MotionSensor for NoopSensor {
    fn read(
        &mut self,
        _timeout: std::time::Duration,
    ) -> Result<AccelerationSample, Box<dyn std::error::Error + Send + Sync>> {
        Err(Box::new(std::io::Error::other("noop sensor")))
    }
}

/// A sensor that reports unavailable at startup.
pub struct AbsentSensor;

impl MotionSensor for AbsentSensor {
    fn is_available(&self) -> bool {
        false
    }

    fn read(
        &mut self,
        _timeout: std::time::Duration,
    ) -> Result<AccelerationSample, Box<dyn std::error::Error + Send + Sync>> {
        Err(Box::new(std::io::Error::other("motion sensor not available")))
    }
}

/// A sensor that returns the same reading forever.
#[derive(Debug, Clone, Copy)]
pub struct ConstantSensor(pub AccelerationSample);

impl MotionSensor for ConstantSensor {
    fn read(
        &mut self,
        _timeout: std::time::Duration,
    ) -> Result<AccelerationSample, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.0)
    }
}
