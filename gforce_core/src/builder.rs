//! Type-state builder for `Pipeline`.
//!
//! `build()` only exists once a `TelemetryCfg` has been supplied; `try_build()`
//! is always available and reports the missing piece at runtime.

use std::marker::PhantomData;
use std::sync::Arc;

use gforce_traits::MotionSensor;
use gforce_traits::clock::{Clock, MonotonicClock};

use crate::config::{TelemetryCfg, Timeouts};
use crate::error::{BuildError, Result};
use crate::runner::{Pipeline, SamplingMode};

pub struct Missing;
pub struct Set;

pub struct PipelineBuilder<C> {
    cfg: Option<TelemetryCfg>,
    sensor: Option<Box<dyn MotionSensor + Send>>,
    clock: Option<Box<dyn Clock + Send + Sync>>,
    timeouts: Option<Timeouts>,
    sampling: Option<SamplingMode>,
    queue_capacity: Option<usize>,
    _c: PhantomData<C>,
}

impl Default for PipelineBuilder<Missing> {
    fn default() -> Self {
        Self {
            cfg: None,
            sensor: None,
            clock: None,
            timeouts: None,
            sampling: None,
            queue_capacity: None,
            _c: PhantomData,
        }
    }
}

impl<C> PipelineBuilder<C> {
    /// Fallible build available in any type-state.
    pub fn try_build(self) -> Result<Pipeline> {
        let cfg = self
            .cfg
            .ok_or_else(|| eyre::Report::new(BuildError::MissingConfig))?;
        cfg.validate().map_err(eyre::Report::new)?;

        let timeouts = self.timeouts.unwrap_or_default();
        if timeouts.sensor_ms == 0 {
            return Err(eyre::Report::new(BuildError::InvalidConfig(
                "sensor_ms must be >= 1",
            )));
        }
        let sampling = self
            .sampling
            .unwrap_or(SamplingMode::Paced(cfg.sensor_rate_hz));
        if let SamplingMode::Paced(0) = sampling {
            return Err(eyre::Report::new(BuildError::InvalidConfig(
                "paced sampling rate must be > 0",
            )));
        }
        let queue_capacity = self.queue_capacity.unwrap_or_else(|| {
            crate::util::queue_capacity(cfg.sensor_rate_hz, cfg.render_rate_hz)
        });
        let clock: Arc<dyn Clock + Send + Sync> = match self.clock {
            Some(b) => Arc::from(b),
            None => Arc::new(MonotonicClock::new()),
        };

        Pipeline::new(cfg, timeouts, sampling, queue_capacity, clock, self.sensor)
            .map_err(eyre::Report::new)
    }

    /// Sensor owned by the pipeline and read on a sampler thread after `start()`.
    ///
    /// Without one, samples come in through `Pipeline::sample_sink()`.
    pub fn with_sensor(mut self, sensor: impl MotionSensor + Send + 'static) -> Self {
        self.sensor = Some(Box::new(sensor));
        self
    }
    /// Defaults to `MonotonicClock`.
    pub fn with_clock(mut self, clock: Box<dyn Clock + Send + Sync>) -> Self {
        self.clock = Some(clock);
        self
    }
    pub fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = Some(timeouts);
        self
    }
    /// Defaults to `Paced(sensor_rate_hz)`.
    pub fn with_sampling(mut self, mode: SamplingMode) -> Self {
        self.sampling = Some(mode);
        self
    }
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = Some(capacity.max(1));
        self
    }
}

impl PipelineBuilder<Missing> {
    pub fn with_config(self, cfg: TelemetryCfg) -> PipelineBuilder<Set> {
        PipelineBuilder {
            cfg: Some(cfg),
            sensor: self.sensor,
            clock: self.clock,
            timeouts: self.timeouts,
            sampling: self.sampling,
            queue_capacity: self.queue_capacity,
            _c: PhantomData,
        }
    }
}

impl PipelineBuilder<Set> {
    /// Validate and build. Only available once the config is set.
    pub fn build(self) -> Result<Pipeline> {
        self.try_build()
    }
}
