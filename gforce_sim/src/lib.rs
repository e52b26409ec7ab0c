//! Software motion sensors: a synthetic lap generator and a recorded-stream replayer.
//!
//! Both implement `gforce_traits::MotionSensor` and return their failures as
//! boxed `SimError`s so the core error mapping can downcast them.
pub mod error;
pub mod util;

use std::f64::consts::TAU;
use std::time::Duration;

use gforce_traits::{AccelerationSample, MotionSensor};

use crate::error::SimError;
use crate::util::XorShift32;

/// Shape of the simulated motion.
#[derive(Debug, Clone)]
pub struct SimParams {
    /// Sample rate the simulated time base advances at.
    pub rate_hz: u32,
    pub lateral_amplitude_g: f64,
    pub longitudinal_amplitude_g: f64,
    /// Duration of one simulated lap.
    pub period_secs: f64,
    pub noise_g: f64,
    /// Fail every Nth read (0 = never).
    pub dropout_every: u64,
    pub available: bool,
    pub seed: u32,
}

impl Default for SimParams {
    fn default() -> Self {
        Self {
            rate_hz: 100,
            lateral_amplitude_g: 1.2,
            longitudinal_amplitude_g: 0.8,
            period_secs: 6.0,
            noise_g: 0.0,
            dropout_every: 0,
            available: true,
            seed: 0x5eed,
        }
    }
}

/// Simulated accelerometer driving a lap: lateral load follows a sine, longitudinal a cosine.
///
/// Time advances by one sample period per successful or failed read, so the
/// output depends only on the read count, not on wall-clock timing.
#[derive(Debug, Clone)]
pub struct SimulatedSensor {
    params: SimParams,
    reads: u64,
    rng: XorShift32,
}

impl Default for SimulatedSensor {
    fn default() -> Self {
        Self::new(SimParams::default())
    }
}

impl SimulatedSensor {
    pub fn new(params: SimParams) -> Self {
        let rng = XorShift32::new(params.seed);
        Self {
            params,
            reads: 0,
            rng,
        }
    }

    /// Number of reads served so far, including failed ones.
    pub fn reads(&self) -> u64 {
        self.reads
    }

    fn sample_at(&mut self, index: u64) -> AccelerationSample {
        let p = &self.params;
        let t = index as f64 / f64::from(p.rate_hz.max(1));
        let phase = TAU * t / p.period_secs;
        let noise = p.noise_g;
        AccelerationSample {
            x: p.lateral_amplitude_g * phase.sin() + self.rng.symmetric(noise),
            y: self.rng.symmetric(noise),
            z: p.longitudinal_amplitude_g * phase.cos() + self.rng.symmetric(noise),
        }
    }
}

impl MotionSensor for SimulatedSensor {
    fn is_available(&self) -> bool {
        self.params.available
    }

    fn read(
        &mut self,
        _timeout: Duration,
    ) -> Result<AccelerationSample, Box<dyn std::error::Error + Send + Sync>> {
        if !self.params.available {
            return Err(Box::new(SimError::Unavailable));
        }
        let index = self.reads;
        self.reads = self.reads.saturating_add(1);
        let every = self.params.dropout_every;
        if every > 0 && self.reads % every == 0 {
            tracing::trace!(read = self.reads, "simulated dropout");
            return Err(Box::new(SimError::Dropout(self.reads)));
        }
        Ok(self.sample_at(index))
    }
}

/// Plays back a recorded sample stream once, then fails every read with `Exhausted`.
#[derive(Debug, Clone, Default)]
pub struct ReplaySensor {
    samples: Vec<AccelerationSample>,
    pos: usize,
}

impl ReplaySensor {
    pub fn new(samples: Vec<AccelerationSample>) -> Self {
        Self { samples, pos: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.samples.len().saturating_sub(self.pos)
    }
}

impl MotionSensor for ReplaySensor {
    fn is_available(&self) -> bool {
        !self.samples.is_empty()
    }

    fn read(
        &mut self,
        _timeout: Duration,
    ) -> Result<AccelerationSample, Box<dyn std::error::Error + Send + Sync>> {
        match self.samples.get(self.pos) {
            Some(s) => {
                self.pos += 1;
                Ok(*s)
            }
            None => Err(Box::new(SimError::Exhausted)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const T: Duration = Duration::from_millis(10);

    fn downcast(e: &(dyn std::error::Error + Send + Sync + 'static)) -> SimError {
        e.downcast_ref::<SimError>().cloned().unwrap()
    }

    #[test]
    fn simulated_lap_starts_at_full_longitudinal_load() {
        let mut s = SimulatedSensor::default();
        let first = s.read(T).unwrap();
        assert!(first.x.abs() < 1e-12);
        assert!((first.z - 0.8).abs() < 1e-12);
    }

    #[test]
    fn simulated_output_is_repeatable() {
        let params = SimParams {
            noise_g: 0.05,
            ..SimParams::default()
        };
        let mut a = SimulatedSensor::new(params.clone());
        let mut b = SimulatedSensor::new(params);
        for _ in 0..50 {
            assert_eq!(a.read(T).unwrap(), b.read(T).unwrap());
        }
    }

    #[test]
    fn quarter_lap_peaks_laterally() {
        // 6 s lap at 100 Hz: sample 150 sits at a quarter period.
        let mut s = SimulatedSensor::default();
        let mut v = AccelerationSample::ZERO;
        for _ in 0..=150 {
            v = s.read(T).unwrap();
        }
        assert!((v.x - 1.2).abs() < 1e-9);
        assert!(v.z.abs() < 1e-9);
    }

    #[test]
    fn dropouts_fail_every_nth_read() {
        let mut s = SimulatedSensor::new(SimParams {
            dropout_every: 3,
            ..SimParams::default()
        });
        assert!(s.read(T).is_ok());
        assert!(s.read(T).is_ok());
        let err = s.read(T).unwrap_err();
        assert_eq!(downcast(err.as_ref()), SimError::Dropout(3));
        assert!(s.read(T).is_ok());
        assert_eq!(s.reads(), 4);
    }

    #[test]
    fn unavailable_sensor_reports_and_fails() {
        let mut s = SimulatedSensor::new(SimParams {
            available: false,
            ..SimParams::default()
        });
        assert!(!s.is_available());
        let err = s.read(T).unwrap_err();
        assert_eq!(downcast(err.as_ref()), SimError::Unavailable);
    }

    #[test]
    fn replay_plays_once_then_exhausts() {
        let mut r = ReplaySensor::new(vec![
            AccelerationSample::new(0.0, 0.0, 1.0),
            AccelerationSample::new(0.5, 0.0, -1.0),
        ]);
        assert!(r.is_available());
        assert_eq!(r.read(T).unwrap().z, 1.0);
        assert_eq!(r.remaining(), 1);
        assert_eq!(r.read(T).unwrap().x, 0.5);
        let err = r.read(T).unwrap_err();
        assert_eq!(downcast(err.as_ref()), SimError::Exhausted);
    }

    #[test]
    fn empty_replay_is_unavailable() {
        assert!(!ReplaySensor::default().is_available());
    }
}
