//! The single mutable aggregate of the pipeline and its published snapshots.

use std::sync::Arc;
use std::time::Duration;

use crate::config::TelemetryCfg;
use crate::error::BuildError;
use crate::extrema::{ExtremaState, ExtremaTracker};
use crate::history::HistoryBuffer;
use crate::interpolate::TraceInterpolator;
use crate::sampler::EvictedSpan;
use crate::status::SensorStatus;
use crate::throttle::RenderSignalThrottle;
use crate::types::{AccelerationSample, Point2D};

/// Owns extrema, throttle and history for one session.
///
/// Every method takes `&mut self` or `&self` on the owning context; nothing
/// in here is shared. Other threads see it only through `TelemetrySnapshot`.
#[derive(Debug, Clone)]
pub struct TelemetryState {
    cfg: TelemetryCfg,
    status: SensorStatus,
    extrema: ExtremaTracker,
    throttle: RenderSignalThrottle,
    history: HistoryBuffer,
    interpolator: TraceInterpolator,
    current_sample: AccelerationSample,
    current_point: Point2D,
    samples_seen: u64,
    samples_ignored: u64,
    ticks: u64,
}

impl TelemetryState {
    /// Rejects a config that fails `TelemetryCfg::validate`.
    pub fn new(cfg: TelemetryCfg) -> Result<Self, BuildError> {
        cfg.validate()?;
        Ok(Self {
            status: SensorStatus::Idle,
            extrema: ExtremaTracker::new(cfg.axes),
            throttle: RenderSignalThrottle::new(cfg.render_period()),
            history: HistoryBuffer::new(cfg.history_capacity()),
            interpolator: TraceInterpolator::new(cfg.sensor_rate_hz, cfg.render_rate_hz),
            current_sample: AccelerationSample::ZERO,
            current_point: Point2D::ORIGIN,
            samples_seen: 0,
            samples_ignored: 0,
            ticks: 0,
            cfg,
        })
    }

    /// Sensor availability confirmed; start accepting samples.
    pub fn activate(&mut self) {
        if self.status != SensorStatus::Active {
            tracing::debug!("telemetry active");
            self.status = SensorStatus::Active;
        }
    }

    pub fn status(&self) -> SensorStatus {
        self.status
    }

    /// Ingest one raw sample. Returns `false` when it was ignored.
    ///
    /// O(1): updates the extrema and the throttle's hold register only.
    pub fn on_sample(&mut self, sample: AccelerationSample) -> bool {
        if !self.status.is_active() {
            self.samples_ignored = self.samples_ignored.saturating_add(1);
            tracing::trace!("sample ignored while idle");
            return false;
        }
        if !sample.is_finite() {
            self.samples_ignored = self.samples_ignored.saturating_add(1);
            tracing::debug!(?sample, "non-finite sample discarded");
            return false;
        }
        self.extrema.observe(&sample);
        self.current_sample = sample;
        self.throttle.feed(self.cfg.axes.project(&sample));
        self.samples_seen = self.samples_seen.saturating_add(1);
        true
    }

    /// Fold samples a full queue evicted before they could be ingested.
    ///
    /// Only the extrema see them. Anything still queued is newer, so the
    /// hold register is left alone.
    pub fn on_evicted(&mut self, span: &EvictedSpan) -> bool {
        if !self.status.is_active() {
            self.samples_ignored = self.samples_ignored.saturating_add(span.count);
            return false;
        }
        self.extrema.observe(&span.hi);
        self.extrema.observe(&span.lo);
        self.samples_seen = self.samples_seen.saturating_add(span.count);
        true
    }

    /// One render-tick boundary: forward the throttle's emission into the history.
    pub fn on_tick(&mut self) -> Option<Point2D> {
        self.ticks = self.ticks.saturating_add(1);
        let point = self.throttle.tick()?;
        self.history.push(point);
        self.current_point = point;
        Some(point)
    }

    /// Zero the four extrema. History and current values are untouched.
    pub fn reset_extrema(&mut self) {
        self.extrema.reset();
        tracing::debug!("extrema reset");
    }

    pub fn extrema(&self) -> ExtremaState {
        self.extrema.state()
    }

    /// Latest raw sample ingested (zero before the first one).
    pub fn current_sample(&self) -> AccelerationSample {
        self.current_sample
    }

    /// Latest throttled point (origin before the first emission).
    pub fn current_point(&self) -> Point2D {
        self.current_point
    }

    pub fn history(&self) -> &HistoryBuffer {
        &self.history
    }

    /// Dense trailing trace over the current history, in `scale` units per G.
    pub fn trace_path(&self, scale: f64) -> Vec<Point2D> {
        self.interpolator.interpolate(&self.history.snapshot(), scale)
    }

    pub fn render_tick_period(&self) -> Duration {
        self.throttle.period()
    }

    pub fn config(&self) -> &TelemetryCfg {
        &self.cfg
    }

    pub fn samples_seen(&self) -> u64 {
        self.samples_seen
    }

    /// Samples rejected by the state itself (idle or non-finite).
    pub fn samples_ignored(&self) -> u64 {
        self.samples_ignored
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Immutable copy of everything a reader needs.
    pub fn snapshot(&self) -> TelemetrySnapshot {
        TelemetrySnapshot {
            status: self.status,
            sample: self.current_sample,
            point: self.current_point,
            extrema: self.extrema.state(),
            history: self.history.iter().copied().collect(),
            ticks: self.ticks,
            samples: self.samples_seen,
            interpolator: self.interpolator,
        }
    }
}

/// Read-only view published once per tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetrySnapshot {
    pub status: SensorStatus,
    pub sample: AccelerationSample,
    pub point: Point2D,
    pub extrema: ExtremaState,
    pub history: Arc<[Point2D]>,
    pub ticks: u64,
    pub samples: u64,
    interpolator: TraceInterpolator,
}

impl TelemetrySnapshot {
    /// Trace over this snapshot's history; same result as `TelemetryState::trace_path` at publish time.
    pub fn trace_path(&self, scale: f64) -> Vec<Point2D> {
        self.interpolator.interpolate(&self.history, scale)
    }
}
