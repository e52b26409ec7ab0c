//! Pipeline orchestration: sampler thread on one side, tick-driven state on the other.
//!
//! All mutation of `TelemetryState` happens inside `Pipeline::tick`, on the
//! thread that owns the `Pipeline`. Samples reach it through the bounded
//! `SampleSink` queue, commands from other threads through `TelemetryHandle`,
//! and readers get an immutable `TelemetrySnapshot` swapped in once per tick.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use crossbeam_channel as xch;
use gforce_traits::clock::Clock;
use gforce_traits::MotionSensor;

use crate::builder::{Missing, PipelineBuilder};
use crate::config::{TelemetryCfg, Timeouts};
use crate::error::{BuildError, Result, TelemetryError};
use crate::sampler::{SampleQueue, SampleSink, Sampler};
use crate::telemetry::{TelemetrySnapshot, TelemetryState};
use crate::throttle::Ticker;
use crate::types::Point2D;

/// How the owned sensor is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplingMode {
    /// Block on the sensor's own data-ready timing.
    Event,
    /// Read at the given rate in Hz.
    Paced(u32),
}

#[derive(Debug, Clone, Copy)]
enum Command {
    ResetExtrema,
}

/// Counters for one pipeline.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PipelineStats {
    pub ticks: u64,
    /// Samples that reached the extrema tracker and throttle.
    pub samples: u64,
    /// Deliveries thrown away: sensor errors, non-finite values, samples while idle.
    pub discarded: u64,
    /// Samples evicted from a full queue. Their peaks still reach the extrema.
    pub dropped: u64,
    /// Render boundaries skipped after an overrun.
    pub skipped_ticks: u64,
}

type Published = Arc<RwLock<Arc<TelemetrySnapshot>>>;

fn read_published(published: &Published) -> Arc<TelemetrySnapshot> {
    published
        .read()
        .map(|g| g.clone())
        .unwrap_or_else(|p| p.into_inner().clone())
}

/// Cloneable, thread-safe view of a running pipeline.
#[derive(Debug, Clone)]
pub struct TelemetryHandle {
    published: Published,
    commands: xch::Sender<Command>,
    render_period: Duration,
}

impl TelemetryHandle {
    /// Snapshot published at the most recent tick.
    pub fn latest(&self) -> Arc<TelemetrySnapshot> {
        read_published(&self.published)
    }

    /// Queue an extrema reset; applied at the next tick.
    /// Returns `false` once the pipeline is gone.
    pub fn reset_extrema(&self) -> bool {
        self.commands.send(Command::ResetExtrema).is_ok()
    }

    /// Interval between render ticks, for animation timing.
    pub fn render_tick_period(&self) -> Duration {
        self.render_period
    }
}

pub struct Pipeline {
    state: TelemetryState,
    timeouts: Timeouts,
    sampling: SamplingMode,
    clock: Arc<dyn Clock + Send + Sync>,
    sensor: Option<Box<dyn MotionSensor + Send>>,
    sampler: Option<Sampler>,
    sink: SampleSink,
    samples: SampleQueue,
    commands_tx: xch::Sender<Command>,
    commands_rx: xch::Receiver<Command>,
    published: Published,
    subscribers: Vec<xch::Sender<Arc<TelemetrySnapshot>>>,
    skipped_ticks: u64,
    started: bool,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("status", &self.state.status())
            .field("sampling", &self.sampling)
            .field("owns_sensor", &self.sensor.is_some())
            .field("sampler_running", &self.sampler.is_some())
            .field("ticks", &self.state.ticks())
            .finish()
    }
}

impl Pipeline {
    pub fn builder() -> PipelineBuilder<Missing> {
        PipelineBuilder::default()
    }

    pub(crate) fn new(
        cfg: TelemetryCfg,
        timeouts: Timeouts,
        sampling: SamplingMode,
        queue_capacity: usize,
        clock: Arc<dyn Clock + Send + Sync>,
        sensor: Option<Box<dyn MotionSensor + Send>>,
    ) -> std::result::Result<Self, BuildError> {
        let state = TelemetryState::new(cfg)?;
        let (sink, samples) = SampleSink::bounded(queue_capacity);
        let (commands_tx, commands_rx) = xch::unbounded();
        let published = Arc::new(RwLock::new(Arc::new(state.snapshot())));
        Ok(Self {
            state,
            timeouts,
            sampling,
            clock,
            sensor,
            sampler: None,
            sink,
            samples,
            commands_tx,
            commands_rx,
            published,
            subscribers: Vec::new(),
            skipped_ticks: 0,
            started: false,
        })
    }

    /// Confirm sensor availability and go `Active`.
    ///
    /// With an owned sensor that reports unavailable, returns
    /// `TelemetryError::SensorUnavailable`; the pipeline stays `Idle` and every
    /// published value stays at zero. The caller may keep ticking it.
    pub fn start(&mut self) -> Result<()> {
        if self.started {
            return Err(eyre::Report::new(TelemetryError::State(
                "pipeline already started".into(),
            )));
        }
        if let Some(sensor) = self.sensor.take() {
            if !sensor.is_available() {
                self.sensor = Some(sensor);
                tracing::warn!("motion sensor unavailable; telemetry stays idle");
                return Err(eyre::Report::new(TelemetryError::SensorUnavailable(
                    "sensor reported unavailable at startup".into(),
                )));
            }
            let timeout = Duration::from_millis(self.timeouts.sensor_ms);
            let sink = self.sink.clone();
            let clock = self.clock.clone();
            self.sampler = Some(match self.sampling {
                SamplingMode::Event => Sampler::spawn_event(sensor, sink, timeout, clock),
                SamplingMode::Paced(hz) => Sampler::spawn(sensor, sink, hz, timeout, clock),
            });
        }
        self.started = true;
        self.state.activate();
        self.publish();
        tracing::info!(
            sensor_hz = self.state.config().sensor_rate_hz,
            render_hz = self.state.config().render_rate_hz,
            history = self.state.history().capacity(),
            "telemetry started"
        );
        Ok(())
    }

    /// Producer entry point for externally driven pipelines. Safe to use from any thread.
    pub fn sample_sink(&self) -> SampleSink {
        self.sink.clone()
    }

    /// One render tick: apply queued commands, ingest queued samples, emit
    /// one throttled point, publish a fresh snapshot.
    pub fn tick(&mut self) -> Option<Point2D> {
        for cmd in self.commands_rx.try_iter() {
            match cmd {
                Command::ResetExtrema => self.state.reset_extrema(),
            }
        }

        if let Some(span) = self.samples.take_evicted() {
            tracing::trace!(count = span.count, "folding evicted samples");
            self.state.on_evicted(&span);
        }
        for sample in self.samples.drain() {
            self.state.on_sample(sample);
        }

        let emitted = self.state.on_tick();
        self.publish();
        emitted
    }

    /// Drive `tick()` on render boundaries of the injected clock until
    /// `duration` has elapsed or `shutdown` is set. A duration past the
    /// clock's range means no deadline.
    pub fn run_for(&mut self, duration: Duration, shutdown: &AtomicBool) -> PipelineStats {
        let start = self.clock.now();
        let deadline = start.checked_add(duration);
        let mut ticker = Ticker::new(start, self.state.render_tick_period());

        loop {
            if shutdown.load(Ordering::Relaxed) {
                tracing::debug!("run interrupted");
                break;
            }
            let now = self.clock.now();
            let wait = ticker.wait(now);
            if deadline.is_some_and(|d| now + wait > d) {
                break;
            }
            self.clock.sleep(wait);
            self.tick();
            let missed = ticker.advance(self.clock.now());
            if missed > 0 {
                tracing::debug!(missed, "render ticks skipped after overrun");
            }
        }

        self.skipped_ticks = self.skipped_ticks.saturating_add(ticker.skipped());
        self.stats()
    }

    /// Zero the extrema now and republish.
    pub fn reset_extrema(&mut self) {
        self.state.reset_extrema();
        self.publish();
    }

    pub fn handle(&self) -> TelemetryHandle {
        TelemetryHandle {
            published: self.published.clone(),
            commands: self.commands_tx.clone(),
            render_period: self.state.render_tick_period(),
        }
    }

    /// Receive the snapshot of every tick. A subscriber that falls behind
    /// keeps the one it has not read yet and misses the rest.
    pub fn subscribe(&mut self) -> xch::Receiver<Arc<TelemetrySnapshot>> {
        let (tx, rx) = xch::bounded(1);
        self.subscribers.push(tx);
        rx
    }

    pub fn latest(&self) -> Arc<TelemetrySnapshot> {
        read_published(&self.published)
    }

    pub fn state(&self) -> &TelemetryState {
        &self.state
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Milliseconds since the sampler last read successfully, if it is running.
    pub fn sensor_stalled_for(&self) -> Option<u64> {
        self.sampler.as_ref().map(Sampler::stalled_for_now)
    }

    pub fn stats(&self) -> PipelineStats {
        PipelineStats {
            ticks: self.state.ticks(),
            samples: self.state.samples_seen(),
            discarded: self
                .sink
                .discarded()
                .saturating_add(self.state.samples_ignored()),
            dropped: self.sink.dropped(),
            skipped_ticks: self.skipped_ticks,
        }
    }

    /// Stop the sampler thread, if any. Published state stays as it is.
    pub fn stop(&mut self) {
        if self.sampler.take().is_some() {
            tracing::debug!("sampler stopped");
        }
    }

    fn publish(&mut self) {
        let snap = Arc::new(self.state.snapshot());
        match self.published.write() {
            Ok(mut g) => *g = snap.clone(),
            Err(p) => *p.into_inner() = snap.clone(),
        }
        self.subscribers
            .retain(|tx| !matches!(tx.try_send(snap.clone()), Err(xch::TrySendError::Disconnected(_))));
    }
}

impl Drop for Pipeline {
    fn drop(&mut self) {
        self.stop();
    }
}
