//! Telemetry run: config mapping, sensor assembly, pipeline execution and the final report.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::{Duration, Instant};

use eyre::WrapErr;
use gforce_core::error::{Result as CoreResult, TelemetryError};
use gforce_core::{
    AccelerationSample, Direction, ExtremaState, GraphGeometry, GraphLayout, Pipeline,
    PipelineStats, Point2D, SensorStatus, TelemetryCfg, Timeouts,
};
use gforce_sim::{ReplaySensor, SimParams, SimulatedSensor};
use gforce_traits::MotionSensor;
use serde_json::json;

/// Simulator parameters from `[sim]`, timed at the configured sensor rate.
pub fn sim_params(cfg: &gforce_config::Config) -> SimParams {
    SimParams {
        rate_hz: cfg.sensor.rate_hz,
        lateral_amplitude_g: cfg.sim.lateral_amplitude_g,
        longitudinal_amplitude_g: cfg.sim.longitudinal_amplitude_g,
        period_secs: cfg.sim.period_secs,
        noise_g: cfg.sim.noise_g,
        dropout_every: cfg.sim.dropout_every,
        available: cfg.sim.available,
        ..SimParams::default()
    }
}

pub fn replay_samples(rows: &[gforce_config::SampleRow]) -> Vec<AccelerationSample> {
    rows.iter()
        .map(|r| AccelerationSample::new(r.x, r.y, r.z))
        .collect()
}

/// Replay sensor when a CSV is given, simulator otherwise.
pub fn build_sensor(
    cfg: &gforce_config::Config,
    replay: Option<&Path>,
) -> eyre::Result<Box<dyn MotionSensor + Send>> {
    match replay {
        Some(path) => {
            let rows = gforce_config::load_samples_csv(path)
                .wrap_err_with(|| format!("failed to load replay file {}", path.display()))?;
            tracing::info!(samples = rows.len(), path = %path.display(), "replaying recorded samples");
            Ok(Box::new(ReplaySensor::new(replay_samples(&rows))))
        }
        None => Ok(Box::new(SimulatedSensor::new(sim_params(cfg)))),
    }
}

#[derive(Debug, Clone)]
pub struct RunReport {
    pub status: SensorStatus,
    pub extrema: ExtremaState,
    pub point: Point2D,
    pub stats: PipelineStats,
    pub elapsed_ms: u64,
    pub layout: GraphLayout,
    pub trace: Option<Vec<Point2D>>,
}

pub struct RunParams {
    pub seconds: f64,
    pub canvas: f64,
    pub trace: bool,
}

pub fn run_telemetry(
    cfg: &gforce_config::Config,
    sensor: Box<dyn MotionSensor + Send>,
    params: &RunParams,
    shutdown: Arc<AtomicBool>,
) -> CoreResult<RunReport> {
    let duration = Duration::try_from_secs_f64(params.seconds).map_err(|e| {
        eyre::Report::new(TelemetryError::Config(format!(
            "--seconds must be a non-negative number of seconds that fits a duration ({e})"
        )))
    })?;
    if !(params.canvas.is_finite() && params.canvas > 0.0) {
        return Err(eyre::Report::new(TelemetryError::Config(
            "--canvas must be a positive number".into(),
        )));
    }

    let telemetry: TelemetryCfg = cfg.into();
    let timeouts: Timeouts = (&cfg.sensor).into();
    let geometry: GraphGeometry = (&cfg.graph).into();

    let mut pipeline = Pipeline::builder()
        .with_config(telemetry)
        .with_timeouts(timeouts)
        .with_sensor(sensor)
        .build()?;

    let started = Instant::now();
    match pipeline.start() {
        Ok(()) => {
            pipeline.run_for(duration, &shutdown);
        }
        Err(e) => match e.downcast_ref::<TelemetryError>() {
            Some(TelemetryError::SensorUnavailable(msg)) => {
                tracing::warn!(reason = %msg, "no sensor data; reporting zeroed values");
            }
            _ => return Err(e),
        },
    }
    pipeline.stop();
    let elapsed_ms = started.elapsed().as_millis().min(u128::from(u64::MAX)) as u64;

    let snap = pipeline.latest();
    let layout = geometry.layout(params.canvas, params.canvas);
    let trace = params.trace.then(|| layout.trace(&snap));
    let stats = pipeline.stats();
    tracing::info!(
        ticks = stats.ticks,
        samples = stats.samples,
        discarded = stats.discarded,
        dropped = stats.dropped,
        "run complete"
    );

    Ok(RunReport {
        status: snap.status,
        extrema: snap.extrema,
        point: snap.point,
        stats,
        elapsed_ms,
        layout,
        trace,
    })
}

/// One extrema line as shown next to the graph, e.g. `Max Accel 0.80 G`.
pub fn extrema_line(extrema: &ExtremaState, direction: Direction) -> String {
    format!("{} {:.2} G", direction.label(), extrema.magnitude(direction))
}

pub fn print_report(report: &RunReport) {
    if !report.status.is_active() {
        println!("warning: motion sensor unavailable; values stay at zero");
    }
    println!("status: {}", report.status);
    for d in Direction::ALL {
        println!("{}", extrema_line(&report.extrema, d));
    }
    println!(
        "current: lateral {:.2} G, longitudinal {:.2} G",
        report.point.x, report.point.y
    );
    let s = &report.stats;
    println!(
        "ticks: {} (skipped {}), samples: {}, discarded: {}, dropped: {}, elapsed: {} ms",
        s.ticks, s.skipped_ticks, s.samples, s.discarded, s.dropped, report.elapsed_ms
    );
    if let Some(trace) = &report.trace {
        println!("trace: {} points", trace.len());
        for p in trace {
            println!("{:.1},{:.1}", p.x, p.y);
        }
    }
}

pub fn report_json(report: &RunReport) -> serde_json::Value {
    let e = &report.extrema;
    let l = &report.layout;
    let dot = l.dot_position(report.point);
    let warning = (!report.status.is_active()).then_some("motion sensor unavailable");
    let trace = report
        .trace
        .as_ref()
        .map(|t| t.iter().map(|p| [p.x, p.y]).collect::<Vec<_>>());
    json!({
        "status": report.status.as_str(),
        "warning": warning,
        "extrema": {
            "max_acceleration": e.max_acceleration,
            "max_braking": e.max_braking,
            "max_left": e.max_left,
            "max_right": e.max_right,
        },
        "labels": Direction::ALL
            .iter()
            .map(|d| extrema_line(e, *d))
            .collect::<Vec<_>>(),
        "point": { "x": report.point.x, "y": report.point.y },
        "stats": {
            "ticks": report.stats.ticks,
            "samples": report.stats.samples,
            "discarded": report.stats.discarded,
            "dropped": report.stats.dropped,
            "skipped_ticks": report.stats.skipped_ticks,
        },
        "elapsed_ms": report.elapsed_ms,
        "graph": {
            "bounds": l.bounds,
            "scale": l.scale,
            "dot_diameter": l.dot_diameter,
            "dot": { "x": dot.x, "y": dot.y },
        },
        "trace": trace,
    })
}
