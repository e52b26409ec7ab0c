#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schemas and recorded-sample parsing for the g-force telemetry pipeline.
//!
//! - `Config` and sub-structs are deserialized from TOML and validated.
//! - The sample CSV loader enforces headers and rejects non-finite readings
//!   so a replayed recording behaves like a well-formed sensor stream.
use serde::Deserialize;

/// Recorded sample CSV schema.
///
/// Expected headers:
/// x,y,z
///
/// Example:
/// x,y,z
/// 0.01,-0.98,0.12
/// 0.05,-0.97,0.31
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct SampleRow {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[derive(Debug, Deserialize)]
pub struct SensorCfg {
    /// Nominal rate at which the sensor delivers samples.
    pub rate_hz: u32,
    /// Max time to wait for one sample before the read counts as failed.
    #[serde(default = "default_read_timeout_ms")]
    pub read_timeout_ms: u64,
}

fn default_read_timeout_ms() -> u64 {
    50
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RenderCfg {
    /// Render tick rate; the throttle emits at most once per tick.
    pub rate_hz: u32,
    /// Length of the trailing trace window in seconds.
    pub retention_secs: f64,
}

impl Default for RenderCfg {
    fn default() -> Self {
        Self {
            rate_hz: 15,
            retention_secs: 2.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AxisName {
    X,
    Y,
    Z,
}

/// Sign convention: which sensor axis feeds each graph axis, and whether it is negated.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AxesCfg {
    pub lateral: AxisName,
    pub longitudinal: AxisName,
    pub invert_lateral: bool,
    pub invert_longitudinal: bool,
}

impl Default for AxesCfg {
    fn default() -> Self {
        Self {
            lateral: AxisName::X,
            longitudinal: AxisName::Z,
            invert_lateral: false,
            invert_longitudinal: false,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GraphCfg {
    /// G value drawn at the edge of the graph circle.
    pub outer_edge_g: f64,
    /// Ratio of graph bounds to the diameter of the current-value dot.
    pub dot_ratio: f64,
}

impl Default for GraphCfg {
    fn default() -> Self {
        Self {
            outer_edge_g: 3.0,
            dot_ratio: 20.0,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SimCfg {
    /// Report the simulated device as present.
    pub available: bool,
    pub lateral_amplitude_g: f64,
    pub longitudinal_amplitude_g: f64,
    /// Duration of one simulated lap.
    pub period_secs: f64,
    /// Peak amplitude of uniform noise added to every axis.
    pub noise_g: f64,
    /// Fail every Nth read with a delivery error (0 disables).
    pub dropout_every: u64,
}

impl Default for SimCfg {
    fn default() -> Self {
        Self {
            available: true,
            lateral_amplitude_g: 1.2,
            longitudinal_amplitude_g: 0.8,
            period_secs: 6.0,
            noise_g: 0.02,
            dropout_every: 0,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Config {
    pub sensor: SensorCfg,
    #[serde(default)]
    pub render: RenderCfg,
    #[serde(default)]
    pub axes: AxesCfg,
    #[serde(default)]
    pub graph: GraphCfg,
    #[serde(default)]
    pub logging: Logging,
    /// Simulated sensor parameters (ignored when replaying a recording)
    #[serde(default)]
    pub sim: SimCfg,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

/// Load a recorded sample stream from CSV with exact `x,y,z` headers.
pub fn load_samples_csv(path: &std::path::Path) -> eyre::Result<Vec<SampleRow>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| eyre::eyre!("open sample CSV {:?}: {}", path, e))?;

    // Enforce exact headers
    let headers = rdr
        .headers()
        .map_err(|e| eyre::eyre!("read CSV headers {:?}: {}", path, e))?
        .clone();
    let expected = ["x", "y", "z"];
    let actual: Vec<String> = headers.iter().map(|s| s.to_string()).collect();
    if actual != expected {
        eyre::bail!(
            "sample CSV must have headers 'x,y,z', got: {}",
            actual.join(",")
        );
    }

    let mut rows = Vec::new();
    for (idx, rec) in rdr.deserialize::<SampleRow>().enumerate() {
        let row = rec.map_err(|e| eyre::eyre!("invalid CSV row {}: {}", idx + 2, e))?;
        if !(row.x.is_finite() && row.y.is_finite() && row.z.is_finite()) {
            eyre::bail!("invalid CSV row {}: non-finite sample", idx + 2);
        }
        rows.push(row);
    }

    if rows.is_empty() {
        eyre::bail!("sample CSV {:?} contains no rows", path);
    }
    Ok(rows)
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // Sensor
        if self.sensor.rate_hz == 0 {
            eyre::bail!("sensor.rate_hz must be > 0");
        }
        if self.sensor.read_timeout_ms == 0 {
            eyre::bail!("sensor.read_timeout_ms must be >= 1");
        }
        if self.sensor.read_timeout_ms > 10_000 {
            eyre::bail!("sensor.read_timeout_ms is unreasonably large (>10s)");
        }

        // Render
        if self.render.rate_hz == 0 {
            eyre::bail!("render.rate_hz must be > 0");
        }
        if self.render.rate_hz > self.sensor.rate_hz {
            eyre::bail!("render.rate_hz must be <= sensor.rate_hz");
        }
        if !(self.render.retention_secs > 0.0 && self.render.retention_secs <= 60.0) {
            eyre::bail!("render.retention_secs must be in (0.0, 60.0]");
        }

        // Axes
        if self.axes.lateral == self.axes.longitudinal {
            eyre::bail!("axes.lateral and axes.longitudinal must name different axes");
        }

        // Graph
        if !(self.graph.outer_edge_g.is_finite() && self.graph.outer_edge_g > 0.0) {
            eyre::bail!("graph.outer_edge_g must be > 0.0");
        }
        if !(self.graph.dot_ratio.is_finite() && self.graph.dot_ratio >= 1.0) {
            eyre::bail!("graph.dot_ratio must be >= 1.0");
        }

        // Logging
        if let Some(rotation) = self.logging.rotation.as_deref()
            && !matches!(rotation, "never" | "daily" | "hourly")
        {
            eyre::bail!("logging.rotation must be one of never|daily|hourly");
        }

        // Sim
        if !(self.sim.period_secs.is_finite() && self.sim.period_secs > 0.0) {
            eyre::bail!("sim.period_secs must be > 0.0");
        }
        if !(self.sim.noise_g.is_finite() && self.sim.noise_g >= 0.0) {
            eyre::bail!("sim.noise_g must be >= 0.0");
        }
        if !(self.sim.lateral_amplitude_g.is_finite()
            && self.sim.longitudinal_amplitude_g.is_finite())
        {
            eyre::bail!("sim amplitudes must be finite");
        }

        Ok(())
    }
}
