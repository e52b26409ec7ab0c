#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Motion telemetry pipeline (sensor-agnostic).
//!
//! Raw acceleration samples come in through `gforce_traits::MotionSensor` or
//! an external `SampleSink`; out come running peak loads in four directions
//! and a smoothed, render-rate trace for a G-force graph.
//!
//! ## Architecture
//!
//! - **Extrema**: running peaks per direction (`extrema` module)
//! - **Throttle**: sample-and-hold render-rate register plus tick scheduler (`throttle`)
//! - **History**: bounded FIFO of throttled points (`history`)
//! - **Interpolation**: sensor-rate trace reconstruction (`interpolate`)
//! - **State**: the aggregate and its snapshots (`telemetry`, `status`)
//! - **Runtime**: sampler thread, builder and tick-driven pipeline (`sampler`, `builder`, `runner`)
//!
//! ## Threading
//!
//! The producer side only ever touches `SampleSink`, which never blocks. Every
//! write to extrema and history happens in `Pipeline::tick` on the owning
//! thread; other threads read immutable snapshots through `TelemetryHandle`.

pub mod axes;
pub mod builder;
pub mod config;
pub mod conversions;
pub mod error;
pub mod extrema;
pub mod graph;
pub mod history;
pub mod interpolate;
pub mod mocks;
pub mod runner;
pub mod sampler;
pub mod sensor_error;
pub mod status;
pub mod telemetry;
pub mod throttle;
pub mod types;
pub mod util;

pub use axes::{Axis, AxisMap};
pub use builder::PipelineBuilder;
pub use config::{TelemetryCfg, Timeouts};
pub use error::{BuildError, Result, TelemetryError};
pub use extrema::{ExtremaState, ExtremaTracker};
pub use graph::{GraphGeometry, GraphLayout};
pub use history::HistoryBuffer;
pub use interpolate::TraceInterpolator;
pub use runner::{Pipeline, PipelineStats, SamplingMode, TelemetryHandle};
pub use sampler::{Delivery, EvictedSpan, SampleQueue, SampleSink, Sampler};
pub use status::SensorStatus;
pub use telemetry::{TelemetrySnapshot, TelemetryState};
pub use throttle::{RenderSignalThrottle, Ticker};
pub use types::{AccelerationSample, Direction, Point2D};
