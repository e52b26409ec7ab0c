//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::OnceLock;

pub static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();
/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(name = "gforce", version, about = "G-force telemetry CLI")]
pub struct Cli {
    /// Path to config TOML (typed)
    #[arg(long, value_name = "FILE", default_value = "etc/gforce_config.toml")]
    pub config: PathBuf,

    /// Log and report as JSON instead of pretty text
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace)
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    pub log_level: String,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the telemetry pipeline and report peak loads
    Run {
        /// How long to run, in seconds (Ctrl-C stops early)
        #[arg(long, value_name = "SECS", default_value_t = 5.0)]
        seconds: f64,
        /// Replay a recorded sample CSV (headers x,y,z) instead of the simulator
        #[arg(long, value_name = "FILE")]
        replay: Option<PathBuf>,
        /// Canvas size in pixels used to lay out the graph
        #[arg(long, value_name = "PX", default_value_t = 300.0)]
        canvas: f64,
        /// Also print the interpolated trace in canvas coordinates
        #[arg(long, action = ArgAction::SetTrue)]
        trace: bool,
    },
    /// Validate config and probe sensor availability
    SelfCheck,
}
