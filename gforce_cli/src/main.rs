mod cli;
mod error_fmt;
mod run;

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use clap::Parser;
use eyre::WrapErr;
use gforce_traits::MotionSensor;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

use crate::cli::{Cli, Commands, FILE_GUARD, JSON_MODE};
use crate::error_fmt::{exit_code_for_error, format_error_json, humanize};

fn main() {
    let cli = Cli::parse();
    let _ = JSON_MODE.set(cli.json);
    if let Err(e) = color_eyre::install() {
        eprintln!("failed to install error reporter: {e}");
    }

    if let Err(err) = real_main(cli) {
        if JSON_MODE.get().copied().unwrap_or(false) {
            println!("{}", format_error_json(&err));
        } else {
            eprintln!("{}", humanize(&err));
        }
        std::process::exit(exit_code_for_error(&err));
    }
}

fn real_main(cli: Cli) -> eyre::Result<()> {
    let loaded = load_config(&cli.config);
    init_tracing(
        cli.json,
        &cli.log_level,
        loaded.as_ref().ok().map(|c| &c.logging),
    )?;
    let cfg = loaded?;
    tracing::debug!(path = %cli.config.display(), "config loaded");

    match cli.cmd {
        Commands::Run {
            seconds,
            replay,
            canvas,
            trace,
        } => {
            let shutdown = Arc::new(AtomicBool::new(false));
            {
                let flag = shutdown.clone();
                if let Err(e) = ctrlc::set_handler(move || flag.store(true, Ordering::Relaxed)) {
                    tracing::warn!(error = %e, "failed to install Ctrl-C handler");
                }
            }
            let sensor = run::build_sensor(&cfg, replay.as_deref())?;
            let params = run::RunParams {
                seconds,
                canvas,
                trace,
            };
            let report = run::run_telemetry(&cfg, sensor, &params, shutdown)?;
            if cli.json {
                println!("{}", run::report_json(&report));
            } else {
                run::print_report(&report);
            }
            Ok(())
        }
        Commands::SelfCheck => {
            let sensor = run::build_sensor(&cfg, None)?;
            if !sensor.is_available() {
                return Err(eyre::Report::new(
                    gforce_core::TelemetryError::SensorUnavailable(
                        "self-check: sensor reported unavailable".into(),
                    ),
                ));
            }
            if cli.json {
                println!(
                    "{}",
                    serde_json::json!({
                        "status": "ok",
                        "sensor_rate_hz": cfg.sensor.rate_hz,
                        "render_rate_hz": cfg.render.rate_hz,
                    })
                );
            } else {
                println!("ok: config valid, sensor available");
            }
            Ok(())
        }
    }
}

fn load_config(path: &Path) -> eyre::Result<gforce_config::Config> {
    let text = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read config {}", path.display()))?;
    let cfg = gforce_config::load_toml(&text)
        .wrap_err_with(|| format!("failed to parse config {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Console logs go to stderr (pretty or JSON); `[logging].file` adds a JSON
/// file sink. Level precedence: `RUST_LOG`, then `[logging].level`, then `--log-level`.
fn init_tracing(
    json: bool,
    cli_level: &str,
    logging: Option<&gforce_config::Logging>,
) -> eyre::Result<()> {
    let level = logging
        .and_then(|l| l.level.as_deref())
        .unwrap_or(cli_level);
    let filter = match EnvFilter::try_from_default_env() {
        Ok(f) => f,
        Err(_) => EnvFilter::try_new(level)
            .wrap_err_with(|| format!("invalid log level '{level}'"))?,
    };

    let console_json = json.then(|| fmt::layer().json().with_writer(std::io::stderr));
    let console_pretty = (!json).then(|| {
        fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
    });

    let file_layer = match logging.and_then(|l| l.file.as_deref()) {
        Some(file) => {
            let path = Path::new(file);
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let name = path
                .file_name()
                .ok_or_else(|| eyre::eyre!("logging.file must name a file, got '{file}'"))?;
            let rotation = logging.and_then(|l| l.rotation.as_deref()).unwrap_or("never");
            let appender = match rotation {
                "daily" => tracing_appender::rolling::daily(dir, name),
                "hourly" => tracing_appender::rolling::hourly(dir, name),
                _ => tracing_appender::rolling::never(dir, name),
            };
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let _ = FILE_GUARD.set(guard);
            Some(fmt::layer().json().with_ansi(false).with_writer(writer))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console_json)
        .with(console_pretty)
        .with(file_layer)
        .try_init()
        .map_err(|e| eyre::eyre!("failed to initialise logging: {e}"))?;
    Ok(())
}
