//! Human-readable error descriptions and structured JSON error formatting.

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    use gforce_core::error::{BuildError, TelemetryError};

    // Typed matches first
    if let Some(be) = err.downcast_ref::<BuildError>() {
        return match be {
            BuildError::MissingConfig => {
                "What happened: The telemetry pipeline was built without a configuration.\nLikely causes: The config was not loaded or not passed to the builder.\nHow to fix: Pass a valid config with --config FILE.".to_string()
            }
            BuildError::InvalidConfig(msg) => format!(
                "What happened: Invalid configuration ({msg}).\nLikely causes: Missing or out-of-range values in the TOML.\nHow to fix: Edit the config file, then rerun."
            ),
        };
    }

    if let Some(te) = err.downcast_ref::<TelemetryError>() {
        return match te {
            TelemetryError::SensorUnavailable(_) => {
                "What happened: The motion sensor is unavailable.\nLikely causes: No accelerometer on this device, or the simulator is configured with sim.available = false.\nHow to fix: Check the device, or set [sim] available = true in the config.".to_string()
            }
            TelemetryError::Config(msg) => format!(
                "What happened: Invalid option ({msg}).\nLikely causes: A command-line value is out of range.\nHow to fix: Check the values passed on the command line."
            ),
            other => format!(
                "What happened: {other}.\nLikely causes: See logs.\nHow to fix: Re-run with --log-level=debug or set RUST_LOG for more detail."
            ),
        };
    }

    // String-based heuristics for errors coming from config loading or replay files.
    // The alternate format includes the whole context chain.
    let msg = format!("{err:#}");
    let lower = msg.to_ascii_lowercase();

    if lower.contains("sample csv must have headers") {
        return "Invalid headers in sample CSV. Expected 'x,y,z'.".to_string();
    }

    if lower.contains("invalid csv row") || lower.contains("contains no rows") {
        return format!(
            "What happened: The replay file could not be used.\nLikely causes: Unparsable or non-finite values, or an empty recording.\nHow to fix: Fix the CSV and rerun. Original: {msg}"
        );
    }

    if lower.contains("read config") || lower.contains("parse config") {
        return format!(
            "What happened: The config file could not be loaded.\nLikely causes: Wrong --config path or TOML syntax errors.\nHow to fix: Check the path and the file contents. Original: {msg}"
        );
    }

    if lower.contains("must be") {
        return format!(
            "What happened: Configuration is invalid ({msg}).\nLikely causes: Out-of-range values in [sensor], [render], [axes], [graph], [logging] or [sim].\nHow to fix: Edit the TOML config and try again."
        );
    }

    // Generic fallback
    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

/// Stable exit codes: 3 for an unavailable sensor, 1 for everything else.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    use gforce_core::error::TelemetryError;
    match err.downcast_ref::<TelemetryError>() {
        Some(TelemetryError::SensorUnavailable(_)) => 3,
        _ => 1,
    }
}

fn reason_name(err: &eyre::Report) -> &'static str {
    use gforce_core::error::{BuildError, TelemetryError};
    if let Some(te) = err.downcast_ref::<TelemetryError>() {
        return match te {
            TelemetryError::SensorUnavailable(_) => "SensorUnavailable",
            TelemetryError::SensorDelivery(_) => "SensorDelivery",
            TelemetryError::Config(_) => "Config",
            TelemetryError::State(_) => "State",
        };
    }
    if err.downcast_ref::<BuildError>().is_some() {
        return "InvalidConfig";
    }
    "Error"
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    use serde_json::json;
    json!({
        "reason": reason_name(err),
        "exit_code": exit_code_for_error(err),
        "message": humanize(err),
    })
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use gforce_core::error::{BuildError, TelemetryError};

    #[test]
    fn unavailable_sensor_maps_to_three() {
        let e = eyre::Report::new(TelemetryError::SensorUnavailable("x".into()));
        assert_eq!(exit_code_for_error(&e), 3);
        assert!(humanize(&e).contains("unavailable"));
    }

    #[test]
    fn wrapped_header_error_is_recognised() {
        use eyre::WrapErr;
        let e: eyre::Result<()> = Err(eyre::eyre!("sample CSV must have headers 'x,y,z', got: a,b,c"));
        let e = e.wrap_err("failed to load replay file r.csv").unwrap_err();
        assert_eq!(humanize(&e), "Invalid headers in sample CSV. Expected 'x,y,z'.");
        assert_eq!(exit_code_for_error(&e), 1);
    }

    #[test]
    fn json_error_carries_reason() {
        let e = eyre::Report::new(BuildError::InvalidConfig("render_rate_hz must be > 0"));
        let v: serde_json::Value = serde_json::from_str(&format_error_json(&e)).unwrap();
        assert_eq!(v["reason"], "InvalidConfig");
        assert_eq!(v["exit_code"], 1);
    }
}
