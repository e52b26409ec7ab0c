use assert_cmd::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::tempdir;

fn run_json(extra_cfg: &str, args: &[&str]) -> (i32, serde_json::Value) {
    let dir = tempdir().unwrap();
    let cfg = dir.path().join("cfg.toml");
    fs::write(&cfg, format!("[sensor]\nrate_hz = 100\n[sim]\n{extra_cfg}\n")).unwrap();

    let out = Command::cargo_bin("gforce_cli")
        .unwrap()
        .env_remove("RUST_LOG")
        .arg("--config")
        .arg(&cfg)
        .arg("--json")
        .args(["--log-level", "error"])
        .args(args)
        .output()
        .unwrap();
    let stdout = String::from_utf8(out.stdout).unwrap();
    let line = stdout
        .lines()
        .find(|l| l.trim_start().starts_with('{'))
        .unwrap_or_else(|| panic!("no JSON on stdout: {stdout:?}"));
    (out.status.code().unwrap(), serde_json::from_str(line).unwrap())
}

#[test]
fn run_report_has_stable_keys() {
    let (code, v) = run_json("", &["run", "--seconds", "0.3", "--trace"]);
    assert_eq!(code, 0);

    assert_eq!(v["status"], "active");
    assert!(v["warning"].is_null());
    for key in ["max_acceleration", "max_braking", "max_left", "max_right"] {
        assert!(v["extrema"][key].is_number(), "missing extrema.{key}");
    }
    assert!(v["extrema"]["max_acceleration"].as_f64().unwrap() >= 0.0);
    assert!(v["extrema"]["max_braking"].as_f64().unwrap() <= 0.0);

    let labels = v["labels"].as_array().unwrap();
    assert_eq!(labels.len(), 4);
    assert!(labels.iter().all(|l| l.as_str().unwrap().ends_with(" G")));

    assert!(v["point"]["x"].is_number() && v["point"]["y"].is_number());
    assert!(v["stats"]["ticks"].as_u64().unwrap() >= 1);
    assert!(v["stats"]["samples"].is_u64());
    assert!(v["elapsed_ms"].is_u64());

    // 300 px canvas with a 3 G outer edge.
    assert_eq!(v["graph"]["bounds"].as_f64().unwrap(), 300.0);
    assert_eq!(v["graph"]["scale"].as_f64().unwrap(), 100.0);
    assert_eq!(v["graph"]["dot_diameter"].as_f64().unwrap(), 15.0);
    assert!(v["trace"].is_array());
}

#[test]
fn trace_is_null_unless_requested() {
    let (code, v) = run_json("", &["run", "--seconds", "0.1"]);
    assert_eq!(code, 0);
    assert!(v["trace"].is_null());
}

#[test]
fn idle_run_reports_warning_and_zeroes() {
    let (code, v) = run_json("available = false", &["run", "--seconds", "0.1"]);
    assert_eq!(code, 0);
    assert_eq!(v["status"], "idle");
    assert_eq!(v["warning"], "motion sensor unavailable");
    assert_eq!(v["extrema"]["max_acceleration"].as_f64().unwrap(), 0.0);
    assert_eq!(v["stats"]["samples"].as_u64().unwrap(), 0);
    // Dot sits at the canvas center.
    assert_eq!(v["graph"]["dot"]["x"].as_f64().unwrap(), 150.0);
    assert_eq!(v["graph"]["dot"]["y"].as_f64().unwrap(), 150.0);
}

#[test]
fn errors_are_structured_in_json_mode() {
    let (code, v) = run_json("available = false", &["self-check"]);
    assert_eq!(code, 3);
    assert_eq!(v["reason"], "SensorUnavailable");
    assert_eq!(v["exit_code"], 3);
    assert!(v["message"].as_str().unwrap().contains("unavailable"));
}
