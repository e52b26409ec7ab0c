use assert_cmd::prelude::*;
use predicates::prelude::*;
use rstest::rstest;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::Command;
use tempfile::tempdir;

// Minimal valid config: simulator at 100 Hz, default render rate.
fn write_config(dir: &tempfile::TempDir, extra: &str) -> PathBuf {
    let toml = format!(
        r#"
[sensor]
rate_hz = 100
read_timeout_ms = 50

[render]
rate_hz = 15
retention_secs = 2.0

[sim]
noise_g = 0.0
{extra}
"#
    );
    let path = dir.path().join("cfg.toml");
    fs::write(&path, toml).unwrap();
    path
}

fn gforce(cfg: &PathBuf) -> Command {
    let mut cmd = Command::cargo_bin("gforce_cli").unwrap();
    cmd.env_remove("RUST_LOG").arg("--config").arg(cfg);
    cmd
}

#[rstest]
#[case(&["--help"], 0, "Usage:", "stdout")]
#[case(&["run", "--seconds", "0.3"], 0, "Max Accel", "stdout")]
#[case(&["run", "--seconds", "0.3"], 0, "status: active", "stdout")]
#[case(&["self-check"], 0, "ok: config valid", "stdout")]
#[case(&["launch"], 2, "unrecognized subcommand", "stderr")]
#[case(&["run", "--seconds", "soon"], 2, "invalid value", "stderr")]
#[case(&["run", "--seconds", "0.1", "--canvas", "0"], 1, "--canvas", "stderr")]
#[case(&["run", "--seconds", "1e30"], 1, "--seconds", "stderr")]
fn cli_table_cases(
    #[case] args: &[&str],
    #[case] exit_code: i32,
    #[case] needle: &str,
    #[case] stream: &str,
) {
    let dir = tempdir().unwrap();
    let cfg = write_config(&dir, "");

    let mut cmd = gforce(&cfg);
    cmd.args(args);

    let assert = cmd.assert().code(exit_code);
    match stream {
        "stdout" => {
            assert.stdout(predicate::str::contains(needle));
        }
        "stderr" => {
            assert.stderr(predicate::str::contains(needle));
        }
        other => panic!("unknown stream: {other}"),
    }
}

#[test]
fn run_prints_all_four_extrema_labels() {
    let dir = tempdir().unwrap();
    let cfg = write_config(&dir, "");
    gforce(&cfg)
        .args(["run", "--seconds", "0.2"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Max Accel")
                .and(predicate::str::contains("Max Braking"))
                .and(predicate::str::contains("Max Left"))
                .and(predicate::str::contains("Max Right"))
                .and(predicate::str::contains(" G")),
        );
}

#[test]
fn invalid_config_is_reported() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("cfg.toml");
    fs::write(&path, "[sensor]\nrate_hz = 10\n[render]\nrate_hz = 30\n").unwrap();

    gforce(&path)
        .arg("self-check")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("must be"));
}

#[test]
fn missing_config_file_is_reported() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("absent.toml");

    gforce(&path)
        .arg("self-check")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("could not be loaded"));
}

#[test]
fn unavailable_sensor_runs_with_zeroed_values() {
    let dir = tempdir().unwrap();
    let cfg = write_config(&dir, "available = false");

    gforce(&cfg)
        .args(["run", "--seconds", "0.1"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("status: idle")
                .and(predicate::str::contains("warning: motion sensor unavailable"))
                .and(predicate::str::contains("Max Accel 0.00 G")),
        );
}

#[test]
fn self_check_fails_when_sensor_unavailable() {
    let dir = tempdir().unwrap();
    let cfg = write_config(&dir, "available = false");

    gforce(&cfg)
        .arg("self-check")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("unavailable"));
}

#[test]
fn cli_reports_bad_replay_header() {
    let dir = tempdir().unwrap();
    let cfg = write_config(&dir, "");

    let bad_csv = dir.path().join("ride.csv");
    let mut f = fs::File::create(&bad_csv).unwrap();
    writeln!(f, "ax,ay,az").unwrap();
    writeln!(f, "0.1,0.0,0.2").unwrap();

    gforce(&cfg)
        .args(["run", "--seconds", "0.1", "--replay"])
        .arg(&bad_csv)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid headers"));
}

#[test]
fn replay_recording_sets_extrema() {
    let dir = tempdir().unwrap();
    let cfg = write_config(&dir, "");

    // Default axes: lateral from x, longitudinal from z.
    let csv = dir.path().join("ride.csv");
    let mut f = fs::File::create(&csv).unwrap();
    writeln!(f, "x,y,z").unwrap();
    writeln!(f, "0.5,-1.0,0.8").unwrap();
    writeln!(f, "-0.3,-1.0,-0.6").unwrap();

    gforce(&cfg)
        .args(["run", "--seconds", "0.3", "--replay"])
        .arg(&csv)
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Max Accel 0.80 G")
                .and(predicate::str::contains("Max Braking 0.60 G"))
                .and(predicate::str::contains("Max Left 0.50 G"))
                .and(predicate::str::contains("Max Right 0.30 G")),
        );
}
