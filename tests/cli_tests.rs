// Binary-level tests: flags, config file, and exit status
//
// Every run points --log-file into a temp dir and uses a zero-length delay
// window from a config file so no real waiting happens.

use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn zero_delay_config(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("settings.toml");
    fs::write(&path, "min_delay_secs = 0.0\nmax_delay_secs = 0.0\n").unwrap();
    path
}

#[test]
fn test_full_session_writes_log() {
    let tmp = TempDir::new().unwrap();
    let log = tmp.path().join("log.csv");
    let config = zero_delay_config(tmp.path());

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("reaction-time");
    cmd.arg("--config")
        .arg(&config)
        .arg("--trials")
        .arg("3")
        .arg("--log-file")
        .arg(&log)
        .write_stdin("\n\n\n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("REACTION TIME TEST"))
        .stdout(predicate::str::contains("Trial 3 of 3"))
        .stdout(predicate::str::contains(">>> GO! <<<"))
        .stdout(predicate::str::contains("Percentile:"))
        .stdout(predicate::str::contains("Results saved to"));

    let content = fs::read_to_string(&log).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(
        lines[0],
        "date,time,avg_rt_ms,fastest_ms,slowest_ms,all_trials_ms"
    );
    assert_eq!(lines[1].split(',').count(), 6);
    assert_eq!(lines[1].split(',').nth(5).unwrap().split('|').count(), 3);
}

#[test]
fn test_closed_stdin_fails_without_saving() {
    let tmp = TempDir::new().unwrap();
    let log = tmp.path().join("log.csv");
    let config = zero_delay_config(tmp.path());

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("reaction-time");
    cmd.arg("--config")
        .arg(&config)
        .arg("--log-file")
        .arg(&log)
        .write_stdin("\n\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("interrupted after 1 of 5 trials"));

    assert!(!log.exists());
}

#[test]
fn test_zero_trials_rejected() {
    let tmp = TempDir::new().unwrap();
    let log = tmp.path().join("log.csv");

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("reaction-time");
    cmd.arg("--trials")
        .arg("0")
        .arg("--log-file")
        .arg(&log)
        .assert()
        .failure()
        .stderr(predicate::str::contains("trials must be >= 1"));

    assert!(!log.exists());
}

#[test]
fn test_oversized_trial_count_rejected() {
    let tmp = TempDir::new().unwrap();
    let log = tmp.path().join("log.csv");

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("reaction-time");
    cmd.arg("--trials")
        .arg(usize::MAX.to_string())
        .arg("--log-file")
        .arg(&log)
        .assert()
        .failure()
        .stderr(predicate::str::contains("trials must be <= 1000"))
        .stderr(predicate::str::contains("panicked").not());

    assert!(!log.exists());
}

#[test]
fn test_oversized_delay_in_config_rejected() {
    let tmp = TempDir::new().unwrap();
    let config = tmp.path().join("settings.toml");
    fs::write(&config, "min_delay_secs = 1e20\nmax_delay_secs = 1e20\n").unwrap();

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("reaction-time");
    cmd.arg("--config")
        .arg(&config)
        .arg("--log-file")
        .arg(tmp.path().join("log.csv"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("max_delay_secs must be <= 3600"))
        .stderr(predicate::str::contains("panicked").not());
}

#[test]
fn test_invalid_config_file_rejected() {
    let tmp = TempDir::new().unwrap();
    let config = tmp.path().join("settings.toml");
    fs::write(&config, "min_delay_secs = 4.0\nmax_delay_secs = 1.0\n").unwrap();

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("reaction-time");
    cmd.arg("--config")
        .arg(&config)
        .arg("--log-file")
        .arg(tmp.path().join("log.csv"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("max_delay_secs"));
}

#[test]
fn test_missing_config_file_rejected() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("reaction-time");
    cmd.arg("--config")
        .arg("/nonexistent/reaction-time.toml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read config file"));
}

#[test]
fn test_help_lists_flags() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("reaction-time");
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--trials"))
        .stdout(predicate::str::contains("--log-file"))
        .stdout(predicate::str::contains("--config"));
}
