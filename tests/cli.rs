mod common;

use assert_cmd::Command;
use chrono::Duration;
use predicates::prelude::*;
use serde_json::Value;
use std::path::Path;
use tempfile::tempdir;

use common::{now_secs, MockUpstream, Reply, FORECAST_JSON};

const POINT: [&str; 6] = ["--lat", "59.9428", "--lon", "10.7207", "--alt", "100"];

fn metcast(cache_dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("metcast"));
    cmd.env_remove("METCAST_CLIENT_ID")
        .env_remove("METCAST_CACHE_DIR")
        .env_remove("METCAST_BASE_URL")
        .env_remove("RUST_LOG")
        .arg("--cache-dir")
        .arg(cache_dir);
    cmd
}

fn parse_json(stdout: &[u8]) -> Value {
    serde_json::from_slice(stdout).expect("valid json output")
}

#[test]
fn fetch_requires_client_id() {
    let temp = tempdir().unwrap();

    metcast(temp.path())
        .arg("fetch")
        .args(POINT)
        .assert()
        .failure()
        .stderr(predicate::str::contains("client identifier must not be empty"));
}

#[test]
fn fetch_then_serve_from_disk_inspect_and_clear() {
    let temp = tempdir().unwrap();
    let now = now_secs();

    {
        let upstream = MockUpstream::start();
        upstream.push(Reply::ok(FORECAST_JSON, now + Duration::hours(1), now));

        let assert = metcast(temp.path())
            .args(["--client-id", "metcast-tests", "--base-url", upstream.base_url.as_str()])
            .arg("fetch")
            .args(POINT)
            .assert()
            .success();
        let doc = parse_json(&assert.get_output().stdout);
        assert_eq!(doc["type"], "Feature");
        assert_eq!(upstream.hits(), 1);
        assert_eq!(
            upstream.last_request().header("User-Agent"),
            Some("metcast-tests")
        );
    }

    assert!(temp
        .path()
        .join("metno-locationforecast-59.9428-10.7207-100.json")
        .exists());
    assert!(temp
        .path()
        .join("metno-locationforecast-59.9428-10.7207-100-info.json")
        .exists());

    // Upstream is gone: a fresh disk entry is enough
    let assert = metcast(temp.path())
        .args(["--client-id", "metcast-tests", "--base-url", "http://127.0.0.1:9/complete"])
        .arg("fetch")
        .args(POINT)
        .assert()
        .success();
    assert_eq!(parse_json(&assert.get_output().stdout)["type"], "Feature");

    let assert = metcast(temp.path()).arg("inspect").args(POINT).assert().success();
    let report = parse_json(&assert.get_output().stdout);
    assert_eq!(report["key"], "locationforecast-59.9428-10.7207-100");
    assert_eq!(report["cached"], true);
    assert_eq!(report["expired"], false);

    let assert = metcast(temp.path()).arg("clear").args(POINT).assert().success();
    assert_eq!(parse_json(&assert.get_output().stdout)["cached"], false);
    assert_eq!(std::fs::read_dir(temp.path()).unwrap().count(), 0);

    // Clearing again is fine
    metcast(temp.path()).arg("clear").args(POINT).assert().success();
}

#[test]
fn fetch_renders_markdown() {
    let temp = tempdir().unwrap();
    let upstream = MockUpstream::start();
    let now = now_secs();
    upstream.push(Reply::ok(FORECAST_JSON, now + Duration::hours(1), now));

    metcast(temp.path())
        .args(["--client-id", "metcast-tests", "--base-url", upstream.base_url.as_str()])
        .args(["--format", "md"])
        .arg("fetch")
        .args(POINT)
        .assert()
        .success()
        .stdout(predicate::str::contains("# Forecast"))
        .stdout(predicate::str::contains("| Time (UTC) |"));
}

#[test]
fn upstream_error_fails_the_command() {
    let temp = tempdir().unwrap();
    let upstream = MockUpstream::start();
    upstream.push(Reply::status(503));

    metcast(temp.path())
        .args(["--client-id", "metcast-tests", "--base-url", upstream.base_url.as_str()])
        .arg("fetch")
        .args(POINT)
        .assert()
        .failure()
        .stderr(predicate::str::contains("503"));
}

#[test]
fn inspect_reports_missing_entry() {
    let temp = tempdir().unwrap();

    let assert = metcast(temp.path())
        .args(["--format", "md"])
        .arg("inspect")
        .args(POINT)
        .assert()
        .success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout);
    assert!(stdout.contains("Nothing cached"));
}
