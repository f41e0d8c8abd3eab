//! Integration tests for the hybrid-analyzer CLI

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

/// Folder with two readable text files and one file of another type
fn corpus() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let data = temp_dir.path().join("data");
    fs::create_dir(&data).unwrap();
    fs::write(data.join("a.txt"), "hello world").unwrap();
    fs::write(data.join("b.txt"), "the cat and the hat 42").unwrap();
    fs::write(data.join("notes.md"), "ignored entirely").unwrap();
    temp_dir
}

fn cli(temp_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("hybrid-analyzer").unwrap();
    cmd.current_dir(temp_dir.path()).env_remove("RUST_LOG");
    cmd
}

fn json_run(temp_dir: &TempDir, args: &[&str]) -> Value {
    let assert = cli(temp_dir)
        .args(args)
        .args(["--folder", "data", "--detailed", "--format", "json"])
        .assert()
        .success();
    serde_json::from_slice(&assert.get_output().stdout).unwrap()
}

/// Test CLI binary exists and responds to --help
#[test]
fn test_cli_help() {
    let mut cmd = Command::cargo_bin("hybrid-analyzer").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Bulk text analysis"));
}

#[test]
fn test_cli_version() {
    let mut cmd = Command::cargo_bin("hybrid-analyzer").unwrap();
    cmd.arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("hybrid-analyzer"));
}

#[test]
fn test_invalid_subcommand() {
    let mut cmd = Command::cargo_bin("hybrid-analyzer").unwrap();
    cmd.arg("invalid-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_analyze_prints_summary() {
    let temp_dir = corpus();

    cli(&temp_dir)
        .args(["analyze", "--folder", "data", "--io-workers", "2", "--cpu-workers", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 2 files"))
        .stdout(predicate::str::contains("Sequential time"))
        .stdout(predicate::str::contains("Speedup"))
        .stdout(predicate::str::contains("Total files processed"));
}

#[test]
fn test_summary_counts_failed_files() {
    let temp_dir = corpus();
    fs::write(temp_dir.path().join("data/broken.txt"), [0xffu8, 0xfe]).unwrap();

    cli(&temp_dir)
        .args(["analyze", "--folder", "data"])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"Files analyzed +2\n").unwrap())
        .stdout(predicate::str::is_match(r"Failed +1\n").unwrap())
        .stdout(predicate::str::contains("broken.txt (read)"));
}

#[test]
fn test_analyze_json_aggregate() {
    let temp_dir = corpus();
    let doc = json_run(&temp_dir, &["analyze"]);

    assert_eq!(doc["mode"], "hybrid");
    assert_eq!(doc["files_discovered"], 2);
    assert_eq!(doc["aggregate"]["files"], 2);
    assert_eq!(doc["aggregate"]["words"], 8);
    assert_eq!(doc["aggregate"]["digits"], 2);
    assert_eq!(doc["top_words"][0], serde_json::json!(["the", 2]));
    assert_eq!(doc["per_file"][0]["name"], "a.txt");
    assert_eq!(doc["performance"]["rank_count"], 1);
}

#[test]
fn test_distributed_matches_analyze() {
    let temp_dir = corpus();
    let hybrid = json_run(&temp_dir, &["analyze"]);
    let distributed = json_run(&temp_dir, &["distributed", "--ranks", "3"]);

    assert_eq!(distributed["mode"], "distributed");
    assert_eq!(distributed["aggregate"], hybrid["aggregate"]);
    assert_eq!(distributed["top_words"], hybrid["top_words"]);
    assert_eq!(distributed["len_histogram"], hybrid["len_histogram"]);
    assert_eq!(distributed["ranks"].as_array().unwrap().len(), 3);
    assert_eq!(distributed["performance"]["rank_count"], 3);
}

#[test]
fn test_more_ranks_than_files() {
    let temp_dir = corpus();
    let doc = json_run(&temp_dir, &["distributed", "--ranks", "5"]);

    assert_eq!(doc["aggregate"]["files"], 2);
    assert_eq!(doc["ranks"].as_array().unwrap().len(), 5);
}

#[test]
fn test_missing_folder_fails() {
    let temp_dir = TempDir::new().unwrap();

    cli(&temp_dir)
        .args(["analyze", "--folder", "nowhere"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nowhere"));
}

#[test]
fn test_limit_caps_discovery() {
    let temp_dir = corpus();
    let doc = json_run(&temp_dir, &["analyze", "--limit", "1"]);

    assert_eq!(doc["files_discovered"], 1);
    assert_eq!(doc["per_file"][0]["name"], "a.txt");
}

#[test]
fn test_write_files_creates_artifacts() {
    let temp_dir = corpus();

    cli(&temp_dir)
        .args(["analyze", "--folder", "data", "--write-files", "--output-dir", "out"])
        .assert()
        .success()
        .stdout(predicate::str::contains("results.json"));

    let csv = fs::read_to_string(temp_dir.path().join("out/results.csv")).unwrap();
    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some("filename,words,vowels,digits,symbols,avg_len"));
    assert!(lines.next().unwrap().starts_with("a.txt,2,3,0,0,"));

    let json = fs::read_to_string(temp_dir.path().join("out/results.json")).unwrap();
    let doc: Value = serde_json::from_str(&json).unwrap();
    assert_eq!(doc["aggregate"]["files"], 2);
}

#[test]
fn test_params_derivation() {
    let temp_dir = TempDir::new().unwrap();

    let assert = cli(&temp_dir)
        .args(["params", "237006081", "--format", "json"])
        .assert()
        .success();
    let doc: Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();

    assert_eq!(doc["io_workers"], 3);
    assert_eq!(doc["cpu_workers"], 2);
    assert_eq!(doc["file_limit"], 810);
}

#[test]
fn test_params_rejects_short_identifier() {
    let temp_dir = TempDir::new().unwrap();

    cli(&temp_dir).args(["params", "12"]).assert().failure();
}

#[test]
fn test_invalid_nim_falls_back() {
    let temp_dir = corpus();

    cli(&temp_dir)
        .args(["analyze", "--folder", "data", "--nim", "12ab"])
        .assert()
        .success()
        .stdout(predicate::str::contains("using configured parameters"));
}

#[test]
fn test_nim_applies_derived_limit() {
    let temp_dir = corpus();
    // last three digits 000 give a file limit of zero
    let doc = json_run(&temp_dir, &["analyze", "--nim", "12000"]);

    assert_eq!(doc["files_discovered"], 0);
    assert_eq!(doc["derived"]["file_limit"], 0);
    assert_eq!(doc["performance"]["throughput_files_per_sec"], 0.0);
}

#[test]
fn test_config_show() {
    let temp_dir = TempDir::new().unwrap();

    cli(&temp_dir)
        .args(["config", "show", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"extension\": \"txt\""));
}

#[test]
fn test_config_file_is_used() {
    let temp_dir = corpus();
    fs::write(
        temp_dir.path().join("custom.toml"),
        "[run]\nsource_directory = \"data\"\n\n[discovery]\nextension = \"md\"\n",
    )
    .unwrap();

    let assert = cli(&temp_dir)
        .args(["--config", "custom.toml", "analyze", "--format", "json"])
        .assert()
        .success();
    let doc: Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();

    assert_eq!(doc["files_discovered"], 1);
    assert_eq!(doc["per_file"][0]["name"], "notes.md");
}

#[test]
fn test_missing_config_file_fails() {
    let temp_dir = TempDir::new().unwrap();

    cli(&temp_dir)
        .args(["--config", "absent.toml", "config", "validate"])
        .assert()
        .failure();
}
