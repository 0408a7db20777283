use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

use crate::test_utils::merged_feature_log;

fn gitk_graph() -> Command {
    let mut cmd = Command::cargo_bin("gitk-graph").unwrap();
    // keep the user's config out of the tests
    cmd.env("XDG_CONFIG_HOME", std::env::temp_dir().join("gitk-graph-cli-tests"));
    cmd
}

#[test]
fn test_text_output_from_stdin() {
    gitk_graph()
        .args(["--delimiter", "|"])
        .write_stdin(merged_feature_log())
        .assert()
        .success()
        .stdout(predicate::str::contains("Merge feature (HEAD, main, origin/main)"))
        .stdout(predicate::str::contains("Initial commit (v0.1)"))
        .stdout(predicate::str::contains("1970-01-01 00:01"));
}

#[test]
fn test_json_output_from_file() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("history.log");
    std::fs::write(&input, merged_feature_log()).unwrap();

    let output = gitk_graph()
        .args(["--delimiter", "|", "--format", "json", "--input"])
        .arg(&input)
        .output()
        .unwrap();
    assert!(output.status.success());

    let view: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(view["layout"]["nodes"].as_array().map(Vec::len), Some(5));
    assert_eq!(view["commits"][0]["short_hash"], "m");
}

#[test]
fn test_print_format() {
    gitk_graph()
        .args(["--print-format", "--delimiter", "|"])
        .assert()
        .success()
        .stdout("--pretty=format:%H|%P|%an|%at|%s|%D\n");
}

#[test]
fn test_cycle_is_reported() {
    gitk_graph()
        .args(["--delimiter", "|"])
        .write_stdin("a|b|x|1|one|\nb|a|x|2|two|\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to build commit graph"));
}

#[test]
fn test_missing_input_file() {
    gitk_graph()
        .args(["--input", "/nonexistent/history.log"])
        .assert()
        .failure();
}

#[test]
fn test_config_file_is_used() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config.json");
    std::fs::write(&config, r#"{"delimiter": "|", "short_hash_length": 1}"#).unwrap();

    gitk_graph()
        .arg("--config")
        .arg(&config)
        .write_stdin("abcdef||alice|100|Initial commit|")
        .assert()
        .success()
        .stdout(predicate::str::contains(" a 1970-01-01 00:01 alice Initial commit"));
}
