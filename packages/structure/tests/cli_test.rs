//! Tests for the command-line front end.

use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn cli() -> Command {
    Command::new(env!("CARGO_BIN_EXE_statute-structure"))
}

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn test_parse_prints_json() {
    cli()
        .arg("parse")
        .arg(fixture("labour_law.txt"))
        .assert()
        .success()
        .stdout(predicate::str::contains("\"type\": \"branch\""))
        .stdout(predicate::str::contains("\"name\": \"labour_law\""))
        .stderr(predicate::str::contains("Articles: 5"));
}

#[test]
fn test_parse_yaml_with_metadata() {
    cli()
        .args(["parse", "--format", "yaml", "--name", "Labour Law", "--jurisdiction", "KW"])
        .arg(fixture("bilingual.txt"))
        .assert()
        .success()
        .stdout(predicate::str::starts_with("---\n"))
        .stdout(predicate::str::contains("jurisdiction: KW"));
}

#[test]
fn test_parse_many_files_into_directory() {
    let output = TempDir::new().unwrap();
    cli()
        .arg("parse")
        .arg(fixture("labour_law.txt"))
        .arg(fixture("decree.txt"))
        .arg("--output")
        .arg(output.path())
        .assert()
        .success();

    assert!(output.path().join("labour_law.json").exists());
    assert!(output.path().join("decree.json").exists());
}

#[test]
fn test_empty_input_fails() {
    let dir = TempDir::new().unwrap();
    let empty = dir.path().join("empty.txt");
    std::fs::write(&empty, "\n   \n").unwrap();

    cli()
        .arg("parse")
        .arg(&empty)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn test_missing_file_fails() {
    cli()
        .args(["parse", "does-not-exist.txt"])
        .assert()
        .failure();
}

#[test]
fn test_invalid_threshold_rejected() {
    cli()
        .arg("parse")
        .arg(fixture("labour_law.txt"))
        .args(["--toc-min-entries", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid configuration"));
}

#[test]
fn test_classify_lists_lines() {
    cli()
        .arg("classify")
        .arg(fixture("labour_law.txt"))
        .assert()
        .success()
        .stdout(predicate::str::contains("ignored"))
        .stdout(predicate::str::contains("branch_header"))
        .stderr(predicate::str::contains("TOC:"));
}
