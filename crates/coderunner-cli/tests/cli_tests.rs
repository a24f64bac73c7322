//! Integration tests for coderunner-cli.
//!
//! Note: Tests use `unwrap`/`expect` which is acceptable in test code.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use coderunner_core::test_utils::TarTestBuilder;
use coderunner_core::test_utils::ZipTestBuilder;
use predicates::prelude::*;
use std::path::Path;
use std::path::PathBuf;
use tempfile::TempDir;

fn coderunner_cmd() -> Command {
    cargo_bin_cmd!("coderunner")
}

fn write_archive(dir: &Path, name: &str, data: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, data).expect("failed to write archive");
    path
}

fn hello_archive() -> Vec<u8> {
    TarTestBuilder::new()
        .add_directory("src/")
        .add_file_with_mode("src/hello.sh", b"#!/bin/sh\necho \"hello $1\"\n", 0o755)
        .build_gz()
}

#[test]
fn test_version_flag() {
    coderunner_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("coderunner"));
}

#[test]
fn test_help_flag() {
    coderunner_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("submit"))
        .stdout(predicate::str::contains("extract"));
}

#[test]
fn test_extract_help() {
    coderunner_cmd()
        .arg("extract")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("path containment"));
}

#[test]
fn test_extract_creates_files() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let archive = write_archive(temp.path(), "hello.tar.gz", &hello_archive());
    let out = temp.path().join("out");

    coderunner_cmd()
        .arg("extract")
        .arg(&archive)
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Extraction complete"));

    assert!(out.join("src/hello.sh").is_file());
}

#[test]
fn test_extract_json_output() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let archive = write_archive(temp.path(), "hello.tar.gz", &hello_archive());

    let output = coderunner_cmd()
        .arg("extract")
        .arg("--json")
        .arg(&archive)
        .arg(temp.path().join("out"))
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json: serde_json::Value = serde_json::from_slice(&output).expect("invalid JSON output");
    assert_eq!(json["status"], "success");
    assert_eq!(json["operation"], "extract");
    assert_eq!(json["data"]["files_extracted"], 1);
    assert_eq!(json["data"]["directories_created"], 1);
}

#[test]
fn test_extract_quiet_mode() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let archive = write_archive(temp.path(), "hello.tar.gz", &hello_archive());

    coderunner_cmd()
        .arg("extract")
        .arg("--quiet")
        .arg(&archive)
        .arg(temp.path().join("out"))
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_extract_traversal_rejected() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let data = TarTestBuilder::new()
        .add_raw_file("../../escape.txt", b"x")
        .build();
    let archive = write_archive(temp.path(), "evil.tar", &data);

    coderunner_cmd()
        .arg("extract")
        .arg(&archive)
        .arg(temp.path().join("a/b"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("path traversal"))
        .stderr(predicate::str::contains("HINT"));

    assert!(!temp.path().join("escape.txt").exists());
}

#[test]
fn test_extract_missing_archive() {
    let temp = TempDir::new().expect("failed to create temp dir");

    coderunner_cmd()
        .arg("extract")
        .arg(temp.path().join("missing.zip"))
        .arg(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("I/O error"));
}

#[cfg(unix)]
#[test]
fn test_submit_runs_program() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let archive = write_archive(temp.path(), "hello.tar.gz", &hello_archive());

    coderunner_cmd()
        .current_dir(temp.path())
        .args(["submit", "--compile", "test -x hello.sh", "--run", "./hello.sh"])
        .args(["--workdir", "src", "--arg", "there"])
        .arg(&archive)
        .assert()
        .success()
        .stdout(predicate::str::contains("Successfully Uploaded File(s)"))
        .stdout(predicate::str::contains("Compiled successfully"))
        .stdout(predicate::str::contains("hello there"));

    assert!(temp.path().join("assignments/hello/src/hello.sh").is_file());
}

#[cfg(unix)]
#[test]
fn test_submit_quiet_prints_program_output_only() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let archive = write_archive(temp.path(), "hello.tar.gz", &hello_archive());

    coderunner_cmd()
        .current_dir(temp.path())
        .args(["submit", "-q", "-c", "true", "-r", "./hello.sh", "-w", "src", "-a", "a", "-a", "b"])
        .arg(&archive)
        .assert()
        .success()
        .stdout("hello a\n");
}

#[cfg(unix)]
#[test]
fn test_submit_build_failure() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let archive = write_archive(temp.path(), "hello.tar.gz", &hello_archive());

    coderunner_cmd()
        .current_dir(temp.path())
        .args(["submit", "--compile", "echo broken >&2; false", "--run", "./hello.sh"])
        .arg(&archive)
        .assert()
        .failure()
        .stdout(predicate::str::contains("build"))
        .stdout(predicate::str::contains("broken"))
        .stdout(predicate::str::contains("run").not())
        .stderr(predicate::str::contains("Submission"));
}

#[cfg(unix)]
#[test]
fn test_submit_json_output() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let data = ZipTestBuilder::new().add_file("main.txt", b"42").build();
    let archive = write_archive(temp.path(), "answer.zip", &data);

    let output = coderunner_cmd()
        .current_dir(temp.path())
        .args(["submit", "--json", "--compile", "true", "--run", "cat main.txt"])
        .arg(&archive)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json: serde_json::Value = serde_json::from_slice(&output).expect("invalid JSON output");
    assert_eq!(json["operation"], "submit");
    assert_eq!(json["status"], "success");
    assert_eq!(json["data"]["extraction"]["files_extracted"], 1);
    assert_eq!(json["data"]["stages"][0]["stage"], "upload");
    assert_eq!(json["data"]["stages"][1]["message"], "Compiled successfully");
    assert_eq!(json["data"]["stages"][2]["message"], "42");
}

#[cfg(unix)]
#[test]
fn test_submit_custom_assignments_dir() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let archive = write_archive(temp.path(), "hello.tar.gz", &hello_archive());
    let subs = temp.path().join("subs");

    coderunner_cmd()
        .current_dir(temp.path())
        .args(["submit", "-q", "-c", "true", "-r", "true", "--assignments-dir"])
        .arg(&subs)
        .arg(&archive)
        .assert()
        .success();

    assert!(subs.join("hello/src/hello.sh").is_file());
}

#[cfg(unix)]
#[test]
fn test_submit_json_reports_failed_stage() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let archive = write_archive(temp.path(), "hello.tar.gz", &hello_archive());

    let output = coderunner_cmd()
        .current_dir(temp.path())
        .args(["submit", "--json", "--compile", "false", "--run", "true"])
        .arg(&archive)
        .assert()
        .failure()
        .get_output()
        .stdout
        .clone();

    let json: serde_json::Value = serde_json::from_slice(&output).expect("invalid JSON output");
    assert_eq!(json["status"], "error");
    assert_eq!(json["error"], "build stage failed");
    assert_eq!(json["data"]["stages"][1]["success"], false);
    assert_eq!(json["data"]["stages"].as_array().unwrap().len(), 2);
}
