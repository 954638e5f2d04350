//! Integration tests for `pkgkit check-write`.

use std::process::Command;

fn cargo_bin() -> Command {
    let mut cmd = Command::new(env!("CARGO"));
    cmd.args(["run", "-q", "-p", "pkgkit-cli", "--bin", "pkgkit", "--"]);
    cmd
}

#[test]
fn test_check_write_dir_json() {
    let dir = tempfile::tempdir().unwrap();

    let output = cargo_bin()
        .arg("--json")
        .arg("check-write")
        .arg("--dir")
        .arg(dir.path())
        .output()
        .expect("Failed to run check-write command");

    assert!(output.status.success());
    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be valid JSON");
    assert_eq!(json["writable"], true);

    // The probe file is removed again.
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_check_write_prefix() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("bin")).unwrap();
    std::fs::write(dir.path().join("bin/tool"), b"#!/bin/sh\n").unwrap();

    let output = cargo_bin()
        .arg("--json")
        .arg("check-write")
        .arg("--prefix")
        .arg(dir.path())
        .output()
        .expect("Failed to run check-write command");

    assert!(output.status.success());
    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be valid JSON");
    assert_eq!(json["writable"], true);
}

#[test]
fn test_check_write_missing_dir_fails() {
    let dir = tempfile::tempdir().unwrap();

    let output = cargo_bin()
        .arg("--json")
        .arg("check-write")
        .arg("--dir")
        .arg(dir.path().join("missing"))
        .output()
        .expect("Failed to run check-write command");

    assert_eq!(output.status.code(), Some(1));
    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be valid JSON");
    assert_eq!(json["writable"], false);
}

#[test]
fn test_check_write_nothing_to_check() {
    let output = cargo_bin()
        .arg("check-write")
        .output()
        .expect("Failed to run check-write command");

    assert!(!output.status.success());
}
