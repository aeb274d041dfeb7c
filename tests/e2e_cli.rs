//! CLI end-to-end tests
//!
//! Tests for the filevault command-line interface.

use assert_cmd::prelude::*;
use image::{ImageBuffer, Rgb};
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::tempdir;

/// Get a command for the filevault binary
#[allow(deprecated)]
fn filevault_cmd() -> Command {
    Command::cargo_bin("filevault").unwrap()
}

const CONFIG: &str = r#"
[paths]
template = "{model}/{id}/{version}.jpg"
url_prefix = "https://cdn.example.com"

[image_sizes.Avatar]
thumbnail = { width = ["<=", 150] }

[adapters.Local]
kind = "local"
root = "/var/lib/filevault"
"#;

fn write_config(dir: &Path) -> PathBuf {
    let path = dir.join("filevault.toml");
    fs::write(&path, CONFIG).unwrap();
    path
}

#[test]
fn test_cli_no_args_shows_help() {
    let mut cmd = filevault_cmd();
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_cli_version_command() {
    let mut cmd = filevault_cmd();
    cmd.arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("filevault"));
}

#[test]
fn test_cli_resolve_path() {
    let dir = tempdir().unwrap();
    let config = write_config(dir.path());

    let mut cmd = filevault_cmd();
    cmd.arg("--config")
        .arg(&config)
        .args(["resolve", "--model", "Avatar", "--id", "42", "--version", "thumbnail"])
        .assert()
        .success()
        .stdout("Avatar/42/thumbnail.jpg\n");
}

#[test]
fn test_cli_resolve_url_defaults_to_original() {
    let dir = tempdir().unwrap();
    let config = write_config(dir.path());

    let mut cmd = filevault_cmd();
    cmd.arg("--config")
        .arg(&config)
        .args(["resolve", "--model", "Avatar", "--id", "42", "--url"])
        .assert()
        .success()
        .stdout("https://cdn.example.com/Avatar/42/original.jpg\n");
}

#[test]
fn test_cli_resolve_without_id_fails() {
    let dir = tempdir().unwrap();
    let config = write_config(dir.path());

    let mut cmd = filevault_cmd();
    cmd.arg("--config")
        .arg(&config)
        .args(["resolve", "--model", "Avatar", "--id", ""])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No path"));
}

#[test]
fn test_cli_versions_json() {
    let dir = tempdir().unwrap();
    let config = write_config(dir.path());

    let output = filevault_cmd()
        .arg("--config")
        .arg(&config)
        .args(["versions", "--model", "Avatar", "--id", "7", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["thumbnail"], "Avatar/7/thumbnail.jpg");
    assert_eq!(json["original"], "Avatar/7/original.jpg");
}

#[test]
fn test_cli_versions_text() {
    let dir = tempdir().unwrap();
    let config = write_config(dir.path());

    let mut cmd = filevault_cmd();
    cmd.arg("--config")
        .arg(&config)
        .args(["versions", "--model", "Avatar", "--id", "7"])
        .assert()
        .success()
        .stdout(predicate::str::contains("thumbnail: Avatar/7/thumbnail.jpg"))
        .stdout(predicate::str::contains("original: Avatar/7/original.jpg"));
}

#[test]
fn test_cli_check_size() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("pic.png");
    let img: ImageBuffer<Rgb<u8>, Vec<u8>> = ImageBuffer::new(100, 50);
    img.save(&path).unwrap();

    let mut cmd = filevault_cmd();
    cmd.arg("check-size")
        .arg(&path)
        .args(["--width", "==:100"])
        .assert()
        .success()
        .stdout(predicate::str::contains("100x50"));

    let mut cmd = filevault_cmd();
    cmd.arg("check-size")
        .arg(&path)
        .args(["--height", "==:100"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not satisfy"));
}

#[test]
fn test_cli_check_size_needs_a_constraint() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("pic.png");
    let img: ImageBuffer<Rgb<u8>, Vec<u8>> = ImageBuffer::new(10, 10);
    img.save(&path).unwrap();

    let mut cmd = filevault_cmd();
    cmd.arg("check-size")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("width and/or height"));
}

#[test]
fn test_cli_check_size_rejects_bad_operator() {
    let mut cmd = filevault_cmd();
    cmd.args(["check-size", "pic.png", "--width", "~:10"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("operator"));
}

#[test]
fn test_cli_validate_config() {
    let dir = tempdir().unwrap();
    let config = write_config(dir.path());

    let mut cmd = filevault_cmd();
    cmd.arg("validate")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"))
        .stdout(predicate::str::contains("Avatar: thumbnail, original"));
}

#[test]
fn test_cli_validate_invalid_config() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.toml");
    fs::write(&path, "[paths]\ntemplate = \"{model}/{nope}\"\n").unwrap();

    let mut cmd = filevault_cmd();
    cmd.arg("validate").arg(&path).assert().failure();
}
