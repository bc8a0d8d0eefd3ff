// tests/cli_test.rs
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

fn cut_release(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_cut-release"))
        .args(args)
        .current_dir(dir)
        .env("RUST_LOG", "off")
        .output()
        .expect("Failed to execute cut-release")
}

fn write_package(dir: &Path, version: &str) {
    std::fs::write(
        dir.join("package.json"),
        format!(r#"{{"name": "demo-package", "version": "{}"}}"#, version),
    )
    .unwrap();
}

#[test]
fn test_help_exits_zero() {
    let dir = TempDir::new().unwrap();
    let output = cut_release(dir.path(), &["--help"]);

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("cut-release [increment] [options]"));
    assert!(stdout.contains("--preid"));
}

#[test]
fn test_version_flag_exits_zero() {
    let dir = TempDir::new().unwrap();
    let output = cut_release(dir.path(), &["-v"]);

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_unknown_flag_exits_one() {
    let dir = TempDir::new().unwrap();
    let output = cut_release(dir.path(), &["--frobnicate"]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_preid_without_pre_increment_is_usage_error() {
    let dir = TempDir::new().unwrap();
    write_package(dir.path(), "1.0.0");
    let output = cut_release(dir.path(), &["patch", "--preid", "rc"]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("The --preid argument can only be used"));
}

#[test]
fn test_missing_package_json() {
    let dir = TempDir::new().unwrap();
    let output = cut_release(dir.path(), &["patch", "-y", "--dry-run"]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("No package.json exists in current working directory"));
}

#[test]
fn test_dry_run_prints_plan() {
    let dir = TempDir::new().unwrap();
    write_package(dir.path(), "1.0.0");
    let output = cut_release(dir.path(), &["minor", "-y", "-d", "-t", "next"]);

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("Dry run release of new version of `demo-package` (current version: 1.0.0)"));
    assert!(stdout.contains("=> npm version 1.1.0"));
    assert!(stdout.contains("=> npm publish --tag next"));
    assert!(stdout.contains("Done"));
}
