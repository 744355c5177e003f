//! CLI integration tests for bdnbuild.
//!
//! These tests cover argument handling and exit codes. None of them needs CMake.

use std::fs;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get the bdnbuild binary command.
fn bdnbuild() -> Command {
    let mut cmd = Command::cargo_bin("bdnbuild").unwrap();
    cmd.env_remove("BDNBUILD_DIR").env_remove("BDNBUILD_CMAKE");
    cmd
}

#[test]
fn test_help_succeeds() {
    bdnbuild()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("prepare"))
        .stdout(predicate::str::contains("distclean"))
        .stdout(predicate::str::contains("winuwp"))
        .stdout(predicate::str::contains("sim64"));
}

#[test]
fn test_version_succeeds() {
    bdnbuild()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("bdnbuild"));
}

#[test]
fn test_unknown_command() {
    bdnbuild().arg("install").assert().code(1);
}

#[test]
fn test_invalid_config_name() {
    bdnbuild()
        .args(["build", "--config", "Fast"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Fast"));
}

#[test]
fn test_invalid_platform_name() {
    bdnbuild()
        .args(["prepare", "--platform", "windows"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid platform name: 'windows'"));
}

#[test]
fn test_run_without_module() {
    let tmp = TempDir::new().unwrap();
    bdnbuild()
        .args(["run", "--platform", "linux", "--config", "Debug"])
        .current_dir(tmp.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--module MODULE"));
}

#[test]
fn test_missing_project_directory() {
    let tmp = TempDir::new().unwrap();
    bdnbuild()
        .arg("-C")
        .arg(tmp.path().join("missing"))
        .arg("build")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Project directory not found"));
}

#[test]
fn test_malformed_config_file() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("bdnbuild.toml"), "[paths\n").unwrap();

    bdnbuild()
        .args(["build"])
        .current_dir(tmp.path())
        .assert()
        .code(50)
        .stderr(predicate::str::contains("bdnbuild.toml"));
}

#[test]
fn test_cmake_not_invocable() {
    let tmp = TempDir::new().unwrap();
    bdnbuild()
        .args(["--cmake", "/definitely/not/cmake", "build"])
        .current_dir(tmp.path())
        .assert()
        .code(10)
        .stderr(predicate::str::contains("There was a problem calling cmake"));
}

#[test]
fn test_builddeps_without_sources() {
    let tmp = TempDir::new().unwrap();
    bdnbuild()
        .args(["--cmake", "/definitely/not/cmake", "builddeps"])
        .current_dir(tmp.path())
        .assert()
        .code(50);
    assert!(!tmp.path().join("3rdparty_build/curl").exists());
}
