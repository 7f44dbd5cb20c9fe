//! CLI end-to-end tests
//!
//! Tests for the scenerename command-line interface.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::tempdir;

/// Get a command for the scenerename binary
#[allow(deprecated)]
fn scenerename_cmd() -> Command {
    Command::cargo_bin("scenerename").unwrap()
}

/// A command isolated from any user config, with library directories under
/// `root`.
fn isolated_cmd(root: &Path) -> Command {
    let mut cmd = scenerename_cmd();
    cmd.env_remove("RUST_LOG")
        .arg("-c")
        .arg(root.join("config.toml"))
        .arg("-m")
        .arg(root.join("Movies"))
        .arg("-s")
        .arg(root.join("Shows"));
    cmd
}

#[test]
fn test_cli_no_args_shows_help() {
    let dir = tempdir().unwrap();
    let mut cmd = scenerename_cmd();
    cmd.arg("-c")
        .arg(dir.path().join("config.toml"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn test_cli_help_flag() {
    let mut cmd = scenerename_cmd();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("scenerename"))
        .stdout(predicate::str::contains("--dry-run"))
        .stdout(predicate::str::contains("--add-override"));
}

#[test]
fn test_cli_version_flag() {
    let mut cmd = scenerename_cmd();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("scenerename"));
}

#[test]
fn test_cli_dry_run_moves_nothing() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("Movie.Name.2020.1080p.mkv");
    fs::write(&src, b"x").unwrap();

    let mut cmd = isolated_cmd(dir.path());
    cmd.arg("--dry-run")
        .arg(&src)
        .assert()
        .success()
        .stdout(predicate::str::contains("Movie Name (2020).mkv"));

    assert!(src.exists());
    assert!(!dir.path().join("Movies").exists());
}

#[test]
fn test_cli_moves_show() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("Show.Name.S01E02.mkv");
    fs::write(&src, b"episode").unwrap();

    let mut cmd = isolated_cmd(dir.path());
    cmd.arg("-y")
        .arg(&src)
        .assert()
        .success()
        .stdout(predicate::str::contains("Moved: 1"));

    let dest = dir
        .path()
        .join("Shows/Show Name/Show Name - Season 01/Show Name - S01E02.mkv");
    assert!(!src.exists());
    assert_eq!(fs::read(dest).unwrap(), b"episode");
}

#[test]
fn test_cli_reports_unparseable_file() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("1080p.x264.mkv");
    fs::write(&src, b"x").unwrap();

    let mut cmd = isolated_cmd(dir.path());
    cmd.arg("-y")
        .arg(&src)
        .assert()
        .success()
        .stdout(predicate::str::contains("Failures: 1"));

    assert!(src.exists());
}

#[test]
fn test_cli_add_and_remove_override() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("config.toml");

    let mut cmd = scenerename_cmd();
    cmd.arg("-c")
        .arg(&config)
        .args(["--add-override", "show name", "Renamed Show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added override"));

    let saved = fs::read_to_string(&config).unwrap();
    assert!(saved.contains("[overrides]"));
    assert!(saved.contains("Renamed Show"));

    let mut cmd = scenerename_cmd();
    cmd.arg("-c")
        .arg(&config)
        .args(["--rm-override", "show name"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed override"));

    let saved = fs::read_to_string(&config).unwrap();
    assert!(!saved.contains("Renamed Show"));
}

#[test]
fn test_cli_override_applies_to_move() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("Show.Name.S01E02.mkv");
    fs::write(&src, b"x").unwrap();
    fs::write(
        dir.path().join("config.toml"),
        "[overrides]\n\"show name\" = \"Renamed Show\"\n",
    )
    .unwrap();

    let mut cmd = isolated_cmd(dir.path());
    cmd.arg("--dry-run")
        .arg(&src)
        .assert()
        .success()
        .stdout(predicate::str::contains("Renamed Show - S01E02.mkv"));
}

#[test]
fn test_cli_rejects_invalid_config() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("config.toml");
    fs::write(&config, "[conversion]\nformat = \"\"\n").unwrap();

    let mut cmd = scenerename_cmd();
    cmd.arg("-c")
        .arg(&config)
        .arg("whatever.mkv")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Conversion format cannot be empty"));
}

#[test]
fn test_cli_save_config() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("nested/config.toml");

    let mut cmd = scenerename_cmd();
    cmd.arg("-c")
        .arg(&config)
        .args(["--save-config", "-f", "mp4", "--converter", "HandBrakeCLI"])
        .assert()
        .success();

    let saved = fs::read_to_string(&config).unwrap();
    assert!(saved.contains("format = \"mp4\""));
    assert!(saved.contains("converter = \"HandBrakeCLI\""));
}
