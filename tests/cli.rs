//! Command line behavior of the dynamo_build binary.
//!
//! Only commands that need no external tools are run end to end here.

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

fn dynamo_build(dir: &std::path::Path) -> Command {
    let mut cmd = cargo_bin_cmd!("dynamo_build");
    cmd.current_dir(dir)
        .env_remove("DYNAMO_HOME")
        .env("HOME", dir)
        .env("RUST_LOG", "info");
    cmd
}

#[test]
fn help_lists_every_command() {
    let dir = tempfile::tempdir().unwrap();
    let mut assert = dynamo_build(dir.path()).arg("--help").assert().success();
    for name in [
        "distclean",
        "install_ext",
        "build_engine",
        "archive_engine",
        "test_cr",
        "build_server",
        "build_editor",
        "archive_editor",
        "archive_server",
        "build_docs",
        "bump",
    ] {
        assert = assert.stdout(predicate::str::contains(name));
    }
}

#[test]
fn missing_command_is_a_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    dynamo_build(dir.path())
        .arg("--skip-tests")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("COMMAND"));
}

#[test]
fn unknown_command_is_a_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    dynamo_build(dir.path())
        .args(["distclean", "build_everything"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Unknown command build_everything"));

    // Nothing ran, not even the valid command before it.
    assert!(!dir.path().join("tmp").exists());
}

#[test]
fn archive_without_destination_is_a_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    dynamo_build(dir.path())
        .args(["distclean", "archive_engine"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--archive-path"));

    assert!(!dir.path().join("tmp").exists());
}

#[test]
fn archive_destination_needs_a_host_separator() {
    let dir = tempfile::tempdir().unwrap();
    dynamo_build(dir.path())
        .args(["--archive-path", "nowhere", "archive_server"])
        .assert()
        .code(2);
}

#[test]
fn distclean_prepares_the_install_root() {
    let dir = tempfile::tempdir().unwrap();
    let home = dir.path().join("home");
    std::fs::create_dir_all(home.join("bin")).unwrap();
    std::fs::write(home.join("bin/stale"), "x").unwrap();

    dynamo_build(dir.path())
        .env("DYNAMO_HOME", &home)
        .args(["--no-colors", "distclean"])
        .assert()
        .success();

    assert!(!home.join("bin").exists());
    assert!(home.join("ext/lib/python").is_dir());
    assert!(home.join("lib/python").is_dir());
    assert!(home.join("share").is_dir());
}

#[test]
fn install_ext_without_packages_fails_before_extracting() {
    let dir = tempfile::tempdir().unwrap();
    dynamo_build(dir.path())
        .arg("install_ext")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("package archive not found"));

    assert!(!dir.path().join("tmp/dynamo_home/ext/include").exists());
}

/// Project tree `bump` can patch, with `VERSION` at 1.2.3.
fn seed_versioned_project(dir: &std::path::Path) {
    std::fs::write(dir.join("VERSION"), "1.2.3\n").unwrap();

    let activator = dir.join("com.dynamo.cr/com.dynamo.cr.editor/src/com/dynamo/cr/editor/Activator.java");
    std::fs::create_dir_all(activator.parent().unwrap()).unwrap();
    std::fs::write(
        &activator,
        "public class Activator {\n    public static final String VERSION = \"1.2.3\";\n    public static final String VERSION_SHA1 = \"\";\n}\n",
    )
    .unwrap();

    let engine = dir.join("engine/engine/src/engine_version.h");
    std::fs::create_dir_all(engine.parent().unwrap()).unwrap();
    std::fs::write(
        &engine,
        "const char* VERSION = \"1.2.3\";\nconst char* VERSION_SHA1 = \"\";\n",
    )
    .unwrap();
}

fn git(dir: &std::path::Path, args: &[&str]) {
    let status = std::process::Command::new("git")
        .args(["-c", "user.name=Build", "-c", "user.email=build@example.com"])
        .args(args)
        .current_dir(dir)
        .status()
        .unwrap();
    assert!(status.success(), "git {args:?} failed");
}

#[test]
fn bump_outside_a_repository_shows_git_diagnostics() {
    let dir = tempfile::tempdir().unwrap();
    seed_versioned_project(dir.path());

    dynamo_build(dir.path())
        .env("GIT_CEILING_DIRECTORIES", dir.path().parent().unwrap())
        .arg("bump")
        .assert()
        .code(128)
        .stderr(predicate::str::contains("not a git repository"));

    assert_eq!(
        std::fs::read_to_string(dir.path().join("VERSION")).unwrap(),
        "1.2.3\n"
    );
}

#[test]
fn bump_reports_versions_on_stdout_regardless_of_log_level() {
    let dir = tempfile::tempdir().unwrap();
    seed_versioned_project(dir.path());
    git(dir.path(), &["init", "-q"]);
    git(dir.path(), &["commit", "-q", "--allow-empty", "-m", "Release prep"]);

    dynamo_build(dir.path())
        .env("RUST_LOG", "warn")
        .arg("bump")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Bumping engine version from 1.2.3 to 1.2.4",
        ))
        .stdout(predicate::str::contains("Review changes and commit"));

    assert_eq!(
        std::fs::read_to_string(dir.path().join("VERSION")).unwrap(),
        "1.2.4"
    );
}
