//! Binary-level tests for the failure paths that need no network.
//!
//! Version resolution is the first phase, so pointing the binary at a
//! checkout without a build script exercises the fatal-error path end to
//! end: glyph-prefixed diagnostic on stderr, recovery suggestions, exit
//! code 1.

use anyhow::Result;
use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn missing_build_file_fails_with_diagnostic() -> Result<()> {
    let dir = tempfile::tempdir()?;

    Command::cargo_bin("douluo_bridge_release")?
        .arg(dir.path())
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("✗"))
        .stderr(predicate::str::contains("build.gradle.kts"));

    Ok(())
}

#[test]
fn build_file_without_version_marker_fails() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let build_file = dir.path().join("android/app/build.gradle.kts");
    std::fs::create_dir_all(build_file.parent().expect("has parent"))?;
    std::fs::write(&build_file, "android {\n    versionCode = 42\n}\n")?;

    Command::cargo_bin("douluo_bridge_release")?
        .arg(dir.path())
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("versionName"));

    Ok(())
}

#[test]
fn malformed_repo_flag_is_rejected_before_any_work() -> Result<()> {
    let dir = tempfile::tempdir()?;

    Command::cargo_bin("douluo_bridge_release")?
        .arg(dir.path())
        .args(["--repo", "not-a-slug"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("owner/repo"));

    Ok(())
}

#[test]
fn help_documents_the_project_root_argument() -> Result<()> {
    Command::cargo_bin("douluo_bridge_release")?
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("PROJECT_ROOT"))
        .stdout(predicate::str::contains("--use-release-log"));

    Ok(())
}
