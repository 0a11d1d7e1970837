//! CLI smoke tests for dpabuild.
//!
//! Real runs use a stand-in for CMake so the pipeline can execute end to end
//! without a toolchain installed.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get a Command for the dpabuild binary with tool overrides cleared.
fn dpabuild_cmd() -> Command {
  let mut cmd = cargo_bin_cmd!("dpabuild");
  cmd.env_remove("DPABUILD_CMAKE").env_remove("DPABUILD_SHELL");
  cmd
}

/// A temp directory holding a `clibdpa` source root.
fn temp_root() -> (TempDir, PathBuf) {
  let temp = TempDir::new().unwrap();
  let root = temp.path().join("clibdpa");
  std::fs::create_dir_all(&root).unwrap();
  (temp, root)
}

/// Write an executable stand-in for cmake that exits with `code`.
#[cfg(unix)]
fn fake_cmake(dir: &Path, code: i32) -> PathBuf {
  use std::os::unix::fs::PermissionsExt;

  let path = dir.join("fake-cmake");
  std::fs::write(&path, format!("#!/bin/sh\necho \"fake cmake $1\"\nexit {}\n", code)).unwrap();
  std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
  path
}

// =============================================================================
// Help & Version
// =============================================================================

#[test]
fn help_flag_works() {
  dpabuild_cmd()
    .arg("--help")
    .assert()
    .success()
    .stdout(predicate::str::contains("Usage").and(predicate::str::contains("--gen")));
}

#[test]
fn version_flag_works() {
  dpabuild_cmd()
    .arg("--version")
    .assert()
    .success()
    .stdout(predicate::str::contains("dpabuild"));
}

#[test]
fn missing_gen_is_a_usage_error() {
  dpabuild_cmd().assert().code(2).stderr(predicate::str::contains("--gen"));
}

// =============================================================================
// Generator resolution
// =============================================================================

#[test]
fn unknown_generator_fails_without_side_effects() {
  let (_temp, root) = temp_root();

  dpabuild_cmd()
    .args(["--gen", "ninja", "--root"])
    .arg(&root)
    .assert()
    .code(1)
    .stderr(predicate::str::contains("unknown generator 'ninja'"))
    .stderr(predicate::str::contains("vs14, make, eclipse"));

  assert_eq!(std::fs::read_dir(&root).unwrap().count(), 0);
}

#[test]
fn missing_root_is_reported() {
  let temp = TempDir::new().unwrap();

  dpabuild_cmd()
    .args(["-g", "make", "--root"])
    .arg(temp.path().join("does-not-exist"))
    .assert()
    .code(1)
    .stderr(predicate::str::contains("source root"));
}

// =============================================================================
// Dry run
// =============================================================================

#[test]
fn dry_run_prints_plan_without_touching_disk() {
  let (_temp, root) = temp_root();

  dpabuild_cmd()
    .args(["-g", "MAKE", "--dry-run", "--root"])
    .arg(&root)
    .assert()
    .success()
    .stdout(predicate::str::contains("cmake -G \"Unix Makefiles\""))
    .stdout(predicate::str::contains("-Dclibspi_DIR:PATH="))
    .stdout(predicate::str::contains("cmake --build"));

  assert!(!root.join("build").exists());
}

#[cfg(unix)]
#[test]
fn dry_run_appends_debug_flag_on_posix() {
  let (_temp, root) = temp_root();

  dpabuild_cmd()
    .args(["--gen", "eclipse", "--debug", "YES", "-n", "--root"])
    .arg(&root)
    .assert()
    .success()
    .stdout(predicate::str::contains("-DCMAKE_BUILD_TYPE=Debug"));

  dpabuild_cmd()
    .args(["--gen", "eclipse", "--debug", "no", "-n", "--root"])
    .arg(&root)
    .assert()
    .success()
    .stdout(predicate::str::contains("CMAKE_BUILD_TYPE").not());
}

#[test]
fn dry_run_json_lists_four_steps() {
  let (_temp, root) = temp_root();

  let output = dpabuild_cmd()
    .args(["-g", "vs14", "-n", "--output", "json", "--root"])
    .arg(&root)
    .output()
    .unwrap();
  assert!(output.status.success());

  let plan: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  let steps: Vec<_> = plan["commands"]
    .as_array()
    .unwrap()
    .iter()
    .map(|c| c["step"].as_str().unwrap().to_string())
    .collect();
  assert_eq!(steps, ["clean", "create", "configure", "build"]);
  assert_eq!(plan["target"]["generator_name"], "Visual Studio 14 2015 Win64");
}

#[test]
fn cmake_override_from_env_and_flag() {
  let (_temp, root) = temp_root();

  dpabuild_cmd()
    .args(["-g", "make", "-n", "--root"])
    .arg(&root)
    .env("DPABUILD_CMAKE", "cmake3")
    .assert()
    .success()
    .stdout(predicate::str::contains("cmake3 --build"));

  dpabuild_cmd()
    .args(["-g", "make", "-n", "--cmake", "cmake-flag", "--root"])
    .arg(&root)
    .env("DPABUILD_CMAKE", "cmake3")
    .assert()
    .success()
    .stdout(predicate::str::contains("cmake-flag --build"));
}

// =============================================================================
// Real runs
// =============================================================================

#[cfg(unix)]
#[test]
fn build_recreates_directory_and_prints_output() {
  let (temp, root) = temp_root();
  let stale = root.join("build").join("Unix_Makefiles");
  std::fs::create_dir_all(&stale).unwrap();
  std::fs::write(stale.join("CMakeCache.txt"), "stale").unwrap();
  let cmake = fake_cmake(temp.path(), 0);

  dpabuild_cmd()
    .args(["--gen", "make", "--root"])
    .arg(&root)
    .arg("--cmake")
    .arg(&cmake)
    .assert()
    .success()
    .stdout(predicate::str::contains("fake cmake -G"))
    .stdout(predicate::str::contains("fake cmake --build"))
    .stdout(predicate::str::contains("Built"));

  assert!(stale.is_dir());
  assert!(!stale.join("CMakeCache.txt").exists());
}

#[cfg(unix)]
#[test]
fn failing_configure_exits_non_zero() {
  let (temp, root) = temp_root();
  let cmake = fake_cmake(temp.path(), 1);

  dpabuild_cmd()
    .args(["--gen", "make", "--root"])
    .arg(&root)
    .arg("--cmake")
    .arg(&cmake)
    .assert()
    .code(1)
    .stderr(predicate::str::contains("configure step failed"))
    .stderr(predicate::str::contains("exit code 1"))
    .stdout(predicate::str::contains("fake cmake -G"))
    .stdout(predicate::str::contains("mkdir -p"))
    .stdout(predicate::str::contains("Built").not());
}

#[test]
fn powershell_override_is_rejected() {
  let (_temp, root) = temp_root();

  dpabuild_cmd()
    .args(["--gen", "make", "--dry-run", "--shell", "pwsh", "--root"])
    .arg(&root)
    .assert()
    .code(1)
    .stderr(predicate::str::contains("unsupported shell 'pwsh'"));
}
