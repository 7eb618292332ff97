//! Integration tests for argument handling and exit codes.
//!
//! Only dry runs are exercised here; they never mutate the machine.
// The cargo_bin function is marked deprecated in favor of cargo_bin! macro,
// but both work correctly.
#![allow(deprecated)]

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

struct Sandbox {
    config: TempDir,
    logs: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        Self {
            config: TempDir::new().unwrap(),
            logs: TempDir::new().unwrap(),
        }
    }

    fn nova(&self) -> Command {
        let mut cmd = Command::new(cargo_bin("nova"));
        cmd.env("NOVA_CONFIG_DIR", self.config.path())
            .env("NOVA_LOG_DIR", self.logs.path());
        cmd
    }
}

#[test]
fn help_lists_the_token_catalog() {
    let sandbox = Sandbox::new();
    sandbox
        .nova()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Groups:"))
        .stdout(predicate::str::contains("apps"))
        .stdout(predicate::str::contains("(requires homebrew)"));
}

#[test]
fn version_exits_zero() {
    let sandbox = Sandbox::new();
    sandbox
        .nova()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

impl Sandbox {
    /// Contents of the single transcript written by a run
    fn transcript(&self) -> String {
        let transcripts: Vec<_> = fs::read_dir(self.logs.path())
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .collect();
        assert_eq!(transcripts.len(), 1);
        fs::read_to_string(&transcripts[0]).unwrap()
    }
}

#[test]
fn unknown_flag_exits_one() {
    let sandbox = Sandbox::new();
    sandbox.nova().arg("--frobnicate").assert().code(1);
    assert!(sandbox.transcript().contains("--frobnicate"));
}

#[test]
fn transcript_includes_banner() {
    let sandbox = Sandbox::new();
    sandbox
        .nova()
        .args(["--plan", "--skip=all"])
        .assert()
        .success()
        .stdout(predicate::str::contains("███╗   ██╗"));
    assert!(sandbox.transcript().contains("███╗   ██╗"));
}

#[test]
fn unknown_token_exits_one_before_any_step() {
    let sandbox = Sandbox::new();
    sandbox
        .nova()
        .args(["--only=bogus", "--dry-run"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("unknown section 'bogus'"))
        .stdout(predicate::str::contains("Planned actions").not());
}

#[test]
fn missing_explicit_config_exits_one() {
    let sandbox = Sandbox::new();
    let missing = sandbox.config.path().join("nope.toml");
    sandbox
        .nova()
        .arg("--plan")
        .arg("--config")
        .arg(&missing)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Config file not found"));
}

#[test]
fn dry_run_with_everything_skipped_needs_no_changes() {
    let sandbox = Sandbox::new();
    sandbox
        .nova()
        .args(["--plan", "--skip=all"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No changes needed."));
}

#[test]
fn dry_run_plans_forced_steps() {
    let sandbox = Sandbox::new();
    sandbox
        .nova()
        .args(["--dry-run", "--only=macos"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Planned actions:"))
        .stdout(predicate::str::contains("macOS preferences (forced)"));
}

#[test]
fn legacy_flag_selects_group() {
    let sandbox = Sandbox::new();
    sandbox
        .nova()
        .args(["--dry-run", "--macos-only"])
        .assert()
        .success()
        .stdout(predicate::str::contains("macOS preferences (forced)"));
}

#[test]
fn skipped_prerequisite_prunes_dependents() {
    let sandbox = Sandbox::new();
    sandbox
        .nova()
        .args(["--dry-run", "--only=ssh", "--skip=1password"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Not running ssh: its prerequisite 1password is skipped",
        ))
        .stdout(predicate::str::contains("SSH agent config").not());
}

#[test]
fn run_writes_a_transcript() {
    let sandbox = Sandbox::new();
    fs::write(
        sandbox.config.path().join("config.toml"),
        "[machine]\n# unnamed\n",
    )
    .unwrap();

    sandbox
        .nova()
        .args(["--plan", "--skip=all"])
        .assert()
        .success();

    let transcripts: Vec<_> = fs::read_dir(sandbox.logs.path())
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect();
    assert_eq!(transcripts.len(), 1);

    let name = transcripts[0].file_name().unwrap().to_string_lossy().to_string();
    assert!(name.starts_with("nova-") && name.ends_with(".log"));

    let content = fs::read_to_string(&transcripts[0]).unwrap();
    assert!(content.contains("No changes needed."));
    assert!(content.contains("Machine name (skipped by flag)"));
}

#[test]
fn completions_exit_zero() {
    let sandbox = Sandbox::new();
    sandbox
        .nova()
        .args(["--completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("nova"));
}
