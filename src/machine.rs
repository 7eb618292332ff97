//! Machine handle - the only way steps touch the outside world
//!
//! Probes receive `&dyn Machine`, apply actions `&mut dyn Machine`. The
//! engine never reads ambient state itself, which is what lets the tests
//! swap in [`fake::FakeMachine`].

use anyhow::{Context, Result, bail};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Duration;

use crate::sudo::SudoContext;
use crate::ui;

#[cfg(test)]
pub mod fake;

/// How often blocking waits re-check their condition
const WAIT_POLL: Duration = Duration::from_secs(2);

/// Captured output of a finished command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

#[cfg(test)]
impl CommandOutput {
    pub fn ok(stdout: &str) -> Self {
        Self {
            success: true,
            stdout: stdout.to_string(),
            stderr: String::new(),
        }
    }

    pub fn failed(stderr: &str) -> Self {
        Self {
            success: false,
            stdout: String::new(),
            stderr: stderr.to_string(),
        }
    }
}

impl From<std::process::Output> for CommandOutput {
    fn from(output: std::process::Output) -> Self {
        Self {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }
}

/// Current machine state, as seen by steps
pub trait Machine {
    /// Run a command and capture its output
    ///
    /// Errors only when the command could not be started.
    fn output(&self, cmd: &str, args: &[&str]) -> Result<CommandOutput>;

    /// Run a command attached to the terminal; returns whether it succeeded
    fn run(&mut self, cmd: &str, args: &[&str]) -> Result<bool>;

    /// Run a command with elevated privileges; returns whether it succeeded
    fn sudo(&mut self, cmd: &str, args: &[&str]) -> Result<bool>;

    /// Check if a command is on `$PATH`
    fn command_exists(&self, cmd: &str) -> bool;

    /// Check if a file, directory or socket exists
    fn exists(&self, path: &Path) -> bool;

    /// Read a text file; `None` if it does not exist
    fn read_file(&self, path: &Path) -> Result<Option<String>>;

    /// Write a text file, creating parent directories
    fn write_file(&mut self, path: &Path, contents: &str) -> Result<()>;

    fn home_dir(&self) -> Result<PathBuf>;

    /// Ask the operator for a line of input
    fn prompt(&mut self, prompt: &str, default: &str) -> Result<String>;

    /// Tell the operator something they need to act on
    fn notify(&mut self, message: &str);

    /// Block until `ready` holds
    ///
    /// There is no timeout: the operator either completes the external
    /// action or kills the process.
    fn wait_until(&mut self, waiting_for: &str, ready: &mut dyn FnMut(&dyn Machine) -> bool);

    /// Run a command and report only whether it succeeded
    fn succeeds(&self, cmd: &str, args: &[&str]) -> bool {
        self.output(cmd, args).is_ok_and(|o| o.success)
    }

    /// Expand a leading `~` against this machine's home directory
    fn expand(&self, path: &str) -> Result<PathBuf> {
        if path == "~" {
            return self.home_dir();
        }
        match path.strip_prefix("~/") {
            Some(rest) => Ok(self.home_dir()?.join(rest)),
            None => Ok(crate::paths::expand(path)),
        }
    }
}

/// The machine nova is running on
pub struct HostMachine {
    sudo: Option<SudoContext>,
}

impl HostMachine {
    pub fn new() -> Self {
        Self { sudo: None }
    }
}

impl Default for HostMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl Machine for HostMachine {
    fn output(&self, cmd: &str, args: &[&str]) -> Result<CommandOutput> {
        log::trace!("exec {} {}", cmd, args.join(" "));
        let output = Command::new(cmd)
            .args(args)
            .output()
            .with_context(|| format!("Failed to execute: {} {}", cmd, args.join(" ")))?;
        Ok(output.into())
    }

    fn run(&mut self, cmd: &str, args: &[&str]) -> Result<bool> {
        log::info!("Running {} {}", cmd, args.join(" "));
        let status = Command::new(cmd)
            .args(args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .with_context(|| format!("Failed to execute: {} {}", cmd, args.join(" ")))?;
        Ok(status.success())
    }

    fn sudo(&mut self, cmd: &str, args: &[&str]) -> Result<bool> {
        if self.sudo.is_none() {
            let reason = format!("{} {}", cmd, args.join(" "));
            self.sudo = Some(SudoContext::acquire(&reason)?);
        }
        match &self.sudo {
            Some(sudo) => sudo.run_status(cmd, args),
            None => bail!("Sudo required but not available"),
        }
    }

    fn command_exists(&self, cmd: &str) -> bool {
        Command::new("which")
            .arg(cmd)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .is_ok_and(|s| s.success())
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn read_file(&self, path: &Path) -> Result<Option<String>> {
        if !path.exists() {
            return Ok(None);
        }
        fs::read_to_string(path)
            .map(Some)
            .with_context(|| format!("Could not read {}", path.display()))
    }

    fn write_file(&mut self, path: &Path, contents: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Could not create {}", parent.display()))?;
        }
        fs::write(path, contents).with_context(|| format!("Could not write {}", path.display()))
    }

    fn home_dir(&self) -> Result<PathBuf> {
        dirs::home_dir().context("Could not determine home directory")
    }

    fn prompt(&mut self, prompt: &str, default: &str) -> Result<String> {
        let mut input = dialoguer::Input::<String>::new().with_prompt(prompt);
        if !default.is_empty() {
            input = input.default(default.to_string());
        }
        let answer = input.interact_text().context("Failed to read input")?;
        crate::transcript::record(&format!("{prompt}: {answer}"));
        Ok(answer)
    }

    fn notify(&mut self, message: &str) {
        ui::warn(message);
    }

    fn wait_until(&mut self, waiting_for: &str, ready: &mut dyn FnMut(&dyn Machine) -> bool) {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("  {spinner:.cyan} {msg} ({elapsed})")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_message(format!("Waiting for {waiting_for}"));
        spinner.enable_steady_tick(Duration::from_millis(120));
        crate::transcript::record(&format!("Waiting for {waiting_for}"));

        let this: &Self = self;
        let polls = declarative::block_until(WAIT_POLL, || ready(this), |attempt| {
            log::trace!("Still waiting for {waiting_for} (poll {attempt})");
        });

        spinner.finish_and_clear();
        log::info!("Done waiting for {waiting_for} after {polls} polls");
    }
}
