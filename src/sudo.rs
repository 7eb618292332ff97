//! Scoped sudo context
//!
//! Sudo is never requested up front. The first step that needs elevated
//! privileges acquires it (with a reason shown to the operator), and the
//! timestamp is invalidated again when the context is dropped.

use anyhow::{Context, Result, bail};
use std::process::{Command, Output};

/// Scoped sudo context - automatically invalidates on drop
pub struct SudoContext {
    validated: bool,
}

impl SudoContext {
    /// Acquire sudo privileges with a reason shown to the operator
    pub fn acquire(reason: &str) -> Result<Self> {
        crate::ui::info(&format!("Sudo required: {reason}"));

        // Validate sudo (will prompt for password)
        let status = Command::new("sudo")
            .args(["-v"])
            .status()
            .context("Failed to execute sudo")?;

        if !status.success() {
            bail!("Failed to acquire sudo privileges");
        }

        Ok(Self { validated: true })
    }

    /// Run a command with sudo
    pub fn run(&self, cmd: &str, args: &[&str]) -> Result<Output> {
        if !self.validated {
            bail!("Sudo context not validated");
        }

        log::debug!("sudo {} {}", cmd, args.join(" "));
        Command::new("sudo")
            .arg(cmd)
            .args(args)
            .output()
            .with_context(|| format!("Failed to execute: sudo {cmd} {args:?}"))
    }

    /// Run a command with sudo, returning success/failure
    pub fn run_status(&self, cmd: &str, args: &[&str]) -> Result<bool> {
        let output = self.run(cmd, args)?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            log::warn!("sudo {cmd} failed: {}", stderr.trim());
        }
        Ok(output.status.success())
    }
}

impl Drop for SudoContext {
    fn drop(&mut self) {
        // Invalidate sudo timestamp to release privileges
        let _ = Command::new("sudo").args(["-k"]).status();
    }
}
