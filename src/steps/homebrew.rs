//! Homebrew itself, via the official install script

use anyhow::{Context, Result, bail};
use declarative::{Applied, Probe, Step};
use std::path::{Path, PathBuf};

use super::StepId;
use crate::machine::Machine;

const INSTALL_URL: &str = "https://raw.githubusercontent.com/Homebrew/install/HEAD/install.sh";

/// Where the installer puts `brew` (Apple silicon first)
pub const PREFIXES: [&str; 2] = ["/opt/homebrew/bin/brew", "/usr/local/bin/brew"];

/// Locate the `brew` binary
///
/// The known prefixes are checked before `$PATH`, since a fresh install is
/// not on `$PATH` until the shell profile is reloaded.
pub fn brew_path(machine: &dyn Machine) -> Option<PathBuf> {
    PREFIXES
        .iter()
        .map(Path::new)
        .find(|path| machine.exists(path))
        .map(Path::to_path_buf)
        .or_else(|| machine.command_exists("brew").then(|| PathBuf::from("brew")))
}

/// `brew` binary for later steps, failing when Homebrew is absent
pub fn require_brew(machine: &dyn Machine) -> Result<String> {
    brew_path(machine)
        .map(|path| path.to_string_lossy().to_string())
        .context("Homebrew is not installed")
}

/// Shell script that downloads with `fetch` and hands the text to a fresh bash
///
/// The download has to become the `-c` argument of an inner bash; running
/// the substitution as a plain command would try to execute its first line.
fn installer(fetch: &str) -> String {
    format!("/bin/bash -c \"$({fetch})\"")
}

/// Where `brew` will live on this architecture once installed
pub fn default_brew_path() -> &'static str {
    if std::env::consts::ARCH == "aarch64" {
        PREFIXES[0]
    } else {
        PREFIXES[1]
    }
}

pub struct Homebrew;

impl Step<StepId, dyn Machine> for Homebrew {
    fn id(&self) -> StepId {
        StepId::Homebrew
    }

    fn label(&self) -> &str {
        StepId::Homebrew.label()
    }

    fn prerequisites(&self) -> &[StepId] {
        StepId::Homebrew.prerequisites()
    }

    fn probe(&self, machine: &dyn Machine) -> Result<Probe> {
        Ok(match brew_path(machine) {
            Some(path) => Probe::satisfied(format!("brew found at {}", path.display())),
            None => Probe::needed("brew not found"),
        })
    }

    fn apply(&self, machine: &mut (dyn Machine + 'static)) -> Result<Applied> {
        if let Some(path) = brew_path(machine) {
            return Ok(Applied::unchanged(format!(
                "Homebrew already installed at {}",
                path.display()
            )));
        }

        let script = installer(&format!("curl -fsSL {INSTALL_URL}"));
        let ok = machine
            .run("/bin/bash", &["-c", &script])
            .context("Failed to run Homebrew install script")?;
        if !ok {
            bail!("Homebrew install script failed");
        }

        match brew_path(machine) {
            Some(path) => Ok(Applied::installed(format!(
                "Homebrew installed at {}",
                path.display()
            ))),
            None => bail!("Homebrew install script succeeded but `brew` is still not found"),
        }
    }
}
