//! Brewfile packages via `brew bundle`

use anyhow::{Result, bail};
use declarative::{Applied, Probe, Step};
use std::path::PathBuf;

use super::StepId;
use super::homebrew::require_brew;
use crate::machine::Machine;

pub struct Packages {
    brewfile: PathBuf,
}

impl Packages {
    pub fn new(brewfile: PathBuf) -> Self {
        Self { brewfile }
    }

    fn file_arg(&self) -> String {
        self.brewfile.to_string_lossy().to_string()
    }
}

impl Step<StepId, dyn Machine> for Packages {
    fn id(&self) -> StepId {
        StepId::Packages
    }

    fn label(&self) -> &str {
        StepId::Packages.label()
    }

    fn prerequisites(&self) -> &[StepId] {
        StepId::Packages.prerequisites()
    }

    fn probe(&self, machine: &dyn Machine) -> Result<Probe> {
        if !machine.exists(&self.brewfile) {
            return Ok(Probe::satisfied(format!(
                "no Brewfile at {}",
                self.brewfile.display()
            )));
        }

        let brew = require_brew(machine)?;
        let file = self.file_arg();
        let check = machine.output(&brew, &["bundle", "check", "--file", &file])?;
        if check.success {
            Ok(Probe::satisfied("all Brewfile dependencies are installed"))
        } else {
            Ok(Probe::needed("Brewfile dependencies are missing"))
        }
    }

    fn apply(&self, machine: &mut (dyn Machine + 'static)) -> Result<Applied> {
        if !machine.exists(&self.brewfile) {
            return Ok(Applied::unchanged(format!(
                "No Brewfile at {}, nothing to install",
                self.brewfile.display()
            )));
        }

        let brew = require_brew(machine)?;
        let file = self.file_arg();
        if machine.succeeds(&brew, &["bundle", "check", "--file", &file]) {
            return Ok(Applied::unchanged(format!("Everything in {file} is installed")));
        }
        if !machine.run(&brew, &["bundle", "install", "--file", &file])? {
            bail!("brew bundle install failed for {file}");
        }

        Ok(Applied::installed(format!("Installed packages from {file}")))
    }
}
