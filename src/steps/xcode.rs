//! Command Line Tools via `xcode-select`

use anyhow::{Result, bail};
use declarative::{Applied, Probe, Step};

use super::StepId;
use crate::machine::Machine;

pub struct Xcode;

fn installed(machine: &dyn Machine) -> bool {
    machine.succeeds("xcode-select", &["-p"])
}

impl Step<StepId, dyn Machine> for Xcode {
    fn id(&self) -> StepId {
        StepId::Xcode
    }

    fn label(&self) -> &str {
        StepId::Xcode.label()
    }

    fn probe(&self, machine: &dyn Machine) -> Result<Probe> {
        let output = machine.output("xcode-select", &["-p"])?;
        if output.success {
            Ok(Probe::satisfied(format!(
                "developer tools at {}",
                output.stdout.trim()
            )))
        } else {
            Ok(Probe::needed("developer tools are not installed"))
        }
    }

    fn apply(&self, machine: &mut (dyn Machine + 'static)) -> Result<Applied> {
        if installed(machine) {
            return Ok(Applied::unchanged("Command-line developer tools already present"));
        }

        if !machine.run("xcode-select", &["--install"])? {
            bail!("xcode-select --install failed");
        }

        machine.notify("Finish the Command Line Tools installer window; nova continues when it is done");
        machine.wait_until("Command Line Tools", &mut |m| installed(m));

        Ok(Applied::installed("Command-line developer tools installed"))
    }
}
