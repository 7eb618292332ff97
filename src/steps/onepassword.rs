//! 1Password app, CLI and SSH agent

use anyhow::{Result, bail};
use declarative::{Applied, Probe, Step};

use super::StepId;
use super::homebrew::require_brew;
use crate::config::CredentialsConfig;
use crate::machine::Machine;

pub struct OnePassword {
    casks: Vec<String>,
    app: String,
    agent_socket: String,
}

impl OnePassword {
    pub fn new(config: &CredentialsConfig) -> Self {
        Self {
            casks: config.casks.clone(),
            app: config.app.clone(),
            agent_socket: config.agent_socket.clone(),
        }
    }

    fn missing(&self, machine: &dyn Machine) -> Result<Vec<&'static str>> {
        let mut missing = Vec::new();
        if !machine.exists(&machine.expand(&self.app)?) {
            missing.push("app");
        }
        if !machine.command_exists("op") {
            missing.push("CLI");
        }
        if !machine.exists(&machine.expand(&self.agent_socket)?) {
            missing.push("SSH agent");
        }
        Ok(missing)
    }
}

impl Step<StepId, dyn Machine> for OnePassword {
    fn id(&self) -> StepId {
        StepId::OnePassword
    }

    fn label(&self) -> &str {
        StepId::OnePassword.label()
    }

    fn prerequisites(&self) -> &[StepId] {
        StepId::OnePassword.prerequisites()
    }

    fn probe(&self, machine: &dyn Machine) -> Result<Probe> {
        let missing = self.missing(machine)?;
        if missing.is_empty() {
            Ok(Probe::satisfied("app, CLI and SSH agent are ready"))
        } else {
            Ok(Probe::needed(format!("missing {}", missing.join(", "))))
        }
    }

    fn apply(&self, machine: &mut (dyn Machine + 'static)) -> Result<Applied> {
        let brew = require_brew(machine)?;

        let mut installed = Vec::new();
        for cask in &self.casks {
            if machine.succeeds(&brew, &["list", "--cask", cask]) {
                log::debug!("cask {cask} already installed");
                continue;
            }
            if !machine.run(&brew, &["install", "--cask", cask])? {
                bail!("brew install --cask {cask} failed");
            }
            installed.push(cask.as_str());
        }

        let socket = machine.expand(&self.agent_socket)?;
        let mut enabled_agent = false;
        if !machine.exists(&socket) {
            machine.notify(
                "Open 1Password, sign in, and turn on Settings > Developer > Use the SSH agent",
            );
            machine.wait_until("the 1Password SSH agent", &mut |m| m.exists(&socket));
            enabled_agent = true;
        }

        if !installed.is_empty() {
            Ok(Applied::installed(format!("Installed {}", installed.join(", "))))
        } else if enabled_agent {
            Ok(Applied::changed("1Password SSH agent enabled"))
        } else {
            Ok(Applied::unchanged("1Password already set up"))
        }
    }
}
