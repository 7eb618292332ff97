//! SSH client config pointing at the 1Password agent

use anyhow::Result;
use declarative::{Applied, Probe, Step};

use super::StepId;
use super::block;
use crate::config::CredentialsConfig;
use crate::machine::Machine;

pub struct SshAgent {
    ssh_config: String,
    agent_socket: String,
}

impl SshAgent {
    pub fn new(config: &CredentialsConfig) -> Self {
        Self {
            ssh_config: config.ssh_config.clone(),
            agent_socket: config.agent_socket.clone(),
        }
    }

    fn block(&self, machine: &dyn Machine) -> Result<String> {
        let socket = machine.expand(&self.agent_socket)?;
        Ok(block::render(&[
            "Host *".to_string(),
            format!("  IdentityAgent \"{}\"", socket.display()),
        ]))
    }
}

impl Step<StepId, dyn Machine> for SshAgent {
    fn id(&self) -> StepId {
        StepId::Ssh
    }

    fn label(&self) -> &str {
        StepId::Ssh.label()
    }

    fn prerequisites(&self) -> &[StepId] {
        StepId::Ssh.prerequisites()
    }

    fn probe(&self, machine: &dyn Machine) -> Result<Probe> {
        let path = machine.expand(&self.ssh_config)?;
        block::probe_file(machine, &path, &self.block(machine)?)
    }

    fn apply(&self, machine: &mut (dyn Machine + 'static)) -> Result<Applied> {
        let path = machine.expand(&self.ssh_config)?;
        let block = self.block(machine)?;
        block::apply_file(machine, &path, &block)
    }
}
