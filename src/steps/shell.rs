//! Shell profile - puts Homebrew on `$PATH` plus any configured lines

use anyhow::Result;
use declarative::{Applied, Probe, Step};

use super::StepId;
use super::block;
use super::homebrew;
use crate::machine::Machine;

pub struct Shell {
    profile: String,
    lines: Vec<String>,
}

impl Shell {
    pub fn new(profile: &str, lines: &[String]) -> Self {
        Self {
            profile: profile.to_string(),
            lines: lines.to_vec(),
        }
    }

    fn block(&self, machine: &dyn Machine) -> String {
        let brew = homebrew::brew_path(machine)
            .filter(|path| path.is_absolute())
            .map(|path| path.to_string_lossy().to_string())
            .unwrap_or_else(|| homebrew::default_brew_path().to_string());

        let mut body = vec![format!("eval \"$({brew} shellenv)\"")];
        body.extend(self.lines.iter().cloned());
        block::render(&body)
    }
}

impl Step<StepId, dyn Machine> for Shell {
    fn id(&self) -> StepId {
        StepId::Shell
    }

    fn label(&self) -> &str {
        StepId::Shell.label()
    }

    fn prerequisites(&self) -> &[StepId] {
        StepId::Shell.prerequisites()
    }

    fn probe(&self, machine: &dyn Machine) -> Result<Probe> {
        let path = machine.expand(&self.profile)?;
        block::probe_file(machine, &path, &self.block(machine))
    }

    fn apply(&self, machine: &mut (dyn Machine + 'static)) -> Result<Applied> {
        let path = machine.expand(&self.profile)?;
        let block = self.block(machine);
        block::apply_file(machine, &path, &block)
    }
}
