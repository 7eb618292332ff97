//! Test doubles shared by the unit tests

use std::cell::RefCell;

use anyhow::{Context, Result, anyhow, bail};

use crate::step::{BoxedStep, Step};
use crate::types::{Applied, Probe};

/// Records which steps were probed and applied
#[derive(Debug, Default)]
pub struct Machine {
    pub probed: RefCell<Vec<&'static str>>,
    pub applied: Vec<&'static str>,
}

#[derive(Debug, Clone, Copy)]
pub enum Behavior {
    /// Probe says needed, apply installs
    Needed,
    /// Probe says satisfied, apply changes
    Satisfied,
    /// Probe says satisfied, apply finds nothing to do
    Settled,
    /// Probe fails, apply installs
    ProbeError,
    /// Probe says needed, apply fails
    Fail,
    /// Probe says needed, apply must never be called
    PanicOnApply,
}

pub struct Fake {
    id: &'static str,
    label: String,
    prerequisites: Vec<&'static str>,
    behavior: Behavior,
}

impl Fake {
    pub fn boxed(id: &'static str, prerequisites: &[&'static str]) -> BoxedStep<&'static str, Machine> {
        Self::with(id, prerequisites, Behavior::Needed)
    }

    pub fn with(
        id: &'static str,
        prerequisites: &[&'static str],
        behavior: Behavior,
    ) -> BoxedStep<&'static str, Machine> {
        Box::new(Self {
            id,
            label: format!("Step {id}"),
            prerequisites: prerequisites.to_vec(),
            behavior,
        })
    }
}

impl Step<&'static str, Machine> for Fake {
    fn id(&self) -> &'static str {
        self.id
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn prerequisites(&self) -> &[&'static str] {
        &self.prerequisites
    }

    fn probe(&self, machine: &Machine) -> Result<Probe> {
        machine.probed.borrow_mut().push(self.id);
        match self.behavior {
            Behavior::Satisfied | Behavior::Settled => {
                Ok(Probe::satisfied(format!("{} is present", self.id)))
            }
            Behavior::ProbeError => {
                Err(anyhow!("No such file or directory")).context("probe tool missing")
            }
            Behavior::Needed | Behavior::Fail | Behavior::PanicOnApply => {
                Ok(Probe::needed(format!("{} is missing", self.id)))
            }
        }
    }

    fn apply(&self, machine: &mut Machine) -> Result<Applied> {
        match self.behavior {
            Behavior::PanicOnApply => panic!("apply invoked for {}", self.id),
            Behavior::Fail => bail!("{} exploded", self.id),
            Behavior::Satisfied => {
                machine.applied.push(self.id);
                Ok(Applied::changed(format!("{} updated", self.id)))
            }
            Behavior::Settled => {
                machine.applied.push(self.id);
                Ok(Applied::unchanged(format!("{} already in place", self.id)))
            }
            Behavior::Needed | Behavior::ProbeError => {
                machine.applied.push(self.id);
                Ok(Applied::installed(format!("{} installed", self.id)))
            }
        }
    }
}
