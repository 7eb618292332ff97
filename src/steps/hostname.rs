//! Machine name - ComputerName, LocalHostName and HostName via `scutil`

use anyhow::{Result, bail};
use declarative::{Applied, Probe, Step};

use super::StepId;
use crate::machine::Machine;

const KEYS: [&str; 3] = ["ComputerName", "LocalHostName", "HostName"];

pub struct Hostname {
    desired: Option<String>,
}

impl Hostname {
    pub fn new(desired: Option<String>) -> Self {
        Self {
            desired: desired.filter(|name| !name.trim().is_empty()),
        }
    }
}

/// Bonjour-safe form of a name: ASCII letters, digits and hyphens only
pub fn local_host_name(name: &str) -> String {
    let mut local = String::with_capacity(name.len());
    for c in name.trim().chars() {
        if c.is_ascii_alphanumeric() {
            local.push(c);
        } else if !local.ends_with('-') {
            local.push('-');
        }
    }
    local.trim_matches('-').to_string()
}

/// Value `scutil` should report for `key` when the machine is named `name`
fn expected(key: &str, name: &str) -> String {
    match key {
        "ComputerName" => name.trim().to_string(),
        _ => local_host_name(name),
    }
}

fn current(machine: &dyn Machine, key: &str) -> Result<Option<String>> {
    let output = machine.output("scutil", &["--get", key])?;
    // `scutil --get HostName` fails with "not set" on a fresh machine
    Ok(output
        .success
        .then(|| output.stdout.trim().to_string())
        .filter(|value| !value.is_empty()))
}

impl Step<StepId, dyn Machine> for Hostname {
    fn id(&self) -> StepId {
        StepId::Hostname
    }

    fn label(&self) -> &str {
        StepId::Hostname.label()
    }

    fn probe(&self, machine: &dyn Machine) -> Result<Probe> {
        let Some(name) = &self.desired else {
            return Ok(Probe::satisfied("no machine name configured"));
        };

        let mut mismatched = Vec::new();
        for key in KEYS {
            if current(machine, key)?.as_deref() != Some(expected(key, name).as_str()) {
                mismatched.push(key);
            }
        }

        if mismatched.is_empty() {
            Ok(Probe::satisfied(format!("machine is named {name}")))
        } else {
            Ok(Probe::needed(format!(
                "{} not set to {name}",
                mismatched.join(", ")
            )))
        }
    }

    fn apply(&self, machine: &mut (dyn Machine + 'static)) -> Result<Applied> {
        let name = match &self.desired {
            Some(name) => name.clone(),
            None => {
                let suggestion = current(machine, "ComputerName")?.unwrap_or_default();
                machine.prompt("Machine name", &suggestion)?
            }
        };
        let name = name.trim();
        if local_host_name(name).is_empty() {
            bail!("'{name}' is not a usable machine name");
        }

        for key in KEYS {
            let value = expected(key, name);
            if !machine.sudo("scutil", &["--set", key, &value])? {
                bail!("scutil --set {key} failed");
            }
        }

        Ok(Applied::changed(format!("Machine name set to {name}")))
    }
}
