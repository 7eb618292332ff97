//! macOS preferences - read/write via `defaults`

use anyhow::{Result, bail};
use declarative::{Applied, Probe, Step};

use super::StepId;
use crate::config::{DefaultValue, DefaultsConfig};
use crate::machine::Machine;

/// One desired `defaults` value
#[derive(Debug, Clone, PartialEq)]
pub struct Setting {
    /// Domain (e.g., "com.apple.finder")
    pub domain: String,
    /// Key (e.g., "ShowPathbar")
    pub key: String,
    pub value: DefaultValue,
}

impl Setting {
    /// Parse "domain.key" format
    pub fn from_domain_key(domain_key: &str, value: DefaultValue) -> Result<Self> {
        if let Some(key) = domain_key.strip_prefix("NSGlobalDomain.") {
            return Ok(Self {
                domain: "NSGlobalDomain".to_string(),
                key: key.to_string(),
                value,
            });
        }

        // The last dot separates domain from key
        match domain_key.rsplit_once('.') {
            Some((domain, key)) if !domain.is_empty() && !key.is_empty() => Ok(Self {
                domain: domain.to_string(),
                key: key.to_string(),
                value,
            }),
            _ => bail!("Invalid domain.key format: {domain_key}"),
        }
    }

    fn name(&self) -> String {
        format!("{}.{}", self.domain, self.key)
    }

    /// Current value, parsed as the desired value's type
    fn read_current(&self, machine: &dyn Machine) -> Result<Option<DefaultValue>> {
        let output = machine.output("defaults", &["read", &self.domain, &self.key])?;
        if !output.success {
            // Key doesn't exist
            return Ok(None);
        }

        let stdout = output.stdout.trim();
        Ok(match &self.value {
            DefaultValue::Bool(_) => match stdout {
                "1" | "true" => Some(DefaultValue::Bool(true)),
                "0" | "false" => Some(DefaultValue::Bool(false)),
                _ => None,
            },
            DefaultValue::Int(_) => stdout.parse().ok().map(DefaultValue::Int),
            DefaultValue::Float(_) => stdout.parse().ok().map(DefaultValue::Float),
            DefaultValue::String(_) => Some(DefaultValue::String(stdout.to_string())),
        })
    }

    fn matches(&self, machine: &dyn Machine) -> Result<bool> {
        Ok(self.read_current(machine)?.as_ref() == Some(&self.value))
    }
}

pub struct Defaults {
    settings: Vec<Setting>,
    restart: Vec<String>,
}

impl Defaults {
    pub fn new(settings: Vec<Setting>, restart: Vec<String>) -> Self {
        Self { settings, restart }
    }

    pub fn from_config(config: &DefaultsConfig) -> Result<Self> {
        let settings = config
            .settings
            .iter()
            .map(|(domain_key, value)| Setting::from_domain_key(domain_key, value.clone()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(settings, config.restart.clone()))
    }

    fn mismatched(&self, machine: &dyn Machine) -> Result<Vec<&Setting>> {
        let mut mismatched = Vec::new();
        for setting in &self.settings {
            if !setting.matches(machine)? {
                mismatched.push(setting);
            }
        }
        Ok(mismatched)
    }
}

impl Step<StepId, dyn Machine> for Defaults {
    fn id(&self) -> StepId {
        StepId::Defaults
    }

    fn label(&self) -> &str {
        StepId::Defaults.label()
    }

    fn probe(&self, machine: &dyn Machine) -> Result<Probe> {
        if self.settings.is_empty() {
            return Ok(Probe::satisfied("no preferences configured"));
        }

        let mismatched = self.mismatched(machine)?;
        if mismatched.is_empty() {
            return Ok(Probe::satisfied(format!(
                "{} preferences match",
                self.settings.len()
            )));
        }

        let names: Vec<String> = mismatched.iter().map(|s| s.name()).collect();
        Ok(Probe::needed(format!(
            "{} preferences differ: {}",
            names.len(),
            names.join(", ")
        )))
    }

    fn apply(&self, machine: &mut (dyn Machine + 'static)) -> Result<Applied> {
        let pending = self.mismatched(machine)?;

        for setting in &pending {
            let value = setting.value.to_arg();
            let args = [
                "write",
                setting.domain.as_str(),
                setting.key.as_str(),
                setting.value.type_flag(),
                value.as_str(),
            ];
            if !machine.run("defaults", &args)? {
                bail!("defaults write {} failed", setting.name());
            }
        }

        if pending.is_empty() {
            return Ok(Applied::unchanged("All preferences already match"));
        }

        for service in &self.restart {
            // killall fails when the service is not running
            if !machine.run("killall", &[service.as_str()])? {
                log::warn!("Could not restart {service}");
            }
        }

        Ok(Applied::changed(format!(
            "Updated {} preferences",
            pending.len()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::machine::CommandOutput;
    use crate::machine::fake::FakeMachine;

    fn step() -> Defaults {
        Defaults::new(
            vec![
                Setting::from_domain_key("com.apple.finder.ShowPathbar", DefaultValue::Bool(true))
                    .unwrap(),
                Setting::from_domain_key("com.apple.dock.tilesize", DefaultValue::Int(42))
                    .unwrap(),
            ],
            vec!["Finder".to_string()],
        )
    }

    #[test]
    fn test_from_domain_key() {
        let setting =
            Setting::from_domain_key("com.apple.finder.ShowPathbar", DefaultValue::Bool(true))
                .unwrap();
        assert_eq!(setting.domain, "com.apple.finder");
        assert_eq!(setting.key, "ShowPathbar");

        let global = Setting::from_domain_key(
            "NSGlobalDomain.AppleShowAllExtensions",
            DefaultValue::Bool(true),
        )
        .unwrap();
        assert_eq!(global.domain, "NSGlobalDomain");
        assert_eq!(global.key, "AppleShowAllExtensions");

        assert!(Setting::from_domain_key("nodot", DefaultValue::Int(1)).is_err());
    }

    #[test]
    fn test_no_settings_is_not_needed() {
        let step = Defaults::new(Vec::new(), Vec::new());
        assert!(!step.probe(&FakeMachine::new()).unwrap().needed);
    }

    #[test]
    fn test_probe_reports_mismatches() {
        let machine = FakeMachine::new()
            .with_output(
                "defaults read com.apple.finder ShowPathbar",
                CommandOutput::ok("1\n"),
            )
            .with_output(
                "defaults read com.apple.dock tilesize",
                CommandOutput::ok("64\n"),
            );

        let probe = step().probe(&machine).unwrap();
        assert!(probe.needed);
        assert_eq!(probe.reason, "1 preferences differ: com.apple.dock.tilesize");
    }

    #[test]
    fn test_apply_writes_only_mismatches_and_restarts() {
        let mut machine = FakeMachine::new()
            .with_command("defaults")
            .with_output(
                "defaults read com.apple.finder ShowPathbar",
                CommandOutput::ok("1\n"),
            );

        let applied = step().apply(&mut machine).unwrap();
        assert_eq!(applied.detail, "Updated 1 preferences");
        assert_eq!(
            machine.ran,
            vec!["defaults write com.apple.dock tilesize -int 42", "killall Finder"]
        );
    }

    #[test]
    fn test_restart_failure_is_not_fatal() {
        let mut machine = FakeMachine::new()
            .with_command("defaults")
            .with_status("killall Finder", false);
        assert!(step().apply(&mut machine).is_ok());
    }

    #[test]
    fn test_matching_values_skip_restart() {
        let mut machine = FakeMachine::new()
            .with_output(
                "defaults read com.apple.finder ShowPathbar",
                CommandOutput::ok("1\n"),
            )
            .with_output(
                "defaults read com.apple.dock tilesize",
                CommandOutput::ok("42\n"),
            );

        assert!(!step().probe(&machine).unwrap().needed);
        let applied = step().apply(&mut machine).unwrap();
        assert_eq!(applied.kind, declarative::AppliedKind::Unchanged);
        assert!(machine.ran.is_empty());
    }
}
