//! The bootstrap step catalog
//!
//! Registration order is execution order; each step's prerequisites come
//! before it.

pub mod block;
pub mod defaults;
pub mod homebrew;
pub mod hostname;
pub mod onepassword;
pub mod packages;
pub mod shell;
pub mod ssh;
pub mod xcode;

use anyhow::{Context, Result};
use declarative::Registry;
use std::fmt;
use std::fmt::Write as _;

use crate::config::NovaConfig;
use crate::machine::Machine;

pub type StepRegistry = Registry<StepId, dyn Machine>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StepId {
    Hostname,
    Xcode,
    Homebrew,
    Shell,
    Packages,
    OnePassword,
    Ssh,
    Defaults,
}

impl StepId {
    /// Every step, in registry order
    pub const ALL: [StepId; 8] = [
        StepId::Hostname,
        StepId::Xcode,
        StepId::Homebrew,
        StepId::Shell,
        StepId::Packages,
        StepId::OnePassword,
        StepId::Ssh,
        StepId::Defaults,
    ];

    /// Token the operator types for this step
    pub fn name(self) -> &'static str {
        match self {
            StepId::Hostname => "hostname",
            StepId::Xcode => "xcode",
            StepId::Homebrew => "homebrew",
            StepId::Shell => "shell",
            StepId::Packages => "packages",
            StepId::OnePassword => "1password",
            StepId::Ssh => "ssh",
            StepId::Defaults => "defaults",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StepId::Hostname => "Machine name",
            StepId::Xcode => "Command-line developer tools",
            StepId::Homebrew => "Homebrew",
            StepId::Shell => "Shell profile",
            StepId::Packages => "Brewfile packages",
            StepId::OnePassword => "1Password",
            StepId::Ssh => "SSH agent config",
            StepId::Defaults => "macOS preferences",
        }
    }

    pub fn prerequisites(self) -> &'static [StepId] {
        match self {
            StepId::Homebrew => &[StepId::Xcode],
            StepId::Shell | StepId::Packages | StepId::OnePassword => &[StepId::Homebrew],
            StepId::Ssh => &[StepId::OnePassword],
            StepId::Hostname | StepId::Xcode | StepId::Defaults => &[],
        }
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Logical groups of steps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Group {
    Global,
    Apps,
    Macos,
    All,
}

impl Group {
    pub const ALL: [Group; 4] = [Group::Global, Group::Apps, Group::Macos, Group::All];

    pub fn name(self) -> &'static str {
        match self {
            Group::Global => "global",
            Group::Apps => "apps",
            Group::Macos => "macos",
            Group::All => "all",
        }
    }

    pub fn members(self) -> &'static [StepId] {
        match self {
            Group::Global => &[
                StepId::Hostname,
                StepId::Xcode,
                StepId::Homebrew,
                StepId::Shell,
            ],
            Group::Apps => &[StepId::Packages, StepId::OnePassword, StepId::Ssh],
            Group::Macos => &[StepId::Defaults],
            Group::All => &StepId::ALL,
        }
    }
}

/// Alternate spellings for single steps
pub const ALIASES: [(&str, StepId); 14] = [
    ("name", StepId::Hostname),
    ("computer-name", StepId::Hostname),
    ("clt", StepId::Xcode),
    ("xcode-select", StepId::Xcode),
    ("brew", StepId::Homebrew),
    ("zsh", StepId::Shell),
    ("profile", StepId::Shell),
    ("brewfile", StepId::Packages),
    ("bundle", StepId::Packages),
    ("op", StepId::OnePassword),
    ("onepassword", StepId::OnePassword),
    ("ssh-agent", StepId::Ssh),
    ("prefs", StepId::Defaults),
    ("preferences", StepId::Defaults),
];

/// Build the registry for a loaded config
pub fn build_registry(config: &NovaConfig) -> Result<StepRegistry> {
    let brewfile = config.packages.brewfile_path()?;
    let defaults = defaults::Defaults::from_config(&config.defaults)
        .context("Invalid [defaults] section")?;

    let mut registry = StepRegistry::new();
    registry.register(Box::new(hostname::Hostname::new(config.machine.name.clone())))?;
    registry.register(Box::new(xcode::Xcode))?;
    registry.register(Box::new(homebrew::Homebrew))?;
    registry.register(Box::new(shell::Shell::new(
        &config.shell.profile,
        &config.shell.lines,
    )))?;
    registry.register(Box::new(packages::Packages::new(brewfile)))?;
    registry.register(Box::new(onepassword::OnePassword::new(&config.credentials)))?;
    registry.register(Box::new(ssh::SshAgent::new(&config.credentials)))?;
    registry.register(Box::new(defaults))?;

    for group in Group::ALL {
        registry.alias(group.name(), group.members())?;
    }
    for (alias, step) in ALIASES {
        registry.alias(alias, &[step])?;
    }

    Ok(registry)
}

/// Token reference shown under `--help`
pub fn catalog() -> String {
    let mut out = String::from("Groups:\n");
    for group in Group::ALL {
        let members: Vec<&str> = group.members().iter().map(|s| s.name()).collect();
        let _ = writeln!(out, "  {:<12} {}", group.name(), members.join(", "));
    }

    out.push_str("\nSteps:\n");
    for step in StepId::ALL {
        let prerequisites = step.prerequisites();
        if prerequisites.is_empty() {
            let _ = writeln!(out, "  {:<12} {}", step.name(), step.label());
        } else {
            let names: Vec<&str> = prerequisites.iter().map(|s| s.name()).collect();
            let _ = writeln!(
                out,
                "  {:<12} {} (requires {})",
                step.name(),
                step.label(),
                names.join(", ")
            );
        }
    }

    out.push_str("\nAliases:\n");
    for step in StepId::ALL {
        let aliases: Vec<&str> = ALIASES
            .iter()
            .filter(|(_, target)| *target == step)
            .map(|(alias, _)| *alias)
            .collect();
        if !aliases.is_empty() {
            let _ = writeln!(out, "  {:<12} {}", step.name(), aliases.join(", "));
        }
    }

    out
}
