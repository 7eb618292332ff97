//! nova configuration (`~/.config/nova/config.toml`)
//!
//! Every section is optional. A missing file yields the built-in defaults.

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::paths;

/// Default location of the 1Password SSH agent socket
pub const ONEPASSWORD_AGENT_SOCKET: &str =
    "~/Library/Group Containers/2BUA8C4S2C.com.1password/t/agent.sock";

// ============================================================================
// Main Config Schema
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NovaConfig {
    #[serde(default)]
    pub machine: MachineConfig,

    #[serde(default)]
    pub packages: PackagesConfig,

    #[serde(default)]
    pub shell: ShellConfig,

    #[serde(default)]
    pub credentials: CredentialsConfig,

    /// macOS defaults (`"domain.key" = value`)
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

impl NovaConfig {
    /// Parse a config from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Invalid TOML format in nova config")
    }

    /// Load the config
    ///
    /// An explicitly requested file must exist. The default file may be
    /// missing, in which case built-in defaults are used.
    pub fn load(explicit: Option<&Path>) -> Result<(Self, PathBuf)> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => default_path()?,
        };

        if !path.exists() {
            if explicit.is_some() {
                bail!("Config file not found: {}", path.display());
            }
            log::warn!(
                "No config found at {} - using built-in defaults",
                path.display()
            );
            return Ok((Self::default(), path));
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Could not read config file: {}", path.display()))?;
        let config = Self::parse(&content)
            .with_context(|| format!("Could not load {}", path.display()))?;
        log::debug!("Loaded config from {}", path.display());
        Ok((config, path))
    }
}

/// Default config file location
pub fn default_path() -> Result<PathBuf> {
    Ok(paths::config_dir()?.join("config.toml"))
}

// ============================================================================
// Sections
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MachineConfig {
    /// Desired computer name; when unset nova asks on a forced run
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PackagesConfig {
    /// Brewfile to install from (default: `<config dir>/Brewfile`)
    #[serde(default)]
    pub brewfile: Option<String>,
}

impl PackagesConfig {
    pub fn brewfile_path(&self) -> Result<PathBuf> {
        match &self.brewfile {
            Some(path) => Ok(paths::expand(path)),
            None => Ok(paths::config_dir()?.join("Brewfile")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShellConfig {
    /// Profile file that receives the managed block
    #[serde(default = "default_profile")]
    pub profile: String,

    /// Extra lines appended to the managed block
    #[serde(default)]
    pub lines: Vec<String>,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            profile: default_profile(),
            lines: Vec::new(),
        }
    }
}

fn default_profile() -> String {
    "~/.zprofile".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialsConfig {
    /// Casks providing the app and its CLI
    #[serde(default = "default_casks")]
    pub casks: Vec<String>,

    /// Installed application bundle
    #[serde(default = "default_app")]
    pub app: String,

    /// SSH agent socket the app exposes once its agent is enabled
    #[serde(default = "default_agent_socket")]
    pub agent_socket: String,

    /// SSH client config that gets the IdentityAgent block
    #[serde(default = "default_ssh_config")]
    pub ssh_config: String,
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            casks: default_casks(),
            app: default_app(),
            agent_socket: default_agent_socket(),
            ssh_config: default_ssh_config(),
        }
    }
}

fn default_casks() -> Vec<String> {
    vec!["1password".to_string(), "1password-cli".to_string()]
}

fn default_app() -> String {
    "/Applications/1Password.app".to_string()
}

fn default_agent_socket() -> String {
    ONEPASSWORD_AGENT_SOCKET.to_string()
}

fn default_ssh_config() -> String {
    "~/.ssh/config".to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Services to restart after preferences change (e.g. "Finder", "Dock")
    #[serde(default)]
    pub restart: Vec<String>,

    /// Key-value pairs for defaults (domain.key = value)
    #[serde(flatten)]
    pub settings: BTreeMap<String, DefaultValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DefaultValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl DefaultValue {
    /// `defaults write` type flag
    pub fn type_flag(&self) -> &'static str {
        match self {
            Self::Bool(_) => "-bool",
            Self::Int(_) => "-int",
            Self::Float(_) => "-float",
            Self::String(_) => "-string",
        }
    }

    /// Value as passed to `defaults write`
    pub fn to_arg(&self) -> String {
        match self {
            Self::Bool(b) => b.to_string(),
            Self::Int(i) => i.to_string(),
            Self::Float(f) => f.to_string(),
            Self::String(s) => s.clone(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = NovaConfig::parse("").unwrap();
        assert!(config.machine.name.is_none());
        assert_eq!(config.shell.profile, "~/.zprofile");
        assert_eq!(config.credentials.casks, vec!["1password", "1password-cli"]);
        assert_eq!(config.credentials.agent_socket, ONEPASSWORD_AGENT_SOCKET);
        assert!(config.defaults.settings.is_empty());
    }

    #[test]
    fn test_full_config() {
        let config = NovaConfig::parse(
            r#"
            [machine]
            name = "studio"

            [packages]
            brewfile = "/tmp/Brewfile"

            [shell]
            profile = "~/.zshrc"
            lines = ["export EDITOR=hx"]

            [defaults]
            restart = ["Finder"]
            "com.apple.finder.ShowPathbar" = true
            "com.apple.dock.tilesize" = 42
            "NSGlobalDomain.AppleInterfaceStyle" = "Dark"
            "#,
        )
        .unwrap();

        assert_eq!(config.machine.name.as_deref(), Some("studio"));
        assert_eq!(
            config.packages.brewfile_path().unwrap(),
            PathBuf::from("/tmp/Brewfile")
        );
        assert_eq!(config.shell.lines, vec!["export EDITOR=hx"]);
        assert_eq!(config.defaults.restart, vec!["Finder"]);
        assert_eq!(
            config.defaults.settings.get("com.apple.finder.ShowPathbar"),
            Some(&DefaultValue::Bool(true))
        );
        assert_eq!(
            config.defaults.settings.get("com.apple.dock.tilesize"),
            Some(&DefaultValue::Int(42))
        );
        assert_eq!(config.defaults.settings.len(), 3);
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        assert!(NovaConfig::parse("[machine\nname = 1").is_err());
    }

    #[test]
    fn test_load_explicit_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(NovaConfig::load(Some(&missing)).is_err());
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[machine]\nname = \"mini\"\n").unwrap();

        let (config, loaded_from) = NovaConfig::load(Some(&path)).unwrap();
        assert_eq!(config.machine.name.as_deref(), Some("mini"));
        assert_eq!(loaded_from, path);
    }

    #[test]
    fn test_default_value_args() {
        assert_eq!(DefaultValue::Bool(true).type_flag(), "-bool");
        assert_eq!(DefaultValue::Bool(true).to_arg(), "true");
        assert_eq!(DefaultValue::Int(3).to_arg(), "3");
        assert_eq!(DefaultValue::String("Dark".into()).type_flag(), "-string");
    }
}
