use clap::{ArgAction, CommandFactory, FromArgMatches, Parser};
use clap_complete::Shell;
use declarative::{LegacyAlias, RunMode, SelectionRequest};
use std::ffi::OsString;
use std::path::PathBuf;

use crate::steps;

#[derive(Parser, Debug)]
#[command(name = "nova")]
#[command(author = "Alberto Cavalcante")]
#[command(version)]
#[command(about = "Bootstrap a macOS machine, applying only the steps it still needs", long_about = None)]
pub struct Cli {
    /// Run only these steps or groups (comma separated, repeatable)
    #[arg(long, value_name = "STEPS")]
    pub only: Vec<String>,

    /// Never run these steps or groups (comma separated, repeatable)
    #[arg(long, value_name = "STEPS")]
    pub skip: Vec<String>,

    /// Show what would change without changing anything
    #[arg(long, visible_alias = "plan")]
    pub dry_run: bool,

    /// Same as --only=global
    #[arg(long)]
    pub global_only: bool,

    /// Same as --skip=global
    #[arg(long)]
    pub skip_global: bool,

    /// Same as --only=apps
    #[arg(long)]
    pub apps_only: bool,

    /// Same as --skip=apps
    #[arg(long)]
    pub skip_apps: bool,

    /// Same as --only=macos
    #[arg(long)]
    pub macos_only: bool,

    /// Same as --skip=macos
    #[arg(long)]
    pub skip_macos: bool,

    /// Config file (default: ~/.config/nova/config.toml)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory for run transcripts
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Print shell completions and exit
    #[arg(long, value_enum, value_name = "SHELL")]
    pub completions: Option<Shell>,

    /// Verbosity level
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Parse arguments, with the step catalog appended to `--help`
    pub fn try_parse_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = Self::command()
            .after_help(steps::catalog())
            .try_get_matches_from(args)?;
        Self::from_arg_matches(&matches)
    }

    pub fn mode(&self) -> RunMode {
        RunMode::from_dry_run(self.dry_run)
    }

    pub fn log_level(&self) -> log::LevelFilter {
        if self.quiet {
            return log::LevelFilter::Error;
        }
        match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }

    fn legacy(&self) -> Vec<LegacyAlias> {
        [
            (self.global_only, LegacyAlias::Only("global")),
            (self.skip_global, LegacyAlias::Skip("global")),
            (self.apps_only, LegacyAlias::Only("apps")),
            (self.skip_apps, LegacyAlias::Skip("apps")),
            (self.macos_only, LegacyAlias::Only("macos")),
            (self.skip_macos, LegacyAlias::Skip("macos")),
        ]
        .into_iter()
        .filter_map(|(set, alias)| set.then_some(alias))
        .collect()
    }

    /// Selection tokens from every selection flag
    pub fn request(&self) -> SelectionRequest {
        let mut request = SelectionRequest::new();
        for tokens in &self.only {
            request = request.only(tokens);
        }
        for tokens in &self.skip {
            request = request.skip(tokens);
        }
        request.legacy(self.legacy())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_args(std::iter::once("nova").chain(args.iter().copied()))
    }

    #[test]
    fn test_no_flags_selects_everything() {
        let cli = parse(&[]).unwrap();
        assert_eq!(cli.request(), SelectionRequest::new());
        assert_eq!(cli.mode(), RunMode::Live);
    }

    #[test]
    fn test_only_and_skip_are_repeatable_and_comma_separated() {
        let cli = parse(&["--only=brew,shell", "--only", "ssh", "--skip=xcode,"]).unwrap();
        let request = cli.request();
        assert_eq!(request.include, vec!["brew", "shell", "ssh"]);
        assert_eq!(request.exclude, vec!["xcode"]);
    }

    #[test]
    fn test_plan_is_dry_run() {
        assert!(parse(&["--plan"]).unwrap().mode().is_dry_run());
        assert!(parse(&["--dry-run"]).unwrap().mode().is_dry_run());
    }

    #[test]
    fn test_legacy_flags() {
        let cli = parse(&["--apps-only", "--skip-macos", "--only=name"]).unwrap();
        let request = cli.request();
        assert_eq!(request.include, vec!["name", "apps"]);
        assert_eq!(request.exclude, vec!["macos"]);
    }

    #[test]
    fn test_unknown_flag_is_an_error() {
        let err = parse(&["--frobnicate"]).unwrap_err();
        assert!(err.use_stderr());
    }

    #[test]
    fn test_help_contains_catalog() {
        let err = parse(&["--help"]).unwrap_err();
        assert!(!err.use_stderr());
        assert!(err.to_string().contains("Groups:"));
    }

    #[test]
    fn test_log_level() {
        assert_eq!(parse(&[]).unwrap().log_level(), log::LevelFilter::Warn);
        assert_eq!(parse(&["-vv"]).unwrap().log_level(), log::LevelFilter::Debug);
        assert_eq!(parse(&["-v", "-q"]).unwrap().log_level(), log::LevelFilter::Error);
    }
}
