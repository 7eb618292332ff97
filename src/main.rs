mod cli;
mod config;
mod machine;
mod paths;
mod progress;
mod steps;
mod sudo;
mod transcript;
mod ui;

use anyhow::Result;
use clap::CommandFactory;
use clap_complete::generate;
use cli::Cli;
use std::io;
use std::process::ExitCode;

use crate::config::NovaConfig;
use crate::machine::{HostMachine, Machine};
use crate::progress::ConsoleProgress;

fn main() -> ExitCode {
    let cli = match Cli::try_parse_args(std::env::args_os()) {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            // Help and version are not errors; everything else exits 1
            if !err.use_stderr() {
                return ExitCode::SUCCESS;
            }
            record_usage_error(&err);
            return ExitCode::FAILURE;
        }
    };

    if let Some(shell) = cli.completions {
        generate(shell, &mut Cli::command(), "nova", &mut io::stdout());
        return ExitCode::SUCCESS;
    }

    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .format_timestamp(None)
        .target(env_logger::Target::Pipe(Box::new(transcript::LogPipe)))
        .init();

    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            ui::error(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}

/// Usage errors go to the default log directory, since `--log-dir` was not parsed
fn record_usage_error(err: &clap::Error) {
    let Ok(dir) = paths::log_dir() else {
        return;
    };
    if transcript::init(&dir).is_ok() {
        transcript::record(&err.render().to_string());
    }
}

fn run(cli: &Cli) -> Result<ExitCode> {
    let log_dir = match &cli.log_dir {
        Some(dir) => dir.clone(),
        None => paths::log_dir()?,
    };
    if let Err(e) = transcript::init(&log_dir) {
        log::warn!("Running without a transcript: {e:#}");
    }

    if !cli.quiet {
        ui::banner();
    }
    ui::header("nova - machine bootstrap");

    let (config, config_path) = NovaConfig::load(cli.config.as_deref())?;
    ui::kv("Config", &config_path.display().to_string());

    let registry = steps::build_registry(&config)?;
    let selection = declarative::resolve(&registry, &cli.request())?;

    for pruned in selection.pruned() {
        ui::warn(&format!(
            "Not running {}: its prerequisite {} is skipped",
            pruned.step, pruned.missing
        ));
    }

    let mode = cli.mode();
    ui::kv("Steps", &selection.selected().len().to_string());
    if mode.is_dry_run() {
        ui::info("Dry run - nothing will be changed");
    }

    let mut host = HostMachine::new();
    let machine: &mut (dyn Machine + 'static) = &mut host;
    let mut progress = ConsoleProgress::new(cli.quiet);
    let report = declarative::run(&registry, &selection, mode, machine, &mut progress);

    let summary = declarative::render(&report, mode);
    if !summary.is_empty() {
        ui::section("Summary");
        ui::plain(summary.trim_end());
    }
    if let Some(path) = transcript::path() {
        ui::dim(&format!("Transcript: {}", path.display()));
    }

    Ok(ExitCode::from(report.exit_code(mode)))
}
