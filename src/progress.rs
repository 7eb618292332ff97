//! Console progress for step runs

use declarative::{Outcome, OutcomeKind, Probe, ProgressCallback};

use crate::steps::StepId;
use crate::ui;

pub struct ConsoleProgress {
    quiet: bool,
}

impl ConsoleProgress {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }
}

impl ProgressCallback<StepId> for ConsoleProgress {
    fn on_step_start(&mut self, id: StepId, label: &str) {
        log::debug!("Checking {id} ({label})");
    }

    fn on_probe(&mut self, id: StepId, probe: &Probe) {
        let state = if probe.needed { "needed" } else { "ok" };
        log::info!("{id}: {state} - {}", probe.reason);
    }

    fn on_apply(&mut self, _id: StepId, label: &str) {
        if !self.quiet {
            ui::info(&format!("{label}..."));
        }
    }

    fn on_outcome(&mut self, outcome: &Outcome<StepId>) {
        match outcome.kind {
            OutcomeKind::Installed | OutcomeKind::Changed => ui::success(&outcome.detail),
            OutcomeKind::Skipped if !self.quiet => ui::dim(&outcome.detail),
            // on_failure already printed the cause
            OutcomeKind::Skipped | OutcomeKind::Planned | OutcomeKind::Failed => {}
        }
    }

    fn on_failure(&mut self, id: StepId, error: &anyhow::Error) {
        ui::error(&failure_line(id, error));
    }
}

fn failure_line(id: StepId, error: &anyhow::Error) -> String {
    format!("{} failed: {error:#}", id.label())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Context, anyhow};

    #[test]
    fn test_failure_line_names_step_and_cause() {
        let error = Err::<(), _>(anyhow!("exit status 1"))
            .context("brew bundle install failed")
            .unwrap_err();
        assert_eq!(
            failure_line(StepId::Packages, &error),
            "Brewfile packages failed: brew bundle install failed: exit status 1"
        );
    }
}
