//! Run report - aggregated outcomes and the summary renderer

use crate::types::{Outcome, OutcomeKind, RunMode};

/// Text rendered for a dry run with nothing to do
pub const NO_CHANGES: &str = "No changes needed.";

/// Section order for live runs
const LIVE_SECTIONS: [OutcomeKind; 4] = [
    OutcomeKind::Installed,
    OutcomeKind::Changed,
    OutcomeKind::Skipped,
    OutcomeKind::Failed,
];

/// Outcomes of one run, in recording order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport<K> {
    outcomes: Vec<Outcome<K>>,
    aborted_at: Option<K>,
}

impl<K: Copy> RunReport<K> {
    pub fn new() -> Self {
        Self {
            outcomes: Vec::new(),
            aborted_at: None,
        }
    }

    pub(crate) fn record(&mut self, outcome: Outcome<K>) {
        self.outcomes.push(outcome);
    }

    pub(crate) fn abort(&mut self, at: K) {
        self.aborted_at = Some(at);
    }

    /// All outcomes in execution order
    pub fn outcomes(&self) -> &[Outcome<K>] {
        &self.outcomes
    }

    /// Outcomes of one kind, in execution order
    pub fn of_kind(&self, kind: OutcomeKind) -> impl Iterator<Item = &Outcome<K>> {
        self.outcomes.iter().filter(move |o| o.kind == kind)
    }

    pub fn count(&self, kind: OutcomeKind) -> usize {
        self.of_kind(kind).count()
    }

    /// Step whose failure stopped the run, if any
    pub fn aborted_at(&self) -> Option<K> {
        self.aborted_at
    }

    /// Check if no step failed
    pub fn is_success(&self) -> bool {
        self.count(OutcomeKind::Failed) == 0
    }

    /// Total number of changes made
    pub fn total_changes(&self) -> usize {
        self.count(OutcomeKind::Installed) + self.count(OutcomeKind::Changed)
    }

    /// Process exit code for this report
    ///
    /// Dry runs always succeed; live runs fail if any step failed.
    pub fn exit_code(&self, mode: RunMode) -> u8 {
        match mode {
            RunMode::DryRun => 0,
            RunMode::Live if self.is_success() => 0,
            RunMode::Live => 1,
        }
    }
}

impl<K: Copy> Default for RunReport<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// Render the end-of-run summary
///
/// Dry runs show only the planned actions. Live runs show the non-empty
/// sections among Installed, Changed, Skipped and Failed, in that order.
pub fn render<K: Copy>(report: &RunReport<K>, mode: RunMode) -> String {
    match mode {
        RunMode::DryRun => {
            if report.count(OutcomeKind::Planned) == 0 {
                NO_CHANGES.to_string()
            } else {
                render_section(report, OutcomeKind::Planned)
            }
        }
        RunMode::Live => LIVE_SECTIONS
            .iter()
            .filter(|kind| report.count(**kind) > 0)
            .map(|kind| render_section(report, *kind))
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

fn render_section<K: Copy>(report: &RunReport<K>, kind: OutcomeKind) -> String {
    let mut out = format!("{}:\n", kind.title());
    for outcome in report.of_kind(kind) {
        out.push_str(&format!("  - {}\n", outcome.detail));
    }
    out
}
