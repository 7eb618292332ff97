//! Core types for the step engine

use std::fmt;

/// Execution mode for one invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunMode {
    /// Probe and apply
    #[default]
    Live,
    /// Probe only, report what would be applied
    DryRun,
}

impl RunMode {
    /// Build a mode from a `--dry-run` style flag
    pub fn from_dry_run(dry_run: bool) -> Self {
        if dry_run { Self::DryRun } else { Self::Live }
    }

    pub fn is_dry_run(self) -> bool {
        matches!(self, Self::DryRun)
    }
}

/// Result of probing a step against the current machine state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Probe {
    /// Whether the step has work to do
    pub needed: bool,
    /// Human-readable explanation (e.g. "current name is studio")
    pub reason: String,
}

impl Probe {
    /// The desired state does not hold yet
    pub fn needed(reason: impl Into<String>) -> Self {
        Self {
            needed: true,
            reason: reason.into(),
        }
    }

    /// The desired state already holds
    pub fn satisfied(reason: impl Into<String>) -> Self {
        Self {
            needed: false,
            reason: reason.into(),
        }
    }
}

/// Category a step reports for itself after a successful apply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppliedKind {
    /// Something new was put in place
    Installed,
    /// Existing state was updated
    Changed,
    /// Apply ran but found nothing to do
    Unchanged,
}

/// Successful apply outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Applied {
    pub kind: AppliedKind,
    pub detail: String,
}

impl Applied {
    pub fn installed(detail: impl Into<String>) -> Self {
        Self {
            kind: AppliedKind::Installed,
            detail: detail.into(),
        }
    }

    pub fn changed(detail: impl Into<String>) -> Self {
        Self {
            kind: AppliedKind::Changed,
            detail: detail.into(),
        }
    }

    pub fn unchanged(detail: impl Into<String>) -> Self {
        Self {
            kind: AppliedKind::Unchanged,
            detail: detail.into(),
        }
    }
}

/// Outcome category recorded in a run report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutcomeKind {
    Installed,
    Changed,
    Skipped,
    Failed,
    Planned,
}

impl OutcomeKind {
    /// Section title used by the reporter
    pub fn title(self) -> &'static str {
        match self {
            Self::Installed => "Installed",
            Self::Changed => "Changed",
            Self::Skipped => "Skipped",
            Self::Failed => "Failed",
            Self::Planned => "Planned actions",
        }
    }
}

impl From<AppliedKind> for OutcomeKind {
    fn from(kind: AppliedKind) -> Self {
        match kind {
            AppliedKind::Installed => Self::Installed,
            AppliedKind::Changed => Self::Changed,
            AppliedKind::Unchanged => Self::Skipped,
        }
    }
}

impl fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Installed => "installed",
            Self::Changed => "changed",
            Self::Skipped => "skipped",
            Self::Failed => "failed",
            Self::Planned => "planned",
        };
        f.write_str(name)
    }
}

/// One recorded outcome, tagged with the step it belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome<K> {
    pub step: K,
    pub kind: OutcomeKind,
    pub detail: String,
}

impl<K> Outcome<K> {
    pub fn new(step: K, kind: OutcomeKind, detail: impl Into<String>) -> Self {
        Self {
            step,
            kind,
            detail: detail.into(),
        }
    }
}
