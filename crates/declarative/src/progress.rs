//! Progress callback trait
//!
//! Lets the executor report what it is doing without depending on a
//! particular UI or log sink.

use crate::types::{Outcome, Probe};

/// Receives progress updates during a run
pub trait ProgressCallback<K> {
    /// Called before a selected step is probed
    fn on_step_start(&mut self, id: K, label: &str);

    /// Called with the probe result of a selected step
    fn on_probe(&mut self, id: K, probe: &Probe);

    /// Called right before a step's apply action runs
    fn on_apply(&mut self, _id: K, _label: &str) {}

    /// Called whenever an outcome is recorded
    fn on_outcome(&mut self, outcome: &Outcome<K>);

    /// Called when an apply action fails, before the run aborts
    fn on_failure(&mut self, id: K, error: &anyhow::Error);
}

/// No-op progress callback
pub struct NoProgress;

impl<K> ProgressCallback<K> for NoProgress {
    fn on_step_start(&mut self, _id: K, _label: &str) {}
    fn on_probe(&mut self, _id: K, _probe: &Probe) {}
    fn on_outcome(&mut self, _outcome: &Outcome<K>) {}
    fn on_failure(&mut self, _id: K, _error: &anyhow::Error) {}
}
