//! Execution engine - probes and applies steps in registry order

use crate::progress::ProgressCallback;
use crate::registry::Registry;
use crate::report::RunReport;
use crate::selector::Selection;
use crate::step::{Step, StepKey};
use crate::types::{Outcome, OutcomeKind, Probe, RunMode};

/// Run the selected steps
///
/// Steps are visited strictly in registry order, one at a time. In
/// [`RunMode::DryRun`] no apply action is ever invoked. In live mode the
/// first failing apply stops the run; steps after it are not visited.
///
/// # Arguments
/// * `registry` - The step catalog
/// * `selection` - Resolved selection (see [`resolve`](crate::resolve))
/// * `mode` - Live or dry run
/// * `machine` - Machine-state handle passed to every probe and apply
/// * `progress` - Progress callback
pub fn run<K, M, P>(
    registry: &Registry<K, M>,
    selection: &Selection<K>,
    mode: RunMode,
    machine: &mut M,
    progress: &mut P,
) -> RunReport<K>
where
    K: StepKey,
    M: ?Sized,
    P: ProgressCallback<K>,
{
    let mut report = RunReport::new();

    for step in registry.steps() {
        let id = step.id();
        let label = step.label();

        if !selection.is_selected(id) {
            if selection.is_excluded(id) {
                record(
                    &mut report,
                    progress,
                    Outcome::new(id, OutcomeKind::Skipped, format!("{label} (skipped by flag)")),
                );
            }
            continue;
        }

        progress.on_step_start(id, label);
        let probe = probe_step(step, machine);
        log::debug!("Probed {id}: needed={} ({})", probe.needed, probe.reason);
        progress.on_probe(id, &probe);

        let forced = selection.is_forced(id);

        match mode {
            RunMode::DryRun => {
                if probe.needed {
                    record(
                        &mut report,
                        progress,
                        Outcome::new(
                            id,
                            OutcomeKind::Planned,
                            format!("{label}: {}", probe.reason),
                        ),
                    );
                } else if forced {
                    record(
                        &mut report,
                        progress,
                        Outcome::new(id, OutcomeKind::Planned, format!("{label} (forced)")),
                    );
                }
            }
            RunMode::Live => {
                if !probe.needed && !forced {
                    record(
                        &mut report,
                        progress,
                        Outcome::new(
                            id,
                            OutcomeKind::Skipped,
                            format!("{label} already configured"),
                        ),
                    );
                    continue;
                }

                progress.on_apply(id, label);
                match step.apply(machine) {
                    Ok(applied) => {
                        record(
                            &mut report,
                            progress,
                            Outcome::new(id, applied.kind.into(), applied.detail),
                        );
                    }
                    Err(e) => {
                        log::debug!("Aborting after {id}");
                        progress.on_failure(id, &e);
                        record(
                            &mut report,
                            progress,
                            Outcome::new(id, OutcomeKind::Failed, format!("{label} failed")),
                        );
                        report.abort(id);
                        break;
                    }
                }
            }
        }
    }

    report
}

/// Probe a step, degrading errors to "needed"
fn probe_step<K, M: ?Sized>(step: &dyn Step<K, M>, machine: &M) -> Probe {
    match step.probe(machine) {
        Ok(probe) => probe,
        Err(e) => {
            log::warn!("Could not probe {}: {e:#}", step.label());
            Probe::needed(format!("could not determine state: {e:#}"))
        }
    }
}

fn record<K: Copy, P: ProgressCallback<K>>(
    report: &mut RunReport<K>,
    progress: &mut P,
    outcome: Outcome<K>,
) {
    progress.on_outcome(&outcome);
    report.record(outcome);
}
