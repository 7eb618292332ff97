//! Step trait for declarative machine configuration
//!
//! A Step is one unit of desired state: it can say whether the machine
//! already matches (probe) and can bring the machine into that state (apply).

use crate::types::{Applied, Probe};
use anyhow::Result;
use std::fmt;

/// Identifier type for steps
///
/// Implemented for any small `Copy` key with a stable ordering and a
/// display name. The display name doubles as the step's own alias token.
pub trait StepKey: Copy + Ord + fmt::Debug + fmt::Display {}

impl<T: Copy + Ord + fmt::Debug + fmt::Display> StepKey for T {}

/// Core trait for bootstrap steps
///
/// `M` is the machine-state handle threaded into every call. Probes get a
/// shared reference and must not mutate anything; only `apply` receives the
/// handle mutably.
///
/// # Example
///
/// ```ignore
/// use declarative::{Applied, Probe, Step};
///
/// struct Hostname { desired: String }
///
/// impl Step<&'static str, dyn Machine> for Hostname {
///     fn id(&self) -> &'static str { "hostname" }
///     fn label(&self) -> &str { "Machine name" }
///
///     fn probe(&self, machine: &dyn Machine) -> anyhow::Result<Probe> {
///         let current = machine.capture("scutil", &["--get", "ComputerName"])?;
///         if current == self.desired {
///             Ok(Probe::satisfied(format!("current name is {current}")))
///         } else {
///             Ok(Probe::needed(format!("current name is {current}")))
///         }
///     }
///
///     fn apply(&self, machine: &mut dyn Machine) -> anyhow::Result<Applied> {
///         machine.sudo("scutil", &["--set", "ComputerName", &self.desired])?;
///         Ok(Applied::changed(format!("Machine name set to {}", self.desired)))
///     }
/// }
/// ```
pub trait Step<K, M: ?Sized> {
    /// Unique identifier for this step
    fn id(&self) -> K;

    /// Human-readable label used in reports (e.g. "Homebrew")
    fn label(&self) -> &str;

    /// Steps that must be selected whenever this one is
    fn prerequisites(&self) -> &[K] {
        &[]
    }

    /// Decide whether the step has work to do
    ///
    /// Errors are not fatal: the executor treats a failed probe as
    /// "needed" and lets `apply` decide.
    fn probe(&self, machine: &M) -> Result<Probe>;

    /// Bring the machine into the desired state
    ///
    /// Must be safe to run again after success or after an interruption.
    fn apply(&self, machine: &mut M) -> Result<Applied>;
}

/// A boxed step for type-erased storage
pub type BoxedStep<K, M> = Box<dyn Step<K, M>>;
