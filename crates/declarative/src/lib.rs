//! # Declarative
//!
//! An idempotent step engine for bootstrapping machines.
//!
//! Each step knows how to check whether the machine already matches its
//! desired state (probe) and how to get it there (apply). The engine picks
//! which steps to run, probes them in a fixed order, and applies only what
//! is needed.
//!
//! ## Core Concepts
//!
//! - **Step**: One unit of desired state with a probe and an apply action
//! - **Registry**: Ordered step catalog plus group/alias table
//! - **Selection**: Operator tokens expanded, closed over prerequisites,
//!   minus exclusions
//! - **RunReport**: Outcomes (installed, changed, skipped, failed, planned)
//!   in execution order
//!
//! ## Example
//!
//! ```ignore
//! use declarative::{
//!     NoProgress, Registry, RunMode, SelectionRequest, render, resolve, run,
//! };
//!
//! let mut registry: Registry<StepId, dyn Machine> = Registry::new();
//! registry.register(Box::new(Homebrew))?;
//! registry.register(Box::new(Packages::new(brewfile)))?;
//! registry.alias("apps", &[StepId::Packages])?;
//!
//! let request = SelectionRequest::new().only("apps");
//! let selection = resolve(&registry, &request)?;
//! let report = run(&registry, &selection, RunMode::DryRun, &mut machine, &mut NoProgress);
//! println!("{}", render(&report, RunMode::DryRun));
//! ```
//!
//! ## Guarantees
//!
//! - Steps run one at a time, in registry order, never reordered
//! - Dry runs never call [`Step::apply`]
//! - An explicit skip always wins over prerequisite pull-in
//! - The first failed apply stops the run

pub mod error;
pub mod executor;
pub mod progress;
pub mod registry;
pub mod report;
pub mod selector;
pub mod step;
pub mod types;
pub mod wait;

#[cfg(test)]
mod testing;

// Re-export main types at crate root
pub use error::{RegistryError, SelectError};
pub use executor::run;
pub use progress::{NoProgress, ProgressCallback};
pub use registry::{Alias, Registry};
pub use report::{NO_CHANGES, RunReport, render};
pub use selector::{
    LegacyAlias, Pruned, Selection, SelectionRequest, close_over_prerequisites, resolve,
    split_tokens,
};
pub use step::{BoxedStep, Step, StepKey};
pub use types::{Applied, AppliedKind, Outcome, OutcomeKind, Probe, RunMode};
pub use wait::block_until;
