//! Error types for registry construction and step selection.
//!
//! Both kinds of error are detected before any step runs, so callers can
//! abort without having touched the machine.

use thiserror::Error;

/// Errors raised while building a [`Registry`](crate::Registry).
///
/// These indicate a broken static catalog, not operator input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A step with this name was already registered
    #[error("step '{step}' is registered twice")]
    DuplicateStep {
        /// Name of the duplicated step
        step: String,
    },

    /// A prerequisite was not registered before its dependent
    #[error("step '{step}' requires '{prerequisite}', which is not registered before it")]
    UnknownPrerequisite {
        /// Step declaring the prerequisite
        step: String,
        /// The missing prerequisite
        prerequisite: String,
    },

    /// An alias name collides with a step name or another alias
    #[error("alias '{alias}' is already defined")]
    DuplicateAlias {
        /// The colliding alias
        alias: String,
    },

    /// An alias expands to a step that is not registered
    #[error("alias '{alias}' refers to unregistered step '{step}'")]
    UnknownAliasMember {
        /// The alias being defined
        alias: String,
        /// The unregistered member
        step: String,
    },
}

/// Errors raised while resolving operator tokens into a selection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectError {
    /// The token matches no group or step
    #[error("unknown section '{token}'")]
    UnknownSection {
        /// The offending token, as supplied
        token: String,
    },
}

/// Convenience alias for registry results
pub type Result<T, E = RegistryError> = std::result::Result<T, E>;
