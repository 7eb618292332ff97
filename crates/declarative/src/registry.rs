//! Step registry - ordered step catalog plus the alias table

use crate::error::{RegistryError, Result};
use crate::step::{BoxedStep, Step, StepKey};

/// A named alias expanding to one or more steps
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alias<K> {
    /// Lower-case token the operator types
    pub name: String,
    /// Member steps, in declaration order
    pub members: Vec<K>,
}

/// Ordered catalog of steps
///
/// Registration order is execution order. A step may only name
/// prerequisites that were registered before it, so the order is always
/// dependency-respecting and the prerequisite graph cannot contain cycles.
pub struct Registry<K, M: ?Sized> {
    steps: Vec<BoxedStep<K, M>>,
    aliases: Vec<Alias<K>>,
}

impl<K: StepKey, M: ?Sized> Registry<K, M> {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            steps: Vec::new(),
            aliases: Vec::new(),
        }
    }

    /// Append a step to the catalog
    pub fn register(&mut self, step: BoxedStep<K, M>) -> Result<()> {
        let id = step.id();
        if self.contains(id) {
            return Err(RegistryError::DuplicateStep {
                step: id.to_string(),
            });
        }

        if let Some(missing) = step
            .prerequisites()
            .iter()
            .find(|prerequisite| !self.contains(**prerequisite))
        {
            return Err(RegistryError::UnknownPrerequisite {
                step: id.to_string(),
                prerequisite: missing.to_string(),
            });
        }

        log::trace!("Registered step {id}");
        self.steps.push(step);
        Ok(())
    }

    /// Define a group or single-step alias
    pub fn alias(&mut self, name: &str, members: &[K]) -> Result<()> {
        let name = normalize(name);

        let taken = self.aliases.iter().any(|a| a.name == name)
            || self.steps.iter().any(|s| normalize(&s.id().to_string()) == name);
        if taken {
            return Err(RegistryError::DuplicateAlias { alias: name });
        }

        if let Some(missing) = members.iter().find(|m| !self.contains(**m)) {
            return Err(RegistryError::UnknownAliasMember {
                alias: name,
                step: missing.to_string(),
            });
        }

        self.aliases.push(Alias {
            name,
            members: members.to_vec(),
        });
        Ok(())
    }

    /// Steps in registry order
    pub fn steps(&self) -> impl Iterator<Item = &dyn Step<K, M>> {
        self.steps.iter().map(|s| s.as_ref())
    }

    /// Step identifiers in registry order
    pub fn ids(&self) -> Vec<K> {
        self.steps.iter().map(|s| s.id()).collect()
    }

    /// Look up a step by identifier
    pub fn get(&self, id: K) -> Option<&dyn Step<K, M>> {
        self.steps.iter().find(|s| s.id() == id).map(|s| s.as_ref())
    }

    pub fn contains(&self, id: K) -> bool {
        self.steps.iter().any(|s| s.id() == id)
    }

    /// Label for a step, falling back to its identifier
    pub fn label(&self, id: K) -> String {
        self.get(id)
            .map_or_else(|| id.to_string(), |s| s.label().to_string())
    }

    /// Declared prerequisites of a step (empty for unknown ids)
    pub fn prerequisites_of(&self, id: K) -> &[K] {
        match self.steps.iter().find(|s| s.id() == id) {
            Some(step) => step.prerequisites(),
            None => &[],
        }
    }

    /// Registered aliases, in definition order
    pub fn aliases(&self) -> &[Alias<K>] {
        &self.aliases
    }

    /// Expand one token into the steps it names
    ///
    /// Matches step names first, then aliases. Tokens are trimmed and
    /// compared case-insensitively. Returns `None` for unknown tokens.
    pub fn expand(&self, token: &str) -> Option<Vec<K>> {
        let token = normalize(token);

        if let Some(step) = self
            .steps
            .iter()
            .find(|s| normalize(&s.id().to_string()) == token)
        {
            return Some(vec![step.id()]);
        }

        self.aliases
            .iter()
            .find(|a| a.name == token)
            .map(|a| a.members.clone())
    }

    /// Number of registered steps
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl<K: StepKey, M: ?Sized> Default for Registry<K, M> {
    fn default() -> Self {
        Self::new()
    }
}

fn normalize(token: &str) -> String {
    token.trim().to_lowercase()
}
