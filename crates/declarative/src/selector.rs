//! Selector - turns operator tokens into the set of steps to run
//!
//! Resolution order:
//! 1. Expand include tokens (all steps when none were given)
//! 2. Close the include set over prerequisites
//! 3. Remove everything named by exclude tokens
//! 4. Drop steps whose prerequisites were removed in step 3

use std::collections::BTreeSet;

use crate::error::SelectError;
use crate::registry::Registry;
use crate::step::StepKey;

/// Sugar flag that injects a single token into the request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegacyAlias {
    /// Behaves like `--only=<token>`
    Only(&'static str),
    /// Behaves like `--skip=<token>`
    Skip(&'static str),
}

/// Raw operator input, before expansion
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionRequest {
    pub include: Vec<String>,
    pub exclude: Vec<String>,
}

impl SelectionRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add comma-separated include tokens
    pub fn only(mut self, tokens: &str) -> Self {
        self.include.extend(split_tokens(tokens));
        self
    }

    /// Add comma-separated exclude tokens
    pub fn skip(mut self, tokens: &str) -> Self {
        self.exclude.extend(split_tokens(tokens));
        self
    }

    /// Fold legacy flags into the token lists
    pub fn legacy(mut self, aliases: impl IntoIterator<Item = LegacyAlias>) -> Self {
        for alias in aliases {
            match alias {
                LegacyAlias::Only(token) => self.include.push(token.to_string()),
                LegacyAlias::Skip(token) => self.exclude.push(token.to_string()),
            }
        }
        self
    }

    /// Whether the operator narrowed the run explicitly
    pub fn is_explicit(&self) -> bool {
        !self.include.is_empty()
    }
}

/// Split a comma-separated token list, dropping blanks
pub fn split_tokens(tokens: &str) -> impl Iterator<Item = String> + '_ {
    tokens
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

/// A step dropped because one of its prerequisites was excluded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pruned<K> {
    pub step: K,
    pub missing: K,
}

/// Final, closed and exclusion-filtered selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection<K: Ord> {
    selected: BTreeSet<K>,
    excluded: BTreeSet<K>,
    forced: BTreeSet<K>,
    pruned: Vec<Pruned<K>>,
}

impl<K: StepKey> Selection<K> {
    /// Steps that will be probed
    pub fn selected(&self) -> &BTreeSet<K> {
        &self.selected
    }

    /// Expansion of the exclude tokens, before any filtering
    pub fn excluded(&self) -> &BTreeSet<K> {
        &self.excluded
    }

    /// Steps the operator asked for by name or group
    pub fn forced(&self) -> &BTreeSet<K> {
        &self.forced
    }

    /// Steps dropped because an excluded prerequisite cut their chain
    pub fn pruned(&self) -> &[Pruned<K>] {
        &self.pruned
    }

    pub fn is_selected(&self, id: K) -> bool {
        self.selected.contains(&id)
    }

    pub fn is_excluded(&self, id: K) -> bool {
        self.excluded.contains(&id)
    }

    pub fn is_forced(&self, id: K) -> bool {
        self.forced.contains(&id)
    }
}

/// Resolve a request against the registry
///
/// Fails on the first unknown token; nothing is selected in that case.
pub fn resolve<K: StepKey, M: ?Sized>(
    registry: &Registry<K, M>,
    request: &SelectionRequest,
) -> Result<Selection<K>, SelectError> {
    let include = if request.is_explicit() {
        expand_all(registry, &request.include)?
    } else {
        registry.ids().into_iter().collect()
    };
    let excluded = expand_all(registry, &request.exclude)?;

    let closed = close_over_prerequisites(registry, &include);
    let mut selected: BTreeSet<K> = closed.difference(&excluded).copied().collect();

    // Registry order puts prerequisites first, so one pass settles chains.
    let mut pruned = Vec::new();
    for id in registry.ids() {
        if !selected.contains(&id) {
            continue;
        }
        if let Some(missing) = registry
            .prerequisites_of(id)
            .iter()
            .find(|p| !selected.contains(*p))
        {
            log::debug!("Dropping {id}: prerequisite {missing} is not selected");
            pruned.push(Pruned {
                step: id,
                missing: *missing,
            });
            selected.remove(&id);
        }
    }

    let forced = if request.is_explicit() {
        include.intersection(&selected).copied().collect()
    } else {
        BTreeSet::new()
    };

    Ok(Selection {
        selected,
        excluded,
        forced,
        pruned,
    })
}

/// Add every transitive prerequisite to a set of steps
///
/// The result is a fixed point: closing it again adds nothing.
pub fn close_over_prerequisites<K: StepKey, M: ?Sized>(
    registry: &Registry<K, M>,
    steps: &BTreeSet<K>,
) -> BTreeSet<K> {
    let mut closed = steps.clone();
    let mut pending: Vec<K> = steps.iter().copied().collect();

    while let Some(id) = pending.pop() {
        for prerequisite in registry.prerequisites_of(id) {
            if closed.insert(*prerequisite) {
                pending.push(*prerequisite);
            }
        }
    }

    closed
}

fn expand_all<K: StepKey, M: ?Sized>(
    registry: &Registry<K, M>,
    tokens: &[String],
) -> Result<BTreeSet<K>, SelectError> {
    let mut expanded = BTreeSet::new();
    for token in tokens {
        let members = registry
            .expand(token)
            .ok_or_else(|| SelectError::UnknownSection {
                token: token.clone(),
            })?;
        expanded.extend(members);
    }
    Ok(expanded)
}
