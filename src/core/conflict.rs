//! Binding conflict detection
//!
//! Two bindings conflict when they share a signature
//! (`input type`, `key`, `modifiers`) and neither is the unbound `key == 0`
//! placeholder. Conflicts are a reporting concern only: the engine keeps
//! matching conflicting bindings (the first enabled one in profile order
//! wins), so callers surface them to the user rather than refusing them.
//!
//! Grouping is keyed by a `BTreeMap`, so the resulting partition and its
//! iteration order do not depend on the order bindings were supplied in.
//!
//! # Performance
//! - Add binding: O(log n)
//! - Check conflict: O(log n)
//! - List all conflicts: O(n) where n = number of unique signatures

use std::collections::BTreeMap;

use crate::core::types::{Binding, Signature};

/// Groups bindings by signature, keeping only groups of two or more.
///
/// Unbound (`key == 0`) bindings are ignored entirely.
pub fn detect_conflicts<'a, I>(bindings: I) -> BTreeMap<Signature, Vec<&'a Binding>>
where
    I: IntoIterator<Item = &'a Binding>,
{
    let mut groups: BTreeMap<Signature, Vec<&'a Binding>> = BTreeMap::new();
    for binding in bindings.into_iter().filter(|b| b.is_bound()) {
        groups.entry(binding.signature()).or_default().push(binding);
    }
    groups.retain(|_, group| group.len() > 1);
    groups
}

/// True if some *other* bound binding in `all` shares this binding's signature.
///
/// "Other" is reference identity: a binding never conflicts with itself,
/// but two distinct bindings with identical fields do conflict.
pub fn has_conflict<'a, I>(binding: &Binding, all: I) -> bool
where
    I: IntoIterator<Item = &'a Binding>,
{
    if !binding.is_bound() {
        return false;
    }
    let signature = binding.signature();
    all.into_iter()
        .any(|other| !std::ptr::eq(other, binding) && other.is_bound() && other.signature() == signature)
}

/// Every other bound binding in `all` sharing this binding's signature.
pub fn get_conflicting_bindings<'a, I>(binding: &Binding, all: I) -> Vec<&'a Binding>
where
    I: IntoIterator<Item = &'a Binding>,
{
    if !binding.is_bound() {
        return Vec::new();
    }
    let signature = binding.signature();
    all.into_iter()
        .filter(|other| !std::ptr::eq(*other, binding) && other.is_bound() && other.signature() == signature)
        .collect()
}

/// Owned conflict index for reporting across a whole profile.
///
/// Uses a BTreeMap where keys are signatures and values are vectors of all
/// bindings using that signature. A conflict exists when any vector has
/// length > 1.
pub struct ConflictDetector {
    /// Maps Signature to all bound bindings using it.
    bindings: BTreeMap<Signature, Vec<Binding>>,
    /// Bindings skipped because they are unbound.
    unbound: usize,
}

/// Represents a detected conflict between bindings.
#[derive(Clone, Debug, PartialEq)]
pub struct Conflict {
    /// The signature that has conflicts
    pub signature: Signature,

    /// All bindings using this signature (always 2 or more)
    pub conflicting_bindings: Vec<Binding>,
}

impl ConflictDetector {
    /// Creates a new empty conflict detector.
    pub fn new() -> Self {
        Self {
            bindings: BTreeMap::new(),
            unbound: 0,
        }
    }

    /// Builds a detector from every binding in the iterator.
    pub fn from_bindings<'a, I>(bindings: I) -> Self
    where
        I: IntoIterator<Item = &'a Binding>,
    {
        let mut detector = Self::new();
        for binding in bindings {
            detector.add_binding(binding.clone());
        }
        detector
    }

    /// Adds a binding to the detector. Unbound bindings are counted but not indexed.
    pub fn add_binding(&mut self, binding: Binding) {
        if !binding.is_bound() {
            self.unbound += 1;
            return;
        }
        self.bindings
            .entry(binding.signature())
            .or_default()
            .push(binding);
    }

    /// Finds all conflicts (signatures with 2 or more bindings), ordered by signature.
    pub fn find_conflicts(&self) -> Vec<Conflict> {
        self.bindings
            .iter()
            .filter(|(_, bindings)| bindings.len() > 1)
            .map(|(signature, bindings)| Conflict {
                signature: *signature,
                conflicting_bindings: bindings.clone(),
            })
            .collect()
    }

    /// Checks if a specific signature has conflicts.
    pub fn has_conflict(&self, signature: &Signature) -> bool {
        self.bindings
            .get(signature)
            .map(|bindings| bindings.len() > 1)
            .unwrap_or(false)
    }

    /// Returns the total number of bindings seen, bound or not.
    pub fn total_bindings(&self) -> usize {
        self.bindings.values().map(|v| v.len()).sum::<usize>() + self.unbound
    }
}

impl Default for ConflictDetector {
    fn default() -> Self {
        Self::new()
    }
}
