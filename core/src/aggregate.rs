//! Accumulated "found so far" view of every target.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use subscope_common::Domain;

/// Per-target union of every subdomain delivered so far.
///
/// Entries only ever grow. Each [`merge`](Self::merge) is applied under a
/// single lock acquisition, so readers never observe a partial union.
#[derive(Debug, Default)]
pub struct AggregateState {
    found: Mutex<BTreeMap<Domain, BTreeSet<String>>>,
}

impl AggregateState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unions `subdomains` into the entry for `target`, creating it if absent.
    ///
    /// Returns how many names were not known before.
    pub fn merge(&self, target: &Domain, subdomains: &BTreeSet<String>) -> usize {
        let mut found = self.lock();
        let entry = found.entry(target.clone()).or_default();
        let before = entry.len();
        entry.extend(subdomains.iter().cloned());
        entry.len() - before
    }

    /// Copy of the subdomains known for `target`.
    pub fn get(&self, target: &Domain) -> BTreeSet<String> {
        self.lock().get(target).cloned().unwrap_or_default()
    }

    /// Consistent copy of the whole state.
    pub fn snapshot(&self) -> BTreeMap<Domain, BTreeSet<String>> {
        self.lock().clone()
    }

    /// Number of distinct subdomains across all targets.
    pub fn total_unique(&self) -> usize {
        let found = self.lock();
        let all: BTreeSet<&String> = found.values().flatten().collect();
        all.len()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<Domain, BTreeSet<String>>> {
        self.found.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
