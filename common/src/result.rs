use std::collections::BTreeSet;

use crate::domain::Domain;

/// The outcome of querying one provider about one target.
///
/// Produced once per successful (provider, target) task. The value is never
/// mutated after creation; subscribers only ever see it by reference.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnumerationResult {
    pub provider: String,
    pub domain: Domain,
    pub subdomains: BTreeSet<String>,
}

impl EnumerationResult {
    pub fn new(provider: impl Into<String>, domain: Domain, subdomains: BTreeSet<String>) -> Self {
        Self {
            provider: provider.into(),
            domain,
            subdomains,
        }
    }

    pub fn len(&self) -> usize {
        self.subdomains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subdomains.is_empty()
    }
}
