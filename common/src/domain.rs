//! # Enumeration Target Model
//!
//! Defines the inputs accepted for a subdomain enumeration.
//!
//! A target is a registrable domain name such as `example.com`. Targets may be
//! given one at a time, as a comma separated list (`a.com,b.org`) or as a file
//! holding one domain per line.

use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use tracing::debug;

use crate::error::ConfigError;

const MAX_DOMAIN_LEN: usize = 253;
const MAX_LABEL_LEN: usize = 63;

/// A validated, lower-cased domain name.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Domain(String);

impl Domain {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if `name` is a strict subdomain of this domain.
    pub fn is_parent_of(&self, name: &str) -> bool {
        name.len() > self.0.len() + 1
            && name.ends_with(self.0.as_str())
            && name.as_bytes()[name.len() - self.0.len() - 1] == b'.'
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Domain {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for Domain {
    type Err = ConfigError;

    /// Parses a single domain name.
    ///
    /// Surrounding whitespace and a trailing root dot are ignored, the name is
    /// lower-cased, and every label must be 1 to 63 characters of `[a-z0-9-]`
    /// without a leading or trailing hyphen.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s.trim().trim_end_matches('.').to_ascii_lowercase();
        let invalid = |reason: &str| ConfigError::InvalidDomain {
            domain: s.trim().to_string(),
            reason: reason.to_string(),
        };

        if normalized.is_empty() {
            return Err(invalid("empty domain"));
        }
        if normalized.len() > MAX_DOMAIN_LEN {
            return Err(invalid("longer than 253 characters"));
        }

        let labels: Vec<&str> = normalized.split('.').collect();
        if labels.len() < 2 {
            return Err(invalid("at least two labels are required"));
        }

        for label in labels {
            if label.is_empty() || label.len() > MAX_LABEL_LEN {
                return Err(invalid("labels must be 1 to 63 characters long"));
            }
            if label.starts_with('-') || label.ends_with('-') {
                return Err(invalid("labels cannot start or end with a hyphen"));
            }
            if !label.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-') {
                return Err(invalid("labels may only contain letters, digits and hyphens"));
            }
        }

        Ok(Self(normalized))
    }
}

/// Parses a comma separated list of domains into a de-duplicated set.
pub fn parse_commas(s: &str) -> Result<BTreeSet<Domain>, ConfigError> {
    s.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(Domain::from_str)
        .collect()
}

/// Reads targets from a file holding one domain per line.
///
/// Blank lines and lines starting with `#` are skipped.
pub fn from_file(path: &Path) -> Result<BTreeSet<Domain>, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::TargetsFile {
        path: path.to_path_buf(),
        source,
    })?;

    let targets = contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(Domain::from_str)
        .collect::<Result<BTreeSet<_>, _>>()?;
    debug!("Read {} targets from {}", targets.len(), path.display());
    Ok(targets)
}
