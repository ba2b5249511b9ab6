use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::Context;
use subscope_common::EnumerationResult;
use subscope_core::{AggregateState, Enumerator, Subscriber};
use tracing::info;

/// Writes every known subdomain to the enumerator's output path when a run
/// ends. Scheduled runs rewrite the file with the accumulated set.
pub struct FileOutput;

impl Subscriber<Enumerator> for FileOutput {
    fn on_result(&mut self, _result: &EnumerationResult) -> anyhow::Result<()> {
        Ok(())
    }

    fn on_end(&mut self, subject: &Enumerator) -> anyhow::Result<()> {
        let path = subject
            .output()
            .context("no output path configured")?;
        let written = write_results(path, subject.found())?;
        info!("Enumeration results ({written} subdomains) successfully written to {}", path.display());
        Ok(())
    }
}

/// Writes the sorted, de-duplicated names of `found` to `path`, one per line.
fn write_results(path: &Path, found: &AggregateState) -> anyhow::Result<usize> {
    let names: BTreeSet<String> = found.snapshot().into_values().flatten().collect();

    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    for name in &names {
        writeln!(writer, "{name}")?;
    }
    writer
        .flush()
        .with_context(|| format!("writing {}", path.display()))?;

    Ok(names.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use subscope_common::Domain;

    fn set(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn writes_sorted_unique_names() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("subdomains.txt");
        let found = AggregateState::new();
        let com: Domain = "example.com".parse().unwrap();
        let org: Domain = "example.org".parse().unwrap();
        found.merge(&com, &set(&["www.example.com", "api.example.com"]));
        found.merge(&org, &set(&["mail.example.org"]));

        let written = write_results(&path, &found).unwrap();

        assert_eq!(written, 3);
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "api.example.com\nmail.example.org\nwww.example.com\n"
        );
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope").join("out.txt");
        assert!(write_results(&path, &AggregateState::new()).is_err());
    }
}
