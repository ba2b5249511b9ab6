use std::collections::BTreeSet;
use std::time::Duration;

use colored::*;
use subscope_common::EnumerationResult;
use subscope_core::{Enumerator, Subscriber};

use crate::sprint;
use crate::terminal::{colors, print};

/// Streams subdomains to the terminal as providers answer.
///
/// Names reported by more than one provider are printed once. The enumerator
/// delivers every provider's raw answer; hiding repeats is a display choice.
pub struct ScreenOutput {
    displayed: BTreeSet<String>,
    quiet: u8,
}

impl ScreenOutput {
    pub fn new(quiet: u8) -> Self {
        Self {
            displayed: BTreeSet::new(),
            quiet,
        }
    }

    /// Marks the names of `result` as displayed, returning those seen for
    /// the first time.
    fn unseen<'a>(&mut self, result: &'a EnumerationResult) -> Vec<&'a str> {
        result
            .subdomains
            .iter()
            .filter(|name| self.displayed.insert((*name).clone()))
            .map(String::as_str)
            .collect()
    }
}

impl Subscriber<Enumerator> for ScreenOutput {
    fn on_start(&mut self, subject: &Enumerator) -> anyhow::Result<()> {
        if self.quiet > 0 {
            return Ok(());
        }

        print::header("enumeration started", self.quiet);
        let targets: Vec<String> = subject.targets().iter().map(ToString::to_string).collect();
        print::GLOBAL_KEY_WIDTH.set("Providers".len());
        print::aligned_line("Targets", targets.join(", "));
        print::aligned_line("Providers", subject.provider_names().join(", "));
        print::aligned_line("Workers", subject.max_concurrency().to_string());
        sprint!();
        Ok(())
    }

    fn on_result(&mut self, result: &EnumerationResult) -> anyhow::Result<()> {
        for name in self.unseen(result) {
            match self.quiet {
                2.. => print::print(name),
                _ => print::subdomain(name, &result.provider),
            }
        }
        Ok(())
    }

    fn on_end(&mut self, subject: &Enumerator) -> anyhow::Result<()> {
        if self.quiet >= 2 {
            return Ok(());
        }

        let found = subject.total_unique();
        if found == 0 && self.quiet == 0 {
            print::header("zero subdomains found", self.quiet);
            print::no_results();
            return Ok(());
        }

        sprint!();
        let summary = summary(subject.targets().len(), found, subject.elapsed());
        match self.quiet {
            0 => {
                print::fat_separator();
                print::centerln(&summary);
            }
            _ => print::print_status(summary),
        }
        Ok(())
    }
}

fn summary(targets: usize, found: usize, elapsed: Duration) -> String {
    let domains: ColoredString = format!(
        "{targets} domain{}",
        if targets == 1 { "" } else { "s" }
    )
    .bold()
    .color(colors::ACCENT);
    let found: ColoredString = format!("{found} subdomains").bold().green();
    let elapsed: ColoredString = format!("{:.2}s", elapsed.as_secs_f64()).bold().yellow();
    format!("Enumerated {domains} in {elapsed}, found {found}")
}
