use colored::*;
use subscope_common::EnumerationResult;
use subscope_core::{Enumerator, Subscriber};

use crate::terminal::spinner;

/// Keeps the spinner message in step with the run.
#[derive(Default)]
pub struct ProgressOutput {
    answered: usize,
    total: usize,
    names: usize,
}

impl ProgressOutput {
    pub fn new() -> Self {
        Self::default()
    }

    fn message(&self) -> String {
        format!(
            "{}/{} queries answered, {} names received... (Ctrl-C to stop early)",
            self.answered.to_string().green().bold(),
            self.total,
            self.names.to_string().green().bold()
        )
    }
}

impl Subscriber<Enumerator> for ProgressOutput {
    fn on_start(&mut self, subject: &Enumerator) -> anyhow::Result<()> {
        self.answered = 0;
        self.names = 0;
        self.total = subject.task_count();
        spinner::start(self.message());
        Ok(())
    }

    fn on_result(&mut self, result: &EnumerationResult) -> anyhow::Result<()> {
        self.answered += 1;
        self.names += result.len();
        spinner::set_message(self.message());
        Ok(())
    }

    fn on_end(&mut self, _subject: &Enumerator) -> anyhow::Result<()> {
        spinner::stop();
        Ok(())
    }
}
