use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use subscope_common::{Domain, EnumerationResult};
use subscope_core::{Enumerator, Provider, ProviderError, Subscriber};

/// A provider that answers with a fixed list of full names after a delay.
pub struct StaticProvider {
    name: String,
    names: Vec<String>,
    delay: Duration,
}

impl StaticProvider {
    pub fn new(name: &str, names: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            names: names.iter().map(|n| n.to_string()).collect(),
            delay: Duration::ZERO,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn shared(self) -> Arc<dyn Provider> {
        Arc::new(self)
    }
}

#[async_trait]
impl Provider for StaticProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch_subdomains(&self, _domain: &Domain) -> Result<BTreeSet<String>, ProviderError> {
        tokio::time::sleep(self.delay).await;
        Ok(self.names.iter().cloned().collect())
    }
}

/// A provider that always fails as if its quota were spent.
pub struct ExhaustedProvider;

#[async_trait]
impl Provider for ExhaustedProvider {
    fn name(&self) -> &str {
        "exhausted"
    }

    async fn fetch_subdomains(&self, _domain: &Domain) -> Result<BTreeSet<String>, ProviderError> {
        Err(ProviderError::QuotaExceeded {
            provider: self.name().to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Start { targets: usize, providers: usize },
    Result(EnumerationResult),
    End { unique: usize },
}

/// Subscriber that records everything it is told.
#[derive(Clone, Default)]
pub struct Recorder {
    events: Arc<Mutex<Vec<Event>>>,
}

impl Recorder {
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn results(&self) -> Vec<EnumerationResult> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                Event::Result(result) => Some(result),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }
}

impl Subscriber<Enumerator> for Recorder {
    fn on_start(&mut self, subject: &Enumerator) -> anyhow::Result<()> {
        self.push(Event::Start {
            targets: subject.targets().len(),
            providers: subject.providers().len(),
        });
        Ok(())
    }

    fn on_result(&mut self, result: &EnumerationResult) -> anyhow::Result<()> {
        self.push(Event::Result(result.clone()));
        Ok(())
    }

    fn on_end(&mut self, subject: &Enumerator) -> anyhow::Result<()> {
        self.push(Event::End {
            unique: subject.total_unique(),
        });
        Ok(())
    }
}

pub fn domain(name: &str) -> Domain {
    name.parse().unwrap()
}
