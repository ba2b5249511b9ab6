//! # Subdomain Enumerator
//!
//! Runs one enumeration pass: every (provider, target) pair is queried on a
//! worker pool capped at the configured concurrency, each successful answer is
//! merged into the [`AggregateState`] and pushed to every subscriber as soon as
//! it completes.
//!
//! A pass is bracketed by [`Enumerator::begin`], which fires the subscribers'
//! start hooks and returns a [`RunGuard`]. Dropping the guard fires the end
//! hooks, so they run exactly once on every exit path: normal completion,
//! cancellation, an early `?` return or a panic.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use subscope_common::{ConfigError, Domain, EnumerationResult};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::aggregate::AggregateState;
use crate::provider::{Provider, ProviderError};
use crate::publisher::{Publisher, Subscriber, SubscriberId};

/// Counters describing how a call to [`Enumerator::execute`] went.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Tasks handed to the pool.
    pub dispatched: usize,
    /// Tasks whose result was merged and published.
    pub succeeded: usize,
    /// Tasks whose provider call failed or whose worker panicked.
    pub failed: usize,
    /// In-flight tasks dropped because the run was cancelled.
    pub abandoned: usize,
    pub cancelled: bool,
}

#[derive(Debug, Default)]
struct Timing {
    started: Option<Instant>,
    elapsed: Option<Duration>,
}

/// A failed (provider, target) task, kept only long enough to be logged.
struct TaskFailure {
    provider: String,
    target: Domain,
    error: ProviderError,
}

pub struct Enumerator {
    targets: BTreeSet<Domain>,
    providers: Vec<Arc<dyn Provider>>,
    max_concurrency: usize,
    output: Option<PathBuf>,
    found: AggregateState,
    publisher: Publisher<Enumerator>,
    timing: Mutex<Timing>,
    cancel: CancellationToken,
}

impl std::fmt::Debug for Enumerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Enumerator")
            .field("targets", &self.targets)
            .field("providers", &self.provider_names())
            .field("max_concurrency", &self.max_concurrency)
            .field("output", &self.output)
            .finish_non_exhaustive()
    }
}

impl Enumerator {
    /// Creates an enumerator over the given targets and providers.
    ///
    /// Duplicate targets collapse into one, and providers sharing a name keep
    /// only their first occurrence.
    pub fn new<T, P>(targets: T, providers: P, max_concurrency: usize) -> Result<Self, ConfigError>
    where
        T: IntoIterator<Item = Domain>,
        P: IntoIterator<Item = Arc<dyn Provider>>,
    {
        let targets: BTreeSet<Domain> = targets.into_iter().collect();
        if targets.is_empty() {
            return Err(ConfigError::NoTargets);
        }

        let mut names = BTreeSet::new();
        let providers: Vec<Arc<dyn Provider>> = providers
            .into_iter()
            .filter(|provider| names.insert(provider.name().to_string()))
            .collect();
        if providers.is_empty() {
            return Err(ConfigError::NoProviders);
        }

        if max_concurrency == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }

        Ok(Self {
            targets,
            providers,
            max_concurrency,
            output: None,
            found: AggregateState::new(),
            publisher: Publisher::new(),
            timing: Mutex::new(Timing::default()),
            cancel: CancellationToken::new(),
        })
    }

    /// Attaches the path output subscribers should write to.
    ///
    /// The enumerator itself never touches it.
    pub fn with_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output = Some(path.into());
        self
    }

    /// Uses `token` to stop dispatching and abandon in-flight queries.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn targets(&self) -> &BTreeSet<Domain> {
        &self.targets
    }

    pub fn providers(&self) -> &[Arc<dyn Provider>] {
        &self.providers
    }

    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|provider| provider.name()).collect()
    }

    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    pub fn output(&self) -> Option<&Path> {
        self.output.as_deref()
    }

    /// Number of (provider, target) pairs a full pass dispatches.
    pub fn task_count(&self) -> usize {
        self.targets.len() * self.providers.len()
    }

    pub fn found(&self) -> &AggregateState {
        &self.found
    }

    pub fn total_unique(&self) -> usize {
        self.found.total_unique()
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Wall-clock duration of the current pass, or of the last finished one.
    pub fn elapsed(&self) -> Duration {
        let timing = self.timing();
        match (timing.elapsed, timing.started) {
            (Some(elapsed), _) => elapsed,
            (None, Some(started)) => started.elapsed(),
            (None, None) => Duration::ZERO,
        }
    }

    pub fn register<T>(&self, subscriber: T) -> SubscriberId
    where
        T: Subscriber<Enumerator> + 'static,
    {
        self.publisher.register(subscriber)
    }

    /// Detaches a subscriber. Unknown ids are ignored.
    pub fn unregister(&self, id: SubscriberId) -> bool {
        self.publisher.unregister(id)
    }

    /// Starts a pass: records the start time and fires every start hook.
    ///
    /// The end hooks fire when the returned guard is dropped.
    pub fn begin(&self) -> RunGuard<'_> {
        let started = Instant::now();
        {
            let mut timing = self.timing();
            timing.started = Some(started);
            timing.elapsed = None;
        }
        info!(
            "Enumerating {} targets with {} providers ({} workers)",
            self.targets.len(),
            self.providers.len(),
            self.max_concurrency
        );
        self.publisher.notify_start(self);
        RunGuard {
            enumerator: self,
            started,
        }
    }

    /// Convenience for a bracketed pass: [`begin`](Self::begin) followed by
    /// [`execute`](Self::execute).
    pub async fn run(&self) -> RunReport {
        let _run = self.begin();
        self.execute().await
    }

    /// Queries every (provider, target) pair with at most `max_concurrency`
    /// calls in flight, returning once the pool has drained.
    ///
    /// Results are merged and published in completion order. Provider failures
    /// are logged and counted but never stop sibling tasks. On cancellation no
    /// further task is dispatched and in-flight tasks are abandoned.
    pub async fn execute(&self) -> RunReport {
        let mut report = RunReport::default();
        let mut pending = self.tasks();
        let mut pool: JoinSet<Result<EnumerationResult, TaskFailure>> = JoinSet::new();

        loop {
            while pool.len() < self.max_concurrency && !self.cancel.is_cancelled() {
                let Some((provider, target)) = pending.next() else {
                    break;
                };
                report.dispatched += 1;
                pool.spawn(query(provider, target));
            }

            let joined = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    report.cancelled = true;
                    break;
                }
                joined = pool.join_next() => joined,
            };

            let Some(joined) = joined else {
                break;
            };

            match joined {
                Ok(Ok(result)) => {
                    let new = self.found.merge(&result.domain, &result.subdomains);
                    debug!(
                        "{} returned {} subdomains for {} ({new} new)",
                        result.provider,
                        result.len(),
                        result.domain
                    );
                    self.publisher.notify_result(&result);
                    report.succeeded += 1;
                }
                Ok(Err(failure)) => {
                    warn!(
                        "{} failed for {}: {}",
                        failure.provider, failure.target, failure.error
                    );
                    report.failed += 1;
                }
                Err(e) => {
                    warn!("Enumeration worker terminated abnormally: {e}");
                    report.failed += 1;
                }
            }
        }

        if report.cancelled {
            report.abandoned = pool.len();
            pool.abort_all();
            warn!(
                "Enumeration cancelled, {} queries abandoned and {} never dispatched",
                report.abandoned,
                self.task_count() - report.dispatched
            );
        }

        report
    }

    /// Lazily yields every (provider, target) pair, target by target.
    fn tasks(&self) -> impl Iterator<Item = (Arc<dyn Provider>, Domain)> + '_ {
        self.targets.iter().flat_map(move |target| {
            self.providers
                .iter()
                .map(move |provider| (provider.clone(), target.clone()))
        })
    }

    fn timing(&self) -> MutexGuard<'_, Timing> {
        self.timing.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

async fn query(provider: Arc<dyn Provider>, target: Domain) -> Result<EnumerationResult, TaskFailure> {
    match provider.fetch_subdomains(&target).await {
        Ok(subdomains) => Ok(EnumerationResult::new(provider.name(), target, subdomains)),
        Err(error) => Err(TaskFailure {
            provider: provider.name().to_string(),
            target,
            error,
        }),
    }
}

/// Scope of a single enumeration pass.
///
/// Dropping it stores the elapsed time and fires every subscriber's end hook.
#[must_use = "dropping the guard immediately ends the run"]
pub struct RunGuard<'a> {
    enumerator: &'a Enumerator,
    started: Instant,
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        let elapsed = self.started.elapsed();
        self.enumerator.timing().elapsed = Some(elapsed);
        info!(
            "Enumeration pass finished in {:.2}s with {} unique subdomains",
            elapsed.as_secs_f64(),
            self.enumerator.total_unique()
        );
        self.enumerator.publisher.notify_end(self.enumerator);
    }
}
