#![cfg(test)]
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use subscope_common::{ConfigError, Domain};
use subscope_core::{Enumerator, Provider, ProviderError, Scheduler};
use subscope_integration_tests::mock::{domain, Event, ExhaustedProvider, Recorder, StaticProvider};
use tokio_util::sync::CancellationToken;

fn names(list: &[&str]) -> BTreeSet<String> {
    list.iter().map(|n| n.to_string()).collect()
}

/// Two providers with overlapping answers for a single target: the aggregate
/// holds the union while the subscriber sees each provider's raw answer.
#[tokio::test]
async fn overlapping_providers_merge_into_one_set() {
    let providers = vec![
        StaticProvider::new("alpha", &["a.example.com", "b.example.com"]).shared(),
        StaticProvider::new("beta", &["b.example.com", "c.example.com"]).shared(),
    ];
    let enumerator = Enumerator::new([domain("example.com")], providers, 4).unwrap();
    let recorder = Recorder::default();
    enumerator.register(recorder.clone());

    let report = enumerator.run().await;

    assert_eq!(report.succeeded, 2);
    assert_eq!(report.failed, 0);
    assert!(!report.cancelled);
    assert_eq!(
        enumerator.found().get(&domain("example.com")),
        names(&["a.example.com", "b.example.com", "c.example.com"])
    );

    let results = recorder.results();
    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|result| result.len() == 2));

    let events = recorder.events();
    assert_eq!(events.first(), Some(&Event::Start { targets: 1, providers: 2 }));
    assert_eq!(events.last(), Some(&Event::End { unique: 3 }));
}

#[tokio::test]
async fn every_provider_target_pair_is_queried() {
    let targets = [domain("example.com"), domain("example.org"), domain("example.net")];
    let providers = vec![
        StaticProvider::new("alpha", &["www.example.com"]).shared(),
        StaticProvider::new("beta", &["mail.example.com"]).shared(),
    ];
    let enumerator = Enumerator::new(targets, providers, 2).unwrap();
    let recorder = Recorder::default();
    enumerator.register(recorder.clone());

    let report = enumerator.run().await;

    assert_eq!(enumerator.task_count(), 6);
    assert_eq!(report.dispatched, 6);
    let pairs: BTreeSet<(String, Domain)> = recorder
        .results()
        .into_iter()
        .map(|result| (result.provider, result.domain))
        .collect();
    assert_eq!(pairs.len(), 6);
}

#[tokio::test]
async fn failing_provider_does_not_stop_the_others() {
    let providers = vec![
        Arc::new(ExhaustedProvider) as Arc<dyn Provider>,
        StaticProvider::new("alpha", &["www.example.com"]).shared(),
    ];
    let targets = [domain("example.com"), domain("example.org")];
    let enumerator = Enumerator::new(targets, providers, 3).unwrap();
    let recorder = Recorder::default();
    enumerator.register(recorder.clone());

    let report = enumerator.run().await;

    assert_eq!(report.failed, 2);
    assert_eq!(report.succeeded, 2);
    assert!(recorder.results().iter().all(|result| result.provider == "alpha"));
    assert!(matches!(recorder.events().last(), Some(Event::End { .. })));
}

/// Records how many queries overlap.
#[derive(Default)]
struct GaugedProvider {
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

#[async_trait]
impl Provider for GaugedProvider {
    fn name(&self) -> &str {
        "gauged"
    }

    async fn fetch_subdomains(&self, _domain: &Domain) -> Result<BTreeSet<String>, ProviderError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(20)).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(BTreeSet::new())
    }
}

#[tokio::test(start_paused = true)]
async fn worker_limit_caps_queries_in_flight() {
    let gauge = Arc::new(GaugedProvider::default());
    let targets = ["a.com", "b.com", "c.com", "d.com", "e.com", "f.com"].map(domain);
    let enumerator =
        Enumerator::new(targets, [gauge.clone() as Arc<dyn Provider>], 2).unwrap();

    let report = enumerator.run().await;

    assert_eq!(report.succeeded, 6);
    assert_eq!(gauge.peak.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn zero_interval_runs_exactly_once() {
    let enumerator = Enumerator::new(
        [domain("example.com")],
        [StaticProvider::new("alpha", &["www.example.com"]).shared()],
        1,
    )
    .unwrap();
    let recorder = Recorder::default();
    enumerator.register(recorder.clone());

    let subject = &enumerator;
    let mut scheduler = Scheduler::new(
        move || async move {
            subject.run().await;
        },
        0,
    )
    .unwrap();
    scheduler.execute(&CancellationToken::new()).await;

    assert_eq!(scheduler.completed(), 1);
    let ends = recorder
        .events()
        .iter()
        .filter(|event| matches!(event, Event::End { .. }))
        .count();
    assert_eq!(ends, 1);
}

#[tokio::test(start_paused = true)]
async fn scheduled_runs_repeat_until_cancelled() {
    let enumerator = Enumerator::new(
        [domain("example.com")],
        [StaticProvider::new("alpha", &["www.example.com", "api.example.com"]).shared()],
        1,
    )
    .unwrap();
    let recorder = Recorder::default();
    enumerator.register(recorder.clone());
    let cancel = CancellationToken::new();

    let subject = &enumerator;
    let mut scheduler = Scheduler::new(
        move || async move {
            subject.run().await;
        },
        60,
    )
    .unwrap();

    // Ticks land at 0s, 60s and 120s.
    tokio::join!(scheduler.execute(&cancel), async {
        tokio::time::sleep(Duration::from_secs(150)).await;
        cancel.cancel();
    });

    assert_eq!(scheduler.completed(), 3);
    assert_eq!(scheduler.pending_ticks(), 0);
    assert_eq!(recorder.results().len(), 3);
    assert_eq!(enumerator.total_unique(), 2);
}

#[tokio::test(start_paused = true)]
async fn cancellation_abandons_slow_queries() {
    let cancel = CancellationToken::new();
    let enumerator = Enumerator::new(
        [domain("example.com"), domain("example.org")],
        [StaticProvider::new("slow", &["www.example.com"])
            .delayed(Duration::from_secs(10))
            .shared()],
        1,
    )
    .unwrap()
    .with_cancellation(cancel.clone());
    let recorder = Recorder::default();
    enumerator.register(recorder.clone());

    let (report, ()) = tokio::join!(enumerator.run(), async {
        tokio::time::sleep(Duration::from_secs(1)).await;
        cancel.cancel();
    });

    assert!(report.cancelled);
    assert_eq!(report.dispatched, 1);
    assert_eq!(report.abandoned, 1);
    assert!(recorder.results().is_empty());
    assert_eq!(recorder.events().last(), Some(&Event::End { unique: 0 }));
}

#[test]
fn invalid_inputs_are_rejected() {
    let provider = || StaticProvider::new("alpha", &[]).shared();

    let no_targets = Enumerator::new(Vec::<Domain>::new(), [provider()], 1);
    assert!(matches!(no_targets, Err(ConfigError::NoTargets)));

    let no_providers = Enumerator::new([domain("example.com")], Vec::<Arc<dyn Provider>>::new(), 1);
    assert!(matches!(no_providers, Err(ConfigError::NoProviders)));

    let no_workers = Enumerator::new([domain("example.com")], [provider()], 0);
    assert!(matches!(no_workers, Err(ConfigError::ZeroConcurrency)));

    let backwards = Scheduler::new(|| async {}, -1);
    assert!(matches!(backwards, Err(ConfigError::NegativeInterval(-1))));
}
