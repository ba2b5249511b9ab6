use std::collections::BTreeSet;

use anyhow::Context;
use subscope_common::{ConfigError, Domain, config::Config, domain};
use subscope_core::{Enumerator, Scheduler, providers};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::commands::EnumerateArgs;
use crate::output::{FileOutput, ProgressOutput, ScreenOutput};

/// How an enumeration command ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    Aborted,
}

/// Folds the enumerate flags over the settings loaded from file.
pub fn apply_args(mut cfg: Config, args: &EnumerateArgs) -> Config {
    if let Some(concurrency) = args.concurrency {
        cfg.concurrency = concurrency;
    }
    if let Some(interval) = args.interval {
        cfg.interval = interval;
    }
    if !args.providers.is_empty() {
        cfg.providers = args.providers.clone();
    }
    if let Some(key) = &args.virustotal_api_key {
        cfg.api_keys.virustotal = Some(key.clone());
    }
    if let Some(output) = &args.output {
        cfg.output = Some(output.clone());
    }
    cfg
}

/// Collects targets from the command line and the optional targets file.
pub fn collect_targets(args: &EnumerateArgs) -> Result<BTreeSet<Domain>, ConfigError> {
    let mut targets: BTreeSet<Domain> = args.targets.iter().cloned().collect();
    if let Some(path) = &args.targets_file {
        targets.extend(domain::from_file(path)?);
    }
    if targets.is_empty() {
        return Err(ConfigError::NoTargets);
    }
    Ok(targets)
}

pub async fn enumerate(
    targets: BTreeSet<Domain>,
    cfg: &Config,
    cancel: CancellationToken,
) -> anyhow::Result<Outcome> {
    cfg.validate()?;

    let providers = providers::select(cfg).context("selecting providers")?;
    let mut enumerator =
        Enumerator::new(targets, providers, cfg.concurrency)?.with_cancellation(cancel.clone());
    if let Some(path) = &cfg.output {
        enumerator = enumerator.with_output(path);
    }
    debug!("{enumerator:?}");

    if cfg.quiet == 0 {
        enumerator.register(ProgressOutput::new());
    }
    enumerator.register(ScreenOutput::new(cfg.quiet));
    if enumerator.output().is_some() {
        enumerator.register(FileOutput);
    }

    let enumerator = &enumerator;
    let mut scheduler = Scheduler::new(
        move || async move {
            enumerator.run().await;
        },
        cfg.interval,
    )?;
    scheduler.execute(&cancel).await;

    Ok(if cancel.is_cancelled() {
        Outcome::Aborted
    } else {
        Outcome::Completed
    })
}
