//! Repeats a task on a fixed cadence.
//!
//! An interval of zero runs the task once. A positive interval runs it right
//! away and then every `interval` seconds until the cancellation token fires.

use std::future::Future;
use std::time::Duration;

use subscope_common::ConfigError;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleState {
    /// Constructed, no tick fired yet.
    Idle,
    /// Waiting for or firing ticks.
    Running,
    /// No ticks remain.
    Drained,
}

pub struct Scheduler<F> {
    task: F,
    interval: Duration,
    completed: usize,
    state: ScheduleState,
}

impl<F, Fut> Scheduler<F>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ()>,
{
    /// Creates a scheduler for `task`, firing every `interval_secs` seconds.
    ///
    /// Negative intervals are rejected.
    pub fn new(task: F, interval_secs: i64) -> Result<Self, ConfigError> {
        let secs = u64::try_from(interval_secs)
            .map_err(|_| ConfigError::NegativeInterval(interval_secs))?;
        debug!(
            "Scheduled enumeration every {secs} second{}",
            if secs == 1 { "" } else { "s" }
        );

        Ok(Self {
            task,
            interval: Duration::from_secs(secs),
            completed: 0,
            state: ScheduleState::Idle,
        })
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_repeating(&self) -> bool {
        !self.interval.is_zero()
    }

    pub fn state(&self) -> ScheduleState {
        self.state
    }

    /// Number of ticks whose task ran to completion.
    pub fn completed(&self) -> usize {
        self.completed
    }

    /// Ticks still scheduled: zero once drained, otherwise the next tick.
    pub fn pending_ticks(&self) -> usize {
        match self.state {
            ScheduleState::Drained => 0,
            ScheduleState::Idle | ScheduleState::Running => 1,
        }
    }

    /// Fires ticks until none remain or `cancel` fires.
    ///
    /// A tick never starts once cancellation was requested, and a tick cut
    /// short by cancellation is not counted as completed.
    pub async fn execute(&mut self, cancel: &CancellationToken) {
        if self.state == ScheduleState::Drained {
            return;
        }
        self.state = ScheduleState::Running;

        if self.interval.is_zero() {
            if !cancel.is_cancelled() {
                self.tick(cancel).await;
            }
        } else {
            let mut ticker = tokio::time::interval(self.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => break,
                    _ = ticker.tick() => self.tick(cancel).await,
                }
            }
        }

        self.state = ScheduleState::Drained;
        info!(
            "Finished executing {} subdomain enumeration task{}",
            self.completed,
            if self.completed == 1 { "" } else { "s" }
        );
    }

    async fn tick(&mut self, cancel: &CancellationToken) {
        info!("Executing subdomain enumeration task #{}", self.completed + 1);
        (self.task)().await;
        if !cancel.is_cancelled() {
            self.completed += 1;
        }
    }
}
