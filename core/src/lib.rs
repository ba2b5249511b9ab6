//! # Subscope Core
//!
//! The concurrent enumeration engine.
//!
//! * **[`enumerator`]**: bounded fan-out over every (provider, target) pair.
//! * **[`publisher`]**: subscriber registry that streams results as they land.
//! * **[`aggregate`]**: per-target union of everything found so far.
//! * **[`scheduler`]**: re-runs an enumeration on a fixed interval.
//! * **[`provider`]** / **[`providers`]**: the data source contract and the
//!   bundled HTTP clients.
//!
//! High-level code should depend on the [`provider::Provider`] and
//! [`publisher::Subscriber`] traits rather than on concrete clients or sinks.

pub mod aggregate;
pub mod enumerator;
pub mod provider;
pub mod providers;
pub mod publisher;
pub mod scheduler;

pub use aggregate::AggregateState;
pub use enumerator::{Enumerator, RunGuard, RunReport};
pub use provider::{Provider, ProviderError};
pub use publisher::{Publisher, Subscriber, SubscriberId};
pub use scheduler::{ScheduleState, Scheduler};
