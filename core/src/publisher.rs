//! One-to-many delivery of enumeration results with start/end bracketing.
//!
//! The [`Publisher`] owns an ordered list of [`Subscriber`]s. Every result is
//! pushed through all of them, in registration order, before the call returns.
//!
//! Registration and removal never wait on delivery. They are staged in a
//! separate list and folded into the delivery list at the start of the next
//! notification, while removals are also checked before every hook. A
//! subscriber may therefore detach itself or others from inside a hook, and
//! once `unregister` returns the removed subscriber sees no further event.
//!
//! Failing subscribers are isolated: an `Err` or a panic from a hook is logged
//! and the remaining subscribers are still notified. The run is never aborted
//! on their behalf.

use std::collections::HashSet;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use subscope_common::EnumerationResult;
use tracing::{debug, warn};

/// Receives results and lifecycle events from a [`Publisher`].
///
/// `S` is the subject handed to the lifecycle hooks, so subscribers can read
/// whatever configuration or totals they need for their own messages.
pub trait Subscriber<S: ?Sized>: Send {
    fn on_start(&mut self, _subject: &S) -> anyhow::Result<()> {
        Ok(())
    }

    fn on_result(&mut self, result: &EnumerationResult) -> anyhow::Result<()>;

    fn on_end(&mut self, _subject: &S) -> anyhow::Result<()> {
        Ok(())
    }

    /// Label used when logging this subscriber's failures.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Handle returned by [`Publisher::register`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

struct Registration<S: ?Sized> {
    id: SubscriberId,
    subscriber: Box<dyn Subscriber<S>>,
}

/// Membership changes not yet folded into the delivery list.
struct Staged<S: ?Sized> {
    live: HashSet<SubscriberId>,
    added: Vec<Registration<S>>,
    removed: HashSet<SubscriberId>,
}

pub struct Publisher<S: ?Sized> {
    /// Held for the whole of a notification.
    delivery: Mutex<Vec<Registration<S>>>,
    /// Never held while a hook runs.
    staged: Mutex<Staged<S>>,
    next_id: AtomicU64,
}

impl<S: ?Sized> Default for Publisher<S> {
    fn default() -> Self {
        Self {
            delivery: Mutex::new(Vec::new()),
            staged: Mutex::new(Staged {
                live: HashSet::new(),
                added: Vec::new(),
                removed: HashSet::new(),
            }),
            next_id: AtomicU64::new(0),
        }
    }
}

impl<S: ?Sized> std::fmt::Debug for Publisher<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Publisher")
            .field("subscribers", &self.len())
            .finish()
    }
}

impl<S: ?Sized> Publisher<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a subscriber. It receives every event published after the one
    /// currently being delivered, if any.
    pub fn register<T>(&self, subscriber: T) -> SubscriberId
    where
        T: Subscriber<S> + 'static,
    {
        let id = SubscriberId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let mut staged = lock(&self.staged);
        staged.live.insert(id);
        staged.added.push(Registration {
            id,
            subscriber: Box::new(subscriber),
        });
        id
    }

    /// Detaches a subscriber. Unknown ids are ignored.
    ///
    /// Safe to call from inside a hook, including the detached subscriber's
    /// own. Returns whether a subscriber was removed.
    pub fn unregister(&self, id: SubscriberId) -> bool {
        let mut staged = lock(&self.staged);
        if !staged.live.remove(&id) {
            return false;
        }
        staged.removed.insert(id);
        true
    }

    pub fn len(&self) -> usize {
        lock(&self.staged).live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn notify_start(&self, subject: &S) {
        self.deliver("start", |sub| sub.on_start(subject));
    }

    pub fn notify_result(&self, result: &EnumerationResult) {
        self.deliver("result", |sub| sub.on_result(result));
    }

    pub fn notify_end(&self, subject: &S) {
        self.deliver("end", |sub| sub.on_end(subject));
    }

    fn deliver<F>(&self, event: &str, mut hook: F)
    where
        F: FnMut(&mut dyn Subscriber<S>) -> anyhow::Result<()>,
    {
        let mut subscribers = lock(&self.delivery);
        self.fold_staged(&mut subscribers);

        for reg in subscribers.iter_mut() {
            if lock(&self.staged).removed.contains(&reg.id) {
                continue;
            }
            let subscriber = reg.subscriber.as_mut();
            match panic::catch_unwind(AssertUnwindSafe(|| hook(&mut *subscriber))) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    warn!("Subscriber {} failed on {event}: {e:#}", subscriber.name());
                }
                Err(_) => {
                    warn!("Subscriber {} panicked on {event}", subscriber.name());
                }
            }
        }
    }

    /// Applies staged membership changes. Detached subscribers are dropped
    /// after the staging lock is released.
    fn fold_staged(&self, subscribers: &mut Vec<Registration<S>>) {
        let mut staged = lock(&self.staged);
        subscribers.append(&mut staged.added);
        if staged.removed.is_empty() {
            return;
        }

        let removed = std::mem::take(&mut staged.removed);
        drop(staged);
        let (kept, detached): (Vec<_>, Vec<_>) = std::mem::take(subscribers)
            .into_iter()
            .partition(|reg| !removed.contains(&reg.id));
        *subscribers = kept;
        debug!("Detached {} subscriber(s)", detached.len());
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
