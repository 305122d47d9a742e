//! Change notification bus and live query primitives.
//!
//! # Responsibility
//! - Fan out per-table change notifications to interested observers.
//! - Re-run registered queries so observers always hold a full, current
//!   snapshot of their result set.
//!
//! # Invariants
//! - Publishes between two observations conflate into a single wake-up;
//!   observers see the latest state, not every intermediate one.
//! - Dropping a listener unregisters it; no manual unsubscribe bookkeeping.

mod query;

pub use query::{FilteredLive, LiveQuery};

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

/// Change domain published by repository writes.
///
/// One tag per entity family plus the preference store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    Checklist,
    WeeklyChecks,
    Journal,
    Letters,
    Documents,
    Growth,
    Health,
    Reminders,
    Contractions,
    BellyPhotos,
    BabyNames,
    Prefs,
}

struct Subscriber {
    topics: Vec<Topic>,
    tick: Sender<()>,
}

#[derive(Default)]
struct BusInner {
    next_id: u64,
    subscribers: HashMap<u64, Subscriber>,
}

/// Process-wide broadcast registry for table-level change events.
///
/// Clones share one registry; the bus is cheap to clone and hand to every
/// repository writing to the same database.
#[derive(Clone, Default)]
pub struct ChangeBus {
    inner: Arc<Mutex<BusInner>>,
}

impl ChangeBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Notifies every listener subscribed to `topic`.
    ///
    /// A listener that has not consumed its previous wake-up is not queued
    /// again; pending notifications conflate.
    pub fn publish(&self, topic: Topic) {
        let inner = self.inner.lock().expect("change bus lock poisoned");
        for subscriber in inner.subscribers.values() {
            if !subscriber.topics.contains(&topic) {
                continue;
            }
            match subscriber.tick.try_send(()) {
                Ok(()) | Err(TrySendError::Full(())) => {}
                Err(TrySendError::Disconnected(())) => {}
            }
        }
    }

    /// Registers a listener for the given topics.
    pub fn subscribe(&self, topics: &[Topic]) -> ChangeListener {
        let (tick, wake) = bounded(1);
        let mut inner = self.inner.lock().expect("change bus lock poisoned");
        let id = inner.next_id;
        inner.next_id += 1;
        inner.subscribers.insert(
            id,
            Subscriber {
                topics: topics.to_vec(),
                tick,
            },
        );
        ChangeListener {
            id,
            wake,
            bus: Arc::downgrade(&self.inner),
        }
    }

    /// Number of currently registered listeners.
    pub fn listener_count(&self) -> usize {
        self.inner
            .lock()
            .expect("change bus lock poisoned")
            .subscribers
            .len()
    }
}

/// Subscription handle; unregisters itself on drop.
pub struct ChangeListener {
    id: u64,
    wake: Receiver<()>,
    bus: Weak<Mutex<BusInner>>,
}

impl ChangeListener {
    /// Consumes a pending wake-up without blocking.
    pub fn poll(&self) -> bool {
        self.wake.try_recv().is_ok()
    }

    /// Blocks until a wake-up arrives or the timeout elapses.
    pub fn wait(&self, timeout: Duration) -> bool {
        self.wake.recv_timeout(timeout).is_ok()
    }
}

impl Drop for ChangeListener {
    fn drop(&mut self) {
        if let Some(inner) = self.bus.upgrade() {
            inner
                .lock()
                .expect("change bus lock poisoned")
                .subscribers
                .remove(&self.id);
        }
    }
}
