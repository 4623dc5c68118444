use super::subscription::{Subscription, Unsubscribe};
use crate::store::scope::{self, Scope};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

type Sink<T> = Box<dyn FnMut(&T) + Send>;

/// One registered subscriber.
struct Slot<T> {
    id: usize,
    active: AtomicBool,
    inner: Mutex<SlotInner<T>>,
}

struct SlotInner<T> {
    // Version of the last value handed to the sink.
    seen: Option<u64>,
    sink: Sink<T>,
}

impl<T> Slot<T> {
    fn new(id: usize, sink: Sink<T>) -> Self {
        Self {
            id,
            active: AtomicBool::new(true),
            inner: Mutex::new(SlotInner { seen: None, sink }),
        }
    }

    /// Hand `value` to the sink unless the slot is gone or has already seen
    /// this version or a newer one.
    fn deliver(&self, version: u64, value: &T) -> bool {
        if !self.active.load(Ordering::Acquire) {
            return false;
        }
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        if inner.seen.is_some_and(|seen| version <= seen) {
            return false;
        }
        inner.seen = Some(version);
        (inner.sink)(value);
        true
    }
}

struct Hub<T> {
    version: u64,
    latest: Arc<T>,
    slots: Vec<Arc<Slot<T>>>,
}

/// Hold-latest broadcast: the last published value plus the subscriber list.
///
/// Subscribing replays the latest value to the new subscriber before it sees
/// any later publish. Publishing stores the value and hands it to every
/// subscriber, in subscription order, on the caller's thread. A value equal
/// to the one it replaces is stored but not handed out.
///
/// No lock is held while a sink runs, so sinks may read the latest value,
/// subscribe, or drop subscriptions. Sinks run inside a write scope of the
/// owning store, replay included, so they cannot write back into it.
pub(crate) struct Broadcast<T> {
    store: usize,
    label: Arc<str>,
    next_slot: AtomicUsize,
    hub: RwLock<Hub<T>>,
}

impl<T> Broadcast<T>
where
    T: Send + Sync + 'static,
{
    pub(crate) fn new(label: Arc<str>, initial: T) -> Self {
        Self {
            store: scope::next_store_id(),
            label,
            next_slot: AtomicUsize::new(0),
            hub: RwLock::new(Hub {
                version: 0,
                latest: Arc::new(initial),
                slots: Vec::new(),
            }),
        }
    }

    /// Id of the store this broadcast belongs to, as used by [`Scope`].
    pub(crate) fn store_id(&self) -> usize {
        self.store
    }

    pub(crate) fn label(&self) -> &str {
        &self.label
    }

    /// The latest value, shared.
    pub(crate) fn latest(&self) -> Arc<T> {
        Arc::clone(&self.hub.read().unwrap_or_else(PoisonError::into_inner).latest)
    }

    pub(crate) fn subscriber_count(&self) -> usize {
        self.hub
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .slots
            .len()
    }

    /// Store `value` as the latest value and deliver it to every subscriber,
    /// unless it equals the value it replaces.
    ///
    /// Returns the version assigned to the value.
    pub(crate) fn publish(&self, value: T) -> u64
    where
        T: PartialEq,
    {
        let value = Arc::new(value);
        let (version, slots) = {
            let mut hub = self.hub.write().unwrap_or_else(PoisonError::into_inner);
            let unchanged = *hub.latest == *value;
            hub.version += 1;
            hub.latest = Arc::clone(&value);
            let slots = if unchanged { None } else { Some(hub.slots.clone()) };
            (hub.version, slots)
        };

        let Some(slots) = slots else {
            tracing::trace!(
                target: "rxstore",
                store = %self.label,
                version,
                "state committed unchanged"
            );
            return version;
        };

        tracing::trace!(
            target: "rxstore",
            store = %self.label,
            version,
            subscribers = slots.len(),
            "state committed"
        );

        for slot in slots {
            slot.deliver(version, &value);
        }
        version
    }

    /// Register `sink` and replay the latest value to it.
    pub(crate) fn subscribe(self: &Arc<Self>, sink: Sink<T>) -> Subscription {
        let id = self.next_slot.fetch_add(1, Ordering::Relaxed);
        let slot = Arc::new(Slot::new(id, sink));

        let (version, latest, count) = {
            let mut hub = self.hub.write().unwrap_or_else(PoisonError::into_inner);
            hub.slots.push(Arc::clone(&slot));
            (hub.version, Arc::clone(&hub.latest), hub.slots.len())
        };

        tracing::debug!(
            target: "rxstore",
            store = %self.label,
            subscriber = id,
            subscribers = count,
            "subscribed"
        );

        // The guard exists before the sink first runs, so a panicking replay
        // unwinds through it and the slot is removed again.
        let source: Arc<dyn Unsubscribe> = Arc::clone(self) as Arc<dyn Unsubscribe>;
        let subscription = Subscription::new(id, Arc::downgrade(&source));

        // `None` means a write of this store is already running on this
        // thread, and its scope covers the replay too.
        let _scope = Scope::write(self.store);

        // A publish racing with this replay may already have delivered a
        // newer version; `deliver` then drops the stale replay.
        slot.deliver(version, &latest);
        subscription
    }
}

impl<T> Unsubscribe for Broadcast<T>
where
    T: Send + Sync + 'static,
{
    fn unsubscribe(&self, slot: usize) {
        let removed = {
            let mut hub = self.hub.write().unwrap_or_else(PoisonError::into_inner);
            hub.slots
                .iter()
                .position(|s| s.id == slot)
                .map(|index| hub.slots.remove(index))
        };

        if let Some(removed) = removed {
            removed.active.store(false, Ordering::Release);
            tracing::debug!(
                target: "rxstore",
                store = %self.label,
                subscriber = slot,
                "unsubscribed"
            );
        }
    }
}
