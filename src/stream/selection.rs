use super::broadcast::Broadcast;
use super::subscription::Subscription;
use std::fmt;
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;

type Selector<T, R> = Arc<dyn Fn(&T) -> R + Send + Sync>;

/// A lazy, distinct-until-changed view of a store's state.
///
/// Nothing is observed until [`subscribe`](Self::subscribe) is called, and
/// every call starts an independent subscription. Each subscription
/// immediately receives the projection of the current state, then the
/// projection of every later commit that differs (by `PartialEq`) from the
/// value it last emitted.
///
/// The projection is recomputed on every commit that changed the state;
/// commits of a value equal to the previous one skip the selector. Only the
/// last emitted value is kept, for comparison.
///
/// # Examples
///
/// ```
/// use rxstore::ReactiveStore;
/// use std::sync::{Arc, Mutex};
///
/// #[derive(Clone, PartialEq)]
/// struct User { name: String, age: u32 }
///
/// let store = ReactiveStore::new(User { name: "a".into(), age: 10 });
/// let ages = Arc::new(Mutex::new(Vec::new()));
///
/// let seen = Arc::clone(&ages);
/// let _subscription = store
///     .select(|user: &User| user.age)
///     .subscribe(move |age| seen.lock().unwrap().push(age));
///
/// store.set_state(User { name: "b".into(), age: 10 }).unwrap();
/// store.set_state(User { name: "b".into(), age: 11 }).unwrap();
///
/// assert_eq!(*ages.lock().unwrap(), vec![10, 11]);
/// ```
pub struct Selection<T, R> {
    source: Arc<Broadcast<T>>,
    selector: Selector<T, R>,
}

impl<T, R> Selection<T, R>
where
    T: Send + Sync + 'static,
    R: 'static,
{
    pub(crate) fn new(source: Arc<Broadcast<T>>, selector: Selector<T, R>) -> Self {
        Self { source, selector }
    }

    /// Derive a further projection from this one.
    ///
    /// Distinctness is judged on the final projected value.
    pub fn map<U, F>(self, f: F) -> Selection<T, U>
    where
        F: Fn(&R) -> U + Send + Sync + 'static,
    {
        let selector = self.selector;
        Selection {
            source: self.source,
            selector: Arc::new(move |state: &T| f(&selector(state))),
        }
    }
}

impl<T, R> Selection<T, R>
where
    T: Send + Sync + 'static,
    R: Clone + PartialEq + Send + 'static,
{
    /// Start observing.
    ///
    /// `callback` runs synchronously: once now with the current projection,
    /// then inside every write whose projection changed.
    ///
    /// The store keeps `callback` and the selector until the subscription
    /// ends. If either owns a clone of the store, the store is never freed;
    /// capture a [`WeakStore`](crate::WeakStore) instead.
    pub fn subscribe<F>(&self, mut callback: F) -> Subscription
    where
        F: FnMut(R) + Send + 'static,
    {
        let selector = Arc::clone(&self.selector);
        let label: Arc<str> = self.source.label().into();
        let mut last: Option<R> = None;

        self.source.subscribe(Box::new(move |state: &T| {
            let projected = selector(state);
            if last.as_ref() == Some(&projected) {
                tracing::trace!(target: "rxstore", store = %label, "unchanged value suppressed");
                return;
            }
            last = Some(projected.clone());
            callback(projected);
        }))
    }

    /// Start observing through a channel.
    ///
    /// The receiver yields the same sequence `subscribe` would hand to a
    /// callback. It disconnects once the subscription is dropped and every
    /// buffered value has been taken.
    pub fn subscribe_channel(&self) -> (Subscription, Receiver<R>) {
        let (sender, receiver) = mpsc::channel();
        let subscription = self.subscribe(move |value| {
            let _ = sender.send(value);
        });
        (subscription, receiver)
    }
}

impl<T, R> Clone for Selection<T, R> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            selector: Arc::clone(&self.selector),
        }
    }
}

impl<T, R> fmt::Debug for Selection<T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Selection").finish_non_exhaustive()
    }
}
