use super::builder::StoreBuilder;
use super::interceptor::{self, Interceptor, InterceptorChain};
use super::scope::Scope;
use crate::error::{BoxError, Result, StoreError};
use crate::patch::Patchable;
use crate::stream::{Broadcast, Selection, Subscription};
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError, Weak};

/// A thread-safe, observable container for one value of type `T`.
///
/// Every write (full replace, patch, closure update, reset) is folded
/// through the interceptor chain, committed, and published to subscribers.
/// Subscribers get the current value as soon as they subscribe, then every
/// committed value that differs from the one they last received.
///
/// Reads always hand out copies; nothing returned by the store aliases its
/// internal state. Cloning a store clones the handle, not the state.
///
/// The store does not validate what interceptors or patches produce: it
/// trusts `T`'s own invariants and the caller's functions.
///
/// # Example
///
/// ```
/// use rxstore::{impl_patch, ReactiveStore};
///
/// #[derive(Clone, Debug, PartialEq)]
/// struct Person {
///     name: String,
///     age: u32,
/// }
///
/// impl_patch! {
///     Person => pub struct PersonPatch {
///         name: String,
///         age: u32,
///     }
/// }
///
/// let store = ReactiveStore::new(Person { name: "x".into(), age: 1 });
/// store.patch_state(PersonPatch { age: Some(5), ..Default::default() }).unwrap();
/// assert_eq!(store.snapshot_selected(|p| p.age), 5);
///
/// store.reset_defaults().unwrap();
/// assert_eq!(store.snapshot(), Person { name: "x".into(), age: 1 });
/// ```
pub struct ReactiveStore<T> {
    defaults: Arc<T>,
    changes: Arc<Broadcast<T>>,
    interceptors: Arc<InterceptorChain<T>>,
    write_gate: Arc<Mutex<()>>,
}

impl<T> ReactiveStore<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    /// Create a new store holding `initial`.
    ///
    /// `initial` also becomes the value restored by
    /// [`reset_defaults`](Self::reset_defaults). No interceptor runs on it.
    pub fn new(initial: T) -> Self {
        StoreBuilder::new(initial).build()
    }

    /// Start a [`StoreBuilder`].
    pub fn builder(initial: T) -> StoreBuilder<T> {
        StoreBuilder::new(initial)
    }

    pub(crate) fn from_parts(name: String, initial: T, interceptors: Vec<Interceptor<T>>) -> Self {
        let changes = Arc::new(Broadcast::new(name.into(), initial.clone()));
        tracing::debug!(
            target: "rxstore",
            store = %changes.label(),
            id = changes.store_id(),
            interceptors = interceptors.len(),
            "store created"
        );

        Self {
            defaults: Arc::new(initial),
            changes,
            interceptors: Arc::new(InterceptorChain::new(interceptors)),
            write_gate: Arc::new(Mutex::new(())),
        }
    }

    /// A handle that does not keep the store alive.
    ///
    /// Capture this instead of a clone in a subscriber or interceptor that
    /// needs to reach the store: a clone stored in the store's own callback
    /// list keeps it from ever being freed.
    pub fn downgrade(&self) -> WeakStore<T> {
        WeakStore {
            defaults: Arc::downgrade(&self.defaults),
            changes: Arc::downgrade(&self.changes),
            interceptors: Arc::downgrade(&self.interceptors),
            write_gate: Arc::downgrade(&self.write_gate),
        }
    }

    /// The label used in log events.
    pub fn name(&self) -> &str {
        self.changes.label()
    }

    /// Observe the whole state.
    ///
    /// The returned selection is lazy; see [`Selection`].
    pub fn select_all(&self) -> Selection<T, T> {
        Selection::new(Arc::clone(&self.changes), Arc::new(|state: &T| state.clone()))
    }

    /// Observe a projection of the state.
    ///
    /// Subscribers are notified only when the projected value changes, even
    /// if other parts of the state changed.
    pub fn select<R, F>(&self, selector: F) -> Selection<T, R>
    where
        R: 'static,
        F: Fn(&T) -> R + Send + Sync + 'static,
    {
        Selection::new(Arc::clone(&self.changes), Arc::new(selector))
    }

    /// Subscribe to the whole state.
    ///
    /// Shorthand for `select_all().subscribe(callback)`. The store holds
    /// `callback` until the subscription ends, so a callback that owns a
    /// clone of this store keeps it alive; use [`downgrade`](Self::downgrade).
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: FnMut(T) + Send + 'static,
    {
        self.select_all().subscribe(callback)
    }

    /// Get a copy of the current state.
    pub fn snapshot(&self) -> T {
        T::clone(&self.changes.latest())
    }

    /// Apply `selector` to a copy of the current state.
    pub fn snapshot_selected<R, F>(&self, selector: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        selector(&self.snapshot())
    }

    /// Read the current state without copying it.
    ///
    /// `f` sees the state as of the call; writes made while it runs do not
    /// affect what it sees.
    pub fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        let state = self.changes.latest();
        f(&*state)
    }

    /// A copy of the value the store was created with.
    pub fn defaults(&self) -> T {
        T::clone(&self.defaults)
    }

    /// Replace the whole state.
    ///
    /// Fields of the previous state are not carried over.
    pub fn set_state(&self, next: T) -> Result<()> {
        self.write("set_state", move |_| next)
    }

    /// Overwrite the fields named in `patch`, keeping every other field of
    /// the current state.
    pub fn patch_state(&self, patch: T::Patch) -> Result<()>
    where
        T: Patchable,
    {
        self.write("patch_state", move |current| current.patched(patch))
    }

    /// Modify a copy of the current state with a function and write it back.
    pub fn update<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce(&mut T),
    {
        self.write("update", move |current| {
            let mut next = current.clone();
            f(&mut next);
            next
        })
    }

    /// Write a copy of the defaults back, through the interceptor chain.
    pub fn reset_defaults(&self) -> Result<()> {
        let defaults = self.defaults();
        self.write("reset_defaults", move |_| defaults)
    }

    /// Append an interceptor to the chain.
    ///
    /// It runs on every later write, after the interceptors registered
    /// before it, and must return a complete state. Already committed state
    /// is left as it is. Interceptors live as long as the store, so one that
    /// needs the store should capture a [`WeakStore`].
    pub fn add_interceptor<F>(&self, f: F)
    where
        F: Fn(T) -> T + Send + Sync + 'static,
    {
        self.register(interceptor::infallible(f));
    }

    /// Append an interceptor that may reject a write.
    ///
    /// A rejection aborts the write with [`StoreError::Interceptor`]; nothing
    /// is committed or published.
    pub fn add_fallible_interceptor<F, E>(&self, f: F)
    where
        F: Fn(T) -> std::result::Result<T, E> + Send + Sync + 'static,
        E: Into<BoxError>,
    {
        self.register(interceptor::fallible(f));
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.changes.subscriber_count()
    }

    /// Number of registered interceptors.
    pub fn interceptor_count(&self) -> usize {
        self.interceptors.len()
    }

    fn register(&self, interceptor: Interceptor<T>) {
        let count = self.interceptors.push(interceptor);
        tracing::debug!(
            target: "rxstore",
            store = %self.name(),
            interceptors = count,
            "interceptor added"
        );
    }

    /// Build a candidate from the current state, run it through the
    /// interceptors, then commit and publish it.
    fn write<F>(&self, op: &'static str, candidate: F) -> Result<()>
    where
        F: FnOnce(&T) -> T,
    {
        let Some(_scope) = Scope::write(self.changes.store_id()) else {
            tracing::warn!(
                target: "rxstore",
                store = %self.name(),
                op,
                "nested write on the same thread rejected"
            );
            return Err(StoreError::ReentrantWrite {
                store: self.name().to_string(),
            });
        };
        let _gate = self.write_gate.lock().unwrap_or_else(PoisonError::into_inner);

        let candidate = candidate(&*self.changes.latest());
        let next = self.interceptors.apply(candidate).inspect_err(|err| {
            tracing::warn!(
                target: "rxstore",
                store = %self.name(),
                op,
                error = %err,
                "write rejected"
            );
        })?;

        let version = self.changes.publish(next);
        tracing::trace!(target: "rxstore", store = %self.name(), op, version, "write done");
        Ok(())
    }
}

impl<T> Clone for ReactiveStore<T> {
    fn clone(&self) -> Self {
        Self {
            defaults: Arc::clone(&self.defaults),
            changes: Arc::clone(&self.changes),
            interceptors: Arc::clone(&self.interceptors),
            write_gate: Arc::clone(&self.write_gate),
        }
    }
}

/// A non-owning handle to a [`ReactiveStore`], made by
/// [`ReactiveStore::downgrade`].
pub struct WeakStore<T> {
    defaults: Weak<T>,
    changes: Weak<Broadcast<T>>,
    interceptors: Weak<InterceptorChain<T>>,
    write_gate: Weak<Mutex<()>>,
}

impl<T> WeakStore<T> {
    /// The store, if any strong handle to it is still alive.
    pub fn upgrade(&self) -> Option<ReactiveStore<T>> {
        Some(ReactiveStore {
            defaults: self.defaults.upgrade()?,
            changes: self.changes.upgrade()?,
            interceptors: self.interceptors.upgrade()?,
            write_gate: self.write_gate.upgrade()?,
        })
    }
}

impl<T> Clone for WeakStore<T> {
    fn clone(&self) -> Self {
        Self {
            defaults: Weak::clone(&self.defaults),
            changes: Weak::clone(&self.changes),
            interceptors: Weak::clone(&self.interceptors),
            write_gate: Weak::clone(&self.write_gate),
        }
    }
}

impl<T> fmt::Debug for ReactiveStore<T>
where
    T: fmt::Debug + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReactiveStore")
            .field("name", &self.changes.label())
            .field("state", &self.changes.latest())
            .field("interceptors", &self.interceptors.len())
            .field("subscribers", &self.changes.subscriber_count())
            .finish()
    }
}
