use std::cell::RefCell;
use std::sync::atomic::{AtomicUsize, Ordering};

static NEXT_STORE_ID: AtomicUsize = AtomicUsize::new(0);

// Stores this thread is currently inside, innermost last.
thread_local! {
    static ACTIVE: RefCell<Vec<usize>> = const { RefCell::new(Vec::new()) };
}

/// Generate the next unique store id.
pub(crate) fn next_store_id() -> usize {
    NEXT_STORE_ID.fetch_add(1, Ordering::Relaxed)
}

/// Marks the current thread as inside a write of one store.
///
/// A write may not start while the same thread is already inside a write of
/// that store: it would deadlock on the store's write gate.
pub(crate) struct Scope {
    store: usize,
}

impl Scope {
    /// Enter a write, or return `None` if this thread is already inside one
    /// for the same store.
    pub(crate) fn write(store: usize) -> Option<Self> {
        ACTIVE.with(|active| {
            let mut active = active.borrow_mut();
            if active.contains(&store) {
                return None;
            }
            active.push(store);
            Some(Self { store })
        })
    }
}

impl Drop for Scope {
    fn drop(&mut self) {
        ACTIVE.with(|active| {
            let mut active = active.borrow_mut();
            if let Some(index) = active.iter().rposition(|id| *id == self.store) {
                active.remove(index);
            }
        });
    }
}
