//! # rxstore
//!
//! An observable, in-process state container for Rust.
//!
//! A [`ReactiveStore<T>`] holds one value of an application-defined type and
//! exposes it two ways:
//!
//! ## Snapshots (point-in-time reads)
//!
//! - [`ReactiveStore::snapshot`] - an independent copy of the current state
//! - [`ReactiveStore::snapshot_selected`] - a projection of that copy
//! - [`ReactiveStore::read`] - borrow the current state without copying
//!
//! ## Change streams
//!
//! - [`ReactiveStore::select_all`] / [`ReactiveStore::select`] - lazy
//!   [`Selection`]s that replay the current value to each new subscriber and
//!   then emit only values that differ from the previous emission
//! - [`Subscription`] - RAII guard; drop it to stop observing
//!
//! ## Writes
//!
//! Full replacement ([`set_state`](ReactiveStore::set_state)), shallow
//! partial updates ([`patch_state`](ReactiveStore::patch_state), see
//! [`Patchable`] and [`impl_patch!`]), closure updates and
//! [`reset_defaults`](ReactiveStore::reset_defaults) all pass through the
//! interceptor chain ([`add_interceptor`](ReactiveStore::add_interceptor))
//! before being committed and published.
//!
//! Everything runs synchronously on the caller's thread: subscribers are
//! notified inside the write that triggered them, in commit order.
//!
//! Log events are emitted through `tracing` under the `rxstore` target.

pub mod error;
pub mod patch;
pub mod record;
pub mod store;
pub mod stream;

// Re-export main types for convenience
pub use error::{BoxError, Result, StoreError};
pub use patch::Patchable;
pub use record::Record;
pub use store::{ReactiveStore, StoreBuilder, WeakStore};
pub use stream::{Selection, Subscription};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_works() {
        // Basic smoke test
        let store = ReactiveStore::new(0);
        assert_eq!(store.snapshot(), 0);
        store.set_state(42).unwrap();
        assert_eq!(store.snapshot(), 42);
    }
}
