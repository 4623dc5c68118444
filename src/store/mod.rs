//! The reactive store.
//!
//! A store owns one value, an append-only interceptor chain that every write
//! passes through, and the broadcast its subscribers are notified through.

mod builder;
mod interceptor;
pub(crate) mod scope;
mod store;

pub use builder::StoreBuilder;
pub use store::{ReactiveStore, WeakStore};
