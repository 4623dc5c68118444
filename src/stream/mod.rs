//! Change streams.
//!
//! The store publishes through a hold-latest broadcast; observers attach
//! through a [`Selection`], which projects and de-duplicates values per
//! subscription, and keep receiving values while their [`Subscription`]
//! lives.

mod broadcast;
mod selection;
mod subscription;

pub(crate) use broadcast::Broadcast;
pub use selection::Selection;
pub use subscription::Subscription;
