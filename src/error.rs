//! Store error types.

use thiserror::Error;

/// Boxed error returned by a fallible interceptor.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Convenience alias for results produced by store writes.
pub type Result<T, E = StoreError> = std::result::Result<T, E>;

/// Errors that can occur while writing to a store.
///
/// Reads never fail. A write that returns an error has committed nothing and
/// published nothing.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A fallible interceptor rejected the candidate state.
    #[error("interceptor #{index} rejected the state update: {source}")]
    Interceptor {
        /// Position of the interceptor in the chain (registration order).
        index: usize,
        #[source]
        source: BoxError,
    },

    /// A write was issued from inside a write on the same store, on the same
    /// thread (for example from a subscriber callback or an interceptor).
    #[error("store `{store}` is already being written on this thread")]
    ReentrantWrite { store: String },
}
