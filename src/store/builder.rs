//! Builder API for store construction.

use super::interceptor::{self, Interceptor};
use super::store::ReactiveStore;
use crate::error::BoxError;

const DEFAULT_NAME: &str = "store";

/// Builder for a [`ReactiveStore`] with a name and a pre-registered
/// interceptor chain.
///
/// Interceptors registered here apply to every write, like those added
/// later with [`ReactiveStore::add_interceptor`]. They do not run on the
/// initial value.
///
/// # Example
///
/// ```
/// use rxstore::StoreBuilder;
///
/// let store = StoreBuilder::new(0_i64)
///     .name("counter")
///     .interceptor(|n: i64| n.max(0))
///     .build();
///
/// store.set_state(-5).unwrap();
/// assert_eq!(store.snapshot(), 0);
/// assert_eq!(store.name(), "counter");
/// ```
pub struct StoreBuilder<T> {
    initial: T,
    name: Option<String>,
    interceptors: Vec<Interceptor<T>>,
}

impl<T> StoreBuilder<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    /// Start a builder for a store holding `initial`.
    pub fn new(initial: T) -> Self {
        Self {
            initial,
            name: None,
            interceptors: Vec::new(),
        }
    }

    /// Label used in log events. Defaults to `"store"`.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Append an interceptor to the chain.
    pub fn interceptor<F>(mut self, f: F) -> Self
    where
        F: Fn(T) -> T + Send + Sync + 'static,
    {
        self.interceptors.push(interceptor::infallible(f));
        self
    }

    /// Append an interceptor that may reject a write.
    pub fn fallible_interceptor<F, E>(mut self, f: F) -> Self
    where
        F: Fn(T) -> Result<T, E> + Send + Sync + 'static,
        E: Into<BoxError>,
    {
        self.interceptors.push(interceptor::fallible(f));
        self
    }

    pub fn build(self) -> ReactiveStore<T> {
        let name = self.name.unwrap_or_else(|| DEFAULT_NAME.to_string());
        ReactiveStore::from_parts(name, self.initial, self.interceptors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_name_is_store() {
        let store = StoreBuilder::new(1_u8).build();
        assert_eq!(store.name(), "store");
        assert_eq!(store.interceptor_count(), 0);
    }

    #[test]
    fn interceptors_keep_registration_order() {
        let store = StoreBuilder::new(String::new())
            .interceptor(|s: String| s + "a")
            .interceptor(|s: String| s + "b")
            .build();
        assert_eq!(store.interceptor_count(), 2);

        store.set_state("x".to_string()).unwrap();
        assert_eq!(store.snapshot(), "xab");
    }

    #[test]
    fn builder_interceptors_skip_initial_value() {
        let store = StoreBuilder::new(3_i32).interceptor(|n: i32| n * 100).build();
        assert_eq!(store.snapshot(), 3);
    }

    #[test]
    fn fallible_interceptor_rejects_write() {
        let store = StoreBuilder::new(1_i32)
            .fallible_interceptor(|n: i32| if n > 10 { Err("too large") } else { Ok(n) })
            .build();

        assert!(store.set_state(11).is_err());
        assert_eq!(store.snapshot(), 1);
    }
}
