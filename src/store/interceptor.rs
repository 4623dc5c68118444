use crate::error::{BoxError, StoreError};
use std::sync::{Arc, PoisonError, RwLock};

pub(crate) type Interceptor<T> = Arc<dyn Fn(T) -> Result<T, BoxError> + Send + Sync>;

/// Wrap an infallible transform.
pub(crate) fn infallible<T, F>(f: F) -> Interceptor<T>
where
    T: 'static,
    F: Fn(T) -> T + Send + Sync + 'static,
{
    Arc::new(move |state: T| -> Result<T, BoxError> { Ok(f(state)) })
}

/// Wrap a transform that may reject the candidate state.
pub(crate) fn fallible<T, F, E>(f: F) -> Interceptor<T>
where
    T: 'static,
    F: Fn(T) -> Result<T, E> + Send + Sync + 'static,
    E: Into<BoxError>,
{
    Arc::new(move |state: T| -> Result<T, BoxError> { f(state).map_err(Into::into) })
}

/// Append-only, ordered chain of state transforms.
pub(crate) struct InterceptorChain<T> {
    interceptors: RwLock<Vec<Interceptor<T>>>,
}

impl<T> InterceptorChain<T> {
    pub(crate) fn new(interceptors: Vec<Interceptor<T>>) -> Self {
        Self {
            interceptors: RwLock::new(interceptors),
        }
    }

    /// Append to the end of the chain. Returns the new chain length.
    pub(crate) fn push(&self, interceptor: Interceptor<T>) -> usize {
        let mut interceptors = self
            .interceptors
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        interceptors.push(interceptor);
        interceptors.len()
    }

    pub(crate) fn len(&self) -> usize {
        self.interceptors
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Fold `candidate` through every interceptor, in registration order.
    ///
    /// Stops at the first rejection.
    pub(crate) fn apply(&self, candidate: T) -> Result<T, StoreError> {
        // Run on a copy of the list so interceptors can register more
        // interceptors; those apply from the next write on.
        let chain = self
            .interceptors
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        chain
            .iter()
            .enumerate()
            .try_fold(candidate, |state, (index, interceptor)| {
                interceptor(state).map_err(|source| StoreError::Interceptor { index, source })
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn empty_chain_is_identity() {
        let chain = InterceptorChain::new(Vec::new());
        assert_eq!(chain.apply(5).unwrap(), 5);
    }

    #[test]
    fn chain_folds_left_to_right() {
        let chain = InterceptorChain::new(Vec::new());
        chain.push(infallible(|n: i32| n + 1));
        chain.push(infallible(|n: i32| n * 10));
        assert_eq!(chain.apply(1).unwrap(), 20);
    }

    #[test]
    fn each_interceptor_sees_previous_output() {
        let inputs = Arc::new(Mutex::new(Vec::new()));
        let chain = InterceptorChain::new(Vec::new());
        chain.push(infallible(|s: String| format!("{s}-a")));
        let seen = Arc::clone(&inputs);
        chain.push(infallible(move |s: String| {
            seen.lock().unwrap().push(s.clone());
            s
        }));

        chain.apply("x".to_string()).unwrap();
        assert_eq!(*inputs.lock().unwrap(), vec!["x-a".to_string()]);
    }

    #[test]
    fn rejection_stops_the_chain() {
        let reached = Arc::new(Mutex::new(false));
        let chain = InterceptorChain::new(Vec::new());
        chain.push(infallible(|n: i32| n));
        chain.push(fallible(|n: i32| {
            if n < 0 {
                Err("negative")
            } else {
                Ok(n)
            }
        }));
        let flag = Arc::clone(&reached);
        chain.push(infallible(move |n: i32| {
            *flag.lock().unwrap() = true;
            n
        }));

        let err = chain.apply(-1).unwrap_err();
        assert!(matches!(err, StoreError::Interceptor { index: 1, .. }));
        assert!(!*reached.lock().unwrap());
    }

    #[test]
    fn push_reports_chain_length() {
        let chain = InterceptorChain::new(vec![infallible(|n: i32| n)]);
        assert_eq!(chain.push(infallible(|n: i32| n)), 2);
        assert_eq!(chain.len(), 2);
    }
}
