//! Memoization helpers.
//!
//! [`Memoized`] wraps a function and caches its result per argument key.
//! [`MethodCache`] is a cache field an object owns for its own methods.
//! Both are unbounded: entries live as long as the cache does.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::{Mutex, MutexGuard, PoisonError};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

type CacheFilter<V> = Box<dyn Fn(&V) -> bool + Send + Sync>;

/// A function whose results are cached per key.
///
/// The key stands for the call's arguments: a single value, a tuple of
/// positional values, or a tuple that also carries sorted keyword pairs.
///
/// ```
/// use pkgkit_core::memo::Memoized;
///
/// let add_three = Memoized::new(|x: &i64| x + 3);
/// assert_eq!(add_three.call(10), 13);
/// assert_eq!(add_three.call(10), 13);
/// assert_eq!(add_three.len(), 1);
/// ```
pub struct Memoized<K, V, F> {
    func: F,
    cache: Mutex<HashMap<K, V>>,
    filter: Option<CacheFilter<V>>,
}

impl<K, V, F> Memoized<K, V, F>
where
    K: Hash + Eq,
    V: Clone,
    F: Fn(&K) -> V,
{
    pub fn new(func: F) -> Self {
        Self {
            func,
            cache: Mutex::new(HashMap::new()),
            filter: None,
        }
    }

    /// Only store results for which `keep` returns true.
    ///
    /// Rejected results are still returned to the caller, they are just
    /// recomputed on the next call. Typical use is not caching failures.
    #[must_use]
    pub fn cache_if(mut self, keep: impl Fn(&V) -> bool + Send + Sync + 'static) -> Self {
        self.filter = Some(Box::new(keep));
        self
    }

    /// Return the cached result for `key`, computing it on first use.
    ///
    /// The lock is not held while the function runs, so a memoized function
    /// may call back into the same cache.
    pub fn call(&self, key: K) -> V {
        if let Some(hit) = lock(&self.cache).get(&key) {
            return hit.clone();
        }

        let value = (self.func)(&key);
        if self.filter.as_ref().map_or(true, |keep| keep(&value)) {
            lock(&self.cache).insert(key, value.clone());
        }
        value
    }

    /// Number of cached results.
    pub fn len(&self) -> usize {
        lock(&self.cache).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every cached result.
    pub fn clear(&self) {
        lock(&self.cache).clear();
    }
}

impl<K, V, F> fmt::Debug for Memoized<K, V, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Memoized")
            .field("entries", &lock(&self.cache).len())
            .field("filtered", &self.filter.is_some())
            .finish_non_exhaustive()
    }
}

/// Per-object cache for method results, keyed by method name and arguments.
///
/// Embed it as a field and route method bodies through
/// [`get_or_insert_with`](Self::get_or_insert_with).
#[derive(Debug)]
pub struct MethodCache<K, V> {
    entries: Mutex<HashMap<(&'static str, K), V>>,
}

impl<K, V> Default for MethodCache<K, V> {
    fn default() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl<K, V> MethodCache<K, V>
where
    K: Hash + Eq,
    V: Clone,
{
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached result of `method(args)`, computing it with `f` on first use.
    pub fn get_or_insert_with(&self, method: &'static str, args: K, f: impl FnOnce() -> V) -> V {
        let key = (method, args);
        if let Some(hit) = lock(&self.entries).get(&key) {
            return hit.clone();
        }
        let value = f();
        lock(&self.entries).insert(key, value.clone());
        value
    }

    /// Like [`get_or_insert_with`](Self::get_or_insert_with) for fallible
    /// methods. Errors are returned and never cached.
    pub fn get_or_try_insert_with<E>(
        &self,
        method: &'static str,
        args: K,
        f: impl FnOnce() -> Result<V, E>,
    ) -> Result<V, E> {
        let key = (method, args);
        if let Some(hit) = lock(&self.entries).get(&key) {
            return Ok(hit.clone());
        }
        let value = f()?;
        lock(&self.entries).insert(key, value.clone());
        Ok(value)
    }

    pub fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
