//! Null Cache Module
//!
//! Pass-through engine that never stores anything. Swapping it in disables
//! caching without touching call sites: reads always miss and writes hand
//! back the value they were given.

use std::future::Future;
use std::marker::PhantomData;

use crate::cache::{CacheEngine, CacheEntry, CacheView, EqualityComparer};
use crate::config::CacheConfig;

const NAME: &str = "NullCache";

// == Null Cache ==
#[derive(Debug, Clone)]
pub struct NullCache<K, V> {
    config: CacheConfig,
    _marker: PhantomData<fn() -> (K, V)>,
}

impl<K, V> NullCache<K, V> {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            config,
            _marker: PhantomData,
        }
    }
}

impl<K, V> Default for NullCache<K, V> {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

impl<K, V> CacheView<K, V> for NullCache<K, V> {
    fn name(&self) -> &'static str {
        NAME
    }

    fn len(&self) -> usize {
        0
    }

    fn exists(&self, _key: &K) -> bool {
        false
    }

    fn peek(&self, _key: &K) -> Option<&V> {
        None
    }
}

impl<K, V> CacheEngine<K, V> for NullCache<K, V>
where
    K: PartialEq,
    V: Clone,
{
    fn config(&self) -> &CacheConfig {
        &self.config
    }

    fn get_entry(&self, _key: &K) -> Option<&CacheEntry<K, V>> {
        None
    }

    fn get_item(&mut self, _key: &K) -> Option<V> {
        None
    }

    fn get_item_if<F>(&mut self, _key: &K, _check: F) -> Option<V>
    where
        F: FnOnce(&dyn CacheView<K, V>, &V) -> bool,
    {
        None
    }

    async fn get_item_async<F, Fut, E>(&mut self, _key: &K, _check: F) -> Result<Option<V>, E>
    where
        F: FnOnce(&dyn CacheView<K, V>, &V) -> Fut,
        Fut: Future<Output = Result<bool, E>>,
    {
        Ok(None)
    }

    fn set_item(&mut self, _key: K, value: V, _duration: Option<u64>) -> V {
        value
    }

    fn set_item_with<F>(&mut self, key: K, factory: F, duration: Option<u64>) -> V
    where
        F: FnOnce(&dyn CacheView<K, V>, &K, Option<u64>) -> V,
    {
        let view: &dyn CacheView<K, V> = &*self;
        factory(view, &key, duration)
    }

    async fn set_item_async<F, Fut, E>(
        &mut self,
        key: K,
        factory: F,
        duration: Option<u64>,
    ) -> Result<V, E>
    where
        F: FnOnce(&dyn CacheView<K, V>, &K, Option<u64>) -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        let pending = {
            let view: &dyn CacheView<K, V> = &*self;
            factory(view, &key, duration)
        };
        pending.await
    }

    fn add_or_update<U>(&mut self, _key: K, value: V, _update: U, _duration: Option<u64>) -> V
    where
        U: FnOnce(&dyn CacheView<K, V>, &V, V) -> V,
    {
        value
    }

    fn add_or_update_with<F, U>(
        &mut self,
        key: K,
        factory: F,
        _update: U,
        duration: Option<u64>,
    ) -> V
    where
        F: FnOnce(&dyn CacheView<K, V>, &K, Option<u64>) -> V,
        U: FnOnce(&dyn CacheView<K, V>, &V, F) -> V,
    {
        self.set_item_with(key, factory, duration)
    }

    async fn add_or_update_async<F, FFut, U, UFut, E>(
        &mut self,
        key: K,
        factory: F,
        _update: U,
        duration: Option<u64>,
    ) -> Result<V, E>
    where
        F: FnOnce(&dyn CacheView<K, V>, &K, Option<u64>) -> FFut,
        FFut: Future<Output = Result<V, E>>,
        U: FnOnce(&dyn CacheView<K, V>, &V, F) -> UFut,
        UFut: Future<Output = Result<V, E>>,
    {
        self.set_item_async(key, factory, duration).await
    }

    fn get_or_set(&mut self, _key: K, value: V, _duration: Option<u64>) -> V {
        value
    }

    fn get_or_set_if<F>(&mut self, _key: K, value: V, _check: F, _duration: Option<u64>) -> V
    where
        F: FnOnce(&dyn CacheView<K, V>, &V) -> bool,
    {
        value
    }

    fn get_or_set_with<F>(&mut self, key: K, factory: F, duration: Option<u64>) -> V
    where
        F: FnOnce(&dyn CacheView<K, V>, &K, Option<u64>) -> V,
    {
        self.set_item_with(key, factory, duration)
    }

    async fn get_or_set_async<F, FFut, Q, QFut, E>(
        &mut self,
        key: K,
        factory: F,
        _check: Q,
        duration: Option<u64>,
    ) -> Result<V, E>
    where
        F: FnOnce(&dyn CacheView<K, V>, &K, Option<u64>) -> FFut,
        FFut: Future<Output = Result<V, E>>,
        Q: FnOnce(&dyn CacheView<K, V>, &V) -> QFut,
        QFut: Future<Output = Result<bool, E>>,
    {
        self.set_item_async(key, factory, duration).await
    }

    fn remove(&mut self, _key: &K) -> bool {
        false
    }

    fn contains(&self, _value: &V) -> bool
    where
        V: PartialEq,
    {
        false
    }

    fn contains_with<Q>(&self, _value: &V, _comparer: Q) -> bool
    where
        Q: EqualityComparer<V>,
    {
        false
    }

    fn clean(&mut self) {}

    fn clear(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::convert::Infallible;
    use tokio_test::block_on;

    type TestCache = NullCache<&'static str, i32>;

    #[test]
    fn test_null_cache_never_stores() {
        let mut cache = TestCache::new(CacheConfig::new(5000));

        assert_eq!(cache.set_item("key1", 24, None), 24);

        assert_eq!(cache.len(), 0);
        assert!(!cache.exists(&"key1"));
        assert_eq!(cache.get_item(&"key1"), None);
        assert!(cache.get_entry(&"key1").is_none());
        assert!(!cache.remove(&"key1"));
        assert!(!cache.contains(&24));
        assert!(!cache.contains_with(&24, |a: &i32, b: &i32| a == b));
        assert_eq!(cache.name(), "NullCache");
    }

    #[test]
    fn test_null_cache_never_runs_checks_or_updates() {
        let mut cache = TestCache::default();
        let called = Cell::new(false);

        let value = cache.get_item_if(&"key1", |_, _| {
            called.set(true);
            true
        });
        assert_eq!(value, None);

        let update = |_: &dyn CacheView<&'static str, i32>, old: &i32, _: i32| {
            called.set(true);
            old + 1
        };
        assert_eq!(cache.add_or_update("key1", 30, update, None), 30);
        assert_eq!(cache.get_or_set_if("key1", 7, |_, _| true, None), 7);
        assert!(!called.get());
    }

    #[test]
    fn test_null_cache_runs_factories() {
        let mut cache = TestCache::default();

        let value = cache.set_item_with("k", |c, _, _| c.len() as i32 + 40, None);
        assert_eq!(value, 40);
        assert_eq!(cache.get_or_set_with("k", |_, _, _| 41, None), 41);

        let value = cache.add_or_update_with("k", |_, _, _| 42, |_, old, _| old + 1, None);
        assert_eq!(value, 42);
        assert_eq!(cache.get_or_set("k", 43, None), 43);
    }

    #[test]
    fn test_null_cache_async() {
        let mut cache = TestCache::default();

        let value = block_on(cache.set_item_async(
            "k",
            |_, _, _| async { Ok::<_, Infallible>(5) },
            None,
        ));
        assert_eq!(value, Ok(5));

        let pending = cache.get_item_async(&"k", |_, _| async { Ok::<_, Infallible>(true) });
        assert_eq!(block_on(pending), Ok(None));

        let value = block_on(cache.get_or_set_async(
            "k",
            |_, _, _| async { Ok::<_, &str>(6) },
            |_, _| async { Ok(true) },
            None,
        ));
        assert_eq!(value, Ok(6));

        let value = block_on(cache.get_or_compute_async(
            "k",
            |_, _, _| async { Ok::<_, Infallible>(8) },
            None,
        ));
        assert_eq!(value, Ok(8));

        let value = block_on(cache.add_or_update_async(
            "k",
            |_, _, _| async { Err("offline") },
            |_, _, _| async { Ok(1) },
            None,
        ));
        assert_eq!(value, Err("offline"));
    }

    #[test]
    fn test_null_cache_maintenance_is_noop() {
        let mut cache = TestCache::default();
        cache.clean();
        cache.clear();
        assert!(cache.is_empty());
    }
}
