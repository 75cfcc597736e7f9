//! Engine Factory Module
//!
//! `Cache` picks its engine from `CacheConfig::engine`, so switching caching
//! off is a configuration change rather than a code change.

use std::future::Future;

use tracing::info;

use crate::cache::{
    CacheEngine, CacheEntry, CacheView, Clock, EqualityComparer, ListCache, NullCache, SystemClock,
};
use crate::config::{CacheConfig, EngineKind};

// == Cache ==
/// A cache engine selected at runtime.
#[derive(Debug)]
pub enum Cache<K, V, C = SystemClock> {
    List(ListCache<K, V, C>),
    Null(NullCache<K, V>),
}

impl<K, V> Cache<K, V, SystemClock> {
    // == Constructor ==
    /// Builds the engine named by `config.engine` on the wall clock.
    pub fn from_config(config: CacheConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }

    /// Loads the configuration from the environment and builds the engine.
    pub fn from_env() -> crate::error::Result<Self> {
        Ok(Self::from_config(CacheConfig::from_env()?))
    }
}

impl<K, V, C> Cache<K, V, C> {
    /// Builds the engine named by `config.engine` reading time from `clock`.
    pub fn with_clock(config: CacheConfig, clock: C) -> Self {
        info!(
            "Cache engine initialized: engine={}, default_duration={}ms",
            config.engine.engine_name(),
            config.duration
        );
        match config.engine {
            EngineKind::List => Cache::List(ListCache::with_clock(config, clock)),
            EngineKind::Null => Cache::Null(NullCache::new(config)),
        }
    }

    pub fn kind(&self) -> EngineKind {
        match self {
            Cache::List(_) => EngineKind::List,
            Cache::Null(_) => EngineKind::Null,
        }
    }
}

impl<K, V, C> CacheView<K, V> for Cache<K, V, C>
where
    K: PartialEq,
    V: Clone,
    C: Clock,
{
    fn name(&self) -> &'static str {
        match self {
            Cache::List(cache) => cache.name(),
            Cache::Null(cache) => cache.name(),
        }
    }

    fn len(&self) -> usize {
        match self {
            Cache::List(cache) => cache.len(),
            Cache::Null(cache) => cache.len(),
        }
    }

    fn exists(&self, key: &K) -> bool {
        match self {
            Cache::List(cache) => cache.exists(key),
            Cache::Null(cache) => cache.exists(key),
        }
    }

    fn peek(&self, key: &K) -> Option<&V> {
        match self {
            Cache::List(cache) => cache.peek(key),
            Cache::Null(cache) => cache.peek(key),
        }
    }
}

impl<K, V, C> CacheEngine<K, V> for Cache<K, V, C>
where
    K: PartialEq,
    V: Clone,
    C: Clock,
{
    fn config(&self) -> &CacheConfig {
        match self {
            Cache::List(cache) => cache.config(),
            Cache::Null(cache) => cache.config(),
        }
    }

    fn get_entry(&self, key: &K) -> Option<&CacheEntry<K, V>> {
        match self {
            Cache::List(cache) => cache.get_entry(key),
            Cache::Null(cache) => cache.get_entry(key),
        }
    }

    fn get_item(&mut self, key: &K) -> Option<V> {
        match self {
            Cache::List(cache) => cache.get_item(key),
            Cache::Null(cache) => cache.get_item(key),
        }
    }

    fn get_item_if<F>(&mut self, key: &K, check: F) -> Option<V>
    where
        F: FnOnce(&dyn CacheView<K, V>, &V) -> bool,
    {
        match self {
            Cache::List(cache) => cache.get_item_if(key, check),
            Cache::Null(cache) => cache.get_item_if(key, check),
        }
    }

    async fn get_item_async<F, Fut, E>(&mut self, key: &K, check: F) -> Result<Option<V>, E>
    where
        F: FnOnce(&dyn CacheView<K, V>, &V) -> Fut,
        Fut: Future<Output = Result<bool, E>>,
    {
        match self {
            Cache::List(cache) => cache.get_item_async(key, check).await,
            Cache::Null(cache) => cache.get_item_async(key, check).await,
        }
    }

    fn set_item(&mut self, key: K, value: V, duration: Option<u64>) -> V {
        match self {
            Cache::List(cache) => cache.set_item(key, value, duration),
            Cache::Null(cache) => cache.set_item(key, value, duration),
        }
    }

    fn set_item_with<F>(&mut self, key: K, factory: F, duration: Option<u64>) -> V
    where
        F: FnOnce(&dyn CacheView<K, V>, &K, Option<u64>) -> V,
    {
        match self {
            Cache::List(cache) => cache.set_item_with(key, factory, duration),
            Cache::Null(cache) => cache.set_item_with(key, factory, duration),
        }
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
        match self {
            Cache::List(cache) => cache.set_item_async(key, factory, duration).await,
            Cache::Null(cache) => cache.set_item_async(key, factory, duration).await,
        }
    }

    fn add_or_update<U>(&mut self, key: K, value: V, update: U, duration: Option<u64>) -> V
    where
        U: FnOnce(&dyn CacheView<K, V>, &V, V) -> V,
    {
        match self {
            Cache::List(cache) => cache.add_or_update(key, value, update, duration),
            Cache::Null(cache) => cache.add_or_update(key, value, update, duration),
        }
    }

    fn add_or_update_with<F, U>(
        &mut self,
        key: K,
        factory: F,
        update: U,
        duration: Option<u64>,
    ) -> V
    where
        F: FnOnce(&dyn CacheView<K, V>, &K, Option<u64>) -> V,
        U: FnOnce(&dyn CacheView<K, V>, &V, F) -> V,
    {
        match self {
            Cache::List(cache) => cache.add_or_update_with(key, factory, update, duration),
            Cache::Null(cache) => cache.add_or_update_with(key, factory, update, duration),
        }
    }

    async fn add_or_update_async<F, FFut, U, UFut, E>(
        &mut self,
        key: K,
        factory: F,
        update: U,
        duration: Option<u64>,
    ) -> Result<V, E>
    where
        F: FnOnce(&dyn CacheView<K, V>, &K, Option<u64>) -> FFut,
        FFut: Future<Output = Result<V, E>>,
        U: FnOnce(&dyn CacheView<K, V>, &V, F) -> UFut,
        UFut: Future<Output = Result<V, E>>,
    {
        match self {
            Cache::List(cache) => {
                cache
                    .add_or_update_async(key, factory, update, duration)
                    .await
            }
            Cache::Null(cache) => {
                cache
                    .add_or_update_async(key, factory, update, duration)
                    .await
            }
        }
    }

    fn get_or_set(&mut self, key: K, value: V, duration: Option<u64>) -> V {
        match self {
            Cache::List(cache) => cache.get_or_set(key, value, duration),
            Cache::Null(cache) => cache.get_or_set(key, value, duration),
        }
    }

    fn get_or_set_if<F>(&mut self, key: K, value: V, check: F, duration: Option<u64>) -> V
    where
        F: FnOnce(&dyn CacheView<K, V>, &V) -> bool,
    {
        match self {
            Cache::List(cache) => cache.get_or_set_if(key, value, check, duration),
            Cache::Null(cache) => cache.get_or_set_if(key, value, check, duration),
        }
    }

    fn get_or_set_with<F>(&mut self, key: K, factory: F, duration: Option<u64>) -> V
    where
        F: FnOnce(&dyn CacheView<K, V>, &K, Option<u64>) -> V,
    {
        match self {
            Cache::List(cache) => cache.get_or_set_with(key, factory, duration),
            Cache::Null(cache) => cache.get_or_set_with(key, factory, duration),
        }
    }

    async fn get_or_set_async<F, FFut, Q, QFut, E>(
        &mut self,
        key: K,
        factory: F,
        check: Q,
        duration: Option<u64>,
    ) -> Result<V, E>
    where
        F: FnOnce(&dyn CacheView<K, V>, &K, Option<u64>) -> FFut,
        FFut: Future<Output = Result<V, E>>,
        Q: FnOnce(&dyn CacheView<K, V>, &V) -> QFut,
        QFut: Future<Output = Result<bool, E>>,
    {
        match self {
            Cache::List(cache) => cache.get_or_set_async(key, factory, check, duration).await,
            Cache::Null(cache) => cache.get_or_set_async(key, factory, check, duration).await,
        }
    }

    fn remove(&mut self, key: &K) -> bool {
        match self {
            Cache::List(cache) => cache.remove(key),
            Cache::Null(cache) => cache.remove(key),
        }
    }

    fn contains(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        match self {
            Cache::List(cache) => cache.contains(value),
            Cache::Null(cache) => cache.contains(value),
        }
    }

    fn contains_with<Q>(&self, value: &V, comparer: Q) -> bool
    where
        Q: EqualityComparer<V>,
    {
        match self {
            Cache::List(cache) => cache.contains_with(value, comparer),
            Cache::Null(cache) => cache.contains_with(value, comparer),
        }
    }

    fn clean(&mut self) {
        match self {
            Cache::List(cache) => cache.clean(),
            Cache::Null(cache) => cache.clean(),
        }
    }

    fn clear(&mut self) {
        match self {
            Cache::List(cache) => cache.clear(),
            Cache::Null(cache) => cache.clear(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ManualClock;

    #[test]
    fn test_from_config_builds_list_engine() {
        let mut cache: Cache<&str, i32> = Cache::from_config(CacheConfig::new(1000));

        assert_eq!(cache.kind(), EngineKind::List);
        assert_eq!(cache.name(), "ListCache");
        cache.set_item("a", 1, None);
        assert_eq!(cache.get_item(&"a"), Some(1));
        assert_eq!(cache.resolve_duration(None), 1000);
    }

    #[test]
    fn test_from_config_builds_null_engine() {
        let config = CacheConfig::new(1000).with_engine(EngineKind::Null);
        let mut cache: Cache<&str, i32> = Cache::from_config(config);

        assert_eq!(cache.name(), "NullCache");
        assert_eq!(cache.set_item("a", 1, None), 1);
        assert_eq!(cache.get_item(&"a"), None);
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_checks_run_through_dispatch() {
        let clock = ManualClock::new();
        let mut cache: Cache<&str, i32, ManualClock> =
            Cache::with_clock(CacheConfig::new(100), clock.clone());

        cache.set_item("gate", 1, None);
        cache.set_item("data", 2, Some(0));

        assert_eq!(
            cache.get_item_if(&"data", |c, _| c.exists(&"gate")),
            Some(2)
        );

        clock.advance_ms(100);
        cache.clean();

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get_item_if(&"data", |c, _| c.exists(&"gate")), None);
    }
}
