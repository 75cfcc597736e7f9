//! List Cache Module
//!
//! Default engine: an insertion-ordered list of entries scanned by key
//! equality. Removal tombstones in place; only `clean` and `clear` shrink
//! the list.

use std::future::Future;

use tracing::{debug, trace};

use crate::cache::{
    CacheEngine, CacheEntry, CacheStats, CacheView, Clock, EqualityComparer, SystemClock,
};
use crate::config::CacheConfig;

const NAME: &str = "ListCache";

// == List Cache ==
/// List-backed cache engine with lazy TTL expiration.
#[derive(Debug)]
pub struct ListCache<K, V, C = SystemClock> {
    config: CacheConfig,
    entries: Vec<CacheEntry<K, V>>,
    stats: CacheStats,
    clock: C,
}

impl<K, V> ListCache<K, V, SystemClock> {
    // == Constructor ==
    /// Creates an empty cache on the wall clock.
    pub fn new(config: CacheConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl<K, V> Default for ListCache<K, V, SystemClock> {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

impl<K, V, C> ListCache<K, V, C> {
    /// Creates an empty cache reading time from `clock`.
    pub fn with_clock(config: CacheConfig, clock: C) -> Self {
        Self {
            config,
            entries: Vec::new(),
            stats: CacheStats::new(),
            clock,
        }
    }

    /// Iterates over all entries in insertion order, tombstones included.
    pub fn iter(&self) -> impl Iterator<Item = &CacheEntry<K, V>> {
        self.entries.iter()
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }
}

impl<K, V, C> ListCache<K, V, C>
where
    K: PartialEq,
    V: Clone,
    C: Clock,
{
    fn position(&self, key: &K) -> Option<usize> {
        self.entries.iter().position(|entry| entry.key() == key)
    }

    fn valid_position(&self, key: &K) -> Option<usize> {
        let now = self.clock.now();
        self.position(key)
            .filter(|&index| self.entries[index].is_valid(now))
    }

    fn miss(&mut self) {
        trace!(engine = NAME, "cache miss");
        self.stats.record_miss();
    }

    fn hit_at(&mut self, index: usize) -> V {
        let now = self.clock.now();
        let entry = &mut self.entries[index];
        entry.hit(now);
        self.stats.record_hit();
        trace!(engine = NAME, hits = entry.hit_count(), "cache hit");
        entry.value().clone()
    }

    /// Serves or tombstones the entry at `index` depending on a validity check.
    fn settle(&mut self, index: usize, accepted: bool) -> Option<V> {
        if accepted {
            return Some(self.hit_at(index));
        }

        self.entries[index].invalidate();
        self.stats.record_invalidation();
        debug!(engine = NAME, "validity check failed, entry invalidated");
        self.miss();
        None
    }

    fn replace_at(&mut self, index: usize, value: V, duration: Option<u64>) -> V {
        let now = self.clock.now();
        self.entries[index].set_value(value.clone(), duration, now);
        debug!(engine = NAME, "entry updated");
        value
    }

    /// Writes `value` into the entry for `key`, creating it if needed.
    fn commit(&mut self, key: K, value: V, duration: Option<u64>) -> V {
        if let Some(index) = self.position(&key) {
            return self.replace_at(index, value, duration);
        }

        let ttl = self.resolve_duration(duration);
        let now = self.clock.now();
        self.entries
            .push(CacheEntry::new(key, value.clone(), ttl, now));
        self.stats.set_total_entries(self.entries.len());
        debug!(engine = NAME, ttl_ms = ttl, "entry inserted");
        value
    }
}

impl<K, V, C> CacheView<K, V> for ListCache<K, V, C>
where
    K: PartialEq,
    V: Clone,
    C: Clock,
{
    fn name(&self) -> &'static str {
        NAME
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn exists(&self, key: &K) -> bool {
        self.valid_position(key).is_some()
    }

    fn peek(&self, key: &K) -> Option<&V> {
        self.valid_position(key)
            .map(|index| self.entries[index].value())
    }
}

impl<K, V, C> CacheEngine<K, V> for ListCache<K, V, C>
where
    K: PartialEq,
    V: Clone,
    C: Clock,
{
    fn config(&self) -> &CacheConfig {
        &self.config
    }

    fn get_entry(&self, key: &K) -> Option<&CacheEntry<K, V>> {
        self.entries.iter().find(|entry| entry.key() == key)
    }

    fn get_item(&mut self, key: &K) -> Option<V> {
        match self.valid_position(key) {
            Some(index) => Some(self.hit_at(index)),
            None => {
                self.miss();
                None
            }
        }
    }

    fn get_item_if<F>(&mut self, key: &K, check: F) -> Option<V>
    where
        F: FnOnce(&dyn CacheView<K, V>, &V) -> bool,
    {
        let Some(index) = self.valid_position(key) else {
            self.miss();
            return None;
        };

        let accepted = {
            let view: &dyn CacheView<K, V> = &*self;
            check(view, self.entries[index].value())
        };
        self.settle(index, accepted)
    }

    async fn get_item_async<F, Fut, E>(&mut self, key: &K, check: F) -> Result<Option<V>, E>
    where
        F: FnOnce(&dyn CacheView<K, V>, &V) -> Fut,
        Fut: Future<Output = Result<bool, E>>,
    {
        let Some(index) = self.valid_position(key) else {
            self.miss();
            return Ok(None);
        };

        let pending = {
            let view: &dyn CacheView<K, V> = &*self;
            check(view, self.entries[index].value())
        };
        let accepted = pending.await?;
        Ok(self.settle(index, accepted))
    }

    fn set_item(&mut self, key: K, value: V, duration: Option<u64>) -> V {
        self.commit(key, value, duration)
    }

    fn set_item_with<F>(&mut self, key: K, factory: F, duration: Option<u64>) -> V
    where
        F: FnOnce(&dyn CacheView<K, V>, &K, Option<u64>) -> V,
    {
        let value = {
            let view: &dyn CacheView<K, V> = &*self;
            factory(view, &key, duration)
        };
        self.commit(key, value, duration)
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
        let value = pending.await?;
        Ok(self.commit(key, value, duration))
    }

    fn add_or_update<U>(&mut self, key: K, value: V, update: U, duration: Option<u64>) -> V
    where
        U: FnOnce(&dyn CacheView<K, V>, &V, V) -> V,
    {
        let Some(index) = self.position(&key) else {
            return self.commit(key, value, duration);
        };

        let next = {
            let view: &dyn CacheView<K, V> = &*self;
            update(view, self.entries[index].value(), value)
        };
        self.replace_at(index, next, duration)
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
        let Some(index) = self.position(&key) else {
            return self.set_item_with(key, factory, duration);
        };

        let next = {
            let view: &dyn CacheView<K, V> = &*self;
            update(view, self.entries[index].value(), factory)
        };
        self.replace_at(index, next, duration)
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
        let Some(index) = self.position(&key) else {
            return self.set_item_async(key, factory, duration).await;
        };

        let pending = {
            let view: &dyn CacheView<K, V> = &*self;
            update(view, self.entries[index].value(), factory)
        };
        let next = pending.await?;
        Ok(self.replace_at(index, next, duration))
    }

    fn get_or_set(&mut self, key: K, value: V, duration: Option<u64>) -> V {
        match self.get_item(&key) {
            Some(cached) => cached,
            None => self.set_item(key, value, duration),
        }
    }

    fn get_or_set_if<F>(&mut self, key: K, value: V, check: F, duration: Option<u64>) -> V
    where
        F: FnOnce(&dyn CacheView<K, V>, &V) -> bool,
    {
        match self.get_item_if(&key, check) {
            Some(cached) => cached,
            None => self.set_item(key, value, duration),
        }
    }

    fn get_or_set_with<F>(&mut self, key: K, factory: F, duration: Option<u64>) -> V
    where
        F: FnOnce(&dyn CacheView<K, V>, &K, Option<u64>) -> V,
    {
        match self.get_item(&key) {
            Some(cached) => cached,
            None => self.set_item_with(key, factory, duration),
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
        if let Some(cached) = self.get_item_async(&key, check).await? {
            return Ok(cached);
        }
        self.set_item_async(key, factory, duration).await
    }

    fn remove(&mut self, key: &K) -> bool {
        let Some(index) = self.position(key) else {
            return false;
        };

        self.entries[index].invalidate();
        self.stats.record_invalidation();
        debug!(engine = NAME, "entry removed");
        true
    }

    fn contains(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.entries.iter().any(|entry| entry.value() == value)
    }

    fn contains_with<Q>(&self, value: &V, comparer: Q) -> bool
    where
        Q: EqualityComparer<V>,
    {
        self.entries
            .iter()
            .any(|entry| comparer.equals(entry.value(), value))
    }

    // == Clean ==
    fn clean(&mut self) {
        let now = self.clock.now();
        let before = self.entries.len();
        self.entries.retain(|entry| entry.is_valid(now));

        let purged = before - self.entries.len();
        self.stats.record_purge(purged);
        self.stats.set_total_entries(self.entries.len());

        if purged > 0 {
            debug!(engine = NAME, purged, "clean: removed invalid entries");
        } else {
            trace!(engine = NAME, "clean: no invalid entries found");
        }
    }

    fn clear(&mut self) {
        let purged = self.entries.len();
        self.entries.clear();
        self.stats.record_purge(purged);
        self.stats.set_total_entries(0);
        debug!(engine = NAME, purged, "cache cleared");
    }
}
