//! Cache Engine Contract
//!
//! `CacheEngine` is the full operation set every engine exposes. Each
//! operation comes in explicit shapes instead of inspecting arguments at
//! runtime: a literal value or a factory (`*_with`), a plain read or a
//! checked read (`*_if`), and a blocking or awaitable variant (`*_async`).
//!
//! Callbacks receive the engine as a `&dyn CacheView`, a read-only view that
//! cannot mutate the cache while the operation is in flight. Futures returned
//! by async callbacks must own their data; compute what you need from the
//! view before building the future.

use std::future::{self, Future};

use crate::cache::{CacheEntry, EqualityComparer};
use crate::config::CacheConfig;

// == Cache View ==
/// Read-only access to an engine, handed to validity checks, factories and
/// update functions.
pub trait CacheView<K, V> {
    /// Concrete engine name, e.g. `"ListCache"`.
    fn name(&self) -> &'static str;

    /// Number of stored entries, tombstones and expired entries included.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True iff an entry for `key` is present and currently valid.
    fn exists(&self, key: &K) -> bool;

    /// Returns the value for `key` if it is valid, without counting a hit.
    fn peek(&self, key: &K) -> Option<&V>;
}

// == Cache Engine ==
/// The operation set of a cache engine.
///
/// Misses are `None`, never errors. Async operations return the caller's
/// error type `E` unchanged when a factory, check or update fails, and leave
/// the cache untouched in that case.
#[allow(async_fn_in_trait)]
pub trait CacheEngine<K, V>: CacheView<K, V>
where
    K: PartialEq,
    V: Clone,
{
    fn config(&self) -> &CacheConfig;

    // == Resolve Duration ==
    /// Returns `explicit` if given, otherwise the configured default TTL.
    fn resolve_duration(&self, explicit: Option<u64>) -> u64 {
        explicit.unwrap_or(self.config().duration)
    }

    /// Returns the first entry stored under `key`, valid or not.
    fn get_entry(&self, key: &K) -> Option<&CacheEntry<K, V>>;

    // == Get ==
    /// Returns the value for `key` if present and valid, counting a hit.
    fn get_item(&mut self, key: &K) -> Option<V>;

    /// Like `get_item`, but the hit must also pass `check`.
    ///
    /// A failing check tombstones the entry and returns `None`.
    fn get_item_if<F>(&mut self, key: &K, check: F) -> Option<V>
    where
        F: FnOnce(&dyn CacheView<K, V>, &V) -> bool;

    /// Awaitable `get_item_if`. The check is not invoked when the entry is
    /// missing or invalid.
    async fn get_item_async<F, Fut, E>(&mut self, key: &K, check: F) -> Result<Option<V>, E>
    where
        F: FnOnce(&dyn CacheView<K, V>, &V) -> Fut,
        Fut: Future<Output = Result<bool, E>>;

    // == Set ==
    /// Stores `value` under `key` and returns it.
    ///
    /// A new entry gets `resolve_duration(duration)`; an existing one is
    /// overwritten in place and keeps its TTL unless `duration` is given.
    fn set_item(&mut self, key: K, value: V, duration: Option<u64>) -> V;

    /// Stores the value produced by `factory(view, &key, duration)`.
    fn set_item_with<F>(&mut self, key: K, factory: F, duration: Option<u64>) -> V
    where
        F: FnOnce(&dyn CacheView<K, V>, &K, Option<u64>) -> V;

    /// Awaits `factory` and stores its value. Nothing is stored if it fails.
    async fn set_item_async<F, Fut, E>(
        &mut self,
        key: K,
        factory: F,
        duration: Option<u64>,
    ) -> Result<V, E>
    where
        F: FnOnce(&dyn CacheView<K, V>, &K, Option<u64>) -> Fut,
        Fut: Future<Output = Result<V, E>>;

    // == Add Or Update ==
    /// Inserts `value` when `key` has no entry; otherwise stores
    /// `update(view, &current, value)`.
    ///
    /// Presence is what decides, so expired and tombstoned entries take the
    /// update path.
    fn add_or_update<U>(&mut self, key: K, value: V, update: U, duration: Option<u64>) -> V
    where
        U: FnOnce(&dyn CacheView<K, V>, &V, V) -> V;

    /// `add_or_update` with a factory for the insert path. The update
    /// function receives the factory as its third argument.
    fn add_or_update_with<F, U>(
        &mut self,
        key: K,
        factory: F,
        update: U,
        duration: Option<u64>,
    ) -> V
    where
        F: FnOnce(&dyn CacheView<K, V>, &K, Option<u64>) -> V,
        U: FnOnce(&dyn CacheView<K, V>, &V, F) -> V;

    /// Awaitable `add_or_update_with`.
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
        UFut: Future<Output = Result<V, E>>;

    // == Get Or Set ==
    /// Returns the cached value, or stores and returns `value` on a miss.
    fn get_or_set(&mut self, key: K, value: V, duration: Option<u64>) -> V;

    /// Returns the cached value if it passes `check`, otherwise stores
    /// and returns `value`.
    fn get_or_set_if<F>(&mut self, key: K, value: V, check: F, duration: Option<u64>) -> V
    where
        F: FnOnce(&dyn CacheView<K, V>, &V) -> bool;

    /// Returns the cached value, or stores and returns what `factory`
    /// produces. The factory only runs on a miss.
    fn get_or_set_with<F>(&mut self, key: K, factory: F, duration: Option<u64>) -> V
    where
        F: FnOnce(&dyn CacheView<K, V>, &K, Option<u64>) -> V;

    /// Awaitable get-or-set: `get_item_async` with `check`, falling back to
    /// `set_item_async` with `factory`.
    ///
    /// A literal value is a factory that ignores its arguments:
    /// `move |_, _, _| async move { Ok(value) }`.
    async fn get_or_set_async<F, FFut, C, CFut, E>(
        &mut self,
        key: K,
        factory: F,
        check: C,
        duration: Option<u64>,
    ) -> Result<V, E>
    where
        F: FnOnce(&dyn CacheView<K, V>, &K, Option<u64>) -> FFut,
        FFut: Future<Output = Result<V, E>>,
        C: FnOnce(&dyn CacheView<K, V>, &V) -> CFut,
        CFut: Future<Output = Result<bool, E>>;

    /// `get_or_set_async` without a validity check: any valid entry is
    /// served, and `factory` is awaited only on a miss.
    async fn get_or_compute_async<F, FFut, E>(
        &mut self,
        key: K,
        factory: F,
        duration: Option<u64>,
    ) -> Result<V, E>
    where
        F: FnOnce(&dyn CacheView<K, V>, &K, Option<u64>) -> FFut,
        FFut: Future<Output = Result<V, E>>,
    {
        let accept = |_: &dyn CacheView<K, V>, _: &V| future::ready(Ok(true));
        self.get_or_set_async(key, factory, accept, duration).await
    }

    // == Maintenance ==
    /// Tombstones the entry for `key`. Returns true iff one was found.
    fn remove(&mut self, key: &K) -> bool;

    /// True iff any entry, valid or not, holds a value equal to `value`.
    fn contains(&self, value: &V) -> bool
    where
        V: PartialEq;

    /// `contains` with a custom comparer.
    fn contains_with<Q>(&self, value: &V, comparer: Q) -> bool
    where
        Q: EqualityComparer<V>;

    /// Physically drops every entry that is not valid right now.
    fn clean(&mut self);

    /// Drops every entry.
    fn clear(&mut self);
}
