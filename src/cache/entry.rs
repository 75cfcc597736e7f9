//! Cache Entry Module
//!
//! Defines the record for one cached value and its TTL bookkeeping.

use chrono::{DateTime, Utc};

// == Cache Entry ==
/// A single cached value with its lifecycle metadata.
///
/// All mutation goes through `set_value`, `hit` and `invalidate` so the
/// engine never edits timestamps directly.
#[derive(Debug, Clone)]
pub struct CacheEntry<K, V> {
    key: K,
    value: V,
    created_at: DateTime<Utc>,
    /// TTL in milliseconds, 0 = never expires
    duration_ms: u64,
    hit_count: u64,
    last_hit_at: Option<DateTime<Utc>>,
    tombstoned: bool,
}

impl<K, V> CacheEntry<K, V> {
    // == Constructor ==
    /// Creates an entry created at `now` with the given TTL in milliseconds.
    pub fn new(key: K, value: V, duration_ms: u64, now: DateTime<Utc>) -> Self {
        Self {
            key,
            value,
            created_at: now,
            duration_ms,
            hit_count: 0,
            last_hit_at: None,
            tombstoned: false,
        }
    }

    // == Set Value ==
    /// Replaces the value and restarts the entry's lifetime.
    ///
    /// Hit tracking is reset and a tombstone is lifted. `duration_ms` replaces
    /// the TTL when given, otherwise the previous TTL is kept.
    pub fn set_value(&mut self, value: V, duration_ms: Option<u64>, now: DateTime<Utc>) {
        self.value = value;
        self.created_at = now;
        self.hit_count = 0;
        self.last_hit_at = None;
        self.tombstoned = false;
        if let Some(duration_ms) = duration_ms {
            self.duration_ms = duration_ms;
        }
    }

    // == Is Valid ==
    /// Checks whether the entry may still be served at `now`.
    ///
    /// A tombstoned entry is never valid. Otherwise a zero TTL is always
    /// valid, and a positive TTL holds while `0 <= now - created_at < ttl`.
    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        if self.tombstoned {
            return false;
        }
        if self.duration_ms == 0 {
            return true;
        }

        let elapsed = (now - self.created_at).num_milliseconds();
        elapsed >= 0 && (elapsed as u64) < self.duration_ms
    }

    // == Hit ==
    /// Records a successful, validated read.
    pub fn hit(&mut self, now: DateTime<Utc>) {
        self.hit_count += 1;
        self.last_hit_at = Some(now);
    }

    // == Invalidate ==
    /// Tombstones the entry; it stays in place until the next clean.
    pub fn invalidate(&mut self) {
        self.tombstoned = true;
    }

    // == Time To Live ==
    /// Returns remaining TTL in milliseconds, or None if the entry never expires.
    ///
    /// # Returns
    /// - `Some(0)` if the entry is expired or tombstoned
    /// - `Some(remaining_ms)` if the entry has a TTL and is still valid
    /// - `None` if the entry has no TTL and is not tombstoned
    pub fn ttl_remaining_ms(&self, now: DateTime<Utc>) -> Option<u64> {
        if self.tombstoned {
            return Some(0);
        }
        if self.duration_ms == 0 {
            return None;
        }
        if !self.is_valid(now) {
            return Some(0);
        }

        let elapsed = (now - self.created_at).num_milliseconds() as u64;
        Some(self.duration_ms - elapsed)
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    /// Number of successful reads since the value was last set.
    pub fn hit_count(&self) -> u64 {
        self.hit_count
    }

    pub fn last_hit_at(&self) -> Option<DateTime<Utc>> {
        self.last_hit_at
    }

    pub fn is_tombstoned(&self) -> bool {
        self.tombstoned
    }
}
