//! TTL Cache - An in-process, key-addressed cache
//!
//! Memoizes values for a bounded duration with lazy expiration, caller
//! supplied validity checks and get-or-compute helpers, in blocking and
//! awaitable forms.
//!
//! ```
//! use ttl_cache::{CacheConfig, CacheEngine, CacheView, ListCache};
//!
//! let mut cache: ListCache<&str, i32> = ListCache::new(CacheConfig::new(5_000));
//! cache.set_item("answer", 42, None);
//! assert_eq!(cache.get_item(&"answer"), Some(42));
//!
//! let value = cache.get_or_set_with("answer", |_, _, _| unreachable!(), None);
//! assert_eq!(value, 42);
//! assert!(cache.exists(&"answer"));
//! ```

pub mod cache;
pub mod config;
pub mod error;

pub use cache::{
    Cache, CacheEngine, CacheEntry, CacheStats, CacheView, Clock, EqualityComparer, ListCache,
    ManualClock, NullCache, SystemClock,
};
pub use config::{CacheConfig, EngineKind};
pub use error::{CacheError, Result};
