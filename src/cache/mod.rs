//! Cache Module
//!
//! Provides in-process caching with per-entry TTL, validity checks and
//! get-or-compute access.

mod clock;
mod compare;
mod dispatch;
mod engine;
mod entry;
mod list;
mod null;
mod stats;


// Re-export public types
pub use clock::{Clock, ManualClock, SystemClock};
pub use compare::EqualityComparer;
pub use dispatch::Cache;
pub use engine::{CacheEngine, CacheView};
pub use entry::CacheEntry;
pub use list::ListCache;
pub use null::NullCache;
pub use stats::CacheStats;
