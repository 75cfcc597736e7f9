//! Integration Tests for the cache engines
//!
//! Exercises the public API end to end on the wall clock, including async
//! factories and checks that actually suspend.

use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use tokio::sync::Mutex;
use tokio::task::{self, LocalSet};
use tokio::time::sleep;
use ttl_cache::{
    Cache, CacheConfig, CacheEngine, CacheError, CacheView, EngineKind, EqualityComparer, ListCache,
};

// == Helper Functions ==

fn init_tracing() {
    // Several tests race to install the subscriber; only the first one wins.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ttl_cache=debug".into()),
        )
        .with_test_writer()
        .try_init();
}

fn create_test_cache() -> ListCache<&'static str, i32> {
    init_tracing();
    ListCache::new(CacheConfig::new(5000))
}

async fn slow<T>(value: T) -> T {
    sleep(Duration::from_millis(20)).await;
    value
}

// == Expiry ==

#[tokio::test]
async fn test_item_expires_after_duration() {
    let mut cache = create_test_cache();

    cache.set_item("a", 24, Some(500));
    assert_eq!(cache.get_item(&"a"), Some(24));

    sleep(Duration::from_millis(600)).await;

    assert_eq!(cache.get_item(&"a"), None);
    assert!(!cache.exists(&"a"));
    assert_eq!(cache.len(), 1);

    cache.clean();
    assert!(cache.is_empty());
}

#[tokio::test]
async fn test_default_duration_keeps_item_alive() {
    let mut cache = create_test_cache();

    cache.set_item("key1", 24, Some(50));
    cache.set_item("key2", 25, None);

    sleep(Duration::from_millis(80)).await;

    assert_eq!(cache.get_item(&"key1"), None);
    assert_eq!(cache.get_item(&"key2"), Some(25));
}

// == Async Operations ==

#[tokio::test]
async fn test_get_item_async_with_suspending_check() {
    let mut cache = create_test_cache();
    cache.set_item("key1", 24, None);
    cache.set_item("key2", 100, None);

    let value = cache
        .get_item_async(&"key2", |c, _| {
            slow(Ok::<_, anyhow::Error>(c.exists(&"key1")))
        })
        .await
        .unwrap();
    assert_eq!(value, Some(100));

    cache.remove(&"key1");

    let value = cache
        .get_item_async(&"key2", |c, _| {
            slow(Ok::<_, anyhow::Error>(c.exists(&"key1")))
        })
        .await
        .unwrap();
    assert_eq!(value, None);
}

#[tokio::test]
async fn test_set_item_async_with_suspending_factory() {
    let mut cache = create_test_cache();

    let value = cache
        .set_item_async("key1", |_, _, _| slow(Ok::<_, anyhow::Error>(40)), None)
        .await
        .unwrap();

    assert_eq!(value, 40);
    assert_eq!(cache.get_item(&"key1"), Some(40));
}

#[tokio::test]
async fn test_failed_factory_propagates_error_and_commits_nothing() {
    let mut cache = create_test_cache();

    let result = cache
        .set_item_async(
            "key1",
            |_, _, _| async { Err::<i32, _>(anyhow!("backend down")) },
            None,
        )
        .await;

    let err = result.unwrap_err();
    assert_eq!(err.to_string(), "backend down");
    assert!(cache.is_empty());
}

#[tokio::test]
async fn test_add_or_update_async_paths() {
    let mut cache = create_test_cache();

    let value = cache
        .add_or_update_async(
            "key1",
            |_, _, _| slow(Ok::<_, anyhow::Error>(30)),
            |_, old, _| slow(Ok(old + 1)),
            None,
        )
        .await
        .unwrap();
    assert_eq!(value, 30);

    cache.set_item("key1", 24, None);

    let value = cache
        .add_or_update_async(
            "key1",
            |_, _, _| slow(Ok::<_, anyhow::Error>(30)),
            |_, old, _| slow(Ok(old + 1)),
            None,
        )
        .await
        .unwrap();
    assert_eq!(value, 25);
    assert_eq!(cache.get_item(&"key1"), Some(25));
}

#[tokio::test]
async fn test_get_or_compute_async_memoizes() {
    let mut cache = create_test_cache();
    let mut calls = 0;

    for _ in 0..3 {
        calls += 1;
        let attempt = calls;
        let value = cache
            .get_or_compute_async(
                "answer",
                move |_, _, _| slow(Ok::<_, anyhow::Error>(attempt * 10)),
                None,
            )
            .await
            .unwrap();
        assert_eq!(value, 10, "Only the first factory result is kept");
    }
}

// == Scenarios ==

#[test]
fn test_add_or_update_scenario() {
    let mut cache = create_test_cache();

    assert_eq!(cache.add_or_update("x", 30, |_, old, _| old + 1, None), 30);
    assert_eq!(cache.add_or_update("x", 30, |_, old, _| old + 1, None), 31);
}

#[test]
fn test_get_or_set_scenarios() {
    let mut cache = create_test_cache();

    assert_eq!(
        cache.get_or_set_if("k", 1, |_, _| false, None),
        1,
        "Missing key inserts"
    );
    assert_eq!(cache.get_or_set("k", 2, None), 1, "Valid key is kept");
    assert_eq!(
        cache.get_or_set_if("k", 3, |_, current| *current > 5, None),
        3
    );
    assert_eq!(cache.get_item(&"k"), Some(3));
}

#[test]
fn test_contains_with_comparer_object() {
    struct Within(i32);

    impl EqualityComparer<i32> for Within {
        fn equals(&self, left: &i32, right: &i32) -> bool {
            (left - right).abs() <= self.0
        }
    }

    let mut cache = create_test_cache();
    cache.set_item("a", 100, None);
    cache.remove(&"a");

    assert!(!cache.contains(&103));
    assert!(cache.contains_with(&103, Within(5)));
    assert!(!cache.contains_with(&110, Within(5)));
}

// == Factory ==

#[test]
fn test_null_engine_from_json_disables_caching() {
    init_tracing();
    let config = CacheConfig::from_json(r#"{"duration": "5000", "engine": "null"}"#).unwrap();
    let mut cache: Cache<&str, i32> = Cache::from_config(config);

    assert_eq!(cache.kind(), EngineKind::Null);
    assert_eq!(cache.get_or_set("a", 1, None), 1);
    assert_eq!(cache.get_or_set("a", 2, None), 2);
    assert!(!cache.exists(&"a"));
}

#[test]
fn test_unknown_engine_is_rejected() {
    let abstract_err = CacheError::InstantiationOfAbstract("CacheEngine".to_string());
    assert_eq!("abstract".parse::<EngineKind>(), Err(abstract_err));
    assert!(matches!(
        "memcached".parse::<EngineKind>(),
        Err(CacheError::NotImplemented { operation: "new", .. })
    ));
}

// == Shared Access ==

#[tokio::test]
async fn test_shared_cache_serializes_inserts() {
    init_tracing();
    let cache = ListCache::<String, u32>::new(CacheConfig::new(0));
    let cache = Arc::new(Mutex::new(cache));
    let local = LocalSet::new();

    let results = local
        .run_until(async {
            let mut handles = Vec::new();
            for worker in 0..8u32 {
                let cache = cache.clone();
                handles.push(task::spawn_local(async move {
                    let mut guard = cache.lock().await;
                    guard
                        .get_or_compute_async(
                            "shared".to_string(),
                            move |_, _, _| slow(Ok::<_, anyhow::Error>(worker)),
                            None,
                        )
                        .await
                        .unwrap()
                }));
            }

            let mut results = Vec::new();
            for handle in handles {
                results.push(handle.await.unwrap());
            }
            results
        })
        .await;

    let guard = cache.lock().await;
    assert_eq!(guard.len(), 1, "No duplicate entries for the same key");
    assert!(results.iter().all(|value| *value == results[0]));
}
