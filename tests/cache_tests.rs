//! Single-flight cache tests

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use futures_util::future::join_all;
use smartslug::cache::SlugCache;
use smartslug::config::CacheConfig;
use smartslug::errors::SmartSlugError;
use smartslug::models::{Confidence, SlugCandidate, SlugSource};

fn candidate(slug: &str) -> SlugCandidate {
    SlugCandidate::new(slug, SlugSource::Ai, Confidence::High)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_callers_share_one_generation() {
    let cache = Arc::new(SlugCache::default());
    let calls = Arc::new(AtomicUsize::new(0));

    let tasks = (0..32).map(|_| {
        let cache = Arc::clone(&cache);
        let calls = Arc::clone(&calls);
        tokio::spawn(async move {
            cache
                .get_or_generate("example.com/shoes", move || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(50)).await;
                    Ok(candidate("Example.Shoes"))
                })
                .await
        })
    });
    let results: Vec<SlugCandidate> = join_all(tasks)
        .await
        .into_iter()
        .map(|joined| joined.unwrap().unwrap())
        .collect();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    let first = &results[0];
    assert!(results.iter().all(|r| r.same_proposal(first)));
    assert_eq!(
        results.iter().filter(|r| r.source != SlugSource::Cache).count(),
        1
    );
    assert!(results.iter().any(|r| r.source == SlugSource::Ai));
    assert_eq!(cache.stats().in_flight, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_distinct_keys_do_not_serialize() {
    let cache = Arc::new(SlugCache::default());
    let started = std::time::Instant::now();

    let tasks = (0..8).map(|i| {
        let cache = Arc::clone(&cache);
        tokio::spawn(async move {
            cache
                .get_or_generate(&format!("key-{}", i), move || async move {
                    tokio::time::sleep(Duration::from_millis(200)).await;
                    Ok(candidate(&format!("Slug{}", i)))
                })
                .await
        })
    });
    for joined in join_all(tasks).await {
        assert_eq!(joined.unwrap().unwrap().source, SlugSource::Ai);
    }
    assert!(started.elapsed() < Duration::from_millis(1000));
    assert_eq!(cache.stats().size, 8);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_failure_reaches_every_waiter_and_is_not_cached() {
    let cache = Arc::new(SlugCache::default());
    let calls = Arc::new(AtomicUsize::new(0));

    let tasks = (0..5).map(|_| {
        let cache = Arc::clone(&cache);
        let calls = Arc::clone(&calls);
        tokio::spawn(async move {
            cache
                .get_or_generate("k", move || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(50)).await;
                    Err::<SlugCandidate, _>(SmartSlugError::generation("provider down"))
                })
                .await
        })
    });
    for joined in join_all(tasks).await {
        assert!(matches!(joined.unwrap(), Err(SmartSlugError::Generation(_))));
    }
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(cache.get("k").await.is_none());

    let retried = cache
        .get_or_generate("k", || async { Ok(candidate("Recovered")) })
        .await
        .unwrap();
    assert_eq!(retried.slug, "Recovered");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_cancelled_leader_still_populates_cache() {
    let cache = Arc::new(SlugCache::default());

    let leader = {
        let cache = Arc::clone(&cache);
        tokio::spawn(async move {
            cache
                .get_or_generate("k", || async {
                    tokio::time::sleep(Duration::from_millis(100)).await;
                    Ok(candidate("Survivor"))
                })
                .await
        })
    };
    tokio::time::sleep(Duration::from_millis(20)).await;
    leader.abort();

    tokio::time::sleep(Duration::from_millis(200)).await;
    let hit = cache.get("k").await.expect("flight completed");
    assert_eq!(hit.slug, "Survivor");
    assert_eq!(hit.source, SlugSource::Cache);
}

#[tokio::test]
async fn test_ttl_expiry() {
    let cache = SlugCache::new(&CacheConfig {
        ttl_secs: 1,
        max_capacity: 100,
    });
    cache
        .get_or_generate("k", || async { Ok(candidate("Short.Lived")) })
        .await
        .unwrap();
    assert!(cache.get("k").await.is_some());

    tokio::time::sleep(Duration::from_millis(1200)).await;
    assert!(cache.get("k").await.is_none());
}

#[tokio::test]
async fn test_clear_reports_count() {
    let cache = SlugCache::default();
    for key in ["a", "b", "c"] {
        cache
            .get_or_generate(key, move || async move { Ok(candidate(&key.to_uppercase())) })
            .await
            .unwrap();
    }
    assert_eq!(cache.stats().size, 3);
    assert_eq!(cache.clear().await.cleared, 3);
    assert_eq!(cache.stats().size, 0);
    assert!(cache.stats().entries.is_empty());
}
