//! Read-through slug cache with per-key single-flight
//!
//! 同一个 key 同时只有一个生成任务在跑：
//! - 第一个调用者成为 leader，生成任务被 spawn 出去，取消 leader 不会取消生成
//! - 其他调用者通过 watch channel 等待同一个结果，拿到的 source 是 `cache`
//! - 失败不缓存，所有等待者都收到同一个错误

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use moka::future::Cache;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, trace};

use crate::config::CacheConfig;
use crate::errors::{Result, SmartSlugError};
use crate::models::{SlugCandidate, SlugStyle};
use crate::utils::NormalizedUrl;

type FlightResult = Option<Result<SlugCandidate>>;

/// Cache key for a normalized URL and an optional style
pub fn cache_key(url: &NormalizedUrl, style: Option<SlugStyle>) -> String {
    match style {
        Some(style) => format!("{}#{}", url.cache_key(), style),
        None => url.cache_key(),
    }
}

/// A stored generation result, never mutated after insertion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    pub key: String,
    pub slug: SlugCandidate,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntryView {
    pub key: String,
    pub slug: String,
    pub age_minutes: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub size: usize,
    pub in_flight: usize,
    pub entries: Vec<CacheEntryView>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearResult {
    pub cleared: usize,
}

/// Removes the in-flight registration even if the generation task panics
struct FlightGuard {
    in_flight: Arc<DashMap<String, watch::Receiver<FlightResult>>>,
    key: String,
}

impl Drop for FlightGuard {
    fn drop(&mut self) {
        self.in_flight.remove(&self.key);
    }
}

enum Role {
    Leader(watch::Sender<FlightResult>, watch::Receiver<FlightResult>),
    Follower(watch::Receiver<FlightResult>),
}

pub struct SlugCache {
    entries: Cache<String, CacheEntry>,
    in_flight: Arc<DashMap<String, watch::Receiver<FlightResult>>>,
}

impl SlugCache {
    pub fn new(config: &CacheConfig) -> Self {
        let mut builder =
            Cache::builder().time_to_live(Duration::from_secs(config.ttl_secs.max(1)));
        if config.max_capacity > 0 {
            builder = builder.max_capacity(config.max_capacity);
        }

        debug!(
            "SlugCache initialized with TTL: {}s, max capacity: {}",
            config.ttl_secs, config.max_capacity
        );

        Self {
            entries: builder.build(),
            in_flight: Arc::new(DashMap::new()),
        }
    }

    /// Cached candidate for `key`, tagged as a cache hit
    pub async fn get(&self, key: &str) -> Option<SlugCandidate> {
        let entry = self.entries.get(key).await?;
        trace!("Cache hit: {}", key);
        Some(entry.slug.as_cached())
    }

    /// Return the cached candidate or run `generate` once for all
    /// concurrent callers of the same key
    ///
    /// The caller that starts the flight sees the candidate's real source;
    /// everyone else, including later hits, sees `cache`.
    pub async fn get_or_generate<F, Fut>(&self, key: &str, generate: F) -> Result<SlugCandidate>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<SlugCandidate>> + Send + 'static,
    {
        let mut generate = Some(generate);

        let role = loop {
            if let Some(hit) = self.get(key).await {
                return Ok(hit);
            }

            match self.in_flight.entry(key.to_string()) {
                Entry::Occupied(flight) => break Role::Follower(flight.get().clone()),
                Entry::Vacant(slot) => {
                    // a flight may have finished between the lookup and the lock
                    if self.entries.contains_key(key) {
                        continue;
                    }
                    let (tx, rx) = watch::channel(None);
                    slot.insert(rx.clone());
                    break Role::Leader(tx, rx);
                }
            }
        };

        let (mut rx, is_leader) = match role {
            Role::Follower(rx) => {
                debug!("Joining in-flight generation: {}", key);
                (rx, false)
            }
            Role::Leader(tx, rx) => {
                let generate = generate
                    .take()
                    .ok_or_else(|| SmartSlugError::generation("generator already consumed"))?;
                self.spawn_flight(key.to_string(), tx, generate());
                (rx, true)
            }
        };

        let outcome: FlightResult = rx
            .wait_for(Option::is_some)
            .await
            .map(|value| (*value).clone())
            .map_err(|_| SmartSlugError::generation(format!("generation for '{}' aborted", key)))?;

        match outcome {
            Some(Ok(candidate)) if is_leader => Ok(candidate),
            Some(Ok(candidate)) => Ok(candidate.as_cached()),
            Some(Err(e)) => Err(e),
            None => Err(SmartSlugError::generation(format!(
                "generation for '{}' produced no result",
                key
            ))),
        }
    }

    fn spawn_flight<Fut>(&self, key: String, tx: watch::Sender<FlightResult>, flight: Fut)
    where
        Fut: Future<Output = Result<SlugCandidate>> + Send + 'static,
    {
        let entries = self.entries.clone();
        let guard = FlightGuard {
            in_flight: Arc::clone(&self.in_flight),
            key: key.clone(),
        };

        tokio::spawn(async move {
            let result = flight.await;
            if let Ok(candidate) = &result {
                let entry = CacheEntry {
                    key: key.clone(),
                    slug: candidate.clone(),
                    created_at: Utc::now(),
                };
                entries.insert(key.clone(), entry).await;
                debug!("Cached slug '{}' for {}", candidate.slug, key);
            } else {
                debug!("Generation failed for {}, nothing cached", key);
            }
            // unregister before waking waiters so a retry starts a new flight
            drop(guard);
            let _ = tx.send(Some(result));
        });
    }

    /// Drop one key; returns whether it was cached
    pub async fn invalidate(&self, key: &str) -> bool {
        self.entries.remove(key).await.is_some()
    }

    pub fn stats(&self) -> CacheStats {
        let now = Utc::now();
        let mut entries: Vec<CacheEntryView> = self
            .entries
            .iter()
            .map(|(_, entry)| CacheEntryView {
                key: entry.key.clone(),
                slug: entry.slug.slug.clone(),
                age_minutes: (now - entry.created_at).num_minutes(),
            })
            .collect();
        entries.sort_by(|a, b| a.key.cmp(&b.key));

        CacheStats {
            size: entries.len(),
            in_flight: self.in_flight.len(),
            entries,
        }
    }

    /// Remove every entry; in-flight generations are left alone
    pub async fn clear(&self) -> ClearResult {
        let cleared = self.entries.iter().count();
        self.entries.invalidate_all();
        self.entries.run_pending_tasks().await;
        debug!("SlugCache cleared: {} entries", cleared);
        ClearResult { cleared }
    }
}

impl Default for SlugCache {
    fn default() -> Self {
        Self::new(&CacheConfig::default())
    }
}
