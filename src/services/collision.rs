//! Assignment-time uniqueness
//!
//! The cached candidate is only a proposal; callers run it through
//! [`CollisionResolver`] inside their own storage transaction.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::errors::{Result, SmartSlugError};
use crate::models::SlugCandidate;
use crate::utils::{base36, fit_segments, to_pascal_case};

/// Length of the disambiguating suffix segment
const SUFFIX_LEN: usize = 4;

/// Existence check backed by the external URL-record store
#[async_trait]
pub trait SlugExistence: Send + Sync {
    async fn exists(&self, slug: &str) -> Result<bool>;
}

/// Millisecond clock, injectable for reproducible suffixes
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> u64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        chrono::Utc::now().timestamp_millis().max(0) as u64
    }
}

/// Clock frozen at a given instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub u64);

impl Clock for FixedClock {
    fn now_millis(&self) -> u64 {
        self.0
    }
}

pub struct CollisionResolver {
    clock: Arc<dyn Clock>,
    max_attempts: u32,
    max_length: usize,
}

impl CollisionResolver {
    pub fn new(clock: Arc<dyn Clock>, max_attempts: u32, max_length: usize) -> Self {
        Self {
            clock,
            max_attempts,
            max_length,
        }
    }

    /// Suffix token for a retry attempt (1-based)
    ///
    /// Last four base-36 digits of `clock + attempt`, first one upper-cased.
    pub fn suffix_for(&self, attempt: u32) -> String {
        let token = base36(self.clock.now_millis().wrapping_add(attempt as u64));
        let start = token.len().saturating_sub(SUFFIX_LEN);
        to_pascal_case(&token[start..])
    }

    /// `base` with a suffix segment, trimmed to the length budget
    pub fn with_suffix(&self, base: &str, suffix: &str) -> String {
        let room = self.max_length.saturating_sub(suffix.len() + 1).max(1);
        let segments: Vec<String> = base.split('.').map(str::to_string).collect();
        let mut segments = fit_segments(segments, room);
        if segments
            .last()
            .is_some_and(|last| last.eq_ignore_ascii_case(suffix))
        {
            segments.pop();
        }
        segments.push(suffix.to_string());
        segments.join(".")
    }

    /// Return a candidate whose slug is free, or `SlugExhausted`
    ///
    /// Calls `exists` once for the original slug and once per suffixed
    /// attempt, at most `max_attempts` suffixed attempts.
    pub async fn resolve(
        &self,
        candidate: &SlugCandidate,
        existence: &dyn SlugExistence,
    ) -> Result<SlugCandidate> {
        if !existence.exists(&candidate.slug).await? {
            return Ok(candidate.clone());
        }
        debug!("Slug '{}' is taken, trying suffixes", candidate.slug);

        for attempt in 1..=self.max_attempts {
            let suffix = self.suffix_for(attempt);
            let slug = self.with_suffix(&candidate.slug, &suffix);
            if !existence.exists(&slug).await? {
                debug!("Resolved collision for '{}' as '{}'", candidate.slug, slug);
                return Ok(SlugCandidate {
                    slug,
                    ..candidate.clone()
                });
            }
        }

        warn!(
            "Exhausted {} collision attempts for '{}'",
            self.max_attempts, candidate.slug
        );
        Err(SmartSlugError::slug_exhausted(format!(
            "No free variant of '{}' after {} attempts",
            candidate.slug, self.max_attempts
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver(max_length: usize) -> CollisionResolver {
        CollisionResolver::new(Arc::new(FixedClock(1_700_000_000_000)), 5, max_length)
    }

    #[test]
    fn test_suffix_is_deterministic_per_attempt() {
        let r = resolver(50);
        assert_eq!(r.suffix_for(0), "3v28");
        assert_eq!(r.suffix_for(1), "3v29");
        assert_eq!(r.suffix_for(1), r.suffix_for(1));
    }

    #[test]
    fn test_with_suffix_respects_budget() {
        let r = resolver(20);
        let slug = r.with_suffix("Alpha.Bravo.Charlie.Delta", "3v29");
        assert_eq!(slug, "Alpha.Bravo.3v29");
        assert!(slug.len() <= 20);
    }
}
