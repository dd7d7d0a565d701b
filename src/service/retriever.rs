//! Retrieval coordinator
//!
//! Walks the tiers in order (index 0 first) and only asks the source when
//! no tier holds a fresh entry:
//! 1. Track the entry with the newest `last_modified` seen so far.
//! 2. Stop at the first non-expired tier and return that best entry,
//!    backfilling faster tiers that were empty or held older data.
//! 3. Otherwise fetch (revalidating against the best entry, if any) and
//!    write the result into every tier.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

use crate::cache::key::CacheKey;
use crate::cache::meta::Cached;
use crate::cache::tier::CacheTier;
use crate::core::error::Result;
use crate::core::util::now;
use crate::upstream::Source;

/// What to do when a tier fails to read or write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TierFailurePolicy {
    /// Fail the whole retrieval with the tier's error
    #[default]
    Abort,
    /// Log the failure and carry on as if the tier were empty
    Continue,
}

/// Per-key locks so concurrent retrievals of one key run one at a time
#[derive(Debug, Default)]
struct KeyLocks {
    slots: Mutex<HashMap<CacheKey, Arc<Mutex<()>>>>,
}

impl KeyLocks {
    fn acquire(&self, key: &CacheKey) -> Arc<Mutex<()>> {
        self.slots
            .lock()
            .entry(key.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    fn release(&self, key: &CacheKey, slot: Arc<Mutex<()>>) {
        let mut slots = self.slots.lock();
        drop(slot);
        // Only the map's own handle left: nobody is waiting on this key
        if slots.get(key).is_some_and(|s| Arc::strong_count(s) == 1) {
            slots.remove(key);
        }
    }
}

/// Coordinator over an ordered list of tiers and one source
pub struct Retriever<T> {
    tiers: Vec<Box<dyn CacheTier<T>>>,
    source: Box<dyn Source<T>>,
    policy: TierFailurePolicy,
    locks: KeyLocks,
}

impl<T> Retriever<T> {
    /// `tiers` are consulted in order; put the fastest, most volatile first.
    pub fn new(tiers: Vec<Box<dyn CacheTier<T>>>, source: Box<dyn Source<T>>) -> Self {
        Self {
            tiers,
            source,
            policy: TierFailurePolicy::default(),
            locks: KeyLocks::default(),
        }
    }

    pub fn with_policy(mut self, policy: TierFailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> TierFailurePolicy {
        self.policy
    }

    pub fn tiers(&self) -> &[Box<dyn CacheTier<T>>] {
        &self.tiers
    }

    /// Freshest available document for `key`, fetched from `url` if needed
    pub fn retrieve(&self, key: &CacheKey, url: &str) -> Result<T> {
        let slot = self.locks.acquire(key);
        let result = {
            let _guard = slot.lock();
            self.retrieve_locked(key, url)
        };
        self.locks.release(key, slot);
        result
    }

    /// Remove `key` from every tier
    pub fn clear(&self, key: &CacheKey) -> Result<()> {
        for tier in &self.tiers {
            tier.clear(key)?;
        }
        Ok(())
    }

    fn retrieve_locked(&self, key: &CacheKey, url: &str) -> Result<T> {
        let now = now();
        let mut best: Option<(usize, Cached<T>)> = None;
        let mut last_seen: Vec<Option<DateTime<Utc>>> = vec![None; self.tiers.len()];
        let mut fresh = false;

        for (index, tier) in self.tiers.iter().enumerate() {
            let Some(found) = self.tier_get(tier.as_ref(), key)? else {
                tracing::debug!(tier = tier.name(), key = %key, "miss");
                continue;
            };

            let expired = found.meta.is_expired(now);
            let last_modified = found.meta.last_modified;
            if best
                .as_ref()
                .map_or(true, |(_, b)| last_modified > b.meta.last_modified)
            {
                best = Some((index, found));
            }

            if !expired {
                tracing::debug!(tier = tier.name(), key = %key, "fresh hit");
                fresh = true;
                break;
            }

            tracing::debug!(tier = tier.name(), key = %key, "expired");
            last_seen[index] = Some(last_modified);
        }

        match best {
            Some((origin, cached)) if fresh => {
                self.promote(key, origin, &cached, &last_seen)?;
                Ok(cached.entry)
            }
            prior => {
                let prior = prior.map(|(_, cached)| cached);
                tracing::info!(key = %key, revalidate = prior.is_some(), "fetching from upstream");
                let fetched = self.source.fetch(url, prior)?;
                for tier in &self.tiers {
                    self.tier_set(tier.as_ref(), key, &fetched)?;
                }
                Ok(fetched.entry)
            }
        }
    }

    /// Copy `cached` into faster tiers that were empty or held older data
    fn promote(
        &self,
        key: &CacheKey,
        origin: usize,
        cached: &Cached<T>,
        last_seen: &[Option<DateTime<Utc>>],
    ) -> Result<()> {
        for (tier, seen) in self.tiers.iter().zip(last_seen).take(origin) {
            if seen.map_or(true, |lm| lm < cached.meta.last_modified) {
                tracing::debug!(tier = tier.name(), key = %key, "promoting");
                self.tier_set(tier.as_ref(), key, cached)?;
            }
        }
        Ok(())
    }

    fn tier_get(&self, tier: &dyn CacheTier<T>, key: &CacheKey) -> Result<Option<Cached<T>>> {
        match tier.get(key) {
            Ok(found) => Ok(found),
            Err(e) if self.policy == TierFailurePolicy::Continue => {
                tracing::warn!(tier = tier.name(), key = %key, error = %e, "tier read failed, skipping");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    fn tier_set(&self, tier: &dyn CacheTier<T>, key: &CacheKey, cached: &Cached<T>) -> Result<()> {
        match tier.set(key, &cached.entry, &cached.meta) {
            Ok(()) => Ok(()),
            Err(e) if self.policy == TierFailurePolicy::Continue => {
                tracing::warn!(tier = tier.name(), key = %key, error = %e, "tier write failed, skipping");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}
