//! In-process memory tier

use parking_lot::RwLock;
use std::collections::HashMap;

use crate::cache::key::CacheKey;
use crate::cache::meta::{CacheMeta, Cached};
use crate::cache::tier::CacheTier;
use crate::core::error::Result;

/// Map-backed tier. Fast, unbounded, lost on exit.
#[derive(Debug)]
pub struct MemoryTier<T> {
    slots: RwLock<HashMap<CacheKey, Cached<T>>>,
}

impl<T> MemoryTier<T> {
    pub fn new() -> Self {
        Self {
            slots: RwLock::new(HashMap::new()),
        }
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.slots.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.read().is_empty()
    }
}

impl<T> Default for MemoryTier<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> CacheTier<T> for MemoryTier<T>
where
    T: Clone + Send + Sync,
{
    fn name(&self) -> &'static str {
        "memory"
    }

    fn get(&self, key: &CacheKey) -> Result<Option<Cached<T>>> {
        Ok(self.slots.read().get(key).cloned())
    }

    fn set(&self, key: &CacheKey, entry: &T, meta: &CacheMeta) -> Result<()> {
        self.slots
            .write()
            .insert(key.clone(), Cached::new(entry.clone(), *meta));
        Ok(())
    }

    fn clear(&self, key: &CacheKey) -> Result<()> {
        self.slots.write().remove(key);
        Ok(())
    }
}
