//! Cache tier contract

use crate::cache::key::CacheKey;
use crate::cache::meta::{CacheMeta, Cached};
use crate::core::error::Result;

/// One storage backend in the ordered cache chain.
///
/// Implementations own their stored entries; nothing returned by `get`
/// aliases the tier's storage.
pub trait CacheTier<T>: Send + Sync {
    /// Short name used in logs and errors
    fn name(&self) -> &'static str;

    /// Stored entry and metadata for `key`, or `None` when nothing is stored
    fn get(&self, key: &CacheKey) -> Result<Option<Cached<T>>>;

    /// Replace whatever is stored for `key`
    fn set(&self, key: &CacheKey, entry: &T, meta: &CacheMeta) -> Result<()>;

    /// Remove any stored entry for `key`. Clearing an absent key succeeds.
    fn clear(&self, key: &CacheKey) -> Result<()>;
}

impl<T, C> CacheTier<T> for std::sync::Arc<C>
where
    C: CacheTier<T> + ?Sized,
{
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn get(&self, key: &CacheKey) -> Result<Option<Cached<T>>> {
        (**self).get(key)
    }

    fn set(&self, key: &CacheKey, entry: &T, meta: &CacheMeta) -> Result<()> {
        (**self).set(key, entry, meta)
    }

    fn clear(&self, key: &CacheKey) -> Result<()> {
        (**self).clear(key)
    }
}
