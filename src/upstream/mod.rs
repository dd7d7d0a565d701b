//! Upstream module - Where documents come from when no tier is fresh
//!
//! Provides:
//! - The Source trait consulted by the retriever
//! - conditional: HTTP GET with If-Modified-Since revalidation

pub mod conditional;

use crate::cache::meta::Cached;
use crate::core::error::Result;

/// Origin of documents behind the cache tiers.
///
/// `prior` is the best entry the tiers hold (possibly expired); a source
/// may use it to revalidate instead of downloading again.
pub trait Source<T>: Send + Sync {
    fn fetch(&self, url: &str, prior: Option<Cached<T>>) -> Result<Cached<T>>;
}

impl<T, S> Source<T> for std::sync::Arc<S>
where
    S: Source<T> + ?Sized,
{
    fn fetch(&self, url: &str, prior: Option<Cached<T>>) -> Result<Cached<T>> {
        (**self).fetch(url, prior)
    }
}
