//! metcast - Tiered cache-aside retrieval for met.no Locationforecast
//!
//! metcast provides:
//! - An ordered chain of cache tiers (memory, disk) with freshness metadata
//! - Lazy promotion of fresher entries into faster tiers
//! - HTTP conditional revalidation (If-Modified-Since / 304)
//! - A typed Locationforecast document model

pub mod cache;
pub mod core;
pub mod service;
pub mod upstream;

pub use crate::cache::disk::DiskTier;
pub use crate::cache::key::CacheKey;
pub use crate::cache::memory::MemoryTier;
pub use crate::cache::meta::{CacheMeta, Cached};
pub use crate::cache::tier::CacheTier;
pub use crate::core::error::{Error, ErrorCategory, Result};
pub use crate::core::model::Locationforecast;
pub use crate::service::forecast::{ForecastService, ServiceConfig};
pub use crate::service::retriever::{Retriever, TierFailurePolicy};
pub use crate::upstream::conditional::ConditionalFetcher;
pub use crate::upstream::Source;
