//! Locationforecast service
//!
//! Wires a memory tier, a disk tier and the conditional fetcher into a
//! retriever, and maps `(latitude, longitude, altitude)` to a cache key and
//! an upstream URL.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::cache::disk::DiskTier;
use crate::cache::key::{fixed4, CacheKey};
use crate::cache::memory::MemoryTier;
use crate::cache::tier::CacheTier;
use crate::core::error::{Error, Result};
use crate::core::model::Locationforecast;
use crate::service::retriever::{Retriever, TierFailurePolicy};
use crate::upstream::conditional::ConditionalFetcher;
use crate::upstream::Source;

/// Locationforecast 2.0 `complete` endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.met.no/weatherapi/locationforecast/2.0/complete";

/// Default upstream request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Position of the memory tier in the chain
pub const MEMORY_TIER: usize = 0;

/// Position of the disk tier in the chain
pub const DISK_TIER: usize = 1;

/// Everything needed to build a [`ForecastService`]
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Identifies this client to the upstream (`User-Agent`). Required.
    pub client_id: String,
    /// Disk tier directory; `None` disables the disk tier
    pub cache_dir: Option<PathBuf>,
    pub base_url: String,
    pub timeout: Duration,
    pub tier_failure: TierFailurePolicy,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            cache_dir: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            tier_failure: TierFailurePolicy::default(),
        }
    }
}

impl ServiceConfig {
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            ..Default::default()
        }
    }

    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(dir.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_tier_failure(mut self, policy: TierFailurePolicy) -> Self {
        self.tier_failure = policy;
        self
    }
}

/// Build the upstream URL for a point (coordinates fixed to 4 decimals)
pub fn locationforecast_url(base_url: &str, latitude: f64, longitude: f64, altitude: i32) -> String {
    format!(
        "{}?lat={}&lon={}&altitude={}",
        base_url.trim_end_matches(['?', '/']),
        fixed4(latitude),
        fixed4(longitude),
        altitude
    )
}

/// Cached access to Locationforecast documents
pub struct ForecastService<T = Locationforecast> {
    retriever: Retriever<T>,
    disk: DiskTier,
    base_url: String,
}

impl<T> ForecastService<T>
where
    T: Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
{
    /// Fails with a configuration error when `client_id` is empty.
    pub fn new(config: ServiceConfig) -> Result<Self> {
        let fetcher = ConditionalFetcher::new(&config.client_id, config.timeout)?;
        Self::with_source(config, Box::new(fetcher))
    }

    /// Same tiers, but documents come from `source` instead of HTTP.
    ///
    /// The client identifier is still required.
    pub fn with_source(config: ServiceConfig, source: Box<dyn Source<T>>) -> Result<Self> {
        if config.client_id.trim().is_empty() {
            return Err(Error::MissingClientId);
        }

        let disk = config.cache_dir.map(DiskTier::new).unwrap_or_default();

        let memory: Box<dyn CacheTier<T>> = Box::new(MemoryTier::<T>::new());
        let on_disk: Box<dyn CacheTier<T>> = Box::new(disk.clone());
        let tiers = vec![memory, on_disk];

        Ok(Self {
            retriever: Retriever::new(tiers, source).with_policy(config.tier_failure),
            disk,
            base_url: config.base_url,
        })
    }

    /// Freshest forecast for the point, using the network only when needed
    pub fn fetch(&self, latitude: f64, longitude: f64, altitude: i32) -> Result<T> {
        let key = CacheKey::locationforecast(latitude, longitude, altitude);
        let url = locationforecast_url(&self.base_url, latitude, longitude, altitude);
        self.retriever.retrieve(&key, &url)
    }

    /// Drop the point from every tier
    pub fn clear(&self, latitude: f64, longitude: f64, altitude: i32) -> Result<()> {
        self.retriever
            .clear(&CacheKey::locationforecast(latitude, longitude, altitude))
    }

    pub fn retriever(&self) -> &Retriever<T> {
        &self.retriever
    }

    pub fn disk(&self) -> &DiskTier {
        &self.disk
    }
}
