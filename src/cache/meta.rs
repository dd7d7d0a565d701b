//! Cache freshness metadata

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Freshness record stored next to every cached entry.
///
/// Both fields are absolute points in time. A default (epoch) `last_modified`
/// marks an entry that never came from the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheMeta {
    /// End of the validity window
    pub expires: DateTime<Utc>,

    /// Modification time reported by the upstream
    pub last_modified: DateTime<Utc>,
}

impl CacheMeta {
    pub fn new(expires: DateTime<Utc>, last_modified: DateTime<Utc>) -> Self {
        Self {
            expires,
            last_modified,
        }
    }

    /// An entry is expired once `now` is past its `expires`
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires
    }

    /// Whether `last_modified` can back an `If-Modified-Since` request
    pub fn has_validator(&self) -> bool {
        self.last_modified != DateTime::<Utc>::default()
    }
}

/// An entry together with its freshness record
#[derive(Debug, Clone, PartialEq)]
pub struct Cached<T> {
    pub entry: T,
    pub meta: CacheMeta,
}

impl<T> Cached<T> {
    pub fn new(entry: T, meta: CacheMeta) -> Self {
        Self { entry, meta }
    }
}
