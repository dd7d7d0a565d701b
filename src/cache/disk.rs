//! Disk tier - Two JSON files per key under a cache directory
//!
//! - `metno-<key>.json` holds the payload
//! - `metno-<key>-info.json` holds the freshness metadata
//!
//! A payload without readable metadata is reported as absent.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use crate::cache::key::CacheKey;
use crate::cache::meta::{CacheMeta, Cached};
use crate::cache::tier::CacheTier;
use crate::core::error::{Error, Result};

const TIER_NAME: &str = "disk";

/// File name prefix shared by payload and metadata files
pub const FILE_PREFIX: &str = "metno-";

/// Filesystem-backed tier. Without a directory every operation is a no-op.
#[derive(Debug, Clone, Default)]
pub struct DiskTier {
    dir: Option<PathBuf>,
}

impl DiskTier {
    /// Create a tier rooted at `dir`. An empty path disables the tier.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Self {
            dir: (!dir.as_os_str().is_empty()).then_some(dir),
        }
    }

    /// A tier that stores nothing
    pub fn disabled() -> Self {
        Self { dir: None }
    }

    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    pub fn is_enabled(&self) -> bool {
        self.dir.is_some()
    }

    /// Payload and metadata paths for `key`
    pub fn paths_for(&self, key: &CacheKey) -> Option<(PathBuf, PathBuf)> {
        self.dir.as_ref().map(|dir| {
            (
                dir.join(format!("{}{}.json", FILE_PREFIX, key)),
                dir.join(format!("{}{}-info.json", FILE_PREFIX, key)),
            )
        })
    }

    /// Read only the metadata file for `key`
    pub fn read_meta(&self, key: &CacheKey) -> Result<Option<CacheMeta>> {
        match self.paths_for(key) {
            Some((_, meta_path)) => read_json(&meta_path),
            None => Ok(None),
        }
    }
}

impl<T> CacheTier<T> for DiskTier
where
    T: Serialize + DeserializeOwned + Send + Sync,
{
    fn name(&self) -> &'static str {
        TIER_NAME
    }

    fn get(&self, key: &CacheKey) -> Result<Option<Cached<T>>> {
        let Some((data_path, meta_path)) = self.paths_for(key) else {
            return Ok(None);
        };

        let Some(entry) = read_json::<T>(&data_path)? else {
            return Ok(None);
        };
        let Some(meta) = read_json::<CacheMeta>(&meta_path)? else {
            tracing::debug!(key = %key, "payload without metadata, treating as absent");
            return Ok(None);
        };

        Ok(Some(Cached::new(entry, meta)))
    }

    fn set(&self, key: &CacheKey, entry: &T, meta: &CacheMeta) -> Result<()> {
        let (Some(dir), Some((data_path, meta_path))) = (self.dir(), self.paths_for(key)) else {
            return Ok(());
        };

        fs::create_dir_all(dir).map_err(|source| io_error(dir, source))?;

        // Drop the old metadata first: an interrupted write then reads back
        // as "payload without metadata" instead of new payload + old expiry.
        remove_if_exists(&meta_path)?;
        write_json_atomic(dir, &data_path, entry)?;
        write_json_atomic(dir, &meta_path, meta)?;

        Ok(())
    }

    fn clear(&self, key: &CacheKey) -> Result<()> {
        let Some((data_path, meta_path)) = self.paths_for(key) else {
            return Ok(());
        };
        remove_if_exists(&data_path)?;
        remove_if_exists(&meta_path)?;
        Ok(())
    }
}

fn io_error(path: &Path, source: std::io::Error) -> Error {
    Error::TierIo {
        tier: TIER_NAME,
        path: path.to_path_buf(),
        source,
    }
}

/// Read and decode a JSON file. Missing or undecodable files yield `None`.
fn read_json<V: DeserializeOwned>(path: &Path) -> Result<Option<V>> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(io_error(path, e)),
    };

    match serde_json::from_slice(&bytes) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring corrupt cache file");
            Ok(None)
        }
    }
}

/// Write pretty JSON through a temp file in `dir`, then rename over `path`
fn write_json_atomic<V: Serialize + ?Sized>(dir: &Path, path: &Path, value: &V) -> Result<()> {
    let json = serde_json::to_vec_pretty(value).map_err(|source| Error::TierEncode {
        tier: TIER_NAME,
        path: path.to_path_buf(),
        source,
    })?;

    let mut file = NamedTempFile::new_in(dir).map_err(|e| io_error(dir, e))?;
    file.write_all(&json).map_err(|e| io_error(file.path(), e))?;
    file.persist(path).map_err(|e| io_error(path, e.error))?;

    Ok(())
}

fn remove_if_exists(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(io_error(path, e)),
    }
}
