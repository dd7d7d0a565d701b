//! Default filesystem locations

use std::path::PathBuf;

/// Directory name used under the user's cache directory
pub const CACHE_DIR_NAME: &str = "metcast";

/// Get the default disk cache directory (`<user cache dir>/metcast`)
pub fn default_cache_dir() -> Option<PathBuf> {
    dirs::cache_dir().map(|dir| dir.join(CACHE_DIR_NAME))
}
