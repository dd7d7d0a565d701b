//! Cache module - Ordered tiers with freshness metadata
//!
//! Provides:
//! - Freshness metadata (expires, lastModified)
//! - Cache key derivation
//! - The CacheTier trait
//! - Memory and disk tiers

pub mod disk;
pub mod key;
pub mod memory;
pub mod meta;
pub mod tier;
