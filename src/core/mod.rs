//! Core module - Shared building blocks
//!
//! This module provides:
//! - Error taxonomy (Error, ErrorCategory)
//! - Locationforecast document model
//! - HTTP date helpers and clock
//! - Default paths
//! - Rendering and logging for the CLI

pub mod error;
pub mod logging;
pub mod model;
pub mod paths;
pub mod render;
pub mod util;
