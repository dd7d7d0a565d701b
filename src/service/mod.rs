//! Service module - Retrieval over the tier chain
//!
//! Provides:
//! - retriever: tier walk, promotion and network fallback
//! - forecast: the Locationforecast entry point and its configuration

pub mod forecast;
pub mod retriever;
