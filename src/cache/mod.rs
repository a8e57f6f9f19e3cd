//! Cache module for holding the most recently refreshed table in memory
//!
//! This module provides a single-slot cache with a freshness window. Expired
//! entries are kept and still returned by `get`, so the feed can fall back to
//! stale data when the upstream source is unavailable.

mod manager;

pub use manager::{CacheEntry, TableCache, DEFAULT_FRESHNESS};
