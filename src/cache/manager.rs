//! Single-slot, time-boxed cache
//!
//! Provides a `TableCache` that stores one value with the instant it was
//! cached. The slot is replaced wholesale on every `put` and is never cleared.

use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use crate::clock::Clock;

/// Default freshness window (5 minutes)
pub const DEFAULT_FRESHNESS: Duration = Duration::from_secs(300);

/// A cached value together with the time it was stored
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry<T> {
    /// The cached data
    pub data: T,
    /// When the data was cached
    pub cached_at: DateTime<Utc>,
}

/// Holds the last successfully refreshed value
///
/// `get` returns the entry whether or not it is fresh; freshness is a
/// separate question answered by `is_fresh`. Readers receive an `Arc` to the
/// entry, so a concurrent `put` never tears a value they are holding.
pub struct TableCache<T> {
    /// Current entry, if any refresh has ever succeeded
    slot: Mutex<Option<Arc<CacheEntry<T>>>>,
    /// How long an entry counts as fresh
    freshness: Duration,
    /// Time source for timestamps and age checks
    clock: Arc<dyn Clock>,
}

impl<T> TableCache<T> {
    /// Creates an empty cache
    ///
    /// # Arguments
    /// * `freshness` - How long a stored entry is served without a refresh
    /// * `clock` - Time source for timestamps
    pub fn new(freshness: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            slot: Mutex::new(None),
            freshness,
            clock,
        }
    }

    /// Returns the current entry regardless of its age
    pub fn get(&self) -> Option<Arc<CacheEntry<T>>> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replaces the entry with `data`, stamped with the current instant
    pub fn put(&self, data: T) {
        let entry = Arc::new(CacheEntry {
            data,
            cached_at: self.clock.now(),
        });
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(entry);
    }

    /// Whether an entry exists and is younger than the freshness window
    pub fn is_fresh(&self) -> bool {
        match self.get() {
            Some(entry) => self.is_entry_fresh(&entry),
            None => false,
        }
    }

    /// Freshness window this cache was built with
    pub fn freshness(&self) -> Duration {
        self.freshness
    }

    fn is_entry_fresh(&self, entry: &CacheEntry<T>) -> bool {
        let age = self.clock.now() - entry.cached_at;
        // A window too large for chrono never expires
        match chrono::Duration::from_std(self.freshness) {
            Ok(window) => age < window,
            Err(_) => true,
        }
    }
}

impl<T> std::fmt::Debug for TableCache<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableCache")
            .field("freshness", &self.freshness)
            .field("populated", &self.get().is_some())
            .finish()
    }
}
