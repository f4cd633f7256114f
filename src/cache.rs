//! TTL cache for resolved translation templates.
//!
//! Entries expire lazily: `get` checks the age of what it finds and drops
//! stale entries on the spot. `cleanup` sweeps everything and is meant to be
//! driven by an outside scheduler; the cache owns no timers.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::clock::{Clock, SystemClock, elapsed_between};
use crate::error::Degradation;
use crate::options::{TranslationOptions, escape_key_part};

/// Default lifetime of a cache entry
pub const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    pub data: String,
    /// Recovered problem hit while resolving `data`; replayed on every hit
    pub degradation: Option<Degradation>,
    pub created_at: DateTime<Utc>,
    pub ttl: Duration,
}

impl CacheEntry {
    /// An entry is stale once strictly more than `ttl` has passed.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        elapsed_between(self.created_at, now) > self.ttl
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub expired: u64,
    pub sets: u64,
}

pub struct TranslationCache {
    entries: HashMap<String, CacheEntry>,
    default_ttl: Duration,
    clock: Arc<dyn Clock>,
    stats: CacheStats,
}

impl Default for TranslationCache {
    fn default() -> Self {
        Self::new()
    }
}

impl TranslationCache {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        TranslationCache {
            entries: HashMap::new(),
            default_ttl: DEFAULT_TTL,
            clock,
            stats: CacheStats::default(),
        }
    }

    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = ttl;
        self
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Composite cache key for a translation request.
    ///
    /// Only the options that select a template take part; interpolation
    /// variables would fragment the cache without changing the template.
    /// Parts are escaped, so `|` inside a key or context cannot collide.
    pub fn key_for(locale: &str, key: &str, options: &TranslationOptions) -> String {
        format!(
            "{}|{}|{}",
            escape_key_part(locale),
            escape_key_part(key),
            options.selection_key()
        )
    }

    /// Fresh value for `key`, removing it if it has expired.
    pub fn get(&mut self, key: &str) -> Option<String> {
        self.get_entry(key).map(|entry| entry.data)
    }

    /// Fresh entry for `key`, removing it if it has expired.
    pub fn get_entry(&mut self, key: &str) -> Option<CacheEntry> {
        let now = self.clock.now();
        let expired = match self.entries.get(key) {
            Some(entry) if !entry.is_expired(now) => {
                self.stats.hits += 1;
                return Some(entry.clone());
            }
            Some(_) => true,
            None => false,
        };
        if expired {
            self.entries.remove(key);
            self.stats.expired += 1;
            debug!(key, "Cache entry expired");
        }
        self.stats.misses += 1;
        None
    }

    /// Store `value` under `key`. `ttl` of `None` uses the default TTL.
    pub fn set(&mut self, key: &str, value: &str, ttl: Option<Duration>) {
        self.set_with_degradation(key, value, None, ttl);
    }

    /// Store `value` together with the degradation it was resolved with.
    pub fn set_with_degradation(
        &mut self,
        key: &str,
        value: &str,
        degradation: Option<Degradation>,
        ttl: Option<Duration>,
    ) {
        let entry = CacheEntry {
            data: value.to_string(),
            degradation,
            created_at: self.clock.now(),
            ttl: ttl.unwrap_or(self.default_ttl),
        };
        self.entries.insert(key.to_string(), entry);
        self.stats.sets += 1;
    }

    pub fn remove(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Drop every expired entry. Returns how many were removed.
    pub fn cleanup(&mut self) -> usize {
        let now = self.clock.now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(now));
        let removed = before - self.entries.len();
        self.stats.expired += removed as u64;
        if removed > 0 {
            debug!(removed, "Cache cleanup removed expired entries");
        }
        removed
    }

    /// Drop everything, fresh or not.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }
}
