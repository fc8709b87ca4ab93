//! `HolidayCache`, an expiring `(country, year)` → holidays store.
//!
//! Entries live in a sharded concurrent map keyed by `"{COUNTRY}:{YEAR}"`.
//! Each entry carries its own expiry instant; reads treat an expired entry
//! as absent whether or not the periodic sweep has removed it yet.  The
//! sweep runs on a background task holding only a weak reference, so it
//! ends once the last handle to the cache is dropped.
//!
//! Expiry uses `tokio::time::Instant`, which lets tests drive TTLs with a
//! paused runtime clock.

use std::str::FromStr;
use std::sync::{Arc, Weak};
use std::time::Duration;

use chrono::{DateTime, Datelike, Utc};
use dashmap::DashMap;
use st_core::config::EngineConfig;
use st_core::errors::{Error, Result};
use st_core::stats::{CacheStats, CacheStatsSnapshot};
use st_core::Year;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::batch::{BatchItem, BatchOutcome, BatchSummary};
use crate::fetcher::HolidayFetcher;
use crate::record::HolidayRecord;

/// Provenance tag for entries written through [`HolidayCache::set`].
pub const MANUAL_SOURCE: &str = "manual";

/// A parsed cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// Upper-case country code.
    pub country: String,
    /// Year.
    pub year: Year,
}

impl CacheKey {
    /// Build a key, upper-casing the country.
    pub fn new(country: &str, year: Year) -> Self {
        Self {
            country: country.trim().to_ascii_uppercase(),
            year,
        }
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.country, self.year)
    }
}

impl FromStr for CacheKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let bad = || Error::Precondition(format!("malformed cache key `{s}`"));
        let (country, year) = s.split_once(':').ok_or_else(bad)?;
        if country.is_empty() {
            return Err(bad());
        }
        let year = year.parse::<Year>().map_err(|_| bad())?;
        Ok(CacheKey::new(country, year))
    }
}

/// Cached holidays of one country and year.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Holidays in source order.
    pub records: Arc<[HolidayRecord]>,
    /// Wall-clock creation time.
    pub created_at: DateTime<Utc>,
    /// Where the records came from.
    pub source: String,
    expires_at: Instant,
}

impl CacheEntry {
    /// Return `true` once the TTL has elapsed.
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Instant::now()
    }

    /// Time left before expiry.
    pub fn ttl_remaining(&self) -> Duration {
        self.expires_at.saturating_duration_since(Instant::now())
    }

    /// Return `true` if any record falls on `date`.
    pub fn contains_date(&self, date: chrono::NaiveDate) -> bool {
        self.records.iter().any(|r| r.date == date)
    }
}

/// Expiring holiday store with statistics, warm-up and refresh.
#[derive(Debug)]
pub struct HolidayCache {
    entries: DashMap<String, CacheEntry>,
    default_ttl: Duration,
    max_keys: usize,
    warmup_countries: Vec<String>,
    warmup_delay: Duration,
    stats: Arc<CacheStats>,
}

impl HolidayCache {
    /// Create a cache from configuration, reporting into `stats`.
    pub fn new(config: &EngineConfig, stats: Arc<CacheStats>) -> Self {
        Self {
            entries: DashMap::new(),
            default_ttl: config.cache_ttl(),
            max_keys: config.max_keys,
            warmup_countries: config.warmup_countries.clone(),
            warmup_delay: config.warmup_delay(),
            stats,
        }
    }

    /// Create a cache with default configuration and private counters.
    pub fn with_defaults() -> Self {
        Self::new(&EngineConfig::default(), Arc::default())
    }

    /// Start the periodic expiry sweep.
    ///
    /// Must be called from within a tokio runtime.  The task stops by itself
    /// when the cache is dropped; aborting the returned handle stops it early.
    pub fn spawn_sweeper(self: &Arc<Self>, every: Duration) -> JoinHandle<()> {
        let cache: Weak<Self> = Arc::downgrade(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let Some(cache) = cache.upgrade() else {
                    debug!("holiday cache dropped, sweeper exiting");
                    break;
                };
                let removed = cache.sweep();
                if removed > 0 {
                    debug!(removed, remaining = cache.len(), "expired holiday entries swept");
                }
            }
        })
    }

    /// Drop every expired entry.  Returns how many were removed.
    pub fn sweep(&self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired());
        before.saturating_sub(self.entries.len())
    }

    /// Look up a live entry, counting the hit or miss.
    pub fn get(&self, country: &str, year: Year) -> Option<CacheEntry> {
        let key = CacheKey::new(country, year).to_string();
        let found = self.entries.get(&key).map(|e| e.value().clone());
        match found {
            Some(entry) if !entry.is_expired() => {
                self.stats.hits.incr();
                Some(entry)
            }
            Some(_) => {
                self.entries.remove_if(&key, |_, e| e.is_expired());
                self.stats.misses.incr();
                None
            }
            None => {
                self.stats.misses.incr();
                None
            }
        }
    }

    /// Return `true` if a live entry exists.  Does not touch statistics.
    pub fn has(&self, country: &str, year: Year) -> bool {
        let key = CacheKey::new(country, year).to_string();
        self.entries
            .get(&key)
            .is_some_and(|e| !e.value().is_expired())
    }

    /// Store `records`, with `ttl` or the default TTL.
    ///
    /// Returns `false` (and counts an error) when the cache is full and the
    /// key is new.
    pub fn set(
        &self,
        country: &str,
        year: Year,
        records: Vec<HolidayRecord>,
        ttl: Option<Duration>,
    ) -> bool {
        self.store(CacheKey::new(country, year), records, ttl, MANUAL_SOURCE)
    }

    /// Store a raw payload from the remote source.
    ///
    /// Returns `false` (and counts an error) unless the payload is a JSON
    /// array of holiday records.
    pub fn set_payload(
        &self,
        country: &str,
        year: Year,
        payload: &serde_json::Value,
        ttl: Option<Duration>,
    ) -> bool {
        let key = CacheKey::new(country, year);
        match HolidayRecord::from_payload(payload) {
            Ok(records) => self.store(key, records, ttl, MANUAL_SOURCE),
            Err(err) => {
                warn!(%key, %err, "holiday payload rejected");
                self.stats.errors.incr();
                false
            }
        }
    }

    pub(crate) fn store(
        &self,
        key: CacheKey,
        records: Vec<HolidayRecord>,
        ttl: Option<Duration>,
        source: &str,
    ) -> bool {
        let key = key.to_string();
        if !self.entries.contains_key(&key) && self.entries.len() >= self.max_keys {
            self.sweep();
            if self.entries.len() >= self.max_keys {
                warn!(%key, max_keys = self.max_keys, "holiday cache full, entry rejected");
                self.stats.errors.incr();
                return false;
            }
        }
        let ttl = ttl.unwrap_or(self.default_ttl);
        let count = records.len();
        self.entries.insert(
            key.clone(),
            CacheEntry {
                records: records.into(),
                created_at: Utc::now(),
                source: source.to_string(),
                expires_at: Instant::now() + ttl,
            },
        );
        self.stats.sets.incr();
        debug!(%key, count, ttl_secs = ttl.as_secs(), source, "holidays cached");
        true
    }

    /// Remove an entry.  Returns `true` if one was present.
    pub fn delete(&self, country: &str, year: Year) -> bool {
        let key = CacheKey::new(country, year).to_string();
        let removed = self.entries.remove(&key).is_some();
        if removed {
            self.stats.deletes.incr();
        }
        removed
    }

    /// Remove every entry.
    pub fn clear(&self) {
        let count = self.entries.len();
        self.entries.clear();
        info!(count, "holiday cache cleared");
    }

    /// Live keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .entries
            .iter()
            .filter(|e| !e.value().is_expired())
            .map(|e| e.key().clone())
            .collect();
        keys.sort();
        keys
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| !e.value().is_expired())
            .count()
    }

    /// Return `true` if there are no live entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Time left before an entry expires, if it is live.
    pub fn ttl_remaining(&self, country: &str, year: Year) -> Option<Duration> {
        let key = CacheKey::new(country, year).to_string();
        self.entries
            .get(&key)
            .map(|e| e.value().clone())
            .filter(|e| !e.is_expired())
            .map(|e| e.ttl_remaining())
    }

    /// Snapshot of the counters and live key count.
    pub fn stats(&self) -> CacheStatsSnapshot {
        self.stats.snapshot(self.len())
    }

    /// Zero the counters.
    pub fn reset_stats(&self) {
        self.stats.reset();
    }

    /// Populate the cache ahead of demand.
    ///
    /// `countries` defaults to the configured warm-up list and `years` to the
    /// current and next year.  Pairs already cached are skipped; each fetch
    /// after the first waits for the configured delay.  A failing pair is
    /// recorded and the batch carries on.
    pub async fn warmup(
        &self,
        fetcher: &dyn HolidayFetcher,
        countries: Option<&[String]>,
        years: Option<&[Year]>,
    ) -> BatchSummary {
        let this_year = Utc::now().year();
        let default_years = [this_year, this_year + 1];
        let countries = countries.unwrap_or(self.warmup_countries.as_slice());
        let years = years.unwrap_or(default_years.as_slice());

        let mut items = Vec::with_capacity(countries.len() * years.len());
        let mut fetched_any = false;
        for country in countries {
            for &year in years {
                let key = CacheKey::new(country, year);
                if self.has(&key.country, year) {
                    items.push(BatchItem::new(key.to_string(), BatchOutcome::Skipped));
                    continue;
                }
                if fetched_any && !self.warmup_delay.is_zero() {
                    tokio::time::sleep(self.warmup_delay).await;
                }
                fetched_any = true;
                let outcome = self.fetch_and_store(fetcher, &key).await;
                items.push(BatchItem::new(key.to_string(), outcome));
            }
        }

        let summary: BatchSummary = items.into_iter().collect();
        info!(
            success = summary.success,
            failed = summary.failed,
            skipped = summary.skipped,
            "holiday cache warm-up finished"
        );
        summary
    }

    /// Re-fetch live entries that expire within `threshold`.
    pub async fn refresh(&self, fetcher: &dyn HolidayFetcher, threshold: Duration) -> BatchSummary {
        let mut items = Vec::new();
        for raw in self.keys() {
            let key = match raw.parse::<CacheKey>() {
                Ok(key) => key,
                Err(err) => {
                    items.push(BatchItem::new(raw, BatchOutcome::Failed(err.to_string())));
                    continue;
                }
            };
            match self.ttl_remaining(&key.country, key.year) {
                Some(left) if left <= threshold => {
                    let outcome = self.fetch_and_store(fetcher, &key).await;
                    items.push(BatchItem::new(raw, outcome));
                }
                _ => items.push(BatchItem::new(raw, BatchOutcome::Skipped)),
            }
        }

        let summary: BatchSummary = items.into_iter().collect();
        info!(
            refreshed = summary.refreshed(),
            failed = summary.failed,
            skipped = summary.skipped,
            "holiday cache refresh finished"
        );
        summary
    }

    async fn fetch_and_store(&self, fetcher: &dyn HolidayFetcher, key: &CacheKey) -> BatchOutcome {
        match fetcher.fetch(&key.country, key.year).await {
            Ok(records) if records.is_empty() => {
                BatchOutcome::Failed("no holidays returned".to_string())
            }
            Ok(records) => {
                if self.store(key.clone(), records, None, fetcher.source()) {
                    BatchOutcome::Success
                } else {
                    BatchOutcome::Failed("cache full".to_string())
                }
            }
            Err(err) => {
                warn!(%key, %err, "holiday fetch failed");
                self.stats.errors.incr();
                BatchOutcome::Failed(err.to_string())
            }
        }
    }
}
