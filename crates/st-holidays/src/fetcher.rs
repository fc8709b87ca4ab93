//! The remote holiday source seam.
//!
//! A [`HolidayFetcher`] is the only collaborator in this crate that performs
//! I/O.  Timeouts and retries are the fetcher's own business; callers only
//! see a holiday list or an error.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use st_core::errors::{Error, Result};
use st_core::Year;

use crate::record::HolidayRecord;

/// Source of holiday records for a country and year.
///
/// Implementations must be idempotent and free of side effects visible to
/// the cache.  Failures are reported as `Err`, never as sentinel records.
#[async_trait]
pub trait HolidayFetcher: Send + Sync {
    /// Fetch every holiday of `country` (upper-case) in `year`.
    async fn fetch(&self, country: &str, year: Year) -> Result<Vec<HolidayRecord>>;

    /// Provenance tag stored with cached entries.
    fn source(&self) -> &str {
        "remote"
    }
}

/// An in-memory fetcher serving a fixed set of holidays.
///
/// Used to bootstrap engines from bundled data and as a test double.  Pairs
/// registered with [`fail_for`](Self::fail_for) return an error.
#[derive(Debug, Default)]
pub struct StaticHolidayFetcher {
    holidays: HashMap<(String, Year), Vec<HolidayRecord>>,
    failing: HashMap<(String, Year), String>,
    calls: AtomicUsize,
}

impl StaticHolidayFetcher {
    /// An empty fetcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `records` for `(country, year)`.
    pub fn with_holidays(mut self, country: &str, year: Year, records: Vec<HolidayRecord>) -> Self {
        self.holidays
            .insert((country.to_ascii_uppercase(), year), records);
        self
    }

    /// Fail every request for `(country, year)` with `reason`.
    pub fn fail_for(mut self, country: &str, year: Year, reason: impl Into<String>) -> Self {
        self.failing
            .insert((country.to_ascii_uppercase(), year), reason.into());
        self
    }

    /// Number of fetches served so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl HolidayFetcher for StaticHolidayFetcher {
    async fn fetch(&self, country: &str, year: Year) -> Result<Vec<HolidayRecord>> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        let key = (country.to_ascii_uppercase(), year);
        if let Some(reason) = self.failing.get(&key) {
            return Err(Error::fetch(country, year, reason));
        }
        Ok(self.holidays.get(&key).cloned().unwrap_or_default())
    }

    fn source(&self) -> &str {
        "static"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[tokio::test]
    async fn serves_registered_pairs_only() {
        let christmas = HolidayRecord::new(NaiveDate::from_ymd_opt(2024, 12, 25).unwrap(), "Christmas", "de");
        let fetcher = StaticHolidayFetcher::new()
            .with_holidays("DE", 2024, vec![christmas.clone()])
            .fail_for("FR", 2024, "upstream 503");

        assert_eq!(fetcher.fetch("de", 2024).await.unwrap(), vec![christmas]);
        assert!(fetcher.fetch("DE", 2025).await.unwrap().is_empty());
        let err = fetcher.fetch("FR", 2024).await.unwrap_err();
        assert!(err.is_data_unavailable());
        assert_eq!(fetcher.calls(), 3);
    }
}
