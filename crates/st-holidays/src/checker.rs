//! `BusinessDayChecker`: weekend rules combined with holiday lookups.
//!
//! Holiday data is read through the [`HolidayCache`]; on a miss the
//! [`HolidayFetcher`] is called and a non-empty answer is cached.  When no
//! data can be obtained the configured [`FallbackBehavior`] decides, and the
//! error counter records that a fallback was taken.

use std::sync::Arc;

use chrono::{Datelike, Days, NaiveDate};
use st_core::config::{EngineConfig, FallbackBehavior};
use st_core::errors::{Error, Result};
use st_core::stats::{CheckerStats, CheckerStatsSnapshot};
use st_core::Year;
use st_time::country;
use st_time::{TimezoneResolver, WeekendDays};
use tracing::{debug, warn};

use crate::cache::{CacheKey, HolidayCache};
use crate::fetcher::HolidayFetcher;
use crate::record::HolidayRecord;

/// Decides whether a calendar day is usable in a country.
pub struct BusinessDayChecker {
    cache: Arc<HolidayCache>,
    fetcher: Arc<dyn HolidayFetcher>,
    resolver: TimezoneResolver,
    weekend: WeekendDays,
    fallback: FallbackBehavior,
    lookahead_days: u32,
    stats: Arc<CheckerStats>,
}

impl std::fmt::Debug for BusinessDayChecker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BusinessDayChecker")
            .field("source", &self.fetcher.source())
            .field("weekend", &self.weekend)
            .field("fallback", &self.fallback)
            .field("lookahead_days", &self.lookahead_days)
            .finish()
    }
}

impl BusinessDayChecker {
    /// Create a checker from configuration.
    ///
    /// # Errors
    /// [`Error::InvalidWeekday`] if the configured weekend contains an
    /// ordinal outside `1..=7`.
    pub fn new(
        cache: Arc<HolidayCache>,
        fetcher: Arc<dyn HolidayFetcher>,
        config: &EngineConfig,
        stats: Arc<CheckerStats>,
    ) -> Result<Self> {
        Ok(Self {
            cache,
            fetcher,
            resolver: TimezoneResolver::new(),
            weekend: WeekendDays::from_ordinals(&config.weekend_days)?,
            fallback: config.fallback_behavior,
            lookahead_days: config.max_lookahead_days,
            stats,
        })
    }

    /// Override the weekend set.
    pub fn with_weekend(mut self, weekend: WeekendDays) -> Self {
        self.weekend = weekend;
        self
    }

    /// Override the fallback policy.
    pub fn with_fallback(mut self, fallback: FallbackBehavior) -> Self {
        self.fallback = fallback;
        self
    }

    /// Override the next-business-day bound.
    pub fn with_lookahead(mut self, days: u32) -> Self {
        self.lookahead_days = days;
        self
    }

    /// The cache this checker reads through.
    pub fn cache(&self) -> &Arc<HolidayCache> {
        &self.cache
    }

    /// The fetcher used on cache misses.
    pub fn fetcher(&self) -> &Arc<dyn HolidayFetcher> {
        &self.fetcher
    }

    /// The configured fallback policy.
    pub fn fallback(&self) -> FallbackBehavior {
        self.fallback
    }

    /// The configured weekend set.
    pub fn weekend(&self) -> WeekendDays {
        self.weekend
    }

    /// Return `true` if `date` falls on the configured weekend.
    pub fn is_weekend(&self, date: NaiveDate) -> bool {
        self.weekend.is_weekend(date)
    }

    /// Return `true` if `date` falls on a day of `weekend`.
    pub fn is_weekend_in(date: NaiveDate, weekend: WeekendDays) -> bool {
        weekend.is_weekend(date)
    }

    /// Holidays of `country` in `year`, from the cache or the fetcher.
    ///
    /// # Errors
    /// [`Error::InvalidCountryCode`] for malformed codes; [`Error::Fetch`]
    /// when the country is unsupported, the fetch fails, or it returns
    /// nothing.
    pub async fn holidays_in(&self, country: &str, year: Year) -> Result<Vec<HolidayRecord>> {
        Ok(self.load(country, year).await?.to_vec())
    }

    async fn load(&self, country: &str, year: Year) -> Result<Arc<[HolidayRecord]>> {
        if !country::is_valid_code(country) {
            return Err(Error::InvalidCountryCode(country.to_string()));
        }
        let key = CacheKey::new(country, year);
        if !self.resolver.is_supported(&key.country) {
            return Err(Error::fetch(&key.country, year, "country not supported"));
        }
        if let Some(entry) = self.cache.get(&key.country, year) {
            return Ok(entry.records);
        }

        debug!(%key, source = self.fetcher.source(), "holiday cache miss, fetching");
        let records = self
            .fetcher
            .fetch(&key.country, year)
            .await
            .map_err(|err| match err {
                Error::Fetch { .. } => err,
                other => Error::fetch(&key.country, year, other),
            })?;
        if records.is_empty() {
            return Err(Error::fetch(&key.country, year, "no holiday data"));
        }
        let records: Arc<[HolidayRecord]> = records.into();
        self.cache
            .store(key, records.to_vec(), None, self.fetcher.source());
        Ok(records)
    }

    /// Return `true` if `date` is a public holiday in `country`.
    ///
    /// Data unavailability is answered by the fallback policy and counted.
    ///
    /// # Errors
    /// [`Error::InvalidCountryCode`] if `country` is not a two-letter code.
    pub async fn is_public_holiday(&self, date: NaiveDate, country: &str) -> Result<bool> {
        match self.load(country, date.year()).await {
            Ok(records) => {
                let found = records.iter().any(|r| r.date == date);
                if found {
                    self.stats.holidays_found.incr();
                }
                Ok(found)
            }
            Err(err) if err.is_data_unavailable() => {
                self.stats.errors.incr();
                warn!(
                    %date,
                    country,
                    %err,
                    fallback = %self.fallback,
                    "holiday data unavailable, using fallback"
                );
                Ok(self.fallback.as_holiday())
            }
            Err(err) => Err(err),
        }
    }

    /// Return `true` if `date` is a business day in `country`.
    ///
    /// The weekend test runs first and short-circuits; the holiday test only
    /// runs for surviving days.  If the holiday test errors the answer falls
    /// back to the weekend test alone.
    pub async fn is_business_day(
        &self,
        date: NaiveDate,
        country: &str,
        skip_weekends: bool,
        skip_holidays: bool,
    ) -> bool {
        if skip_weekends && self.is_weekend(date) {
            return false;
        }
        if skip_holidays {
            match self.is_public_holiday(date, country).await {
                Ok(true) => return false,
                Ok(false) => {}
                Err(err) => {
                    self.stats.errors.incr();
                    warn!(%date, country, %err, "holiday check failed, weekend-only evaluation");
                }
            }
        }
        self.stats.business_days_found.incr();
        true
    }

    /// First business day strictly after `start`.
    ///
    /// Walks at most `lookahead_days` days; if none qualifies the result is
    /// `start + lookahead_days`.
    pub async fn next_business_day(
        &self,
        start: NaiveDate,
        country: &str,
        skip_weekends: bool,
        skip_holidays: bool,
    ) -> NaiveDate {
        for offset in 1..=self.lookahead_days {
            let Some(candidate) = start.checked_add_days(Days::new(offset as u64)) else {
                break;
            };
            if self
                .is_business_day(candidate, country, skip_weekends, skip_holidays)
                .await
            {
                return candidate;
            }
        }
        let fallback = start
            .checked_add_days(Days::new(self.lookahead_days as u64))
            .unwrap_or(start);
        warn!(
            %start,
            country,
            lookahead = self.lookahead_days,
            %fallback,
            "no business day within look-ahead"
        );
        fallback
    }

    /// Snapshot of the counters.
    pub fn stats(&self) -> CheckerStatsSnapshot {
        self.stats.snapshot()
    }

    /// Zero the counters.
    pub fn reset_stats(&self) {
        self.stats.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::StaticHolidayFetcher;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn checker(fetcher: StaticHolidayFetcher) -> BusinessDayChecker {
        BusinessDayChecker::new(
            Arc::new(HolidayCache::with_defaults()),
            Arc::new(fetcher),
            &EngineConfig::default(),
            Arc::default(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn miss_fetches_then_hits_cache() {
        let fetcher = StaticHolidayFetcher::new()
            .with_holidays("US", 2024, vec![HolidayRecord::new(date(2024, 7, 4), "Independence Day", "US")]);
        let checker = checker(fetcher);
        assert!(checker.is_public_holiday(date(2024, 7, 4), "us").await.unwrap());
        assert!(!checker.is_public_holiday(date(2024, 7, 5), "US").await.unwrap());

        let cache = checker.cache().stats();
        assert_eq!((cache.misses, cache.hits, cache.sets), (1, 1, 1));
        assert_eq!(checker.cache().get("US", 2024).unwrap().source, "static");
        assert_eq!(checker.stats().holidays_found, 1);
    }

    #[tokio::test]
    async fn fallback_policy_decides_on_failure() {
        let fetcher = StaticHolidayFetcher::new().fail_for("FR", 2024, "503");
        let checker = checker(fetcher);
        assert!(!checker.is_public_holiday(date(2024, 5, 1), "FR").await.unwrap());

        let checker = checker.with_fallback(FallbackBehavior::AssumeHoliday);
        assert!(checker.is_public_holiday(date(2024, 5, 1), "FR").await.unwrap());
        assert_eq!(checker.stats().errors, 2);
        assert!(!checker.cache().has("FR", 2024));
    }

    #[tokio::test]
    async fn empty_data_and_unknown_country_use_fallback() {
        let checker = checker(StaticHolidayFetcher::new()).with_fallback(FallbackBehavior::AssumeHoliday);
        assert!(checker.is_public_holiday(date(2024, 5, 1), "DE").await.unwrap());
        assert!(checker.is_public_holiday(date(2024, 5, 1), "ZZ").await.unwrap());
        assert_eq!(checker.stats().errors, 2);
    }

    #[tokio::test]
    async fn malformed_country_is_an_input_error() {
        let checker = checker(StaticHolidayFetcher::new());
        let err = checker.is_public_holiday(date(2024, 5, 1), "U1").await.unwrap_err();
        assert_eq!(err, Error::InvalidCountryCode("U1".into()));
    }

    #[tokio::test]
    async fn business_day_degrades_to_weekend_only() {
        let checker = checker(StaticHolidayFetcher::new());
        // 2024-06-17 is a Monday, 2024-06-15 a Saturday
        assert!(checker.is_business_day(date(2024, 6, 17), "U1", true, true).await);
        assert!(!checker.is_business_day(date(2024, 6, 15), "U1", true, true).await);
        assert_eq!(checker.stats().errors, 1);
    }

    #[tokio::test]
    async fn weekend_short_circuits_holiday_lookup() {
        let fetcher = Arc::new(StaticHolidayFetcher::new());
        let checker = BusinessDayChecker::new(
            Arc::new(HolidayCache::with_defaults()),
            fetcher.clone(),
            &EngineConfig::default(),
            Arc::default(),
        )
        .unwrap();
        assert!(!checker.is_business_day(date(2024, 6, 15), "US", true, true).await);
        assert_eq!(fetcher.calls(), 0);
    }

    #[tokio::test]
    async fn next_business_day_skips_weekend_and_holiday() {
        let fetcher = StaticHolidayFetcher::new()
            .with_holidays("GB", 2024, vec![HolidayRecord::new(date(2024, 8, 26), "Summer bank holiday", "GB")]);
        let checker = checker(fetcher);
        // Friday 2024-08-23 → Sat, Sun, bank-holiday Monday → Tuesday
        let next = checker.next_business_day(date(2024, 8, 23), "GB", true, true).await;
        assert_eq!(next, date(2024, 8, 27));
    }

    #[tokio::test]
    async fn next_business_day_falls_back_after_lookahead() {
        let checker = checker(StaticHolidayFetcher::new())
            .with_weekend(WeekendDays::new(st_time::Weekday::ALL.into_iter().take(6)))
            .with_lookahead(5);
        let start = date(2024, 6, 17);
        // Only Sundays are workable and none falls within five days of a Monday.
        assert_eq!(
            checker.next_business_day(start, "US", true, false).await,
            date(2024, 6, 22)
        );
    }
}
