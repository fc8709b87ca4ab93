//! `SendTimeEngine`, the end-to-end send-time pipeline.
//!
//! For one contact the pipeline runs four steps in order:
//!
//! 1. express the entry instant as a wall-clock reading in the contact's
//!    country;
//! 2. move that reading forward past excluded days;
//! 3. pick a slot inside the delivery windows on the resulting day;
//! 4. convert the slot back to the reference clock.
//!
//! On the entry day itself only slots after the entry time are eligible.
//! When none remain, the scan restarts on the following day at the same
//! time of day.
//!
//! Invalid windows, an invalid exclusion rule, or a rule written for another
//! country are hard errors.  Running out of days or slots is a failure
//! *result* carrying what was explored.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Days, FixedOffset, NaiveDateTime, Utc};
use st_core::config::EngineConfig;
use st_core::errors::{Error, Result};
use st_core::stats::{CacheStats, CacheStatsSnapshot, CheckerStats, CheckerStatsSnapshot};
use st_core::{ensure, Year};
use st_holidays::{
    BatchSummary, BusinessDayChecker, DateExclusionAdjuster, DayExclusion, ExclusionRule,
    HolidayCache, HolidayFetcher,
};
use st_time::country::canonical_code;
use st_time::{select_slot, validate, SlotOptions, TimeSlot, TimeWindow, TimezoneResolver};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Everything needed to compute one send time.
#[derive(Debug, Clone)]
pub struct SendTimeRequest<'a> {
    /// When the contact entered, on any clock.
    pub entry: DateTime<FixedOffset>,
    /// ISO 3166-1 alpha-2 country of the contact.
    pub country: &'a str,
    /// Local delivery windows.
    pub windows: &'a [TimeWindow],
    /// Which days may not be used.
    pub rule: &'a ExclusionRule,
    /// Slot preference.
    pub slot_options: SlotOptions,
    /// Instant at which the country's UTC offset is sampled for the final
    /// conversion.  `None` samples it now.
    pub offset_sampled_at: Option<DateTime<Utc>>,
}

impl<'a> SendTimeRequest<'a> {
    /// A request with default slot options, sampling offsets now.
    pub fn new(
        entry: DateTime<FixedOffset>,
        country: &'a str,
        windows: &'a [TimeWindow],
        rule: &'a ExclusionRule,
    ) -> Self {
        Self {
            entry,
            country,
            windows,
            rule,
            slot_options: SlotOptions::default(),
            offset_sampled_at: None,
        }
    }

    /// Use `options` for slot selection.
    pub fn with_slot_options(mut self, options: SlotOptions) -> Self {
        self.slot_options = options;
        self
    }

    /// Sample the country's offset at `at` instead of now.
    pub fn sampled_at(mut self, at: DateTime<Utc>) -> Self {
        self.offset_sampled_at = Some(at);
        self
    }
}

/// Outcome of the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct SendTimeResult {
    /// `true` when a send time was found.
    pub success: bool,
    /// The send time on the reference clock.
    pub final_timestamp: Option<DateTime<FixedOffset>>,
    /// The same send time as a wall-clock reading in the contact's country.
    pub local_timestamp: Option<NaiveDateTime>,
    /// The chosen slot.
    pub selected_slot: Option<TimeSlot>,
    /// Other slots close to the chosen one.
    pub alternative_slots: Vec<TimeSlot>,
    /// Days moved forward by the adjuster.
    pub days_adjusted: u32,
    /// Days rejected by the adjuster, with reasons.
    pub adjustments: Vec<DayExclusion>,
    /// Window validation warnings.
    pub warnings: Vec<String>,
    /// Why no send time was found.
    pub error: Option<String>,
}

impl SendTimeResult {
    fn failure(
        error: Option<String>,
        adjustments: Vec<DayExclusion>,
        warnings: Vec<String>,
    ) -> Self {
        Self {
            success: false,
            final_timestamp: None,
            local_timestamp: None,
            selected_slot: None,
            alternative_slots: Vec::new(),
            days_adjusted: 0,
            adjustments,
            warnings,
            error,
        }
    }
}

/// Owns the resolver, holiday cache, checker and adjuster for one
/// configuration and composes them into [`compute_send_time`].
///
/// [`compute_send_time`]: SendTimeEngine::compute_send_time
pub struct SendTimeEngine {
    config: EngineConfig,
    resolver: TimezoneResolver,
    cache: Arc<HolidayCache>,
    checker: Arc<BusinessDayChecker>,
    adjuster: DateExclusionAdjuster,
}

impl std::fmt::Debug for SendTimeEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SendTimeEngine")
            .field("config", &self.config)
            .field("checker", &self.checker)
            .finish()
    }
}

impl SendTimeEngine {
    /// Build an engine fetching holidays from `fetcher`.
    ///
    /// Each engine gets its own statistics counters.
    ///
    /// # Errors
    /// [`Error::Config`] (or a more specific variant) if `config` does not
    /// validate.
    pub fn new(config: EngineConfig, fetcher: Arc<dyn HolidayFetcher>) -> Result<Self> {
        Self::with_stats(config, fetcher, Arc::default(), Arc::default())
    }

    /// Build an engine reporting into the given counters.
    pub fn with_stats(
        config: EngineConfig,
        fetcher: Arc<dyn HolidayFetcher>,
        cache_stats: Arc<CacheStats>,
        checker_stats: Arc<CheckerStats>,
    ) -> Result<Self> {
        config.validate()?;
        let cache = Arc::new(HolidayCache::new(&config, cache_stats));
        let checker = Arc::new(BusinessDayChecker::new(
            cache.clone(),
            fetcher,
            &config,
            checker_stats,
        )?);
        let adjuster = DateExclusionAdjuster::new(checker.clone());
        Ok(Self {
            config,
            resolver: TimezoneResolver::new(),
            cache,
            checker,
            adjuster,
        })
    }

    /// The validated configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The timezone resolver.
    pub fn resolver(&self) -> &TimezoneResolver {
        &self.resolver
    }

    /// The holiday cache.
    pub fn cache(&self) -> &Arc<HolidayCache> {
        &self.cache
    }

    /// The business-day checker.
    pub fn checker(&self) -> &Arc<BusinessDayChecker> {
        &self.checker
    }

    /// The date adjuster.
    pub fn adjuster(&self) -> &DateExclusionAdjuster {
        &self.adjuster
    }

    /// An exclusion rule for `country` using the configured weekend and
    /// scan bound.
    pub fn exclusion_rule(&self, country: &str) -> Result<ExclusionRule> {
        ExclusionRule::from_config(country, &self.config)
    }

    /// Compute a send time with default slot options.
    pub async fn compute_send_time(
        &self,
        entry: DateTime<FixedOffset>,
        country: &str,
        windows: &[TimeWindow],
        rule: &ExclusionRule,
    ) -> Result<SendTimeResult> {
        self.compute(&SendTimeRequest::new(entry, country, windows, rule)).await
    }

    /// Compute a send time.
    ///
    /// # Errors
    /// [`Error::InvalidWindows`] if the windows do not validate, the
    /// rule's validation error, or [`Error::Precondition`] if the rule names
    /// a different country than the request.
    pub async fn compute(&self, request: &SendTimeRequest<'_>) -> Result<SendTimeResult> {
        let report = validate(request.windows);
        if !report.valid {
            return Err(Error::InvalidWindows(report.errors));
        }
        request.rule.validate()?;
        let code = canonical_code(request.country);
        let rule_code = canonical_code(&request.rule.country);
        ensure!(
            code == rule_code,
            "exclusion rule is for {rule_code} but the contact is in {code}"
        );
        let country = code.as_str();

        let local_entry = self.resolver.from_reference_clock(request.entry, country);
        debug!(entry = %request.entry, %local_entry, country, "entry in local time");

        let adjustment = self.adjuster.adjust(local_entry, request.rule).await?;
        let mut adjustments = adjustment.adjustments;
        let Some(mut adjusted) = adjustment.adjusted_date.filter(|_| adjustment.success) else {
            warn!(country, entry = %request.entry, "no send day available");
            return Ok(SendTimeResult::failure(
                adjustment.error,
                adjustments,
                report.warnings,
            ));
        };
        let mut days_adjusted = adjustment.days_adjusted;

        let on_entry_day = adjusted.date() == local_entry.date();
        let mut selection = if on_entry_day {
            let mut options = request.slot_options.clone();
            let entry_time = local_entry.time();
            options.later_than = Some(options.later_than.map_or(entry_time, |t| t.max(entry_time)));
            select_slot(adjusted.date(), request.windows, &options)
        } else {
            select_slot(adjusted.date(), request.windows, &request.slot_options)
        };

        if !selection.success && on_entry_day {
            debug!(country, %local_entry, "no slot left on the entry day");
            let Some(next) = local_entry.checked_add_days(Days::new(1)) else {
                return Ok(SendTimeResult::failure(
                    selection.error,
                    adjustments,
                    report.warnings,
                ));
            };
            let retry = self.adjuster.adjust(next, request.rule).await?;
            adjustments.extend(retry.adjustments);
            let Some(day) = retry.adjusted_date.filter(|_| retry.success) else {
                warn!(country, entry = %request.entry, "no send day available");
                return Ok(SendTimeResult::failure(retry.error, adjustments, report.warnings));
            };
            adjusted = day;
            days_adjusted = 1 + retry.days_adjusted;
            selection = select_slot(adjusted.date(), request.windows, &request.slot_options);
        }

        let Some(slot) = selection.selected_slot.filter(|_| selection.success) else {
            warn!(country, day = %adjusted.date(), "no send slot available");
            return Ok(SendTimeResult::failure(
                selection.error,
                adjustments,
                report.warnings,
            ));
        };

        let sampled_at = request.offset_sampled_at.unwrap_or_else(Utc::now);
        let final_timestamp =
            self.resolver.to_reference_clock_at(slot.datetime, country, sampled_at);
        info!(
            country,
            entry = %request.entry,
            send_at = %final_timestamp,
            local = %slot.datetime,
            days_adjusted,
            "send time computed"
        );
        Ok(SendTimeResult {
            success: true,
            final_timestamp: Some(final_timestamp),
            local_timestamp: Some(slot.datetime),
            selected_slot: Some(slot),
            alternative_slots: selection.alternative_slots,
            days_adjusted,
            adjustments,
            warnings: report.warnings,
            error: None,
        })
    }

    // ── Cache administration ─────────────────────────────────────────────────

    /// Warm the holiday cache through the engine's fetcher.
    pub async fn warmup(
        &self,
        countries: Option<&[String]>,
        years: Option<&[Year]>,
    ) -> BatchSummary {
        self.cache
            .warmup(self.checker.fetcher().as_ref(), countries, years)
            .await
    }

    /// Re-fetch cache entries expiring within `threshold`.
    pub async fn refresh(&self, threshold: Duration) -> BatchSummary {
        self.cache
            .refresh(self.checker.fetcher().as_ref(), threshold)
            .await
    }

    /// Drop every cached holiday list.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Cache counters and live key count.
    pub fn cache_stats(&self) -> CacheStatsSnapshot {
        self.cache.stats()
    }

    /// Checker counters.
    pub fn checker_stats(&self) -> CheckerStatsSnapshot {
        self.checker.stats()
    }

    /// Zero every counter.
    pub fn reset_stats(&self) {
        self.cache.reset_stats();
        self.checker.reset_stats();
    }

    /// Start the cache's expiry sweep at the configured interval.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn_sweeper(&self) -> JoinHandle<()> {
        self.cache.spawn_sweeper(self.config.sweep_interval())
    }
}
