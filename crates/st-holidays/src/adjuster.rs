//! `DateExclusionAdjuster`: moves a send date off excluded days.
//!
//! Starting at the target date, each following day is tested against the
//! [`ExclusionRule`] until one is free or `max_days_to_check` days have been
//! looked at.  The time of day is kept exactly.  Exhaustion is a failure
//! *result* carrying every rejected day and its reasons, never an error.

use std::sync::Arc;

use chrono::{Days, NaiveDate, NaiveDateTime};
use st_core::config::EngineConfig;
use st_core::ensure;
use st_core::errors::{Error, Result};
use st_time::country;
use st_time::{Weekday, WeekendDays};
use tracing::{debug, warn};

use crate::checker::BusinessDayChecker;

/// Default bound on the adjuster's day scan.
pub const DEFAULT_MAX_DAYS_TO_CHECK: u32 = 14;

/// Upper limit accepted for `max_days_to_check`.
pub const MAX_DAYS_TO_CHECK_LIMIT: u32 = 366;

/// How far [`DateExclusionAdjuster::next_weekday`] looks.
pub const WEEKDAY_SEARCH_DAYS: u32 = 14;

/// Which days may not be used for a send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusionRule {
    /// Skip weekend days.
    pub skip_weekends: bool,
    /// Skip public holidays of `country`.
    pub skip_holidays: bool,
    /// What counts as weekend.
    pub weekend_days: WeekendDays,
    /// Country whose holidays apply.
    pub country: String,
    /// Scan bound, including the target day.
    pub max_days_to_check: u32,
}

impl ExclusionRule {
    /// Skip weekends and holidays of `country`, with default bounds.
    pub fn new(country: &str) -> Self {
        Self {
            skip_weekends: true,
            skip_holidays: true,
            weekend_days: WeekendDays::default(),
            country: country::canonical_code(country),
            max_days_to_check: DEFAULT_MAX_DAYS_TO_CHECK,
        }
    }

    /// A rule using the configured weekend and scan bound.
    pub fn from_config(country: &str, config: &EngineConfig) -> Result<Self> {
        Ok(Self {
            weekend_days: WeekendDays::from_ordinals(&config.weekend_days)?,
            max_days_to_check: config.max_consecutive_exclusion_days,
            ..Self::new(country)
        })
    }

    /// Set the weekend flag.
    pub fn skip_weekends(mut self, skip: bool) -> Self {
        self.skip_weekends = skip;
        self
    }

    /// Set the holiday flag.
    pub fn skip_holidays(mut self, skip: bool) -> Self {
        self.skip_holidays = skip;
        self
    }

    /// Set the weekend days.
    pub fn with_weekend_days(mut self, days: WeekendDays) -> Self {
        self.weekend_days = days;
        self
    }

    /// Set the scan bound.
    pub fn with_max_days_to_check(mut self, days: u32) -> Self {
        self.max_days_to_check = days;
        self
    }

    /// Check the rule for caller errors.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            (1..=MAX_DAYS_TO_CHECK_LIMIT).contains(&self.max_days_to_check),
            "max_days_to_check {} out of range [1, {MAX_DAYS_TO_CHECK_LIMIT}]",
            self.max_days_to_check
        );
        if self.skip_holidays && !country::is_valid_code(&self.country) {
            return Err(Error::InvalidCountryCode(self.country.clone()));
        }
        Ok(())
    }
}

/// Why a day was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExclusionReason {
    /// The day is a weekend day.
    Weekend(Weekday),
    /// The day is a public holiday.
    PublicHoliday,
}

impl std::fmt::Display for ExclusionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExclusionReason::Weekend(day) => write!(f, "weekend ({day})"),
            ExclusionReason::PublicHoliday => write!(f, "public holiday"),
        }
    }
}

/// One rejected day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayExclusion {
    /// The rejected date.
    pub date: NaiveDate,
    /// Every reason that applied.
    pub reasons: Vec<ExclusionReason>,
}

/// Outcome of [`DateExclusionAdjuster::adjust`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjustmentResult {
    /// `true` when a free day was found.
    pub success: bool,
    /// The free day at the original time of day.
    pub adjusted_date: Option<NaiveDateTime>,
    /// Days moved forward.
    pub days_adjusted: u32,
    /// Rejected days in scan order.
    pub adjustments: Vec<DayExclusion>,
    /// Human-readable outcome on success.
    pub reason: Option<String>,
    /// Human-readable failure on exhaustion.
    pub error: Option<String>,
}

/// Finds the first usable day at or after a target.
#[derive(Debug, Clone, Default)]
pub struct DateExclusionAdjuster {
    checker: Option<Arc<BusinessDayChecker>>,
}

impl DateExclusionAdjuster {
    /// An adjuster consulting `checker` for holidays.
    pub fn new(checker: Arc<BusinessDayChecker>) -> Self {
        Self {
            checker: Some(checker),
        }
    }

    /// An adjuster without holiday knowledge; only weekends are excluded.
    pub fn weekends_only() -> Self {
        Self { checker: None }
    }

    /// Reasons `date` may not be used under `rule`.  Empty means usable.
    ///
    /// A failing holiday check is logged and does not exclude the day.
    pub async fn exclusions_for(
        &self,
        date: NaiveDate,
        rule: &ExclusionRule,
    ) -> Vec<ExclusionReason> {
        let mut reasons = Vec::new();
        if rule.skip_weekends && rule.weekend_days.is_weekend(date) {
            reasons.push(ExclusionReason::Weekend(Weekday::of(date)));
        }
        if rule.skip_holidays {
            if let Some(checker) = &self.checker {
                match checker.is_public_holiday(date, &rule.country).await {
                    Ok(true) => reasons.push(ExclusionReason::PublicHoliday),
                    Ok(false) => {}
                    Err(err) => {
                        warn!(
                            %date,
                            country = %rule.country,
                            %err,
                            "holiday check failed, day not excluded"
                        );
                    }
                }
            }
        }
        reasons
    }

    /// Move `target` forward to the first usable day.
    ///
    /// # Errors
    /// Only for an invalid `rule`; running out of days is reported in the
    /// result.
    pub async fn adjust(
        &self,
        target: NaiveDateTime,
        rule: &ExclusionRule,
    ) -> Result<AdjustmentResult> {
        rule.validate()?;
        let start = target.date();
        let mut adjustments = Vec::new();

        for offset in 0..rule.max_days_to_check {
            let Some(date) = start.checked_add_days(Days::new(offset as u64)) else {
                break;
            };
            let reasons = self.exclusions_for(date, rule).await;
            if !reasons.is_empty() {
                debug!(%date, ?reasons, "day excluded");
                adjustments.push(DayExclusion { date, reasons });
                continue;
            }

            let adjusted = date.and_time(target.time());
            let reason = match offset {
                0 => "no adjustment needed".to_string(),
                1 => "moved 1 day forward".to_string(),
                n => format!("moved {n} days forward"),
            };
            debug!(%target, %adjusted, days = offset, "send date adjusted");
            return Ok(AdjustmentResult {
                success: true,
                adjusted_date: Some(adjusted),
                days_adjusted: offset,
                adjustments,
                reason: Some(reason),
                error: None,
            });
        }

        warn!(
            %target,
            country = %rule.country,
            max_days = rule.max_days_to_check,
            "no available day found"
        );
        Ok(AdjustmentResult {
            success: false,
            adjusted_date: None,
            days_adjusted: 0,
            adjustments,
            reason: None,
            error: Some(format!(
                "no available day within {} days of {start}",
                rule.max_days_to_check
            )),
        })
    }

    /// Count usable days in `[start, end]`.  Zero when `end < start`.
    pub async fn business_days_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        rule: &ExclusionRule,
    ) -> u32 {
        let mut count = 0;
        for date in start.iter_days().take_while(|d| *d <= end) {
            if self.exclusions_for(date, rule).await.is_empty() {
                count += 1;
            }
        }
        count
    }

    /// The next `weekday` after `from` that is also usable under `rule`,
    /// looking at most two weeks ahead.
    pub async fn next_weekday(
        &self,
        from: NaiveDate,
        weekday: Weekday,
        rule: &ExclusionRule,
    ) -> Option<NaiveDate> {
        let first = match Weekday::of(from).days_until(weekday) {
            0 => 7,
            n => n,
        };
        let mut offset = first;
        while offset <= WEEKDAY_SEARCH_DAYS {
            let date = from.checked_add_days(Days::new(offset as u64))?;
            if self.exclusions_for(date, rule).await.is_empty() {
                return Some(date);
            }
            offset += 7;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn at(y: i32, m: u32, d: u32, time: NaiveTime) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_time(time)
    }

    fn weekends_only_rule() -> ExclusionRule {
        ExclusionRule::new("US").skip_holidays(false)
    }

    #[tokio::test]
    async fn available_day_is_unchanged() {
        let t = at(2024, 6, 17, NaiveTime::from_hms_milli_opt(8, 45, 12, 345).unwrap());
        let result = DateExclusionAdjuster::weekends_only()
            .adjust(t, &weekends_only_rule())
            .await
            .unwrap();
        assert!(result.success);
        assert_eq!(result.adjusted_date, Some(t));
        assert_eq!(result.days_adjusted, 0);
        assert!(result.adjustments.is_empty());
        assert_eq!(result.reason.as_deref(), Some("no adjustment needed"));
    }

    #[tokio::test]
    async fn saturday_moves_to_monday() {
        let t = at(2024, 6, 15, NaiveTime::from_hms_opt(14, 30, 0).unwrap());
        let result = DateExclusionAdjuster::weekends_only()
            .adjust(t, &weekends_only_rule())
            .await
            .unwrap();
        assert_eq!(
            result.adjusted_date,
            Some(at(2024, 6, 17, NaiveTime::from_hms_opt(14, 30, 0).unwrap()))
        );
        assert_eq!(result.days_adjusted, 2);
        assert_eq!(result.reason.as_deref(), Some("moved 2 days forward"));
        assert_eq!(
            result.adjustments[0].reasons,
            vec![ExclusionReason::Weekend(Weekday::Saturday)]
        );
    }

    #[tokio::test]
    async fn exhaustion_returns_trail() {
        let rule = weekends_only_rule()
            .with_weekend_days(WeekendDays::new(Weekday::ALL.into_iter().take(6)))
            .with_max_days_to_check(3);
        let t = at(2024, 6, 17, NaiveTime::from_hms_opt(9, 0, 0).unwrap());
        let result = DateExclusionAdjuster::weekends_only().adjust(t, &rule).await.unwrap();
        assert!(!result.success);
        assert_eq!(result.adjusted_date, None);
        assert_eq!(result.adjustments.len(), 3);
        assert!(result.error.unwrap().contains("within 3 days"));
    }

    #[tokio::test]
    async fn invalid_rule_is_an_error() {
        let t = at(2024, 6, 17, NaiveTime::MIN);
        let adjuster = DateExclusionAdjuster::weekends_only();
        assert!(adjuster
            .adjust(t, &weekends_only_rule().with_max_days_to_check(0))
            .await
            .is_err());
        assert!(matches!(
            adjuster.adjust(t, &ExclusionRule::new("USA")).await,
            Err(Error::InvalidCountryCode(_))
        ));
    }

    #[tokio::test]
    async fn counts_business_days_inclusive() {
        let adjuster = DateExclusionAdjuster::weekends_only();
        let rule = weekends_only_rule();
        let mon = NaiveDate::from_ymd_opt(2024, 6, 17).unwrap();
        let next_mon = NaiveDate::from_ymd_opt(2024, 6, 24).unwrap();
        assert_eq!(adjuster.business_days_between(mon, next_mon, &rule).await, 6);
        assert_eq!(adjuster.business_days_between(mon, mon, &rule).await, 1);
        assert_eq!(adjuster.business_days_between(next_mon, mon, &rule).await, 0);
    }

    #[tokio::test]
    async fn next_weekday_is_strictly_after() {
        let adjuster = DateExclusionAdjuster::weekends_only();
        let rule = weekends_only_rule();
        let mon = NaiveDate::from_ymd_opt(2024, 6, 17).unwrap();
        assert_eq!(
            adjuster.next_weekday(mon, Weekday::Wednesday, &rule).await,
            NaiveDate::from_ymd_opt(2024, 6, 19)
        );
        assert_eq!(
            adjuster.next_weekday(mon, Weekday::Monday, &rule).await,
            NaiveDate::from_ymd_opt(2024, 6, 24)
        );
        assert_eq!(adjuster.next_weekday(mon, Weekday::Saturday, &rule).await, None);
    }
}
