//! Country → timezone resolution and reference-clock conversion.
//!
//! Lookups never fail: an unknown country resolves to the reference clock's
//! own zone and offset, with a warning.  Conversions never fail either; a
//! timezone that cannot be loaded leaves the wall-clock reading unchanged.
//!
//! # DST approximation
//!
//! [`TimezoneResolver::to_reference_clock`] applies the source zone's UTC
//! offset as it is *now*, not as it will be at the converted instant.  For a
//! send time on the other side of a DST transition the result is off by the
//! DST delta.  Callers wanting an exact conversion pass the target instant
//! as `now` to
//! [`to_reference_clock_at`](TimezoneResolver::to_reference_clock_at).

use chrono::{DateTime, FixedOffset, NaiveDateTime, Offset, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;
use st_core::OffsetHours;
use tracing::warn;

use crate::country::{self, CountryTimezoneEntry, COUNTRY_TIMEZONES};
use crate::reference_clock::{ReferenceClock, REFERENCE_CLOCK};

/// Resolves countries to timezones and converts to/from the reference clock.
#[derive(Debug, Clone, Copy)]
pub struct TimezoneResolver {
    clock: &'static ReferenceClock,
}

impl Default for TimezoneResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl TimezoneResolver {
    /// A resolver bound to the process-wide [`REFERENCE_CLOCK`].
    pub fn new() -> Self {
        Self {
            clock: &REFERENCE_CLOCK,
        }
    }

    /// The reference clock conversions target.
    pub fn clock(&self) -> &'static ReferenceClock {
        self.clock
    }

    /// Look up a country.  `None` for unknown codes.
    pub fn resolve(&self, code: &str) -> Option<&'static CountryTimezoneEntry> {
        country::lookup(code)
    }

    /// Return `true` if the country is in the table.
    pub fn is_supported(&self, code: &str) -> bool {
        self.resolve(code).is_some()
    }

    /// Every supported country.
    pub fn supported_countries(&self) -> &'static [CountryTimezoneEntry] {
        COUNTRY_TIMEZONES
    }

    /// Nominal offset of the country, or the reference clock's offset.
    pub fn offset_for(&self, code: &str) -> OffsetHours {
        match self.resolve(code) {
            Some(entry) => entry.offset_hours,
            None => {
                warn!(
                    country = code,
                    fallback = self.clock.offset_hours,
                    "no timezone mapping, using reference offset"
                );
                self.clock.offset_hours
            }
        }
    }

    /// Canonical timezone of the country, or the reference clock's zone.
    pub fn canonical_timezone(&self, code: &str) -> &'static str {
        match self.resolve(code) {
            Some(entry) => entry.timezone,
            None => {
                warn!(
                    country = code,
                    fallback = self.clock.id,
                    "no timezone mapping, using reference zone"
                );
                self.clock.id
            }
        }
    }

    /// Business timezone of the country, or the reference clock's zone.
    pub fn business_timezone(&self, code: &str) -> &'static str {
        match self.resolve(code) {
            Some(entry) => entry.business_timezone,
            None => {
                warn!(
                    country = code,
                    fallback = self.clock.id,
                    "no timezone mapping, using reference zone"
                );
                self.clock.id
            }
        }
    }

    /// Load the canonical timezone of a country from the database.
    pub fn timezone(&self, code: &str) -> Option<Tz> {
        let name = self.canonical_timezone(code);
        match name.parse::<Tz>() {
            Ok(tz) => Some(tz),
            Err(err) => {
                warn!(country = code, timezone = name, %err, "timezone not in database");
                None
            }
        }
    }

    /// DST-aware offset of the country's timezone at `at`.
    pub fn current_offset(&self, code: &str, at: DateTime<Utc>) -> Option<FixedOffset> {
        self.timezone(code)
            .map(|tz| tz.offset_from_utc_datetime(&at.naive_utc()).fix())
    }

    /// Convert a wall-clock reading in the country's timezone to the
    /// reference clock, using the zone's offset *now*.
    pub fn to_reference_clock(&self, local: NaiveDateTime, code: &str) -> DateTime<FixedOffset> {
        self.to_reference_clock_at(local, code, Utc::now())
    }

    /// Like [`to_reference_clock`](Self::to_reference_clock) with an explicit
    /// instant at which the source offset is sampled.
    pub fn to_reference_clock_at(
        &self,
        local: NaiveDateTime,
        code: &str,
        now: DateTime<Utc>,
    ) -> DateTime<FixedOffset> {
        let Some(source) = self.current_offset(code, now) else {
            warn!(country = code, %local, "conversion skipped, reading kept unchanged");
            return self.clock.from_wall_clock(local);
        };
        let utc = local - TimeDelta::seconds(source.local_minus_utc() as i64);
        DateTime::from_naive_utc_and_offset(utc, self.clock.offset())
    }

    /// Convert an instant to a wall-clock reading in the country's timezone,
    /// honouring DST at that instant.
    pub fn from_reference_clock(&self, ts: DateTime<FixedOffset>, code: &str) -> NaiveDateTime {
        match self.timezone(code) {
            Some(tz) => ts.with_timezone(&tz).naive_local(),
            None => {
                warn!(country = code, %ts, "conversion skipped, reading kept unchanged");
                ts.naive_local()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};

    fn local(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    fn utc(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    #[test]
    fn unknown_country_falls_back_to_reference() {
        let r = TimezoneResolver::new();
        assert!(r.resolve("ZZ").is_none());
        assert_eq!(r.offset_for("ZZ"), -6.0);
        assert_eq!(r.canonical_timezone("ZZ"), "Etc/GMT+6");
        assert_eq!(r.business_timezone("zz"), "Etc/GMT+6");
    }

    #[test]
    fn india_to_reference_clock() {
        let r = TimezoneResolver::new();
        // 09:00 IST = 03:30 UTC = 21:30 previous day at UTC-6
        let ts = r.to_reference_clock_at(local(2024, 6, 14, 9, 0), "IN", utc(2024, 6, 1));
        assert_eq!(ts.offset().local_minus_utc(), -21_600);
        assert_eq!(ts.naive_local(), local(2024, 6, 13, 21, 30));
    }

    #[test]
    fn offset_is_sampled_at_now_not_at_target() {
        let r = TimezoneResolver::new();
        let january = local(2025, 1, 15, 10, 0);
        // Sampled in summer: Berlin is UTC+2, so 10:00 → 08:00 UTC → 02:00.
        let summer = r.to_reference_clock_at(january, "DE", utc(2024, 7, 1));
        assert_eq!(summer.hour(), 2);
        // Sampled in winter: UTC+1 → 09:00 UTC → 03:00.
        let winter = r.to_reference_clock_at(january, "DE", utc(2024, 12, 1));
        assert_eq!(winter.hour(), 3);
    }

    #[test]
    fn from_reference_clock_honours_dst_at_instant() {
        let r = TimezoneResolver::new();
        let ts = REFERENCE_CLOCK.from_wall_clock(local(2024, 7, 1, 6, 0));
        // 12:00 UTC is 14:00 in Berlin in July.
        assert_eq!(r.from_reference_clock(ts, "de"), local(2024, 7, 1, 14, 0));
        let ts = REFERENCE_CLOCK.from_wall_clock(local(2024, 1, 1, 6, 0));
        assert_eq!(r.from_reference_clock(ts, "DE"), local(2024, 1, 1, 13, 0));
    }

    #[test]
    fn unknown_country_conversion_keeps_reading() {
        let r = TimezoneResolver::new();
        let reading = local(2024, 6, 14, 9, 0);
        let ts = r.to_reference_clock_at(reading, "ZZ", utc(2024, 6, 1));
        assert_eq!(ts.naive_local(), reading);
    }
}
