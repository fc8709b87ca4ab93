//! The platform reference clock.
//!
//! All computed send times are expressed on a single fixed-offset clock that
//! never observes daylight saving.  The platform runs on UTC-6 all year.

use chrono::{DateTime, FixedOffset, NaiveDateTime, Offset, TimeDelta, TimeZone, Utc};
use st_core::OffsetHours;

use crate::offset::{fixed_offset, format_offset};

/// A fixed, non-DST-adjusted clock.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceClock {
    /// IANA identifier of the equivalent fixed zone.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Fixed UTC offset in hours.
    pub offset_hours: OffsetHours,
    /// Always `false`: the reference clock ignores daylight saving.
    pub dst_adjusted: bool,
}

/// The one process-wide reference clock.
///
/// `Etc/GMT+6` is the IANA spelling of UTC-6 (the sign is inverted in the
/// `Etc` area).
pub static REFERENCE_CLOCK: ReferenceClock = ReferenceClock {
    id: "Etc/GMT+6",
    name: "Platform Standard Time",
    offset_hours: -6.0,
    dst_adjusted: false,
};

impl ReferenceClock {
    /// The fixed offset as a chrono value.
    pub fn offset(&self) -> FixedOffset {
        fixed_offset(self.offset_hours).unwrap_or_else(|| Utc.fix())
    }

    /// Signed `HH:MM` rendering of the offset.
    pub fn offset_label(&self) -> String {
        format_offset(self.offset_hours)
    }

    /// Current time on this clock.
    pub fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.offset())
    }

    /// Express an instant on this clock.
    pub fn at<Tz: TimeZone>(&self, instant: &DateTime<Tz>) -> DateTime<FixedOffset> {
        instant.with_timezone(&self.offset())
    }

    /// Interpret a wall-clock reading as already being on this clock.
    pub fn from_wall_clock(&self, local: NaiveDateTime) -> DateTime<FixedOffset> {
        // A fixed offset has exactly one mapping for every wall-clock reading.
        let offset = self.offset();
        let utc = local - TimeDelta::seconds(offset.local_minus_utc() as i64);
        DateTime::from_naive_utc_and_offset(utc, offset)
    }
}

impl std::fmt::Display for ReferenceClock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (UTC{})", self.name, self.offset_label())
    }
}
