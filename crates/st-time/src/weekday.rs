//! The day-of-week enum `Weekday` and `WeekendDays`, the set of days a
//! country does not work.

use chrono::{Datelike, NaiveDate};
use st_core::errors::{Error, Result};

/// Day of the week.
///
/// Variants are numbered 1–7 (Monday = 1, Sunday = 7), the ISO 8601
/// convention used by configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Weekday {
    /// Monday (1).
    Monday = 1,
    /// Tuesday (2).
    Tuesday = 2,
    /// Wednesday (3).
    Wednesday = 3,
    /// Thursday (4).
    Thursday = 4,
    /// Friday (5).
    Friday = 5,
    /// Saturday (6).
    Saturday = 6,
    /// Sunday (7).
    Sunday = 7,
}

impl Weekday {
    /// All seven days, Monday first.
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    /// Construct from the ISO ordinal (1 = Monday … 7 = Sunday).
    ///
    /// Returns `None` if the value is out of range.
    pub fn from_ordinal(n: u8) -> Option<Self> {
        match n {
            1 => Some(Weekday::Monday),
            2 => Some(Weekday::Tuesday),
            3 => Some(Weekday::Wednesday),
            4 => Some(Weekday::Thursday),
            5 => Some(Weekday::Friday),
            6 => Some(Weekday::Saturday),
            7 => Some(Weekday::Sunday),
            _ => None,
        }
    }

    /// Like [`from_ordinal`](Self::from_ordinal) but reports the bad value.
    pub fn try_from_ordinal(n: u8) -> Result<Self> {
        Self::from_ordinal(n).ok_or(Error::InvalidWeekday(n))
    }

    /// The weekday of a calendar date.
    pub fn of(date: NaiveDate) -> Self {
        date.weekday().into()
    }

    /// Return the ISO ordinal (1 = Monday … 7 = Sunday).
    pub fn ordinal(&self) -> u8 {
        *self as u8
    }

    /// Number of days from `self` forward to `other` (0–6).
    pub fn days_until(&self, other: Weekday) -> u32 {
        (other.ordinal() as u32 + 7 - self.ordinal() as u32) % 7
    }
}

impl From<chrono::Weekday> for Weekday {
    fn from(w: chrono::Weekday) -> Self {
        match w {
            chrono::Weekday::Mon => Weekday::Monday,
            chrono::Weekday::Tue => Weekday::Tuesday,
            chrono::Weekday::Wed => Weekday::Wednesday,
            chrono::Weekday::Thu => Weekday::Thursday,
            chrono::Weekday::Fri => Weekday::Friday,
            chrono::Weekday::Sat => Weekday::Saturday,
            chrono::Weekday::Sun => Weekday::Sunday,
        }
    }
}

impl std::fmt::Display for Weekday {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
            Weekday::Sunday => "Sunday",
        };
        write!(f, "{name}")
    }
}

/// A set of weekend days.
///
/// Defaults to Saturday and Sunday.  Stored as a 7-bit mask.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct WeekendDays(u8);

impl WeekendDays {
    /// No weekend at all.
    pub const NONE: WeekendDays = WeekendDays(0);

    /// Saturday and Sunday.
    pub const SATURDAY_SUNDAY: WeekendDays =
        WeekendDays(Self::bit(Weekday::Saturday) | Self::bit(Weekday::Sunday));

    /// Friday and Saturday (common across the Middle East).
    pub const FRIDAY_SATURDAY: WeekendDays =
        WeekendDays(Self::bit(Weekday::Friday) | Self::bit(Weekday::Saturday));

    const fn bit(day: Weekday) -> u8 {
        1 << (day as u8 - 1)
    }

    /// Build a set from weekdays.
    pub fn new(days: impl IntoIterator<Item = Weekday>) -> Self {
        WeekendDays(days.into_iter().fold(0, |mask, d| mask | Self::bit(d)))
    }

    /// Build a set from ISO ordinals, rejecting anything outside `1..=7`.
    pub fn from_ordinals(ordinals: &[u8]) -> Result<Self> {
        let days = ordinals
            .iter()
            .map(|&n| Weekday::try_from_ordinal(n))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(days))
    }

    /// Return `true` if `day` belongs to the weekend.
    pub fn contains(&self, day: Weekday) -> bool {
        self.0 & Self::bit(day) != 0
    }

    /// Return `true` if `date` falls on a weekend day.
    pub fn is_weekend(&self, date: NaiveDate) -> bool {
        self.contains(Weekday::of(date))
    }

    /// Members in Monday-first order.
    pub fn days(&self) -> Vec<Weekday> {
        Weekday::ALL
            .into_iter()
            .filter(|d| self.contains(*d))
            .collect()
    }

    /// Number of weekend days.
    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Return `true` if there are no weekend days.
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

impl Default for WeekendDays {
    fn default() -> Self {
        Self::SATURDAY_SUNDAY
    }
}

impl std::fmt::Debug for WeekendDays {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.days()).finish()
    }
}
