//! # st-holidays
//!
//! Holiday data and the day-level decisions built on it.
//!
//! Holidays come from a [`HolidayFetcher`] and are kept in an expiring
//! [`HolidayCache`].  The [`BusinessDayChecker`] combines them with weekend
//! rules, and the [`DateExclusionAdjuster`] moves a send date forward past
//! excluded days.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// `DateExclusionAdjuster` and `ExclusionRule`.
pub mod adjuster;

/// Warm-up and refresh outcomes.
pub mod batch;

/// `HolidayCache`, an expiring `(country, year)` store.
pub mod cache;

/// `BusinessDayChecker`.
pub mod checker;

/// The `HolidayFetcher` seam and an in-memory implementation.
pub mod fetcher;

/// `HolidayRecord` and `HolidayKind`.
pub mod record;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use adjuster::{
    AdjustmentResult, DateExclusionAdjuster, DayExclusion, ExclusionReason, ExclusionRule,
};
pub use batch::{BatchError, BatchItem, BatchOutcome, BatchSummary};
pub use cache::{CacheEntry, CacheKey, HolidayCache};
pub use checker::BusinessDayChecker;
pub use fetcher::{HolidayFetcher, StaticHolidayFetcher};
pub use record::{HolidayKind, HolidayRecord};
