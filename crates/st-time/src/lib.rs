//! # st-time
//!
//! Weekday and weekend types, country timezone resolution, the platform
//! reference clock, and local delivery windows with slot selection.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// Static country → timezone table.
pub mod country;

/// UTC offsets in fractional hours and their `±HH:MM` rendering.
pub mod offset;

/// The platform's fixed-offset reference clock.
pub mod reference_clock;

/// `TimezoneResolver`: country lookups and reference-clock conversion.
pub mod resolver;

/// Send-slot enumeration and selection.
pub mod slot;

/// Entry-timestamp parsing.
pub mod timestamp;

/// `Weekday` and `WeekendDays`.
pub mod weekday;

/// `TimeWindow` and window-set validation.
pub mod window;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use country::CountryTimezoneEntry;
pub use offset::{format_offset, parse_offset};
pub use reference_clock::{ReferenceClock, REFERENCE_CLOCK};
pub use resolver::TimezoneResolver;
pub use slot::{select_slot, SelectionReason, SlotOptions, SlotSelection, TimeSlot};
pub use timestamp::{parse_local, parse_timestamp};
pub use weekday::{WeekendDays, Weekday};
pub use window::{merge_overlapping, validate, TimeWindow, WindowValidation};
