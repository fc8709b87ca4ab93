//! Discrete send-slot enumeration and selection.
//!
//! Every enabled window contributes one slot per whole hour in
//! `[ceil(start), end)`.  A fractional start additionally contributes a slot
//! at the exact boundary, so `9.5..11` yields 09:30 and 10:00.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use tracing::debug;

use crate::window::TimeWindow;

/// Number of alternatives returned next to the selected slot.
pub const MAX_ALTERNATIVES: usize = 3;

/// A concrete send time on a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeSlot {
    /// Local date and time of the slot.
    pub datetime: NaiveDateTime,
    /// Hour of day (0–23).
    pub hour: u32,
    /// Minute of hour (0–59).
    pub minute: u32,
}

impl TimeSlot {
    fn at(day: NaiveDate, hour: u32, minute: u32) -> Option<Self> {
        let time = NaiveTime::from_hms_opt(hour, minute, 0)?;
        Some(Self {
            datetime: day.and_time(time),
            hour,
            minute,
        })
    }

    fn minutes(&self) -> i64 {
        self.hour as i64 * 60 + self.minute as i64
    }
}

impl std::fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// Knobs for [`select_slot`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotOptions {
    /// Hour to pick when it is available.
    pub preferred_hour: Option<u32>,
    /// Hours that must not be used.
    pub excluded_hours: Vec<u32>,
    /// Pick the earliest slot (`true`) or the latest (`false`).
    pub prioritize_earlier: bool,
    /// Only slots strictly after this time of day are eligible.
    pub later_than: Option<NaiveTime>,
}

impl Default for SlotOptions {
    fn default() -> Self {
        Self {
            preferred_hour: None,
            excluded_hours: Vec::new(),
            prioritize_earlier: true,
            later_than: None,
        }
    }
}

impl SlotOptions {
    /// Set the preferred hour.
    pub fn with_preferred_hour(mut self, hour: u32) -> Self {
        self.preferred_hour = Some(hour);
        self
    }

    /// Set the excluded hours.
    pub fn with_excluded_hours(mut self, hours: impl Into<Vec<u32>>) -> Self {
        self.excluded_hours = hours.into();
        self
    }

    /// Drop slots at or before `time`.
    pub fn with_later_than(mut self, time: NaiveTime) -> Self {
        self.later_than = Some(time);
        self
    }

    /// Prefer the latest slot instead of the earliest.
    pub fn latest_first(mut self) -> Self {
        self.prioritize_earlier = false;
        self
    }
}

/// Why a slot was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionReason {
    /// The preferred hour was available.
    Preferred,
    /// Earliest remaining slot.
    Earliest,
    /// Latest remaining slot.
    Latest,
}

/// Outcome of [`select_slot`].
#[derive(Debug, Clone, PartialEq)]
pub struct SlotSelection {
    /// `true` when a slot was selected.
    pub success: bool,
    /// The chosen slot.
    pub selected_slot: Option<TimeSlot>,
    /// How it was chosen.
    pub reason: Option<SelectionReason>,
    /// Up to three other slots nearest to the chosen one, in time order.
    pub alternative_slots: Vec<TimeSlot>,
    /// Why nothing was selected.
    pub error: Option<String>,
}

impl SlotSelection {
    fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            selected_slot: None,
            reason: None,
            alternative_slots: Vec::new(),
            error: Some(error.into()),
        }
    }
}

/// Enumerate the slots of every enabled window on `day`, sorted and
/// deduplicated.
pub fn enumerate_slots(day: NaiveDate, windows: &[TimeWindow]) -> Vec<TimeSlot> {
    let mut slots = Vec::new();
    for w in windows.iter().filter(|w| w.enabled) {
        if !w.start_hour.is_finite()
            || !w.end_hour.is_finite()
            || !(0.0..24.0).contains(&w.start_hour)
        {
            continue;
        }
        let whole = w.start_hour.floor();
        let minute = ((w.start_hour - whole) * 60.0).round() as u32;
        let mut hour = whole as u32;
        if minute > 0 {
            if minute < 60 && w.start_hour < w.end_hour {
                slots.extend(TimeSlot::at(day, hour, minute));
            }
            hour += 1;
        }
        let end = w.end_hour.min(24.0);
        while (hour as f64) < end {
            slots.extend(TimeSlot::at(day, hour, 0));
            hour += 1;
        }
    }
    slots.sort();
    slots.dedup();
    slots
}

/// Pick a send slot on `day`.
///
/// Policy: the preferred hour if it survives exclusion and the
/// [`later_than`](SlotOptions::later_than) cut-off, otherwise the earliest
/// (or latest) remaining slot.  Never panics; an empty result is
/// reported through [`SlotSelection::error`].
pub fn select_slot(day: NaiveDate, windows: &[TimeWindow], options: &SlotOptions) -> SlotSelection {
    if !windows.iter().any(|w| w.enabled) {
        return SlotSelection::failure("no enabled time windows");
    }

    let slots: Vec<TimeSlot> = enumerate_slots(day, windows)
        .into_iter()
        .filter(|s| !options.excluded_hours.contains(&s.hour))
        .collect();
    if slots.is_empty() {
        return SlotSelection::failure("all time slots are excluded");
    }
    let slots: Vec<TimeSlot> = match options.later_than {
        Some(after) => slots.into_iter().filter(|s| s.datetime.time() > after).collect(),
        None => slots,
    };
    if slots.is_empty() {
        return SlotSelection::failure("no time slots left on this day");
    }

    let preferred = options
        .preferred_hour
        .and_then(|h| slots.iter().position(|s| s.hour == h));
    let (index, reason) = match preferred {
        Some(i) => (i, SelectionReason::Preferred),
        None if options.prioritize_earlier => (0, SelectionReason::Earliest),
        None => (slots.len() - 1, SelectionReason::Latest),
    };
    let selected = slots[index];

    let mut alternatives: Vec<TimeSlot> = slots
        .iter()
        .copied()
        .filter(|s| *s != selected)
        .collect();
    alternatives.sort_by_key(|s| ((s.minutes() - selected.minutes()).abs(), s.minutes()));
    alternatives.truncate(MAX_ALTERNATIVES);
    alternatives.sort();

    debug!(%day, slot = %selected, ?reason, candidates = slots.len(), "time slot selected");
    SlotSelection {
        success: true,
        selected_slot: Some(selected),
        reason: Some(reason),
        alternative_slots: alternatives,
        error: None,
    }
}
