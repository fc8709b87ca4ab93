//! Local-time delivery windows and their validation.
//!
//! A [`TimeWindow`] is a `[start_hour, end_hour)` range of the recipient's
//! local day.  Start hours may be fractional (`9.5` starts at 09:30).
//! Overlapping and adjacent windows are legal; merging is an explicit
//! operation.

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use st_core::ensure;
use st_core::errors::{Error, Result};
use st_core::Hour;

/// Largest hour a window boundary may take.
pub const MAX_HOUR: Hour = 23.0;

/// A delivery window in local time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeWindow {
    /// First hour of the window (inclusive, may be fractional).
    pub start_hour: Hour,
    /// Hour at which the window closes (exclusive).
    pub end_hour: Hour,
    /// Disabled windows are kept in configuration but never used.
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

fn enabled_by_default() -> bool {
    true
}

impl TimeWindow {
    /// An enabled window.
    pub fn new(start_hour: Hour, end_hour: Hour) -> Self {
        Self {
            start_hour,
            end_hour,
            enabled: true,
        }
    }

    /// An enabled window, checked on construction.
    ///
    /// # Errors
    /// [`Error::InvalidHour`] for a boundary outside `[0, 23]`;
    /// [`Error::Precondition`] unless `start_hour < end_hour`.
    pub fn try_new(start_hour: Hour, end_hour: Hour) -> Result<Self> {
        for hour in [start_hour, end_hour] {
            if !hour.is_finite() || !(0.0..=MAX_HOUR).contains(&hour) {
                return Err(Error::InvalidHour(hour));
            }
        }
        ensure!(
            start_hour < end_hour,
            "window start {start_hour} must be before its end {end_hour}"
        );
        Ok(Self::new(start_hour, end_hour))
    }

    /// A disabled window.
    pub fn disabled(start_hour: Hour, end_hour: Hour) -> Self {
        Self {
            enabled: false,
            ..Self::new(start_hour, end_hour)
        }
    }

    /// Length in hours.
    pub fn duration(&self) -> Hour {
        self.end_hour - self.start_hour
    }

    /// Return `true` if `time` falls inside an enabled window.
    pub fn contains(&self, time: NaiveTime) -> bool {
        let h = time.hour() as f64 + time.minute() as f64 / 60.0 + time.second() as f64 / 3600.0;
        self.enabled && self.start_hour <= h && h < self.end_hour
    }

    /// Return `true` if the two windows share any time (adjacency is not
    /// overlap).
    pub fn overlaps(&self, other: &TimeWindow) -> bool {
        self.start_hour < other.end_hour && other.start_hour < self.end_hour
    }

    fn range_errors(&self, index: usize) -> Vec<String> {
        let mut errors = Vec::new();
        for (label, value) in [("startHour", self.start_hour), ("endHour", self.end_hour)] {
            if !value.is_finite() || !(0.0..=MAX_HOUR).contains(&value) {
                errors.push(format!(
                    "window {index}: {label} {value} must be a number in [0, 23]"
                ));
            }
        }
        if errors.is_empty() && self.start_hour >= self.end_hour {
            errors.push(format!(
                "window {index}: startHour {} must be before endHour {}",
                self.start_hour, self.end_hour
            ));
        }
        errors
    }
}

impl std::fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", clock_label(self.start_hour), clock_label(self.end_hour))?;
        if !self.enabled {
            write!(f, " (disabled)")?;
        }
        Ok(())
    }
}

fn clock_label(hour: Hour) -> String {
    let minutes = (hour * 60.0).round() as i64;
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Outcome of [`validate`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WindowValidation {
    /// `true` when `errors` is empty.
    pub valid: bool,
    /// Problems that make the set unusable.
    pub errors: Vec<String>,
    /// Legal but suspicious configuration.
    pub warnings: Vec<String>,
}

/// Validate a set of windows.
///
/// Errors: no enabled window; a boundary outside `[0, 23]` or not a number;
/// `start_hour >= end_hour`.  Warnings: a window shorter than one hour; two
/// well-formed enabled windows overlapping.
pub fn validate(windows: &[TimeWindow]) -> WindowValidation {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if !windows.iter().any(|w| w.enabled) {
        errors.push("at least one time window must be enabled".to_string());
    }

    for (i, w) in windows.iter().enumerate() {
        let range_errors = w.range_errors(i);
        if range_errors.is_empty() && w.duration() < 1.0 {
            warnings.push(format!("window {i} ({w}) is shorter than one hour"));
        }
        errors.extend(range_errors);
    }

    let enabled: Vec<(usize, &TimeWindow)> = windows
        .iter()
        .enumerate()
        .filter(|(i, w)| w.enabled && w.range_errors(*i).is_empty())
        .collect();
    for (a, (i, wi)) in enabled.iter().enumerate() {
        for (j, wj) in &enabled[a + 1..] {
            if wi.overlaps(wj) {
                warnings.push(format!("windows {i} ({wi}) and {j} ({wj}) overlap"));
            }
        }
    }

    WindowValidation {
        valid: errors.is_empty(),
        errors,
        warnings,
    }
}

/// Merge overlapping enabled windows.
///
/// Enabled windows are sorted by start and folded together whenever a start
/// is at or before the running end, so adjacent windows merge too.  Disabled
/// windows are appended unchanged.
///
/// # Errors
/// [`Error::InvalidWindows`] if `windows` does not pass [`validate`].
pub fn merge_overlapping(windows: &[TimeWindow]) -> Result<Vec<TimeWindow>> {
    let report = validate(windows);
    if !report.valid {
        return Err(Error::InvalidWindows(report.errors));
    }

    let mut enabled: Vec<TimeWindow> = windows.iter().copied().filter(|w| w.enabled).collect();
    enabled.sort_by(|a, b| a.start_hour.total_cmp(&b.start_hour));

    let mut merged: Vec<TimeWindow> = Vec::with_capacity(enabled.len());
    for w in enabled {
        match merged.last_mut() {
            Some(current) if w.start_hour <= current.end_hour => {
                current.end_hour = current.end_hour.max(w.end_hour);
            }
            _ => merged.push(w),
        }
    }
    merged.extend(windows.iter().copied().filter(|w| !w.enabled));
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlap_is_a_warning_not_an_error() {
        let report = validate(&[TimeWindow::new(9.0, 11.0), TimeWindow::new(10.0, 12.0)]);
        assert!(report.valid);
        assert!(report.errors.is_empty());
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn adjacent_windows_do_not_warn() {
        let report = validate(&[TimeWindow::new(9.0, 10.0), TimeWindow::new(10.0, 12.0)]);
        assert!(report.valid);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn disabled_overlap_is_ignored() {
        let report = validate(&[TimeWindow::new(9.0, 11.0), TimeWindow::disabled(10.0, 12.0)]);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn no_enabled_window_is_an_error() {
        let report = validate(&[TimeWindow::disabled(9.0, 11.0)]);
        assert!(!report.valid);
        assert_eq!(report.errors.len(), 1);
        assert!(!validate(&[]).valid);
    }

    #[test]
    fn range_and_order_errors() {
        let report = validate(&[
            TimeWindow::new(-1.0, 5.0),
            TimeWindow::new(10.0, 24.0),
            TimeWindow::new(14.0, 12.0),
            TimeWindow::new(f64::NAN, 12.0),
        ]);
        assert!(!report.valid);
        assert_eq!(report.errors.len(), 4);
    }

    #[test]
    fn short_window_warns() {
        let report = validate(&[TimeWindow::new(9.5, 10.0)]);
        assert!(report.valid);
        assert_eq!(report.warnings, vec!["window 0 (09:30-10:00) is shorter than one hour"]);
    }

    #[test]
    fn merge_folds_overlapping_and_adjacent() {
        let merged = merge_overlapping(&[
            TimeWindow::new(14.0, 16.0),
            TimeWindow::new(9.0, 11.0),
            TimeWindow::disabled(1.0, 2.0),
            TimeWindow::new(10.0, 12.0),
            TimeWindow::new(12.0, 13.0),
        ])
        .unwrap();
        assert_eq!(
            merged,
            vec![
                TimeWindow::new(9.0, 13.0),
                TimeWindow::new(14.0, 16.0),
                TimeWindow::disabled(1.0, 2.0),
            ]
        );
    }

    #[test]
    fn merge_rejects_invalid_input() {
        let err = merge_overlapping(&[TimeWindow::new(12.0, 9.0)]).unwrap_err();
        assert!(matches!(err, Error::InvalidWindows(_)));
    }

    #[test]
    fn contains_respects_bounds_and_enabled() {
        let w = TimeWindow::new(9.5, 11.0);
        assert!(w.contains(NaiveTime::from_hms_opt(9, 30, 0).unwrap()));
        assert!(!w.contains(NaiveTime::from_hms_opt(9, 29, 59).unwrap()));
        assert!(!w.contains(NaiveTime::from_hms_opt(11, 0, 0).unwrap()));
        assert!(!TimeWindow::disabled(9.0, 11.0).contains(NaiveTime::from_hms_opt(10, 0, 0).unwrap()));
    }

    #[test]
    fn checked_constructor_rejects_bad_hours() {
        assert_eq!(TimeWindow::try_new(9.5, 12.0), Ok(TimeWindow::new(9.5, 12.0)));
        assert_eq!(TimeWindow::try_new(9.0, 23.5), Err(Error::InvalidHour(23.5)));
        assert!(matches!(
            TimeWindow::try_new(12.0, 12.0),
            Err(Error::Precondition(_))
        ));
    }

    #[test]
    fn deserialises_camel_case() {
        let w: TimeWindow = serde_json::from_str(r#"{"startHour": 9.5, "endHour": 12}"#).unwrap();
        assert_eq!(w, TimeWindow::new(9.5, 12.0));
    }
}
