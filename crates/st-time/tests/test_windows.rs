//! Integration tests for window validation, merging, and slot selection.

use chrono::NaiveDate;
use st_core::Error;
use st_time::{merge_overlapping, select_slot, validate, SelectionReason, SlotOptions, TimeWindow};

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 17).unwrap()
}

fn morning_and_afternoon() -> Vec<TimeWindow> {
    vec![TimeWindow::new(9.0, 10.0), TimeWindow::new(14.0, 16.0)]
}

fn selected_hour(windows: &[TimeWindow], options: &SlotOptions) -> Option<u32> {
    select_slot(day(), windows, options)
        .selected_slot
        .map(|s| s.hour)
}

#[test]
fn slot_selection_is_deterministic() {
    let windows = morning_and_afternoon();
    assert_eq!(selected_hour(&windows, &SlotOptions::default()), Some(9));
    assert_eq!(
        selected_hour(&windows, &SlotOptions::default().with_excluded_hours([9])),
        Some(14)
    );
    assert_eq!(
        selected_hour(&windows, &SlotOptions::default().latest_first()),
        Some(15)
    );
}

#[test]
fn preferred_hour_wins_when_available() {
    let windows = morning_and_afternoon();
    let picked = select_slot(day(), &windows, &SlotOptions::default().with_preferred_hour(15));
    assert_eq!(picked.reason, Some(SelectionReason::Preferred));
    assert_eq!(picked.selected_slot.unwrap().hour, 15);

    // 12:00 is outside every window, so the policy falls through to earliest.
    let picked = select_slot(day(), &windows, &SlotOptions::default().with_preferred_hour(12));
    assert_eq!(picked.reason, Some(SelectionReason::Earliest));
    assert_eq!(picked.selected_slot.unwrap().hour, 9);
}

#[test]
fn selection_reports_alternatives_in_time_order() {
    let picked = select_slot(day(), &morning_and_afternoon(), &SlotOptions::default());
    let alternatives: Vec<String> = picked
        .alternative_slots
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(alternatives, vec!["14:00", "15:00"]);
    assert_eq!(picked.selected_slot.unwrap().datetime.date(), day());
}

#[test]
fn fractional_window_has_one_boundary_slot() {
    let picked = select_slot(day(), &[TimeWindow::new(9.5, 10.0)], &SlotOptions::default());
    let slot = picked.selected_slot.unwrap();
    assert_eq!((slot.hour, slot.minute), (9, 30));
    assert!(picked.alternative_slots.is_empty());
}

#[test]
fn selection_fails_without_usable_slots() {
    let disabled = [TimeWindow::disabled(9.0, 17.0)];
    let none_enabled = select_slot(day(), &disabled, &SlotOptions::default());
    assert!(!none_enabled.success);
    assert_eq!(none_enabled.error.as_deref(), Some("no enabled time windows"));

    let all_excluded = select_slot(
        day(),
        &[TimeWindow::new(9.0, 11.0)],
        &SlotOptions::default().with_excluded_hours(vec![9, 10]),
    );
    assert!(!all_excluded.success);
    assert_eq!(all_excluded.error.as_deref(), Some("all time slots are excluded"));
}

#[test]
fn overlap_warns_but_validates() {
    let report = validate(&[TimeWindow::new(9.0, 11.0), TimeWindow::new(10.0, 12.0)]);
    assert!(report.valid);
    assert!(!report.warnings.is_empty());
}

#[test]
fn validation_errors_are_collected() {
    let report = validate(&[
        TimeWindow::new(10.0, 9.0),
        TimeWindow::new(-1.0, 24.0),
        TimeWindow::new(8.0, 8.5),
    ]);
    assert!(!report.valid);
    assert_eq!(report.errors.len(), 3);
    assert_eq!(report.warnings.len(), 1);

    let report = validate(&[TimeWindow::disabled(9.0, 10.0)]);
    assert_eq!(report.errors, vec!["at least one time window must be enabled"]);
}

#[test]
fn merge_combines_enabled_and_keeps_disabled() {
    let merged = merge_overlapping(&[
        TimeWindow::new(14.0, 16.0),
        TimeWindow::disabled(20.0, 22.0),
        TimeWindow::new(9.0, 11.0),
        TimeWindow::new(10.5, 12.0),
        TimeWindow::new(12.0, 13.0),
    ])
    .unwrap();
    assert_eq!(
        merged,
        vec![
            TimeWindow::new(9.0, 13.0),
            TimeWindow::new(14.0, 16.0),
            TimeWindow::disabled(20.0, 22.0),
        ]
    );
}

#[test]
fn merge_rejects_invalid_input() {
    let err = merge_overlapping(&[TimeWindow::new(12.0, 11.0)]).unwrap_err();
    assert!(matches!(err, Error::InvalidWindows(ref errors) if errors.len() == 1));
}

#[test]
fn windows_deserialize_from_admin_payload() {
    let windows: Vec<TimeWindow> = serde_json::from_str(
        r#"[{"startHour": 9.5, "endHour": 12}, {"startHour": 13, "endHour": 17, "enabled": false}]"#,
    )
    .unwrap();
    assert_eq!(windows[0], TimeWindow::new(9.5, 12.0));
    assert!(!windows[1].enabled);
    assert_eq!(windows[0].to_string(), "09:30-12:00");
}
