//! UTC offsets expressed in (possibly fractional) hours.

use chrono::FixedOffset;
use st_core::errors::{Error, Result};
use st_core::OffsetHours;

/// Offset in whole seconds, rounded to the nearest minute.
pub fn offset_seconds(hours: OffsetHours) -> i32 {
    ((hours * 60.0).round() as i32) * 60
}

/// Convert an offset in hours to a chrono [`FixedOffset`].
///
/// Returns `None` if the offset is not finite or outside ±24 h.
pub fn fixed_offset(hours: OffsetHours) -> Option<FixedOffset> {
    if !hours.is_finite() {
        return None;
    }
    FixedOffset::east_opt(offset_seconds(hours))
}

/// Offset in hours of a chrono [`FixedOffset`].
pub fn offset_hours(offset: FixedOffset) -> OffsetHours {
    offset.local_minus_utc() as f64 / 3600.0
}

/// Render an offset as signed `HH:MM`.
///
/// ```
/// use st_time::offset::format_offset;
/// assert_eq!(format_offset(5.5), "+05:30");
/// assert_eq!(format_offset(-6.0), "-06:00");
/// assert_eq!(format_offset(0.0), "+00:00");
/// ```
pub fn format_offset(hours: OffsetHours) -> String {
    let total_minutes = (hours * 60.0).round() as i64;
    let sign = if total_minutes < 0 { '-' } else { '+' };
    let abs = total_minutes.abs();
    format!("{sign}{:02}:{:02}", abs / 60, abs % 60)
}

/// Parse a signed `HH:MM` (or `HHMM`, or `Z`) offset into hours.
pub fn parse_offset(s: &str) -> Result<OffsetHours> {
    let bad = || Error::InvalidOffset(s.to_string());
    let s = s.trim();
    if s.eq_ignore_ascii_case("z") {
        return Ok(0.0);
    }
    let (sign, rest) = match s.as_bytes().first() {
        Some(b'+') => (1.0, &s[1..]),
        Some(b'-') => (-1.0, &s[1..]),
        _ => return Err(bad()),
    };
    if !rest.is_ascii() {
        return Err(bad());
    }
    let (hh, mm) = match rest.split_once(':') {
        Some((h, m)) => (h, m),
        None if rest.len() == 4 => rest.split_at(2),
        None => return Err(bad()),
    };
    if hh.len() != 2 || mm.len() != 2 {
        return Err(bad());
    }
    let h: u32 = hh.parse().map_err(|_| bad())?;
    let m: u32 = mm.parse().map_err(|_| bad())?;
    if h > 23 || m > 59 {
        return Err(bad());
    }
    Ok(sign * (h as f64 + m as f64 / 60.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn formats_quarter_hour_offsets() {
        assert_eq!(format_offset(5.75), "+05:45");
        assert_eq!(format_offset(-3.5), "-03:30");
        assert_eq!(format_offset(12.0), "+12:00");
    }

    #[test]
    fn parse_accepts_common_forms() {
        assert_relative_eq!(parse_offset("+05:30").unwrap(), 5.5);
        assert_relative_eq!(parse_offset("-0600").unwrap(), -6.0);
        assert_relative_eq!(parse_offset("Z").unwrap(), 0.0);
    }

    #[test]
    fn parse_rejects_garbage() {
        for s in ["", "05:30", "+5:30", "+24:00", "+05:60", "+ab:cd", "+1é1", "-é:00"] {
            let expected = Err(Error::InvalidOffset(s.to_string()));
            assert_eq!(parse_offset(s), expected, "{s}");
        }
    }

    #[test]
    fn fixed_offset_matches_hours() {
        let off = fixed_offset(5.5).unwrap();
        assert_eq!(off.local_minus_utc(), 19_800);
        assert_relative_eq!(offset_hours(off), 5.5);
        assert!(fixed_offset(f64::NAN).is_none());
        assert!(fixed_offset(30.0).is_none());
    }
}
