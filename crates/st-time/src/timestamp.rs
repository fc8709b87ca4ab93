//! Parsing of entry timestamps.
//!
//! Timestamps carrying an explicit offset (RFC 3339) are taken as-is.
//! Bare wall-clock readings are interpreted on the reference clock, which is
//! how the host platform emits them.

use chrono::{DateTime, FixedOffset, NaiveDateTime};
use st_core::errors::{Error, Result};

use crate::reference_clock::REFERENCE_CLOCK;

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse an entry timestamp.
///
/// # Errors
/// [`Error::InvalidTimestamp`] if the input matches none of the accepted
/// forms.  This is a caller bug and is never papered over.
pub fn parse_timestamp(input: &str) -> Result<DateTime<FixedOffset>> {
    let s = input.trim();
    if s.is_empty() {
        return Err(Error::InvalidTimestamp {
            input: input.to_string(),
            reason: "empty input".into(),
        });
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Ok(ts);
    }
    parse_naive(s)
        .map(|local| REFERENCE_CLOCK.from_wall_clock(local))
        .ok_or_else(|| Error::InvalidTimestamp {
            input: input.to_string(),
            reason: "expected RFC 3339 or `YYYY-MM-DD HH:MM[:SS]`".into(),
        })
}

/// Parse a wall-clock reading without offset.
pub fn parse_local(input: &str) -> Result<NaiveDateTime> {
    parse_naive(input.trim()).ok_or_else(|| Error::InvalidTimestamp {
        input: input.to_string(),
        reason: "expected `YYYY-MM-DD HH:MM[:SS]`".into(),
    })
}

fn parse_naive(s: &str) -> Option<NaiveDateTime> {
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
}
