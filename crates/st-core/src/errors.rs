//! Error types for sendtime.
//!
//! Every input-validation failure in the workspace is reported through the
//! single `thiserror`-derived [`Error`] enum.  Data-unavailability and
//! exhaustion conditions are *not* errors: they are answered by fallbacks or
//! structured failure results in the component crates.
//!
//! The [`ensure!`](crate::ensure) macro is the shorthand used for
//! preconditions.

use thiserror::Error;

/// The top-level error type used throughout sendtime.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// Precondition violated by the caller.
    #[error("precondition not satisfied: {0}")]
    Precondition(String),

    /// A timestamp could not be parsed.
    #[error("invalid timestamp `{input}`: {reason}")]
    InvalidTimestamp {
        /// The raw input.
        input: String,
        /// Why parsing failed.
        reason: String,
    },

    /// An hour value fell outside `[0, 23]` or was not finite.
    #[error("hour {0} out of range [0, 23]")]
    InvalidHour(f64),

    /// A weekday ordinal fell outside `1..=7`.
    #[error("weekday ordinal {0} out of range [1, 7]")]
    InvalidWeekday(u8),

    /// A country code was not a two-letter ISO 3166-1 code.
    #[error("invalid country code `{0}`")]
    InvalidCountryCode(String),

    /// An offset string could not be parsed.
    #[error("invalid UTC offset `{0}`")]
    InvalidOffset(String),

    /// A holiday payload was not a sequence of holiday records.
    #[error("invalid holiday payload: {0}")]
    InvalidPayload(String),

    /// A set of time windows failed validation.
    #[error("invalid time windows: {}", .0.join("; "))]
    InvalidWindows(Vec<String>),

    /// The remote holiday source failed.
    #[error("holiday fetch failed for {country}:{year}: {reason}")]
    Fetch {
        /// Upper-cased country code.
        country: String,
        /// Requested year.
        year: i32,
        /// Upstream failure description.
        reason: String,
    },

    /// Configuration value out of range.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl Error {
    /// Build a [`Error::Fetch`] from anything displayable.
    pub fn fetch(country: &str, year: i32, reason: impl std::fmt::Display) -> Self {
        Error::Fetch {
            country: country.to_ascii_uppercase(),
            year,
            reason: reason.to_string(),
        }
    }

    /// Return `true` if this error signals unavailable upstream data rather
    /// than a caller bug.
    pub fn is_data_unavailable(&self) -> bool {
        matches!(self, Error::Fetch { .. })
    }
}

/// Shorthand `Result` type used throughout sendtime.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Return `Err(Error::Precondition(...))` if `$cond` is false.
///
/// # Example
/// ```
/// use st_core::{ensure, errors::Error};
/// fn positive(x: f64) -> st_core::errors::Result<f64> {
///     ensure!(x > 0.0, "x must be positive, got {x}");
///     Ok(x)
/// }
/// assert!(positive(1.0).is_ok());
/// assert!(matches!(positive(-1.0), Err(Error::Precondition(_))));
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::Precondition(
                format!($($msg)*)
            ));
        }
    };
}
