//! Engine configuration values.
//!
//! [`EngineConfig`] only describes values; how they are loaded (file,
//! environment, admin UI) is up to the host process.  Every field has a
//! default, so a partial document deserialises cleanly.

use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// What to answer when holiday data for a country/year cannot be obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackBehavior {
    /// Treat the day as a regular (non-holiday) day.
    #[default]
    Ignore,
    /// Treat the day as a holiday.
    AssumeHoliday,
}

impl FallbackBehavior {
    /// The holiday answer this policy produces.
    pub fn as_holiday(self) -> bool {
        matches!(self, FallbackBehavior::AssumeHoliday)
    }
}

impl std::fmt::Display for FallbackBehavior {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            FallbackBehavior::Ignore => "ignore",
            FallbackBehavior::AssumeHoliday => "assume_holiday",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for FallbackBehavior {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ignore" => Ok(FallbackBehavior::Ignore),
            "assume_holiday" => Ok(FallbackBehavior::AssumeHoliday),
            other => Err(Error::Config(format!("unknown fallback behavior `{other}`"))),
        }
    }
}

/// Configuration for the holiday cache, business-day checker and adjuster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Time-to-live of a cached `(country, year)` entry, in seconds.
    pub cache_ttl_secs: u64,
    /// Period of the background expiry sweep, in seconds.
    pub sweep_interval_secs: u64,
    /// Maximum number of live cache keys.
    pub max_keys: usize,
    /// Countries populated by a default warm-up.
    pub warmup_countries: Vec<String>,
    /// Pause between consecutive fetches during warm-up, in milliseconds.
    pub warmup_delay_ms: u64,
    /// Weekend days as ISO ordinals (1 = Monday … 7 = Sunday).
    pub weekend_days: Vec<u8>,
    /// Answer used when holiday data is unavailable.
    pub fallback_behavior: FallbackBehavior,
    /// Bound for the next-business-day walk.
    pub max_lookahead_days: u32,
    /// Default bound for the exclusion adjuster's day scan.
    pub max_consecutive_exclusion_days: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cache_ttl_secs: 24 * 60 * 60,
            sweep_interval_secs: 60 * 60,
            max_keys: 1_000,
            warmup_countries: [
                "US", "GB", "DE", "FR", "ES", "IT", "CA", "AU", "JP", "BR", "MX", "IN",
            ]
            .iter()
            .map(|c| c.to_string())
            .collect(),
            warmup_delay_ms: 100,
            weekend_days: vec![6, 7],
            fallback_behavior: FallbackBehavior::Ignore,
            max_lookahead_days: 30,
            max_consecutive_exclusion_days: 14,
        }
    }
}

impl EngineConfig {
    /// Cache TTL as a [`Duration`].
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// Sweep period as a [`Duration`].
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    /// Warm-up pause as a [`Duration`].
    pub fn warmup_delay(&self) -> Duration {
        Duration::from_millis(self.warmup_delay_ms)
    }

    /// Check every value for range errors.
    pub fn validate(&self) -> Result<()> {
        if self.cache_ttl_secs == 0 {
            return Err(Error::Config("cache_ttl_secs must be positive".into()));
        }
        if self.sweep_interval_secs == 0 {
            return Err(Error::Config("sweep_interval_secs must be positive".into()));
        }
        if self.max_keys == 0 {
            return Err(Error::Config("max_keys must be positive".into()));
        }
        if let Some(&bad) = self.weekend_days.iter().find(|d| !(1..=7).contains(*d)) {
            return Err(Error::InvalidWeekday(bad));
        }
        if self.weekend_days.len() >= 7 {
            return Err(Error::Config(
                "weekend_days must leave at least one working day".into(),
            ));
        }
        if let Some(bad) = self
            .warmup_countries
            .iter()
            .find(|c| c.len() != 2 || !c.chars().all(|ch| ch.is_ascii_alphabetic()))
        {
            return Err(Error::InvalidCountryCode(bad.clone()));
        }
        if !(1..=366).contains(&self.max_lookahead_days) {
            return Err(Error::Config(format!(
                "max_lookahead_days {} out of range [1, 366]",
                self.max_lookahead_days
            )));
        }
        if !(1..=366).contains(&self.max_consecutive_exclusion_days) {
            return Err(Error::Config(format!(
                "max_consecutive_exclusion_days {} out of range [1, 366]",
                self.max_consecutive_exclusion_days
            )));
        }
        Ok(())
    }
}
