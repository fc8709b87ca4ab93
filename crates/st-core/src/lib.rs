//! # st-core
//!
//! Core types shared across the sendtime workspace.
//!
//! This crate provides the foundational building blocks used by every other
//! crate – the error hierarchy with its `ensure!` macro, the
//! injected statistics counters, and the engine configuration values.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Public modules ───────────────────────────────────────────────────────────

/// Engine configuration values and the fallback policy enum.
pub mod config;

/// Error types and the `ensure!` macro.
pub mod errors;

/// Statistics counters injected into the cache and checker.
pub mod stats;

// ── Primitive type aliases ────────────────────────────────────────────────────

/// Hour of day, possibly fractional (`9.5` is 09:30).
pub type Hour = f64;

/// UTC offset expressed in hours, possibly fractional (`5.5` is +05:30).
pub type OffsetHours = f64;

/// Calendar year.
pub type Year = i32;

// ── Re-exports for convenience ────────────────────────────────────────────────

pub use config::{EngineConfig, FallbackBehavior};
pub use errors::{Error, Result};
pub use stats::{CacheStats, CacheStatsSnapshot, CheckerStats, CheckerStatsSnapshot, Counter};
