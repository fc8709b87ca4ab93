//! # sendtime
//!
//! Computes when to deliver a message to a contact: a concrete timestamp on
//! the platform's fixed reference clock that falls inside a local delivery
//! window and avoids weekends and public holidays in the contact's country.
//!
//! This crate is a **façade** that re-exports the workspace crates and hosts
//! the [`SendTimeEngine`] pipeline.
//!
//! ## Quick start
//!
//! ```rust
//! use std::sync::Arc;
//! use sendtime::core::EngineConfig;
//! use sendtime::holidays::{ExclusionRule, StaticHolidayFetcher};
//! use sendtime::time::{parse_timestamp, TimeWindow};
//! use sendtime::SendTimeEngine;
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let fetcher = Arc::new(StaticHolidayFetcher::new());
//! let engine = SendTimeEngine::new(EngineConfig::default(), fetcher).unwrap();
//! let entry = parse_timestamp("2024-06-14 20:00:00").unwrap();
//! let windows = [TimeWindow::new(9.0, 12.0)];
//! let result = engine
//!     .compute_send_time(entry, "IN", &windows, &ExclusionRule::new("IN"))
//!     .await
//!     .unwrap();
//! assert!(result.success);
//! # });
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Errors, statistics counters, and configuration.
pub use st_core as core;

/// Weekdays, timezones, the reference clock, windows and slots.
pub use st_time as time;

/// Holiday records, cache, business-day checker and date adjuster.
pub use st_holidays as holidays;

/// The send-time pipeline.
pub mod engine;

pub use engine::{SendTimeEngine, SendTimeRequest, SendTimeResult};
