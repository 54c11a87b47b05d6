//! # Host Bridge Traits
//!
//! Capability traits the host application provides to the lending core.
//!
//! ## Overview
//!
//! The core never reads the system clock or writes to a terminal directly.
//! Both concerns are injected so that a desktop front end, a test harness, or
//! a headless tool can each supply their own implementation.
//!
//! ## Traits
//!
//! - [`Clock`](time::Clock) - Time source; issue and return dates come from
//!   [`Clock::today`](time::Clock::today)
//! - [`LoggerSink`](time::LoggerSink) - Forward structured logs to host logging
//!
//! ## Provided implementations
//!
//! - [`SystemClock`](time::SystemClock) - wall clock, local calendar date
//! - [`FixedClock`](time::FixedClock) - pinned date for tests and demos
//! - [`ConsoleLogger`](time::ConsoleLogger) - stdout sink for development
//!
//! ## Error Handling
//!
//! Bridge implementations report failures through
//! [`BridgeError`](error::BridgeError).

pub mod error;
pub mod time;

pub use error::BridgeError;
pub use time::{Clock, ConsoleLogger, FixedClock, LogEntry, LogLevel, LoggerSink, SystemClock};
