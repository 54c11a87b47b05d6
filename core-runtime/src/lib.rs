//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the library lending core:
//! - Logging and tracing infrastructure
//! - Configuration management
//!
//! ## Overview
//!
//! This crate contains the runtime utilities that the storage and service
//! crates depend on. It establishes the logging conventions and the validated
//! configuration object handed to the bootstrapper.

pub mod config;
pub mod error;
pub mod logging;

pub use error::{Error, Result};
