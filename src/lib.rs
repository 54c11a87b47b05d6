//! Workspace placeholder crate.
//!
//! This crate exists to expose a single feature flag that maps to the
//! individual workspace crates (`core-service`, `core-library`,
//! `core-runtime`). Host applications can depend on `lms-workspace` and enable
//! `service` without wiring each crate individually.

#[cfg(feature = "service")]
pub use core_library as library;
#[cfg(feature = "service")]
pub use core_runtime as runtime;
#[cfg(feature = "service")]
pub use core_service as service;
