//! # Library Lending Core
//!
//! Owns the lending library database and the business rules around it.
//!
//! ## Overview
//!
//! This crate manages:
//! - SQLite connection pool and idempotent schema (`db`)
//! - Books, students and loans as typed models (`models`)
//! - Repository traits with SQLite implementations (`repositories`)
//! - The `LibraryService` enforcing issue/return rules (`service`)
//! - Conversion of raw form text into service arguments (`input`)

pub mod db;
pub mod error;
pub mod input;
pub mod models;
pub mod repositories;
pub mod service;

pub use error::{ConflictReason, ErrorKind, LibraryError, Result};
pub use input::{parse_quantity, IssueRequest};
pub use service::LibraryService;
