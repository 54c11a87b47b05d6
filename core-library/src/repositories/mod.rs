//! # Repository Pattern Implementation
//!
//! This module provides repository traits and SQLite implementations for data
//! access. The lending service only ever sees the traits, so tests can swap in
//! an in-memory fake or a mock without touching business rules.
//!
//! ## Architecture
//!
//! - Traits define the interface for each repository
//! - SQLite implementations use sqlx for async database access
//! - All operations return `Result<T>` for error handling
//! - Writes that must land together (issue, return) run inside one
//!   transaction in [`LoanRepository`]
//!
//! ## Available Repositories
//!
//! - `BookRepository` - Catalogue and available-copy counters
//! - `StudentRepository` - Borrowers, looked up by roll number
//! - `LoanRepository` - Issue/return ledger and the listings built on it

pub mod book;
pub mod loan;
pub mod student;

pub use book::{BookRepository, SqliteBookRepository};
pub use loan::{LoanRepository, SqliteLoanRepository};
pub use student::{SqliteStudentRepository, StudentRepository};
