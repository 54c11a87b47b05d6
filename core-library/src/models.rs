//! Domain models for the lending library
//!
//! This module contains the persisted entities, their identifiers, and the
//! read models returned by the loan listings.

use crate::error::{LibraryError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

// =============================================================================
// ID Types
// =============================================================================

/// Unique identifier for a book
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(transparent)]
pub struct BookId(pub i64);

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a student
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(transparent)]
pub struct StudentId(pub i64);

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a loan (a row in `issued_books`)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(transparent)]
pub struct LoanId(pub i64);

impl fmt::Display for LoanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Domain Models
// =============================================================================

/// A catalogued title and how many copies are on the shelf right now
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    /// Copies currently available for issue, not copies owned
    pub quantity: i64,
}

impl Book {
    pub fn is_available(&self) -> bool {
        self.quantity > 0
    }
}

/// Editable fields of a book, as entered on the add and update forms
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookDetails {
    pub title: String,
    pub author: String,
    pub quantity: i64,
}

impl BookDetails {
    /// Build details from user input, trimming surrounding whitespace
    pub fn new(title: &str, author: &str, quantity: i64) -> Self {
        Self {
            title: title.trim().to_string(),
            author: author.trim().to_string(),
            quantity,
        }
    }

    /// Validate book details
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(LibraryError::validation("title", "Title cannot be empty"));
        }

        if self.author.trim().is_empty() {
            return Err(LibraryError::validation("author", "Author cannot be empty"));
        }

        if self.quantity < 0 {
            return Err(LibraryError::validation(
                "quantity",
                "Quantity must be a non-negative number",
            ));
        }

        Ok(())
    }
}

/// A registered borrower, keyed naturally by roll number
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Student {
    pub id: StudentId,
    pub name: String,
    pub roll_no: String,
}

/// Lifecycle of a loan. `Returned` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoanStatus {
    Open,
    Returned,
}

/// A single issue of a book to a student
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Loan {
    pub id: LoanId,
    pub book_id: BookId,
    pub student_id: StudentId,
    pub issue_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
}

impl Loan {
    pub fn status(&self) -> LoanStatus {
        match self.return_date {
            None => LoanStatus::Open,
            Some(_) => LoanStatus::Returned,
        }
    }

    pub fn is_open(&self) -> bool {
        self.status() == LoanStatus::Open
    }
}

// =============================================================================
// Read Models
// =============================================================================

/// Row of the "currently issued" listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct OpenLoan {
    pub loan_id: LoanId,
    pub book_title: String,
    pub student_name: String,
    pub roll_no: String,
    pub issue_date: NaiveDate,
    pub book_id: BookId,
}

/// Row of the full issue history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct LoanHistoryEntry {
    pub loan_id: LoanId,
    pub book_title: String,
    pub student_name: String,
    pub roll_no: String,
    pub issue_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
}

impl LoanHistoryEntry {
    pub fn status(&self) -> LoanStatus {
        match self.return_date {
            None => LoanStatus::Open,
            Some(_) => LoanStatus::Returned,
        }
    }

    /// ISO return date, or `not_returned` while the loan is still open
    pub fn return_date_label(&self, not_returned: &str) -> String {
        match self.return_date {
            Some(date) => date.format("%Y-%m-%d").to_string(),
            None => not_returned.to_string(),
        }
    }
}

/// Headline counts for a dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LibrarySummary {
    /// Number of catalogued titles
    pub titles: i64,
    /// Sum of available copies across all titles
    pub available_copies: i64,
    /// Registered students
    pub students: i64,
    /// Loans without a return date
    pub open_loans: i64,
}
