//! Form input conversion
//!
//! Presentation layers collect free text. These helpers turn it into the typed
//! arguments the service takes, reporting problems as validation errors.

use crate::error::{LibraryError, Result};
use crate::models::BookId;
use serde::{Deserialize, Serialize};

/// Parse a quantity typed into a form. Must be a non-negative integer.
pub fn parse_quantity(text: &str) -> Result<i64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(LibraryError::validation("quantity", "Quantity is required"));
    }

    match trimmed.parse::<i64>() {
        Ok(quantity) if quantity >= 0 => Ok(quantity),
        _ => Err(LibraryError::validation(
            "quantity",
            "Quantity must be a non-negative number",
        )),
    }
}

/// Arguments of an issue operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueRequest {
    pub book_id: BookId,
    pub roll_number: String,
    /// Only consulted when no student with `roll_number` exists yet
    pub student_name: Option<String>,
}

impl IssueRequest {
    pub fn new(book_id: BookId, roll_number: impl Into<String>) -> Self {
        Self {
            book_id,
            roll_number: roll_number.into(),
            student_name: None,
        }
    }

    pub fn with_student_name(mut self, name: impl Into<String>) -> Self {
        self.student_name = Some(name.into());
        self
    }

    /// Build a request from the three text fields of the issue form.
    ///
    /// An empty name is treated as absent.
    pub fn from_form(book_id: &str, roll_number: &str, student_name: &str) -> Result<Self> {
        let book_id = book_id.trim();
        let roll_number = roll_number.trim();
        let student_name = student_name.trim();

        if book_id.is_empty() {
            return Err(LibraryError::validation("book_id", "Book ID is required"));
        }
        if roll_number.is_empty() {
            return Err(LibraryError::validation(
                "roll_number",
                "Roll number is required",
            ));
        }

        let book_id = book_id
            .parse::<i64>()
            .map(BookId)
            .map_err(|_| LibraryError::validation("book_id", "Book ID must be a number"))?;

        Ok(Self {
            book_id,
            roll_number: roll_number.to_string(),
            student_name: (!student_name.is_empty()).then(|| student_name.to_string()),
        })
    }
}
