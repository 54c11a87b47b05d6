use thiserror::Error;

#[derive(Error, Debug)]
pub enum LibraryError {
    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),

    #[error("Schema setup failed: {0}")]
    Schema(String),

    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: String, id: String },

    #[error("Invalid input: {field} - {message}")]
    Validation { field: String, message: String },

    #[error("Conflict: {0}")]
    Conflict(ConflictReason),
}

/// Business rule an operation would have broken.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictReason {
    #[error("no copies available")]
    NoCopiesAvailable,

    #[error("already issued to this student")]
    AlreadyIssued,

    #[error("book is currently issued")]
    BookOnLoan,

    #[error("already returned")]
    AlreadyReturned,
}

/// Coarse classification for callers that only need to pick a message style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Conflict,
    Storage,
}

impl LibraryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LibraryError::Validation { .. } => ErrorKind::Validation,
            LibraryError::NotFound { .. } => ErrorKind::NotFound,
            LibraryError::Conflict(_) => ErrorKind::Conflict,
            LibraryError::Storage(_) | LibraryError::Schema(_) => ErrorKind::Storage,
        }
    }

    pub(crate) fn not_found(entity_type: &str, id: impl ToString) -> Self {
        LibraryError::NotFound {
            entity_type: entity_type.to_string(),
            id: id.to_string(),
        }
    }

    pub(crate) fn validation(field: &str, message: impl Into<String>) -> Self {
        LibraryError::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, LibraryError>;
