//! Book repository trait and implementation

use crate::error::{LibraryError, Result};
use crate::models::{Book, BookDetails, BookId};
use async_trait::async_trait;
use sqlx::{query, query_as, SqlitePool};

/// Book repository interface for data access operations
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Find a book by its ID
    ///
    /// # Returns
    /// - `Ok(Some(book))` if found
    /// - `Ok(None)` if not found
    /// - `Err` if database error occurs
    async fn find_by_id(&self, id: BookId) -> Result<Option<Book>>;

    /// Insert a new book and return its assigned ID
    ///
    /// # Errors
    /// Returns error if validation fails or a database error occurs
    async fn insert(&self, details: &BookDetails) -> Result<BookId>;

    /// Overwrite title, author and quantity of an existing book
    ///
    /// # Errors
    /// Returns error if:
    /// - Book does not exist
    /// - Validation fails
    /// - Database error occurs
    async fn update(&self, id: BookId, details: &BookDetails) -> Result<()>;

    /// Delete a book by ID
    ///
    /// # Returns
    /// - `Ok(true)` if book was deleted
    /// - `Ok(false)` if book was not found
    async fn delete(&self, id: BookId) -> Result<bool>;

    /// List books ordered by title whose title contains `title_filter`,
    /// ignoring case. A blank filter lists every book.
    async fn search(&self, title_filter: &str) -> Result<Vec<Book>>;

    async fn count(&self) -> Result<i64>;

    /// Sum of available copies across all titles
    async fn total_available(&self) -> Result<i64>;
}

/// SQLite implementation of BookRepository
pub struct SqliteBookRepository {
    pool: SqlitePool,
}

impl SqliteBookRepository {
    /// Create a new SqliteBookRepository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// Case-insensitive substring test. SQLite's `LIKE` only folds ASCII, so
/// matching happens here with full Unicode lowercasing.
fn title_matches(title: &str, needle: &str) -> bool {
    title.to_lowercase().contains(needle)
}

#[async_trait]
impl BookRepository for SqliteBookRepository {
    async fn find_by_id(&self, id: BookId) -> Result<Option<Book>> {
        let book = query_as::<_, Book>(
            "SELECT id, title, author, quantity FROM books WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(book)
    }

    async fn insert(&self, details: &BookDetails) -> Result<BookId> {
        details.validate()?;

        let result = query("INSERT INTO books (title, author, quantity) VALUES (?, ?, ?)")
            .bind(&details.title)
            .bind(&details.author)
            .bind(details.quantity)
            .execute(&self.pool)
            .await?;

        Ok(BookId(result.last_insert_rowid()))
    }

    async fn update(&self, id: BookId, details: &BookDetails) -> Result<()> {
        details.validate()?;

        let result = query("UPDATE books SET title = ?, author = ?, quantity = ? WHERE id = ?")
            .bind(&details.title)
            .bind(&details.author)
            .bind(details.quantity)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(LibraryError::not_found("Book", id));
        }

        Ok(())
    }

    async fn delete(&self, id: BookId) -> Result<bool> {
        let result = query("DELETE FROM books WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn search(&self, title_filter: &str) -> Result<Vec<Book>> {
        let books = query_as::<_, Book>(
            "SELECT id, title, author, quantity FROM books ORDER BY title ASC, id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        let needle = title_filter.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(books);
        }

        Ok(books
            .into_iter()
            .filter(|book| title_matches(&book.title, &needle))
            .collect())
    }

    async fn count(&self) -> Result<i64> {
        let count: i64 = query_as("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await
            .map(|row: (i64,)| row.0)?;

        Ok(count)
    }

    async fn total_available(&self) -> Result<i64> {
        let total: i64 = query_as("SELECT COALESCE(SUM(quantity), 0) FROM books")
            .fetch_one(&self.pool)
            .await
            .map(|row: (i64,)| row.0)?;

        Ok(total)
    }
}
