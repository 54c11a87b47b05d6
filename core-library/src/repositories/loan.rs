//! Loan repository trait and implementation
//!
//! Loans live in the `issued_books` table. Opening and closing a loan each
//! touch two tables, so both run inside a single transaction: the loan row and
//! the book's available-copy counter change together or not at all.

use crate::error::{ConflictReason, LibraryError, Result};
use crate::models::{BookId, Loan, LoanHistoryEntry, LoanId, OpenLoan, StudentId};
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{query, query_as, SqlitePool};
use tracing::debug;

/// Loan repository interface
#[async_trait]
pub trait LoanRepository: Send + Sync {
    /// Find a loan by its ID
    async fn find_by_id(&self, id: LoanId) -> Result<Option<Loan>>;

    /// Find the open loan of `book_id` held by `student_id`, if any
    async fn find_open(&self, book_id: BookId, student_id: StudentId) -> Result<Option<Loan>>;

    /// Whether any open loan references the book
    async fn has_open_loans_for_book(&self, book_id: BookId) -> Result<bool>;

    /// Record a new loan and take one copy off the shelf, atomically
    ///
    /// # Errors
    /// - `NotFound` if the book does not exist
    /// - `Conflict(NoCopiesAvailable)` if the book has no copies left
    ///
    /// Nothing is written in either case.
    async fn open_loan(
        &self,
        book_id: BookId,
        student_id: StudentId,
        issue_date: NaiveDate,
    ) -> Result<LoanId>;

    /// Stamp the return date and put the copy back on the shelf, atomically
    ///
    /// # Errors
    /// - `NotFound` if the loan does not exist, or its book has been deleted
    /// - `Conflict(AlreadyReturned)` if the loan is already closed
    ///
    /// Nothing is written in any of these cases.
    async fn close_loan(&self, id: LoanId, return_date: NaiveDate) -> Result<()>;

    /// Open loans joined with book and student, oldest issue first
    async fn list_open(&self) -> Result<Vec<OpenLoan>>;

    /// Every loan joined with book and student, newest issue first
    async fn list_history(&self) -> Result<Vec<LoanHistoryEntry>>;

    /// Count loans without a return date
    async fn count_open(&self) -> Result<i64>;
}

/// SQLite implementation of LoanRepository
pub struct SqliteLoanRepository {
    pool: SqlitePool,
}

impl SqliteLoanRepository {
    /// Create a new SqliteLoanRepository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LoanRepository for SqliteLoanRepository {
    async fn find_by_id(&self, id: LoanId) -> Result<Option<Loan>> {
        let loan = query_as::<_, Loan>(
            r#"
            SELECT id, book_id, student_id, issue_date, return_date
            FROM issued_books
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(loan)
    }

    async fn find_open(&self, book_id: BookId, student_id: StudentId) -> Result<Option<Loan>> {
        let loan = query_as::<_, Loan>(
            r#"
            SELECT id, book_id, student_id, issue_date, return_date
            FROM issued_books
            WHERE book_id = ? AND student_id = ? AND return_date IS NULL
            LIMIT 1
            "#,
        )
        .bind(book_id)
        .bind(student_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(loan)
    }

    async fn has_open_loans_for_book(&self, book_id: BookId) -> Result<bool> {
        let open: i64 = query_as(
            "SELECT COUNT(*) FROM issued_books WHERE book_id = ? AND return_date IS NULL",
        )
        .bind(book_id)
        .fetch_one(&self.pool)
        .await
        .map(|row: (i64,)| row.0)?;

        Ok(open > 0)
    }

    async fn open_loan(
        &self,
        book_id: BookId,
        student_id: StudentId,
        issue_date: NaiveDate,
    ) -> Result<LoanId> {
        let mut tx = self.pool.begin().await?;

        let decremented = query("UPDATE books SET quantity = quantity - 1 WHERE id = ? AND quantity > 0")
            .bind(book_id)
            .execute(&mut *tx)
            .await?;

        if decremented.rows_affected() == 0 {
            let exists: Option<(i64,)> = query_as("SELECT id FROM books WHERE id = ?")
                .bind(book_id)
                .fetch_optional(&mut *tx)
                .await?;

            debug!(book_id = %book_id, "Rolling back loan: no copy to take");
            return Err(match exists {
                Some(_) => LibraryError::Conflict(ConflictReason::NoCopiesAvailable),
                None => LibraryError::not_found("Book", book_id),
            });
        }

        let inserted = query(
            "INSERT INTO issued_books (book_id, student_id, issue_date, return_date) VALUES (?, ?, ?, NULL)",
        )
        .bind(book_id)
        .bind(student_id)
        .bind(issue_date)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(LoanId(inserted.last_insert_rowid()))
    }

    async fn close_loan(&self, id: LoanId, return_date: NaiveDate) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let loan = query_as::<_, Loan>(
            "SELECT id, book_id, student_id, issue_date, return_date FROM issued_books WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| LibraryError::not_found("Loan", id))?;

        if !loan.is_open() {
            return Err(LibraryError::Conflict(ConflictReason::AlreadyReturned));
        }

        let closed = query("UPDATE issued_books SET return_date = ? WHERE id = ? AND return_date IS NULL")
            .bind(return_date)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if closed.rows_affected() == 0 {
            return Err(LibraryError::Conflict(ConflictReason::AlreadyReturned));
        }

        let restocked = query("UPDATE books SET quantity = quantity + 1 WHERE id = ?")
            .bind(loan.book_id)
            .execute(&mut *tx)
            .await?;

        if restocked.rows_affected() == 0 {
            debug!(loan_id = %id, book_id = %loan.book_id, "Rolling back return: book is gone");
            return Err(LibraryError::not_found("Book", loan.book_id));
        }

        tx.commit().await?;

        Ok(())
    }

    async fn list_open(&self) -> Result<Vec<OpenLoan>> {
        let loans = query_as::<_, OpenLoan>(
            r#"
            SELECT
                ib.id AS loan_id,
                b.title AS book_title,
                s.name AS student_name,
                s.roll_no AS roll_no,
                ib.issue_date AS issue_date,
                ib.book_id AS book_id
            FROM issued_books ib
            JOIN books b ON b.id = ib.book_id
            JOIN students s ON s.id = ib.student_id
            WHERE ib.return_date IS NULL
            ORDER BY ib.issue_date ASC, ib.id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(loans)
    }

    async fn list_history(&self) -> Result<Vec<LoanHistoryEntry>> {
        let entries = query_as::<_, LoanHistoryEntry>(
            r#"
            SELECT
                ib.id AS loan_id,
                b.title AS book_title,
                s.name AS student_name,
                s.roll_no AS roll_no,
                ib.issue_date AS issue_date,
                ib.return_date AS return_date
            FROM issued_books ib
            JOIN books b ON b.id = ib.book_id
            JOIN students s ON s.id = ib.student_id
            ORDER BY ib.issue_date DESC, ib.id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    async fn count_open(&self) -> Result<i64> {
        let count: i64 = query_as("SELECT COUNT(*) FROM issued_books WHERE return_date IS NULL")
            .fetch_one(&self.pool)
            .await
            .map(|row: (i64,)| row.0)?;

        Ok(count)
    }
}
