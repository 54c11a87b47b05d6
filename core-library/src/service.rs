//! # Lending Service
//!
//! Business rules for the catalogue and the issue/return ledger.
//!
//! ## Overview
//!
//! `LibraryService` is the single entry point presentation layers call. It
//! validates input, enforces lending rules and delegates persistence to the
//! repository traits it was built with. It never sees SQL or UI types.
//!
//! ## Rules
//!
//! - A book's `quantity` counts copies on the shelf. Issuing takes one off and
//!   returning puts one back, in the same transaction as the loan change.
//! - A student may hold at most one open loan per book.
//! - Books with open loans cannot be deleted.
//! - A loan is returned at most once.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use core_library::service::LibraryService;
//! use core_library::input::IssueRequest;
//!
//! let service = LibraryService::new(books, students, loans, clock);
//! let book_id = service.add_book("Dune", "Herbert", 2).await?;
//! let loan_id = service
//!     .issue_book(&IssueRequest::new(book_id, "R100").with_student_name("Alice"))
//!     .await?;
//! service.return_book(loan_id).await?;
//! ```

use crate::error::{ConflictReason, LibraryError, Result};
use crate::input::IssueRequest;
use crate::models::{
    Book, BookDetails, BookId, LibrarySummary, Loan, LoanHistoryEntry, LoanId, OpenLoan, Student,
};
use crate::repositories::{BookRepository, LoanRepository, StudentRepository};
use bridge_traits::Clock;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Catalogue and lending operations over injected storage
pub struct LibraryService {
    books: Arc<dyn BookRepository>,
    students: Arc<dyn StudentRepository>,
    loans: Arc<dyn LoanRepository>,
    clock: Arc<dyn Clock>,
}

impl LibraryService {
    pub fn new(
        books: Arc<dyn BookRepository>,
        students: Arc<dyn StudentRepository>,
        loans: Arc<dyn LoanRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            books,
            students,
            loans,
            clock,
        }
    }

    // =========================================================================
    // Catalogue
    // =========================================================================

    /// Add a title to the catalogue.
    ///
    /// # Errors
    ///
    /// - `Validation` if title or author is blank, or quantity is negative
    #[instrument(skip(self))]
    pub async fn add_book(&self, title: &str, author: &str, quantity: i64) -> Result<BookId> {
        let details = BookDetails::new(title, author, quantity);
        if let Err(e) = details.validate() {
            warn!(error = %e, "Rejected new book");
            return Err(e);
        }

        let id = self.books.insert(&details).await?;

        info!(book_id = %id, quantity, "Book added");
        Ok(id)
    }

    /// Overwrite a book's title, author and quantity.
    ///
    /// The quantity is taken as given; copies currently on loan are not
    /// accounted for.
    ///
    /// # Errors
    ///
    /// - `Validation` on the same rules as [`add_book`](Self::add_book)
    /// - `NotFound` if the book does not exist
    #[instrument(skip(self), fields(book_id = %id))]
    pub async fn update_book(
        &self,
        id: BookId,
        title: &str,
        author: &str,
        quantity: i64,
    ) -> Result<()> {
        let details = BookDetails::new(title, author, quantity);
        if let Err(e) = details.validate() {
            warn!(error = %e, "Rejected book update");
            return Err(e);
        }

        self.books.update(id, &details).await?;

        info!(quantity, "Book updated");
        Ok(())
    }

    /// Remove a book from the catalogue.
    ///
    /// Closed loans of the book stay in the ledger but drop out of the
    /// listings, which join on the book.
    ///
    /// # Errors
    ///
    /// - `Conflict(BookOnLoan)` if any copy is still out
    /// - `NotFound` if the book does not exist
    #[instrument(skip(self), fields(book_id = %id))]
    pub async fn delete_book(&self, id: BookId) -> Result<()> {
        if self.loans.has_open_loans_for_book(id).await? {
            warn!("Refusing to delete a book that is on loan");
            return Err(LibraryError::Conflict(ConflictReason::BookOnLoan));
        }

        if !self.books.delete(id).await? {
            return Err(LibraryError::not_found("Book", id));
        }

        info!("Book deleted");
        Ok(())
    }

    /// Books sorted by title. `None` or a blank filter lists everything,
    /// otherwise titles containing the filter (ignoring case) are returned.
    #[instrument(skip(self))]
    pub async fn search_books(&self, title_filter: Option<&str>) -> Result<Vec<Book>> {
        let books = self.books.search(title_filter.unwrap_or_default()).await?;
        debug!(count = books.len(), "Book search complete");
        Ok(books)
    }

    /// Look up one book.
    pub async fn get_book(&self, id: BookId) -> Result<Book> {
        self.books
            .find_by_id(id)
            .await?
            .ok_or_else(|| LibraryError::not_found("Book", id))
    }

    /// Look up a student by roll number, so a form can decide whether to ask
    /// for a name before issuing.
    pub async fn find_student(&self, roll_number: &str) -> Result<Option<Student>> {
        self.students.find_by_roll_no(roll_number.trim()).await
    }

    // =========================================================================
    // Lending
    // =========================================================================

    /// Lend a copy of a book to a student, registering the student first if
    /// the roll number is new.
    ///
    /// Checks run in this order and the first failure wins:
    /// 1. roll number present
    /// 2. book exists
    /// 3. a copy is on the shelf
    /// 4. student exists, or a name was given to register one
    /// 5. the student does not already hold this book
    ///
    /// The loan row and the quantity decrement commit together. An existing
    /// student keeps their stored name even if a different one is supplied.
    ///
    /// # Errors
    ///
    /// - `Validation` for a blank roll number, or a new student without a name
    /// - `NotFound` if the book does not exist
    /// - `Conflict(NoCopiesAvailable)` or `Conflict(AlreadyIssued)`
    #[instrument(
        skip(self, request),
        fields(book_id = %request.book_id, roll_no = %request.roll_number)
    )]
    pub async fn issue_book(&self, request: &IssueRequest) -> Result<LoanId> {
        let roll_number = request.roll_number.trim();
        if roll_number.is_empty() {
            warn!("Issue rejected: roll number missing");
            return Err(LibraryError::validation(
                "roll_number",
                "Roll number is required",
            ));
        }

        let book = self
            .books
            .find_by_id(request.book_id)
            .await?
            .ok_or_else(|| LibraryError::not_found("Book", request.book_id))?;

        if !book.is_available() {
            warn!("Issue rejected: no copies available");
            return Err(LibraryError::Conflict(ConflictReason::NoCopiesAvailable));
        }

        let student_id = match self.students.find_by_roll_no(roll_number).await? {
            Some(student) => {
                if let Some(loan) = self.loans.find_open(book.id, student.id).await? {
                    warn!(loan_id = %loan.id, "Issue rejected: already issued to student");
                    return Err(LibraryError::Conflict(ConflictReason::AlreadyIssued));
                }
                student.id
            }
            None => {
                let name = request
                    .student_name
                    .as_deref()
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .ok_or_else(|| {
                        warn!("Issue rejected: unknown roll number and no name");
                        LibraryError::validation("student_name", "name required for new student")
                    })?;

                let id = self.students.insert(name, roll_number).await?;
                info!(student_id = %id, "Registered new student");
                id
            }
        };

        let today = self.clock.today();
        let loan_id = self.loans.open_loan(book.id, student_id, today).await?;

        info!(loan_id = %loan_id, issue_date = %today, "Book issued");
        Ok(loan_id)
    }

    /// Close a loan today and put the copy back on the shelf.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the loan does not exist, or its book was deleted
    /// - `Conflict(AlreadyReturned)` if the loan is already closed
    #[instrument(skip(self), fields(loan_id = %loan_id))]
    pub async fn return_book(&self, loan_id: LoanId) -> Result<()> {
        let today = self.clock.today();

        if let Err(e) = self.loans.close_loan(loan_id, today).await {
            warn!(error = %e, "Return rejected");
            return Err(e);
        }

        info!(return_date = %today, "Book returned");
        Ok(())
    }

    /// Look up one loan.
    pub async fn get_loan(&self, loan_id: LoanId) -> Result<Loan> {
        self.loans
            .find_by_id(loan_id)
            .await?
            .ok_or_else(|| LibraryError::not_found("Loan", loan_id))
    }

    /// Loans still out, oldest first.
    pub async fn list_open_loans(&self) -> Result<Vec<OpenLoan>> {
        self.loans.list_open().await
    }

    /// Every loan, newest first. Render open loans with
    /// [`LoanHistoryEntry::return_date_label`].
    pub async fn list_loan_history(&self) -> Result<Vec<LoanHistoryEntry>> {
        self.loans.list_history().await
    }

    /// Headline counts.
    pub async fn summary(&self) -> Result<LibrarySummary> {
        Ok(LibrarySummary {
            titles: self.books.count().await?,
            available_copies: self.books.total_available().await?,
            students: self.students.count().await?,
            open_loans: self.loans.count_open().await?,
        })
    }
}
