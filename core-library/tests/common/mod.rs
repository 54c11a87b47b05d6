//! Shared fixtures for the lending integration tests
//!
//! `InMemoryLibrary` is a storage fake that implements all three repository
//! traits over plain collections, so the same scenarios can run against it and
//! against SQLite.

#![allow(dead_code)]

use async_trait::async_trait;
use bridge_traits::FixedClock;
use chrono::NaiveDate;
use core_library::db::create_test_pool;
use core_library::models::{
    Book, BookDetails, BookId, Loan, LoanHistoryEntry, LoanId, OpenLoan, Student, StudentId,
};
use core_library::repositories::{
    BookRepository, LoanRepository, SqliteBookRepository, SqliteLoanRepository,
    SqliteStudentRepository, StudentRepository,
};
use core_library::{ConflictReason, LibraryError, LibraryService, Result};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// A service under test plus the clock that drives its dates
pub struct Harness {
    pub name: &'static str,
    pub service: LibraryService,
    pub clock: Arc<FixedClock>,
}

impl Harness {
    pub async fn sqlite(start: NaiveDate) -> Self {
        let pool = create_test_pool().await.unwrap();
        let clock = Arc::new(FixedClock::new(start));
        let service = LibraryService::new(
            Arc::new(SqliteBookRepository::new(pool.clone())),
            Arc::new(SqliteStudentRepository::new(pool.clone())),
            Arc::new(SqliteLoanRepository::new(pool)),
            clock.clone(),
        );
        Self {
            name: "sqlite",
            service,
            clock,
        }
    }

    pub fn in_memory(start: NaiveDate) -> Self {
        let store = Arc::new(InMemoryLibrary::default());
        let clock = Arc::new(FixedClock::new(start));
        let service = LibraryService::new(store.clone(), store.clone(), store, clock.clone());
        Self {
            name: "in-memory",
            service,
            clock,
        }
    }

    /// One harness per storage backend
    pub async fn all(start: NaiveDate) -> Vec<Self> {
        vec![Self::sqlite(start).await, Self::in_memory(start)]
    }

    pub async fn quantity(&self, id: BookId) -> i64 {
        self.service.get_book(id).await.unwrap().quantity
    }
}

#[derive(Default)]
struct State {
    next_book: i64,
    next_student: i64,
    next_loan: i64,
    books: BTreeMap<BookId, Book>,
    students: BTreeMap<StudentId, Student>,
    loans: BTreeMap<LoanId, Loan>,
}

/// Storage fake with the same observable behaviour as the SQLite repositories
#[derive(Default)]
pub struct InMemoryLibrary {
    state: Mutex<State>,
}

fn not_found(entity_type: &str, id: impl ToString) -> LibraryError {
    LibraryError::NotFound {
        entity_type: entity_type.to_string(),
        id: id.to_string(),
    }
}

fn joined<'a>(
    state: &'a State,
    loan: &Loan,
) -> Option<(&'a Book, &'a Student)> {
    Some((state.books.get(&loan.book_id)?, state.students.get(&loan.student_id)?))
}

#[async_trait]
impl BookRepository for InMemoryLibrary {
    async fn find_by_id(&self, id: BookId) -> Result<Option<Book>> {
        Ok(self.state.lock().unwrap().books.get(&id).cloned())
    }

    async fn insert(&self, details: &BookDetails) -> Result<BookId> {
        details.validate()?;
        let mut state = self.state.lock().unwrap();
        state.next_book += 1;
        let id = BookId(state.next_book);
        state.books.insert(
            id,
            Book {
                id,
                title: details.title.clone(),
                author: details.author.clone(),
                quantity: details.quantity,
            },
        );
        Ok(id)
    }

    async fn update(&self, id: BookId, details: &BookDetails) -> Result<()> {
        details.validate()?;
        let mut state = self.state.lock().unwrap();
        let book = state.books.get_mut(&id).ok_or_else(|| not_found("Book", id))?;
        book.title = details.title.clone();
        book.author = details.author.clone();
        book.quantity = details.quantity;
        Ok(())
    }

    async fn delete(&self, id: BookId) -> Result<bool> {
        Ok(self.state.lock().unwrap().books.remove(&id).is_some())
    }

    async fn search(&self, title_filter: &str) -> Result<Vec<Book>> {
        let needle = title_filter.trim().to_lowercase();
        let mut books: Vec<Book> = self
            .state
            .lock()
            .unwrap()
            .books
            .values()
            .filter(|b| b.title.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        books.sort_by(|a, b| a.title.cmp(&b.title).then(a.id.cmp(&b.id)));
        Ok(books)
    }

    async fn count(&self) -> Result<i64> {
        Ok(self.state.lock().unwrap().books.len() as i64)
    }

    async fn total_available(&self) -> Result<i64> {
        Ok(self.state.lock().unwrap().books.values().map(|b| b.quantity).sum())
    }
}

#[async_trait]
impl StudentRepository for InMemoryLibrary {
    async fn find_by_roll_no(&self, roll_no: &str) -> Result<Option<Student>> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .students
            .values()
            .find(|s| s.roll_no == roll_no)
            .cloned())
    }

    async fn insert(&self, name: &str, roll_no: &str) -> Result<StudentId> {
        let mut state = self.state.lock().unwrap();
        if state.students.values().any(|s| s.roll_no == roll_no) {
            return Err(LibraryError::Storage(sqlx::Error::Protocol(
                "UNIQUE constraint failed: students.roll_no".to_string(),
            )));
        }
        state.next_student += 1;
        let id = StudentId(state.next_student);
        state.students.insert(
            id,
            Student {
                id,
                name: name.to_string(),
                roll_no: roll_no.to_string(),
            },
        );
        Ok(id)
    }

    async fn count(&self) -> Result<i64> {
        Ok(self.state.lock().unwrap().students.len() as i64)
    }
}

#[async_trait]
impl LoanRepository for InMemoryLibrary {
    async fn find_by_id(&self, id: LoanId) -> Result<Option<Loan>> {
        Ok(self.state.lock().unwrap().loans.get(&id).cloned())
    }

    async fn find_open(&self, book_id: BookId, student_id: StudentId) -> Result<Option<Loan>> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .loans
            .values()
            .find(|l| l.book_id == book_id && l.student_id == student_id && l.is_open())
            .cloned())
    }

    async fn has_open_loans_for_book(&self, book_id: BookId) -> Result<bool> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .loans
            .values()
            .any(|l| l.book_id == book_id && l.is_open()))
    }

    async fn open_loan(
        &self,
        book_id: BookId,
        student_id: StudentId,
        issue_date: NaiveDate,
    ) -> Result<LoanId> {
        let mut state = self.state.lock().unwrap();
        let book = state
            .books
            .get_mut(&book_id)
            .ok_or_else(|| not_found("Book", book_id))?;
        if book.quantity <= 0 {
            return Err(LibraryError::Conflict(ConflictReason::NoCopiesAvailable));
        }
        book.quantity -= 1;

        state.next_loan += 1;
        let id = LoanId(state.next_loan);
        state.loans.insert(
            id,
            Loan {
                id,
                book_id,
                student_id,
                issue_date,
                return_date: None,
            },
        );
        Ok(id)
    }

    async fn close_loan(&self, id: LoanId, return_date: NaiveDate) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        let loan = state.loans.get(&id).ok_or_else(|| not_found("Loan", id))?;
        if !loan.is_open() {
            return Err(LibraryError::Conflict(ConflictReason::AlreadyReturned));
        }
        let book_id = loan.book_id;

        let book = state
            .books
            .get_mut(&book_id)
            .ok_or_else(|| not_found("Book", book_id))?;
        book.quantity += 1;

        if let Some(loan) = state.loans.get_mut(&id) {
            loan.return_date = Some(return_date);
        }
        Ok(())
    }

    async fn list_open(&self) -> Result<Vec<OpenLoan>> {
        let state = self.state.lock().unwrap();
        let mut rows: Vec<OpenLoan> = state
            .loans
            .values()
            .filter(|l| l.is_open())
            .filter_map(|l| {
                let (book, student) = joined(&state, l)?;
                Some(OpenLoan {
                    loan_id: l.id,
                    book_title: book.title.clone(),
                    student_name: student.name.clone(),
                    roll_no: student.roll_no.clone(),
                    issue_date: l.issue_date,
                    book_id: l.book_id,
                })
            })
            .collect();
        rows.sort_by(|a, b| a.issue_date.cmp(&b.issue_date).then(a.loan_id.cmp(&b.loan_id)));
        Ok(rows)
    }

    async fn list_history(&self) -> Result<Vec<LoanHistoryEntry>> {
        let state = self.state.lock().unwrap();
        let mut rows: Vec<LoanHistoryEntry> = state
            .loans
            .values()
            .filter_map(|l| {
                let (book, student) = joined(&state, l)?;
                Some(LoanHistoryEntry {
                    loan_id: l.id,
                    book_title: book.title.clone(),
                    student_name: student.name.clone(),
                    roll_no: student.roll_no.clone(),
                    issue_date: l.issue_date,
                    return_date: l.return_date,
                })
            })
            .collect();
        rows.sort_by(|a, b| b.issue_date.cmp(&a.issue_date).then(b.loan_id.cmp(&a.loan_id)));
        Ok(rows)
    }

    async fn count_open(&self) -> Result<i64> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .loans
            .values()
            .filter(|l| l.is_open())
            .count() as i64)
    }
}
