//! Student repository trait and implementation

use crate::error::{LibraryError, Result};
use crate::models::{Student, StudentId};
use async_trait::async_trait;
use sqlx::{query, query_as, SqlitePool};

/// Student repository interface
#[async_trait]
pub trait StudentRepository: Send + Sync {
    /// Find a student by roll number (exact, case-sensitive match)
    async fn find_by_roll_no(&self, roll_no: &str) -> Result<Option<Student>>;

    /// Register a new student
    ///
    /// # Errors
    /// Returns error if name or roll number is empty, or if the roll number
    /// is already taken
    async fn insert(&self, name: &str, roll_no: &str) -> Result<StudentId>;

    /// Count registered students
    async fn count(&self) -> Result<i64>;
}

/// SQLite implementation of StudentRepository
pub struct SqliteStudentRepository {
    pool: SqlitePool,
}

impl SqliteStudentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StudentRepository for SqliteStudentRepository {
    async fn find_by_roll_no(&self, roll_no: &str) -> Result<Option<Student>> {
        let student = query_as::<_, Student>(
            "SELECT id, name, roll_no FROM students WHERE roll_no = ?",
        )
        .bind(roll_no)
        .fetch_optional(&self.pool)
        .await?;

        Ok(student)
    }

    async fn insert(&self, name: &str, roll_no: &str) -> Result<StudentId> {
        if name.trim().is_empty() {
            return Err(LibraryError::validation(
                "student_name",
                "Student name cannot be empty",
            ));
        }
        if roll_no.trim().is_empty() {
            return Err(LibraryError::validation(
                "roll_number",
                "Roll number cannot be empty",
            ));
        }

        let result = query("INSERT INTO students (name, roll_no) VALUES (?, ?)")
            .bind(name)
            .bind(roll_no)
            .execute(&self.pool)
            .await?;

        Ok(StudentId(result.last_insert_rowid()))
    }

    async fn count(&self) -> Result<i64> {
        let count: i64 = query_as("SELECT COUNT(*) FROM students")
            .fetch_one(&self.pool)
            .await
            .map(|row: (i64,)| row.0)?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_test_pool;

    async fn setup_repo() -> SqliteStudentRepository {
        SqliteStudentRepository::new(create_test_pool().await.unwrap())
    }

    #[tokio::test]
    async fn test_insert_and_find_student() {
        let repo = setup_repo().await;

        let id = repo.insert("Alice", "R100").await.unwrap();
        let found = repo.find_by_roll_no("R100").await.unwrap().unwrap();

        assert_eq!(found.id, id);
        assert_eq!(found.name, "Alice");
        assert_eq!(found.roll_no, "R100");
    }

    #[tokio::test]
    async fn test_roll_no_lookup_is_exact() {
        let repo = setup_repo().await;
        repo.insert("Alice", "R100").await.unwrap();

        assert!(repo.find_by_roll_no("r100").await.unwrap().is_none());
        assert!(repo.find_by_roll_no("R10").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_roll_no_is_storage_error() {
        let repo = setup_repo().await;
        repo.insert("Alice", "R100").await.unwrap();

        let result = repo.insert("Bob", "R100").await;
        assert!(matches!(result, Err(LibraryError::Storage(_))));
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_insert_requires_name_and_roll_no() {
        let repo = setup_repo().await;

        assert!(matches!(
            repo.insert("  ", "R1").await,
            Err(LibraryError::Validation { .. })
        ));
        assert!(matches!(
            repo.insert("Alice", "").await,
            Err(LibraryError::Validation { .. })
        ));
        assert_eq!(repo.count().await.unwrap(), 0);
    }
}
