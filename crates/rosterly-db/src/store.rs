//! Persistence seams used by the student import engine.
//!
//! A [`RosterStore`] hands out two kinds of handles:
//!
//! - a [`RosterReader`] for non-transactional lookups (dry runs)
//! - a [`RosterTransaction`] whose reads observe its own uncommitted writes
//!
//! Row savepoints (`begin_row`, `release_row`, `rollback_row`) let a caller
//! discard the writes of a single failed row without abandoning the whole
//! transaction.

use async_trait::async_trait;
use rosterly_models::{NewStudent, Student, StudentClass, UniqueField};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A uniqueness constraint in the store rejected a write.
    #[error("unique constraint violated: {0}")]
    Conflict(String),

    /// The guarded enrollment update found no free seat.
    #[error("class {0} has no free seats")]
    CapacityExceeded(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait RosterReader: Send {
    /// Whether a live student already holds `value` in `field`.
    async fn student_exists(&mut self, field: UniqueField, value: &str)
    -> Result<bool, StoreError>;

    /// Looks up a class by name within an academic year.
    async fn find_class(
        &mut self,
        name: &str,
        academic_year: i32,
    ) -> Result<Option<StudentClass>, StoreError>;
}

#[async_trait]
pub trait RosterTransaction: RosterReader {
    async fn create_student(&mut self, student: NewStudent) -> Result<Student, StoreError>;

    /// Takes one seat in `class` for `student`.
    async fn enroll_student(
        &mut self,
        class: &StudentClass,
        student: &Student,
    ) -> Result<(), StoreError>;

    async fn begin_row(&mut self) -> Result<(), StoreError>;

    async fn release_row(&mut self) -> Result<(), StoreError>;

    async fn rollback_row(&mut self) -> Result<(), StoreError>;

    async fn commit(self) -> Result<(), StoreError>;

    async fn rollback(self) -> Result<(), StoreError>;
}

#[async_trait]
pub trait RosterStore: Send + Sync {
    type Reader: RosterReader;
    type Transaction: RosterTransaction;

    fn reader(&self) -> Self::Reader;

    async fn begin(&self) -> Result<Self::Transaction, StoreError>;
}
