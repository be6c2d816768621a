//! A concrete store type for application state.
//!
//! HTTP handlers hold a [`RosterBackend`] so the same router can run against
//! PostgreSQL in production and against the in-memory store in tests.

use async_trait::async_trait;
use rosterly_models::{NewStudent, Student, StudentClass, UniqueField};

#[cfg(any(test, feature = "test-utils"))]
use crate::memory::{MemoryRosterReader, MemoryRosterStore, MemoryRosterTransaction};
use crate::postgres::{PgRosterReader, PgRosterStore, PgRosterTransaction};
use crate::store::{RosterReader, RosterStore, RosterTransaction, StoreError};

#[derive(Clone, Debug)]
pub enum RosterBackend {
    Postgres(PgRosterStore),
    #[cfg(any(test, feature = "test-utils"))]
    Memory(MemoryRosterStore),
}

impl From<PgRosterStore> for RosterBackend {
    fn from(store: PgRosterStore) -> Self {
        Self::Postgres(store)
    }
}

#[cfg(any(test, feature = "test-utils"))]
impl From<MemoryRosterStore> for RosterBackend {
    fn from(store: MemoryRosterStore) -> Self {
        Self::Memory(store)
    }
}

pub enum BackendReader {
    Postgres(PgRosterReader),
    #[cfg(any(test, feature = "test-utils"))]
    Memory(MemoryRosterReader),
}

pub enum BackendTransaction {
    Postgres(PgRosterTransaction),
    #[cfg(any(test, feature = "test-utils"))]
    Memory(MemoryRosterTransaction),
}

macro_rules! dispatch {
    ($value:expr, $enum:ident, $inner:ident => $body:expr) => {
        match $value {
            $enum::Postgres($inner) => $body,
            #[cfg(any(test, feature = "test-utils"))]
            $enum::Memory($inner) => $body,
        }
    };
}

#[async_trait]
impl RosterStore for RosterBackend {
    type Reader = BackendReader;
    type Transaction = BackendTransaction;

    fn reader(&self) -> Self::Reader {
        match self {
            Self::Postgres(store) => BackendReader::Postgres(store.reader()),
            #[cfg(any(test, feature = "test-utils"))]
            Self::Memory(store) => BackendReader::Memory(store.reader()),
        }
    }

    async fn begin(&self) -> Result<Self::Transaction, StoreError> {
        Ok(match self {
            Self::Postgres(store) => BackendTransaction::Postgres(store.begin().await?),
            #[cfg(any(test, feature = "test-utils"))]
            Self::Memory(store) => BackendTransaction::Memory(store.begin().await?),
        })
    }
}

#[async_trait]
impl RosterReader for BackendReader {
    async fn student_exists(
        &mut self,
        field: UniqueField,
        value: &str,
    ) -> Result<bool, StoreError> {
        dispatch!(self, BackendReader, r => r.student_exists(field, value).await)
    }

    async fn find_class(
        &mut self,
        name: &str,
        academic_year: i32,
    ) -> Result<Option<StudentClass>, StoreError> {
        dispatch!(self, BackendReader, r => r.find_class(name, academic_year).await)
    }
}

#[async_trait]
impl RosterReader for BackendTransaction {
    async fn student_exists(
        &mut self,
        field: UniqueField,
        value: &str,
    ) -> Result<bool, StoreError> {
        dispatch!(self, BackendTransaction, tx => tx.student_exists(field, value).await)
    }

    async fn find_class(
        &mut self,
        name: &str,
        academic_year: i32,
    ) -> Result<Option<StudentClass>, StoreError> {
        dispatch!(self, BackendTransaction, tx => tx.find_class(name, academic_year).await)
    }
}

#[async_trait]
impl RosterTransaction for BackendTransaction {
    async fn create_student(&mut self, student: NewStudent) -> Result<Student, StoreError> {
        dispatch!(self, BackendTransaction, tx => tx.create_student(student).await)
    }

    async fn enroll_student(
        &mut self,
        class: &StudentClass,
        student: &Student,
    ) -> Result<(), StoreError> {
        dispatch!(self, BackendTransaction, tx => tx.enroll_student(class, student).await)
    }

    async fn begin_row(&mut self) -> Result<(), StoreError> {
        dispatch!(self, BackendTransaction, tx => tx.begin_row().await)
    }

    async fn release_row(&mut self) -> Result<(), StoreError> {
        dispatch!(self, BackendTransaction, tx => tx.release_row().await)
    }

    async fn rollback_row(&mut self) -> Result<(), StoreError> {
        dispatch!(self, BackendTransaction, tx => tx.rollback_row().await)
    }

    async fn commit(self) -> Result<(), StoreError> {
        dispatch!(self, BackendTransaction, tx => tx.commit().await)
    }

    async fn rollback(self) -> Result<(), StoreError> {
        dispatch!(self, BackendTransaction, tx => tx.rollback().await)
    }
}
