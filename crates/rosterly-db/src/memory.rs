//! In-memory roster store for tests.
//!
//! A transaction works on a private copy of the roster taken at `begin`;
//! `commit` publishes the copy and `rollback` drops it. Row savepoints keep a
//! second copy to restore. Unique columns are enforced on insert the way a
//! database unique index would, so conflicting writes fail with
//! [`StoreError::Conflict`].
//!
//! Commits replace the shared roster wholesale, so the store models a single
//! writer at a time.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use rosterly_models::{NewStudent, Student, StudentClass, UniqueField};
use uuid::Uuid;

use crate::store::{RosterReader, RosterStore, RosterTransaction, StoreError};

#[derive(Clone, Debug, Default)]
struct Roster {
    students: Vec<Student>,
    classes: Vec<StudentClass>,
}

impl Roster {
    fn student_exists(&self, field: UniqueField, value: &str) -> bool {
        self.students
            .iter()
            .any(|s| field.value_of(s) == Some(value))
    }

    fn find_class(&self, name: &str, academic_year: i32) -> Option<StudentClass> {
        self.classes
            .iter()
            .find(|c| c.name == name && c.academic_year == academic_year)
            .cloned()
    }

    fn insert_student(&mut self, record: NewStudent) -> Result<Student, StoreError> {
        let student = Student::from_new(Uuid::new_v4(), record);

        for field in UniqueField::ALL {
            if let Some(value) = field.value_of(&student)
                && !value.is_empty()
                && self.student_exists(field, value)
            {
                return Err(StoreError::Conflict(format!(
                    "students_{}_key",
                    field.column()
                )));
            }
        }

        self.students.push(student.clone());
        Ok(student)
    }
}

#[derive(Debug, Default)]
struct Faults {
    failing_student_ids: HashSet<String>,
    fail_row_savepoint_at: Option<usize>,
    fail_commit: bool,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Shared in-memory roster. Clones share the same data.
#[derive(Clone, Debug, Default)]
pub struct MemoryRosterStore {
    roster: Arc<Mutex<Roster>>,
    faults: Arc<Mutex<Faults>>,
}

impl MemoryRosterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a class and returns it.
    pub fn add_class(&self, name: &str, academic_year: i32, capacity: i32) -> StudentClass {
        self.add_class_with_enrollment(name, academic_year, capacity, 0)
    }

    pub fn add_class_with_enrollment(
        &self,
        name: &str,
        academic_year: i32,
        capacity: i32,
        current_enrollment: i32,
    ) -> StudentClass {
        let class = StudentClass {
            id: Uuid::new_v4(),
            name: name.to_string(),
            academic_year,
            capacity,
            current_enrollment,
        };
        lock(&self.roster).classes.push(class.clone());
        class
    }

    /// Inserts an already-admitted student, bypassing the import engine.
    pub fn add_student(&self, record: NewStudent) -> Result<Student, StoreError> {
        lock(&self.roster).insert_student(record)
    }

    pub fn students(&self) -> Vec<Student> {
        lock(&self.roster).students.clone()
    }

    pub fn classes(&self) -> Vec<StudentClass> {
        lock(&self.roster).classes.clone()
    }

    pub fn class(&self, name: &str, academic_year: i32) -> Option<StudentClass> {
        lock(&self.roster).find_class(name, academic_year)
    }

    /// Makes every insert of `student_id` fail with [`StoreError::Unavailable`].
    pub fn fail_inserts_for(&self, student_id: &str) {
        lock(&self.faults)
            .failing_student_ids
            .insert(student_id.to_string());
    }

    /// Makes the `n`th row savepoint (1-based) of each transaction fail.
    pub fn fail_row_savepoint_at(&self, n: usize) {
        lock(&self.faults).fail_row_savepoint_at = Some(n);
    }

    pub fn fail_commit(&self) {
        lock(&self.faults).fail_commit = true;
    }
}

#[async_trait]
impl RosterStore for MemoryRosterStore {
    type Reader = MemoryRosterReader;
    type Transaction = MemoryRosterTransaction;

    fn reader(&self) -> Self::Reader {
        MemoryRosterReader {
            roster: Arc::clone(&self.roster),
        }
    }

    async fn begin(&self) -> Result<Self::Transaction, StoreError> {
        let working = lock(&self.roster).clone();
        Ok(MemoryRosterTransaction {
            store: self.clone(),
            working,
            savepoint: None,
            rows_started: 0,
        })
    }
}

/// Reads the committed roster.
#[derive(Clone, Debug)]
pub struct MemoryRosterReader {
    roster: Arc<Mutex<Roster>>,
}

#[async_trait]
impl RosterReader for MemoryRosterReader {
    async fn student_exists(
        &mut self,
        field: UniqueField,
        value: &str,
    ) -> Result<bool, StoreError> {
        Ok(lock(&self.roster).student_exists(field, value))
    }

    async fn find_class(
        &mut self,
        name: &str,
        academic_year: i32,
    ) -> Result<Option<StudentClass>, StoreError> {
        Ok(lock(&self.roster).find_class(name, academic_year))
    }
}

#[derive(Debug)]
pub struct MemoryRosterTransaction {
    store: MemoryRosterStore,
    working: Roster,
    savepoint: Option<Roster>,
    rows_started: usize,
}

#[async_trait]
impl RosterReader for MemoryRosterTransaction {
    async fn student_exists(
        &mut self,
        field: UniqueField,
        value: &str,
    ) -> Result<bool, StoreError> {
        Ok(self.working.student_exists(field, value))
    }

    async fn find_class(
        &mut self,
        name: &str,
        academic_year: i32,
    ) -> Result<Option<StudentClass>, StoreError> {
        Ok(self.working.find_class(name, academic_year))
    }
}

#[async_trait]
impl RosterTransaction for MemoryRosterTransaction {
    async fn create_student(&mut self, student: NewStudent) -> Result<Student, StoreError> {
        if lock(&self.store.faults)
            .failing_student_ids
            .contains(&student.student_id)
        {
            return Err(StoreError::Unavailable(format!(
                "insert of {} rejected",
                student.student_id
            )));
        }

        self.working.insert_student(student)
    }

    async fn enroll_student(
        &mut self,
        class: &StudentClass,
        _student: &Student,
    ) -> Result<(), StoreError> {
        let stored = self
            .working
            .classes
            .iter_mut()
            .find(|c| c.id == class.id)
            .ok_or_else(|| StoreError::Unavailable(format!("class {} vanished", class.name)))?;

        if stored.current_enrollment >= stored.capacity {
            return Err(StoreError::CapacityExceeded(stored.name.clone()));
        }

        stored.current_enrollment += 1;
        Ok(())
    }

    async fn begin_row(&mut self) -> Result<(), StoreError> {
        self.rows_started += 1;
        if lock(&self.store.faults).fail_row_savepoint_at == Some(self.rows_started) {
            return Err(StoreError::Unavailable("connection lost".to_string()));
        }

        self.savepoint = Some(self.working.clone());
        Ok(())
    }

    async fn release_row(&mut self) -> Result<(), StoreError> {
        self.savepoint = None;
        Ok(())
    }

    async fn rollback_row(&mut self) -> Result<(), StoreError> {
        if let Some(snapshot) = self.savepoint.take() {
            self.working = snapshot;
        }
        Ok(())
    }

    async fn commit(self) -> Result<(), StoreError> {
        if lock(&self.store.faults).fail_commit {
            return Err(StoreError::Unavailable("commit failed".to_string()));
        }

        *lock(&self.store.roster) = self.working;
        Ok(())
    }

    async fn rollback(self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rosterly_models::{Gender, STATUS_ACTIVE};

    fn record(student_id: &str, email: Option<&str>) -> NewStudent {
        NewStudent {
            student_id: student_id.to_string(),
            name: "Test Student".to_string(),
            gender: Gender::Female,
            academic_year: 2025,
            email: email.map(str::to_string),
            phone: None,
            nis: None,
            nisn: None,
            birth_date: None,
            birth_place: None,
            address: None,
            parent_name: None,
            parent_phone: None,
            parent_email: None,
            class_id: None,
            status: STATUS_ACTIVE.to_string(),
            enrollment_date: NaiveDate::from_ymd_opt(2025, 7, 14).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_transaction_sees_own_writes_but_reader_does_not() {
        let store = MemoryRosterStore::new();
        let mut tx = store.begin().await.unwrap();
        tx.create_student(record("S001", None)).await.unwrap();

        assert!(
            tx.student_exists(UniqueField::StudentId, "S001")
                .await
                .unwrap()
        );
        assert!(
            !store
                .reader()
                .student_exists(UniqueField::StudentId, "S001")
                .await
                .unwrap()
        );

        tx.commit().await.unwrap();
        assert_eq!(store.students().len(), 1);
    }

    #[tokio::test]
    async fn test_rollback_discards_writes() {
        let store = MemoryRosterStore::new();
        let mut tx = store.begin().await.unwrap();
        tx.create_student(record("S001", None)).await.unwrap();
        tx.rollback().await.unwrap();

        assert!(store.students().is_empty());
    }

    #[tokio::test]
    async fn test_row_savepoint_restores_state() {
        let store = MemoryRosterStore::new();
        let class = store.add_class("VIII-A", 2025, 1);
        let mut tx = store.begin().await.unwrap();

        tx.begin_row().await.unwrap();
        let student = tx.create_student(record("S001", None)).await.unwrap();
        tx.enroll_student(&class, &student).await.unwrap();
        tx.rollback_row().await.unwrap();

        assert!(
            !tx.student_exists(UniqueField::StudentId, "S001")
                .await
                .unwrap()
        );
        let class = tx.find_class("VIII-A", 2025).await.unwrap().unwrap();
        assert_eq!(class.current_enrollment, 0);
    }

    #[tokio::test]
    async fn test_unique_columns_enforced_on_insert() {
        let store = MemoryRosterStore::new();
        store.add_student(record("S001", Some("a@school.id"))).unwrap();

        let err = store
            .add_student(record("S002", Some("a@school.id")))
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(ref c) if c == "students_email_key"));
    }

    #[tokio::test]
    async fn test_enroll_refuses_full_class() {
        let store = MemoryRosterStore::new();
        let class = store.add_class_with_enrollment("IX-B", 2025, 2, 2);
        let mut tx = store.begin().await.unwrap();
        let student = tx.create_student(record("S001", None)).await.unwrap();

        let err = tx.enroll_student(&class, &student).await.unwrap_err();
        assert!(matches!(err, StoreError::CapacityExceeded(_)));
    }

    #[tokio::test]
    async fn test_injected_faults() {
        let store = MemoryRosterStore::new();
        store.fail_inserts_for("S009");
        store.fail_row_savepoint_at(2);

        let mut tx = store.begin().await.unwrap();
        assert!(tx.create_student(record("S009", None)).await.is_err());
        assert!(tx.begin_row().await.is_ok());
        assert!(tx.begin_row().await.is_err());

        store.fail_commit();
        assert!(tx.commit().await.is_err());
    }
}
