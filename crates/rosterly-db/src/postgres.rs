//! PostgreSQL implementation of the roster store.

use async_trait::async_trait;
use rosterly_models::{NewStudent, Student, StudentClass, UniqueField};
use sqlx::{PgExecutor, PgPool, Postgres, Transaction};
use tracing::debug;

use crate::store::{RosterReader, RosterStore, RosterTransaction, StoreError};

const ROW_SAVEPOINT: &str = "student_import_row";

const STUDENT_COLUMNS: &str = "id, student_id, name, gender, academic_year, email, phone, nis, nisn, \
     birth_date, birth_place, address, parent_name, parent_phone, parent_email, class_id, status, \
     enrollment_date, created_at, updated_at";

async fn student_exists<'e, E>(
    executor: E,
    field: UniqueField,
    value: &str,
) -> Result<bool, StoreError>
where
    E: PgExecutor<'e>,
{
    // column names come from a closed enum, never from input
    let sql = format!(
        "SELECT EXISTS(SELECT 1 FROM students WHERE {} = $1 AND deleted_at IS NULL)",
        field.column()
    );

    let exists = sqlx::query_scalar::<_, bool>(&sql)
        .bind(value)
        .fetch_one(executor)
        .await?;

    Ok(exists)
}

async fn find_class<'e, E>(
    executor: E,
    name: &str,
    academic_year: i32,
) -> Result<Option<StudentClass>, StoreError>
where
    E: PgExecutor<'e>,
{
    let class = sqlx::query_as::<_, StudentClass>(
        r#"SELECT id, name, academic_year, capacity, current_enrollment
           FROM student_classes
           WHERE name = $1 AND academic_year = $2 AND deleted_at IS NULL
           LIMIT 1"#,
    )
    .bind(name)
    .bind(academic_year)
    .fetch_optional(executor)
    .await?;

    Ok(class)
}

fn map_write_error(e: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &e
        && db_err.is_unique_violation()
    {
        return StoreError::Conflict(
            db_err
                .constraint()
                .map(str::to_string)
                .unwrap_or_else(|| db_err.message().to_string()),
        );
    }
    StoreError::Database(e)
}

/// Roster store backed by a PostgreSQL pool.
#[derive(Clone, Debug)]
pub struct PgRosterStore {
    pool: PgPool,
}

impl PgRosterStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl RosterStore for PgRosterStore {
    type Reader = PgRosterReader;
    type Transaction = PgRosterTransaction;

    fn reader(&self) -> Self::Reader {
        PgRosterReader {
            pool: self.pool.clone(),
        }
    }

    async fn begin(&self) -> Result<Self::Transaction, StoreError> {
        let tx = self.pool.begin().await?;
        Ok(PgRosterTransaction { tx })
    }
}

/// Reads committed roster data straight from the pool.
#[derive(Clone, Debug)]
pub struct PgRosterReader {
    pool: PgPool,
}

#[async_trait]
impl RosterReader for PgRosterReader {
    async fn student_exists(
        &mut self,
        field: UniqueField,
        value: &str,
    ) -> Result<bool, StoreError> {
        student_exists(&self.pool, field, value).await
    }

    async fn find_class(
        &mut self,
        name: &str,
        academic_year: i32,
    ) -> Result<Option<StudentClass>, StoreError> {
        find_class(&self.pool, name, academic_year).await
    }
}

/// A roster transaction on a single pooled connection.
pub struct PgRosterTransaction {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl RosterReader for PgRosterTransaction {
    async fn student_exists(
        &mut self,
        field: UniqueField,
        value: &str,
    ) -> Result<bool, StoreError> {
        student_exists(&mut *self.tx, field, value).await
    }

    async fn find_class(
        &mut self,
        name: &str,
        academic_year: i32,
    ) -> Result<Option<StudentClass>, StoreError> {
        find_class(&mut *self.tx, name, academic_year).await
    }
}

#[async_trait]
impl RosterTransaction for PgRosterTransaction {
    async fn create_student(&mut self, student: NewStudent) -> Result<Student, StoreError> {
        let sql = format!(
            r#"INSERT INTO students (student_id, name, gender, academic_year, email, phone, nis, nisn,
                   birth_date, birth_place, address, parent_name, parent_phone, parent_email,
                   class_id, status, enrollment_date)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
               RETURNING {STUDENT_COLUMNS}"#
        );

        sqlx::query_as::<_, Student>(&sql)
            .bind(&student.student_id)
            .bind(&student.name)
            .bind(student.gender.as_str())
            .bind(student.academic_year)
            .bind(&student.email)
            .bind(&student.phone)
            .bind(&student.nis)
            .bind(&student.nisn)
            .bind(student.birth_date)
            .bind(&student.birth_place)
            .bind(&student.address)
            .bind(&student.parent_name)
            .bind(&student.parent_phone)
            .bind(&student.parent_email)
            .bind(student.class_id)
            .bind(&student.status)
            .bind(student.enrollment_date)
            .fetch_one(&mut *self.tx)
            .await
            .map_err(map_write_error)
    }

    async fn enroll_student(
        &mut self,
        class: &StudentClass,
        student: &Student,
    ) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"UPDATE student_classes
               SET current_enrollment = current_enrollment + 1, updated_at = NOW()
               WHERE id = $1 AND current_enrollment < capacity"#,
        )
        .bind(class.id)
        .execute(&mut *self.tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::CapacityExceeded(class.name.clone()));
        }

        debug!(class = %class.name, student_id = %student.student_id, "Enrolled student");
        Ok(())
    }

    async fn begin_row(&mut self) -> Result<(), StoreError> {
        sqlx::query(&format!("SAVEPOINT {ROW_SAVEPOINT}"))
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    async fn release_row(&mut self) -> Result<(), StoreError> {
        sqlx::query(&format!("RELEASE SAVEPOINT {ROW_SAVEPOINT}"))
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    async fn rollback_row(&mut self) -> Result<(), StoreError> {
        sqlx::query(&format!("ROLLBACK TO SAVEPOINT {ROW_SAVEPOINT}"))
            .execute(&mut *self.tx)
            .await?;
        // ROLLBACK TO keeps the savepoint alive
        self.release_row().await
    }

    async fn commit(self) -> Result<(), StoreError> {
        self.tx.commit().await?;
        Ok(())
    }

    async fn rollback(self) -> Result<(), StoreError> {
        self.tx.rollback().await?;
        Ok(())
    }
}
