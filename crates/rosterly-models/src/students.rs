//! Student domain models.
//!
//! This module contains the persisted [`Student`] entity, the normalized
//! [`NewStudent`] record produced by an import, and the raw [`ImportRow`]
//! read from a spreadsheet.

use chrono::NaiveDate;
use rosterly_core::serde::deserialize_optional_cell;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use utoipa::ToSchema;
use uuid::Uuid;

/// Status assigned to every student created by an import.
pub const STATUS_ACTIVE: &str = "active";

/// Gender values accepted by the roster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// Parses `male` or `female`, ignoring case and surrounding whitespace.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "male" => Some(Self::Male),
            "female" => Some(Self::Female),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One candidate student as read from the tabular source.
///
/// Every cell is optional and accepts either text or a number; blank cells
/// deserialize to `None`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ImportRow {
    #[serde(default, deserialize_with = "deserialize_optional_cell")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_cell")]
    pub student_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_cell")]
    pub gender: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_cell")]
    pub academic_year: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_cell")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_cell")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_cell")]
    pub nis: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_cell")]
    pub nisn: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_cell")]
    pub birth_date: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_cell")]
    pub birth_place: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_cell")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_cell")]
    pub parent_name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_cell")]
    pub parent_phone: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_cell")]
    pub parent_email: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_cell")]
    pub class_name: Option<String>,
}

impl ImportRow {
    /// Column names understood by [`ImportRow::set_field`].
    pub const FIELDS: [&'static str; 15] = [
        "name",
        "student_id",
        "gender",
        "academic_year",
        "email",
        "phone",
        "nis",
        "nisn",
        "birth_date",
        "birth_place",
        "address",
        "parent_name",
        "parent_phone",
        "parent_email",
        "class_name",
    ];

    /// Assigns a cell by column name. Returns `false` for unknown columns.
    pub fn set_field(&mut self, field: &str, value: Option<String>) -> bool {
        let slot = match field {
            "name" => &mut self.name,
            "student_id" => &mut self.student_id,
            "gender" => &mut self.gender,
            "academic_year" => &mut self.academic_year,
            "email" => &mut self.email,
            "phone" => &mut self.phone,
            "nis" => &mut self.nis,
            "nisn" => &mut self.nisn,
            "birth_date" => &mut self.birth_date,
            "birth_place" => &mut self.birth_place,
            "address" => &mut self.address,
            "parent_name" => &mut self.parent_name,
            "parent_phone" => &mut self.parent_phone,
            "parent_email" => &mut self.parent_email,
            "class_name" => &mut self.class_name,
            _ => return false,
        };
        *slot = value;
        true
    }

    /// Whether every cell of the row is blank.
    pub fn is_blank(&self) -> bool {
        self == &Self::default()
    }
}

/// Columns that must be unique across the roster when present.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UniqueField {
    StudentId,
    Email,
    Nis,
    Nisn,
}

impl UniqueField {
    pub const ALL: [UniqueField; 4] = [Self::StudentId, Self::Email, Self::Nis, Self::Nisn];

    /// Database column holding the value.
    pub fn column(&self) -> &'static str {
        match self {
            Self::StudentId => "student_id",
            Self::Email => "email",
            Self::Nis => "nis",
            Self::Nisn => "nisn",
        }
    }

    /// Human-readable label used in row messages.
    pub fn label(&self) -> &'static str {
        match self {
            Self::StudentId => "Student ID",
            Self::Email => "Email",
            Self::Nis => "NIS",
            Self::Nisn => "NISN",
        }
    }

    /// Reads this field from an import row, trimmed the way it is stored.
    /// Blank cells read as `None`.
    pub fn value_in<'a>(&self, row: &'a ImportRow) -> Option<&'a str> {
        let cell = match self {
            Self::StudentId => &row.student_id,
            Self::Email => &row.email,
            Self::Nis => &row.nis,
            Self::Nisn => &row.nisn,
        };
        cell.as_deref().map(str::trim).filter(|v| !v.is_empty())
    }

    /// Reads this field from a persisted student.
    pub fn value_of<'a>(&self, student: &'a Student) -> Option<&'a str> {
        match self {
            Self::StudentId => Some(student.student_id.as_str()),
            Self::Email => student.email.as_deref(),
            Self::Nis => student.nis.as_deref(),
            Self::Nisn => student.nisn.as_deref(),
        }
    }
}

impl fmt::Display for UniqueField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A normalized student record ready to be persisted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewStudent {
    pub student_id: String,
    pub name: String,
    pub gender: Gender,
    pub academic_year: i32,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub nis: Option<String>,
    pub nisn: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub birth_place: Option<String>,
    pub address: Option<String>,
    pub parent_name: Option<String>,
    pub parent_phone: Option<String>,
    pub parent_email: Option<String>,
    pub class_id: Option<Uuid>,
    pub status: String,
    pub enrollment_date: NaiveDate,
}

/// A student stored in the roster.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, FromRow, ToSchema)]
pub struct Student {
    pub id: Uuid,
    pub student_id: String,
    pub name: String,
    pub gender: String,
    pub academic_year: i32,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub nis: Option<String>,
    pub nisn: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub birth_place: Option<String>,
    pub address: Option<String>,
    pub parent_name: Option<String>,
    pub parent_phone: Option<String>,
    pub parent_email: Option<String>,
    pub class_id: Option<Uuid>,
    pub status: String,
    pub enrollment_date: NaiveDate,
    #[sqlx(default)]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    #[sqlx(default)]
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl Student {
    /// Materializes a record with a fresh id, as a store would on insert.
    pub fn from_new(id: Uuid, record: NewStudent) -> Self {
        Self {
            id,
            student_id: record.student_id,
            name: record.name,
            gender: record.gender.as_str().to_string(),
            academic_year: record.academic_year,
            email: record.email,
            phone: record.phone,
            nis: record.nis,
            nisn: record.nisn,
            birth_date: record.birth_date,
            birth_place: record.birth_place,
            address: record.address,
            parent_name: record.parent_name,
            parent_phone: record.parent_phone,
            parent_email: record.parent_email,
            class_id: record.class_id,
            status: record.status,
            enrollment_date: record.enrollment_date,
            created_at: None,
            updated_at: None,
        }
    }
}
