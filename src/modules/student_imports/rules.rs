//! Row-level admission rules shared by the dry run and the commit path.
//!
//! The two paths apply the same conditions with different severities:
//! an identifier that already exists in the store, or a class that is
//! already full, is only a warning during a dry run but rejects the row on
//! commit. [`RowViolation::is_advisory_in_dry_run`] is the single place that
//! encodes this split.

use chrono::NaiveDate;
use rosterly_db::{RosterReader, RosterTransaction, StoreError};
use rosterly_models::{Gender, ImportRow, NewStudent, STATUS_ACTIVE, Student, StudentClass, UniqueField};
use thiserror::Error;
use validator::ValidateEmail;

use super::class_capacity::{ClassResolution, resolve_class};
use super::normalizer::{normalize_phone, parse_birth_date};
use super::uniqueness;

/// A reason a row cannot be admitted as-is.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RowViolation {
    #[error("Name is required")]
    MissingName,

    #[error("Student ID is required")]
    MissingStudentId,

    #[error("Gender must be male or female")]
    InvalidGender,

    #[error("Academic year is required")]
    MissingAcademicYear,

    #[error("Academic year must be numeric")]
    InvalidAcademicYear,

    #[error("Invalid email format: {0}")]
    InvalidEmail(String),

    #[error("Duplicate {field} {value} in import")]
    DuplicateInBatch { field: UniqueField, value: String },

    #[error("{field} {value} already exists")]
    AlreadyExists { field: UniqueField, value: String },

    #[error("Class {name} not found for academic year {academic_year}")]
    ClassNotFound { name: String, academic_year: i32 },

    #[error("Class {name} is full")]
    ClassFull { name: String },
}

impl RowViolation {
    /// Conditions reported as warnings by the dry run but enforced on commit.
    pub fn is_advisory_in_dry_run(&self) -> bool {
        matches!(self, Self::AlreadyExists { .. } | Self::ClassFull { .. })
    }

    /// Message prefixed with the 1-based row number.
    pub fn for_row(&self, row_number: usize) -> String {
        format!("Row {row_number}: {self}")
    }
}

/// The required cells of a row, parsed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequiredFields<'a> {
    pub name: &'a str,
    pub student_id: &'a str,
    pub gender: Gender,
    pub academic_year: i32,
}

/// Accepts integers and integral floats such as `2025.0`.
pub fn parse_academic_year(raw: &str) -> Option<i32> {
    let raw = raw.trim();
    if let Ok(year) = raw.parse::<i32>() {
        return Some(year);
    }

    let year = raw.parse::<f64>().ok()?;
    if year.is_finite() && year.fract() == 0.0 && year.abs() <= f64::from(i32::MAX) {
        Some(year as i32)
    } else {
        None
    }
}

/// The academic year of a row, when present and numeric.
pub fn academic_year_of(row: &ImportRow) -> Option<i32> {
    row.academic_year.as_deref().and_then(parse_academic_year)
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Checks the cells every row must carry.
///
/// Every violation is returned, in column order.
pub fn check_required_fields(row: &ImportRow) -> Result<RequiredFields<'_>, Vec<RowViolation>> {
    let mut violations = Vec::new();

    let name = non_blank(&row.name);
    if name.is_none() {
        violations.push(RowViolation::MissingName);
    }

    let student_id = non_blank(&row.student_id);
    if student_id.is_none() {
        violations.push(RowViolation::MissingStudentId);
    }

    let gender = row.gender.as_deref().and_then(Gender::parse);
    if gender.is_none() {
        violations.push(RowViolation::InvalidGender);
    }

    let academic_year = match non_blank(&row.academic_year) {
        None => {
            violations.push(RowViolation::MissingAcademicYear);
            None
        }
        Some(raw) => {
            let year = parse_academic_year(raw);
            if year.is_none() {
                violations.push(RowViolation::InvalidAcademicYear);
            }
            year
        }
    };

    if let Some(email) = non_blank(&row.email)
        && !email.validate_email()
    {
        violations.push(RowViolation::InvalidEmail(email.to_string()));
    }

    match (name, student_id, gender, academic_year) {
        (Some(name), Some(student_id), Some(gender), Some(academic_year))
            if violations.is_empty() =>
        {
            Ok(RequiredFields {
                name,
                student_id,
                gender,
                academic_year,
            })
        }
        _ => Err(violations),
    }
}

/// Builds the record persisted for an admitted row.
///
/// `enrollment_date` is passed in so callers control the clock.
pub fn build_student_record(
    required: &RequiredFields<'_>,
    row: &ImportRow,
    class_id: Option<uuid::Uuid>,
    enrollment_date: NaiveDate,
) -> NewStudent {
    let optional = |value: &Option<String>| non_blank(value).map(str::to_string);

    NewStudent {
        student_id: required.student_id.to_string(),
        name: required.name.to_string(),
        gender: required.gender,
        academic_year: required.academic_year,
        email: optional(&row.email),
        phone: normalize_phone(row.phone.as_deref()),
        nis: optional(&row.nis),
        nisn: optional(&row.nisn),
        birth_date: parse_birth_date(row.birth_date.as_deref()),
        birth_place: optional(&row.birth_place),
        address: optional(&row.address),
        parent_name: optional(&row.parent_name),
        parent_phone: normalize_phone(row.parent_phone.as_deref()),
        parent_email: optional(&row.parent_email),
        class_id,
        status: STATUS_ACTIVE.to_string(),
        enrollment_date,
    }
}

/// Classifies a class lookup as a violation, if it is one.
pub fn class_violation(resolution: &ClassResolution, name: &str, academic_year: i32) -> Option<RowViolation> {
    match resolution {
        ClassResolution::Available(_) => None,
        ClassResolution::Full(class) => Some(RowViolation::ClassFull {
            name: class.name.clone(),
        }),
        ClassResolution::NotFound => Some(RowViolation::ClassNotFound {
            name: name.to_string(),
            academic_year,
        }),
    }
}

/// Decision for one row on the commit path.
#[derive(Debug)]
pub enum AdmissionPlan {
    Rejected(RowViolation),
    Admit {
        record: NewStudent,
        class: Option<StudentClass>,
    },
}

/// Applies every rule with commit severity and stops at the first violation.
pub async fn plan_admission<R>(
    reader: &mut R,
    row: &ImportRow,
    enrollment_date: NaiveDate,
) -> Result<AdmissionPlan, StoreError>
where
    R: RosterReader + ?Sized,
{
    let required = match check_required_fields(row) {
        Ok(required) => required,
        Err(mut violations) => return Ok(AdmissionPlan::Rejected(violations.remove(0))),
    };

    if let Some((field, value)) = uniqueness::first_taken(reader, row).await? {
        return Ok(AdmissionPlan::Rejected(RowViolation::AlreadyExists {
            field,
            value,
        }));
    }

    let class = match non_blank(&row.class_name) {
        None => None,
        Some(class_name) => {
            let resolution = resolve_class(reader, class_name, required.academic_year).await?;
            if let Some(violation) = class_violation(&resolution, class_name, required.academic_year) {
                return Ok(AdmissionPlan::Rejected(violation));
            }
            match resolution {
                ClassResolution::Available(class) => Some(class),
                _ => None,
            }
        }
    };

    let record = build_student_record(
        &required,
        row,
        class.as_ref().map(|c| c.id),
        enrollment_date,
    );

    Ok(AdmissionPlan::Admit { record, class })
}

/// Terminal state of one row on the commit path.
#[derive(Debug)]
pub enum RowOutcome {
    Admitted(Student),
    Rejected(RowViolation),
    /// The store failed while the row was being processed.
    Failed(StoreError),
}

/// Runs the commit rules for one row and persists it when admissible.
///
/// Store failures are captured as [`RowOutcome::Failed`] rather than
/// returned, so the caller decides how far they propagate.
pub async fn admit_row<T>(tx: &mut T, row: &ImportRow, enrollment_date: NaiveDate) -> RowOutcome
where
    T: RosterTransaction + ?Sized,
{
    let (record, class) = match plan_admission(tx, row, enrollment_date).await {
        Ok(AdmissionPlan::Admit { record, class }) => (record, class),
        Ok(AdmissionPlan::Rejected(violation)) => return RowOutcome::Rejected(violation),
        Err(e) => return RowOutcome::Failed(e),
    };

    let student = match tx.create_student(record).await {
        Ok(student) => student,
        Err(e) => return RowOutcome::Failed(e),
    };

    if let Some(class) = &class
        && let Err(e) = tx.enroll_student(class, &student).await
    {
        return RowOutcome::Failed(e);
    }

    RowOutcome::Admitted(student)
}
