use chrono::NaiveDate;
use rosterly_models::{Gender, ImportRow, NewStudent, STATUS_ACTIVE};

pub fn enrollment_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 7, 14).unwrap()
}

/// A row that passes every rule against an empty roster.
pub fn row(student_id: &str) -> ImportRow {
    ImportRow {
        name: Some(format!("Student {student_id}")),
        student_id: Some(student_id.to_string()),
        gender: Some("male".to_string()),
        academic_year: Some("2025".to_string()),
        ..Default::default()
    }
}

pub fn new_student(student_id: &str) -> NewStudent {
    NewStudent {
        student_id: student_id.to_string(),
        name: format!("Student {student_id}"),
        gender: Gender::Female,
        academic_year: 2025,
        email: None,
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
        enrollment_date: enrollment_date(),
    }
}
