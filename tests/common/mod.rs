#![allow(dead_code)]

use axum::Router;
use chrono::NaiveDate;
use fake::Fake;
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use rosterly::router::init_router;
use rosterly::state::AppState;
use rosterly_config::{CorsConfig, ImportConfig};
use rosterly_db::MemoryRosterStore;
use rosterly_models::{Gender, ImportRow, NewStudent, STATUS_ACTIVE};

pub fn enrollment_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 7, 14).unwrap()
}

/// A row with every required field filled in and a random name.
pub fn valid_row(student_id: &str) -> ImportRow {
    ImportRow {
        name: Some(Name().fake()),
        student_id: Some(student_id.to_string()),
        gender: Some("female".to_string()),
        academic_year: Some("2025".to_string()),
        ..Default::default()
    }
}

pub fn row_in_class(student_id: &str, class_name: &str) -> ImportRow {
    ImportRow {
        class_name: Some(class_name.to_string()),
        ..valid_row(student_id)
    }
}

pub fn row_with_email(student_id: &str, email: &str) -> ImportRow {
    ImportRow {
        email: Some(email.to_string()),
        ..valid_row(student_id)
    }
}

pub fn random_email() -> String {
    SafeEmail().fake()
}

/// A student that is already on the roster before the import runs.
pub fn existing_student(student_id: &str) -> NewStudent {
    NewStudent {
        student_id: student_id.to_string(),
        name: Name().fake(),
        gender: Gender::Male,
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

pub fn setup_test_app(store: MemoryRosterStore) -> Router {
    setup_test_app_with(store, ImportConfig::default())
}

pub fn setup_test_app_with(store: MemoryRosterStore, import_config: ImportConfig) -> Router {
    let state = AppState::new(
        store,
        CorsConfig::from_origins("http://localhost:3000"),
        import_config,
    );
    init_router(state)
}
