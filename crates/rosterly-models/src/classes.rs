//! Student class models.

use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// A class students are enrolled into, identified by `(name, academic_year)`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, FromRow, ToSchema)]
pub struct StudentClass {
    pub id: Uuid,
    pub name: String,
    pub academic_year: i32,
    pub capacity: i32,
    pub current_enrollment: i32,
}

impl StudentClass {
    /// True while the class has at least one free seat.
    pub fn can_enroll_student(&self) -> bool {
        self.current_enrollment < self.capacity
    }

    pub fn remaining_seats(&self) -> i32 {
        (self.capacity - self.current_enrollment).max(0)
    }
}
