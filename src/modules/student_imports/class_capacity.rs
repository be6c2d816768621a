//! Resolution of a row's target class and its remaining capacity.

use rosterly_db::{RosterReader, StoreError};
use rosterly_models::StudentClass;

/// What a `(class_name, academic_year)` pair resolved to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClassResolution {
    Available(StudentClass),
    Full(StudentClass),
    NotFound,
}

pub async fn resolve_class<R>(
    reader: &mut R,
    name: &str,
    academic_year: i32,
) -> Result<ClassResolution, StoreError>
where
    R: RosterReader + ?Sized,
{
    Ok(match reader.find_class(name, academic_year).await? {
        Some(class) if class.can_enroll_student() => ClassResolution::Available(class),
        Some(class) => ClassResolution::Full(class),
        None => ClassResolution::NotFound,
    })
}
