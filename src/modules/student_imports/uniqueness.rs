//! Store lookups for identifiers that must be unique across the roster.

use rosterly_db::{RosterReader, StoreError};
use rosterly_models::{ImportRow, UniqueField};

/// Whether a live student already holds `value` in `field`.
///
/// Blank values are never considered taken. Inside a transaction the lookup
/// also sees students inserted earlier in the same transaction.
pub async fn exists<R>(reader: &mut R, field: UniqueField, value: &str) -> Result<bool, StoreError>
where
    R: RosterReader + ?Sized,
{
    if value.trim().is_empty() {
        return Ok(false);
    }
    reader.student_exists(field, value).await
}

/// First unique identifier of `row` that is already taken, checked in
/// [`UniqueField::ALL`] order.
pub async fn first_taken<R>(
    reader: &mut R,
    row: &ImportRow,
) -> Result<Option<(UniqueField, String)>, StoreError>
where
    R: RosterReader + ?Sized,
{
    for field in UniqueField::ALL {
        if let Some(value) = field.value_in(row)
            && exists(reader, field, value).await?
        {
            return Ok(Some((field, value.to_string())));
        }
    }
    Ok(None)
}
