//! # Rosterly Models
//!
//! Domain models and DTOs for the Rosterly API.
//!
//! # Modules
//!
//! - [`classes`]: Student classes and their enrollment capacity
//! - [`imports`]: Batch import payloads and their outcome reports
//! - [`students`]: Persisted students, import rows and unique identifiers
//!
//! # Example
//!
//! ```ignore
//! use rosterly_models::{ImportRow, UniqueField};
//!
//! let row: ImportRow = serde_json::from_str(r#"{"student_id": "S001"}"#)?;
//! assert_eq!(UniqueField::StudentId.value_in(&row), Some("S001"));
//! ```

pub mod classes;
pub mod imports;
pub mod students;

// Re-export commonly used types at crate root for convenience
pub use classes::StudentClass;
pub use imports::{ImportResult, ImportStudentsDto, ValidationOutcome};
pub use students::{Gender, ImportRow, NewStudent, STATUS_ACTIVE, Student, UniqueField};
