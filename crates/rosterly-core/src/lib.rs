//! # Rosterly Core
//!
//! Core types, errors, and utilities for the Rosterly API.
//!
//! This crate provides foundational types used throughout the Rosterly application:
//!
//! - [`errors`]: Application error type with HTTP response conversion
//! - [`serde`]: Custom deserializers for loosely-typed spreadsheet cells
//!
//! # Example
//!
//! ```ignore
//! use rosterly_core::errors::AppError;
//!
//! let error = AppError::bad_request(anyhow::anyhow!("CSV file is empty"));
//! ```

pub mod errors;
pub mod serde;

// Re-export commonly used types at crate root
pub use errors::{AppError, ErrorResponse};
