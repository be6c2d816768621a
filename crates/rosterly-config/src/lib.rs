//! # Rosterly Config
//!
//! Configuration types for the Rosterly API.
//!
//! This crate provides configuration structures loaded from environment variables:
//!
//! - [`cors`]: CORS (Cross-Origin Resource Sharing) configuration
//! - [`import`]: Student batch import limits and CSV options
//!
//! # Example
//!
//! ```ignore
//! use rosterly_config::{CorsConfig, ImportConfig};
//!
//! let cors_config = CorsConfig::from_env();
//! let import_config = ImportConfig::from_env();
//! ```

pub mod cors;
pub mod import;

// Re-export commonly used types at crate root
pub use cors::CorsConfig;
pub use import::ImportConfig;
