//! # Rosterly DB
//!
//! Database pool and roster store for the Rosterly API.
//!
//! The import engine talks to persistence only through the traits in
//! [`store`]. [`postgres`] implements them on top of SQLx; the in-memory
//! [`memory`] store (feature `test-utils`) backs the test suites.
//!
//! # Example
//!
//! ```ignore
//! use rosterly_db::{init_db_pool, PgRosterStore, RosterStore};
//!
//! let pool = init_db_pool(&database_url).await?;
//! let store = PgRosterStore::new(pool);
//! let mut tx = store.begin().await?;
//! ```

pub mod backend;
#[cfg(any(test, feature = "test-utils"))]
pub mod memory;
pub mod postgres;
pub mod store;

use std::env;

use sqlx::postgres::PgPoolOptions;

pub use backend::RosterBackend;
#[cfg(any(test, feature = "test-utils"))]
pub use memory::MemoryRosterStore;
pub use postgres::{PgRosterReader, PgRosterStore, PgRosterTransaction};
pub use store::{RosterReader, RosterStore, RosterTransaction, StoreError};

// Re-export PgPool for convenience
pub use sqlx::PgPool;

/// Opens a PostgreSQL connection pool.
///
/// The pool size is read from `DATABASE_MAX_CONNECTIONS` (default: 5).
pub async fn init_db_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(5);

    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

/// Applies the embedded migrations from the repository's `migrations/` directory.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../migrations").run(pool).await
}
