//! Inkwell persistence layer.
//!
//! - [`models`] -- row types and DTOs for every table.
//! - [`repositories`] -- static, pool-based query helpers (Postgres).
//! - [`store`] -- the [`DraftStore`] trait the workflow layer depends on.
//! - [`pg_store`] / [`memory`] -- Postgres and in-memory implementations.

pub mod error;
pub mod memory;
pub mod models;
pub mod pg_store;
pub mod repositories;
pub mod retry;
pub mod store;

use sqlx::postgres::PgPoolOptions;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use pg_store::PgStore;
pub use store::DraftStore;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to verify connectivity.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply the embedded migrations in `crates/db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
