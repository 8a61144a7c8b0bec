//! Database layer: connection pooling, migrations, models and repositories.
//!
//! All persistent state for inspection sessions (PRD-41), frame analysis
//! results (PRD-42) and the event journal (PRD-44) lives in Postgres.
//! Repositories are stateless structs with static async methods taking a
//! `&PgPool`; queries are built from `COLUMNS` constants so the column
//! lists stay in one place per table.

use sqlx::postgres::PgPoolOptions;

pub mod models;
pub mod repositories;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Verify the database is reachable with a trivial round-trip query.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply all pending migrations from `db/migrations/`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}
