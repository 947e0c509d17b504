//! PostgreSQL access for Helm: pool setup, migrations, row models and
//! one repository per record kind.
//!
//! Every repository method takes the owning `user_id` and scopes its
//! query by it, so one user can never read or write another's rows.
//!
//! Everything that touches the database sits behind the default
//! `postgres` feature. Without it only [`models`] is built.

pub mod models;
#[cfg(feature = "postgres")]
pub mod repositories;

#[cfg(feature = "postgres")]
pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
#[cfg(feature = "postgres")]
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    sqlx::postgres::PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to confirm the database is reachable.
#[cfg(feature = "postgres")]
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply any pending migrations from `db/migrations`.
#[cfg(feature = "postgres")]
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}
