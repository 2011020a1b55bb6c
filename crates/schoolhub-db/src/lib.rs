//! # SchoolHub DB
//!
//! PostgreSQL pool initialisation, embedded migrations, and helpers for
//! classifying constraint violations raised by the schema.
//!
//! Uniqueness of enrollments per (student, course) and of attendance per
//! (student, course, day) is enforced by unique indexes in `migrations/`;
//! services translate those violations into conflict responses with
//! [`is_unique_violation`].
//!
//! # Example
//!
//! ```ignore
//! use schoolhub_config::DatabaseConfig;
//! use schoolhub_db::{init_db_pool, run_migrations};
//!
//! let pool = init_db_pool(&DatabaseConfig::from_env()).await?;
//! run_migrations(&pool).await?;
//! ```

use schoolhub_config::DatabaseConfig;
use sqlx::postgres::PgPoolOptions;

pub use sqlx::PgPool;

/// Connects a pool sized by `DATABASE_MAX_CONNECTIONS`.
pub async fn init_db_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.url)
        .await?;

    tracing::info!(max_connections = config.max_connections, "Database pool ready");
    Ok(pool)
}

/// Applies the migrations embedded from the workspace `migrations/` directory.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../migrations").run(pool).await
}

/// True when the statement failed on a UNIQUE constraint or index.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}

/// True when the statement failed on a FOREIGN KEY constraint, e.g. deleting a
/// course that still has enrollments.
pub fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_database_errors_are_not_violations() {
        let err = sqlx::Error::RowNotFound;
        assert!(!is_unique_violation(&err));
        assert!(!is_foreign_key_violation(&err));
    }
}
