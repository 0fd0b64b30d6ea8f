//! Database layer for roomshare.

pub mod entities;
pub mod migrations;
pub mod repositories;
pub mod test_utils;

use roomshare_common::{AppError, Config};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr, SqlErr};
use std::time::Duration;
use tracing::log::LevelFilter;

/// Initialize database connection.
pub async fn init(config: &Config) -> Result<DatabaseConnection, AppError> {
    let mut opt = ConnectOptions::new(&config.database.url);

    opt.max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect_timeout(Duration::from_secs(10))
        .acquire_timeout(Duration::from_secs(10))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .sqlx_logging(true)
        .sqlx_logging_level(LevelFilter::Debug);

    Database::connect(opt)
        .await
        .map_err(|e| AppError::Database(e.to_string()))
}

/// Run pending migrations.
pub async fn migrate(db: &DatabaseConnection) -> Result<(), AppError> {
    use sea_orm_migration::MigratorTrait;
    migrations::Migrator::up(db, None)
        .await
        .map_err(|e| AppError::Database(e.to_string()))
}

/// Whether the store rejected a write because of a unique index.
///
/// Drivers that do not surface a structured code are matched on the
/// `PostgreSQL` message (`23505 duplicate key value ...`).
#[must_use]
pub fn is_unique_violation(err: &DbErr) -> bool {
    if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
        return true;
    }
    let message = err.to_string();
    message.contains("duplicate key") || message.contains("23505")
}

/// Map an insert error, classifying unique-index violations as [`AppError::Conflict`].
pub(crate) fn map_insert_err(err: DbErr, conflict_message: &str) -> AppError {
    if is_unique_violation(&err) {
        AppError::Conflict(conflict_message.to_string())
    } else {
        AppError::Database(err.to_string())
    }
}
