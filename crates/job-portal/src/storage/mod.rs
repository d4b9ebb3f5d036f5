//! Relational persistence over SQLite. Each concern has its own store trait; [`SqliteStore`]
//! implements all of them on one connection pool.

mod sqlite;

use std::str::FromStr;
use std::time::Duration;

use sqlx::migrate::{MigrateError, Migrator};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

pub use sqlite::SqliteStore;

use crate::applications::ApplicationStore;
use crate::auth::UserStore;
use crate::config::DatabaseConfig;
use crate::jobs::JobStore;
use crate::profiles::ProfileStore;

pub static MIGRATOR: Migrator = sqlx::migrate!();

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for RepositoryError {
    fn from(value: sqlx::Error) -> Self {
        match &value {
            sqlx::Error::Database(db) if db.is_unique_violation() => RepositoryError::Conflict,
            sqlx::Error::RowNotFound => RepositoryError::NotFound,
            _ => RepositoryError::Unavailable(value.to_string()),
        }
    }
}

/// Every store the portal needs, satisfied by one backing type.
pub trait PortalStore: UserStore + ProfileStore + JobStore + ApplicationStore {}

impl<T> PortalStore for T where T: UserStore + ProfileStore + JobStore + ApplicationStore {}

/// Opens a pool for `DATABASE_URL`, creating the database file when missing.
pub async fn connect(config: &DatabaseConfig) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(&config.url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .busy_timeout(BUSY_TIMEOUT);

    SqlitePoolOptions::new()
        .max_connections(config.max_connections.max(1))
        .connect_with(options)
        .await
}

/// A private in-memory database. One connection that never expires, so the data lives as long
/// as the pool.
pub async fn connect_in_memory() -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
}

pub async fn migrate(pool: &SqlitePool) -> Result<(), MigrateError> {
    MIGRATOR.run(pool).await?;
    tracing::debug!("database migrations applied");
    Ok(())
}
