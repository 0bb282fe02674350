//! Embedded schema migrations applied at startup.

use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use thiserror::Error;
use tracing::info;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("failed to connect for migrations: {message}")]
    Connect { message: String },
    #[error("failed to apply migrations: {message}")]
    Apply { message: String },
    #[error("migration task aborted: {message}")]
    Aborted { message: String },
}

fn apply_pending(database_url: &str) -> Result<usize, MigrationError> {
    let mut conn = PgConnection::establish(database_url).map_err(|err| MigrationError::Connect {
        message: err.to_string(),
    })?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|err| MigrationError::Apply {
            message: err.to_string(),
        })?;
    Ok(applied.len())
}

/// Apply every pending migration using a short-lived synchronous connection.
///
/// Diesel's migration harness is blocking, so the work runs on the blocking
/// pool rather than an async worker.
pub async fn run_migrations(database_url: &str) -> Result<usize, MigrationError> {
    let url = database_url.to_owned();
    let applied = tokio::task::spawn_blocking(move || apply_pending(&url))
        .await
        .map_err(|err| MigrationError::Aborted {
            message: err.to_string(),
        })??;
    info!(applied, "database migrations complete");
    Ok(applied)
}
