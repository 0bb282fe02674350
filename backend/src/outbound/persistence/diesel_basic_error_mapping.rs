//! Diesel and pool error mapping shared by the repositories.
//!
//! Each repository passes its own `connection`/`query` constructors so the
//! port error types stay separate while the classification lives here.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

pub(super) fn map_basic_pool_error<E>(error: PoolError, connection: impl FnOnce(String) -> E) -> E {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => connection(message),
    }
}

/// Log the failure at debug level, then classify it as a connection or
/// query error. Database messages are not forwarded to the caller.
pub(super) fn map_basic_diesel_error<E>(
    error: DieselError,
    query: impl FnOnce(&'static str) -> E,
    connection: impl FnOnce(&'static str) -> E,
) -> E {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        other => debug!(error = %other, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(
            DatabaseErrorKind::ClosedConnection | DatabaseErrorKind::UnableToSendCommand,
            _,
        ) => connection("database connection error"),
        DieselError::NotFound => query("record not found"),
        DieselError::QueryBuilderError(_) => query("database query error"),
        _ => query("database error"),
    }
}

/// Whether the error is a unique-constraint violation.
pub(super) fn is_unique_violation(error: &DieselError) -> bool {
    matches!(
        error,
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)
    )
}

/// Convert a non-negative column value to `u32`, clamping corrupt negatives.
pub(super) fn column_to_u32(value: i32) -> u32 {
    u32::try_from(value).unwrap_or(0)
}

/// Convert a domain count to an `INTEGER` column, saturating at `i32::MAX`.
pub(super) fn u32_to_column(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}
