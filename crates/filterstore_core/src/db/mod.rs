//! SQLite storage bootstrap and schema migration entry points.
//!
//! # Responsibility
//! - Open and configure SQLite connections holding the `filters` table.
//! - Apply schema migrations in deterministic order.
//!
//! # Invariants
//! - Migration version is tracked via `PRAGMA user_version`.
//! - Repositories must not touch `filters` before migrations succeed.

use rusqlite::ErrorCode;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Coarse classification of a storage engine failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// A schema constraint rejected the row.
    Constraint,
    /// The engine could not be reached or could not serve the request now.
    Unavailable,
    /// Anything else, propagated as-is.
    Other,
}

/// Classifies an engine error by its primary SQLite result code.
pub fn failure_kind(err: &rusqlite::Error) -> FailureKind {
    let rusqlite::Error::SqliteFailure(failure, _) = err else {
        return FailureKind::Other;
    };

    match failure.code {
        ErrorCode::ConstraintViolation => FailureKind::Constraint,
        ErrorCode::CannotOpen
        | ErrorCode::DatabaseBusy
        | ErrorCode::DatabaseLocked
        | ErrorCode::SystemIoFailure
        | ErrorCode::NotADatabase
        | ErrorCode::PermissionDenied => FailureKind::Unavailable,
        _ => FailureKind::Other,
    }
}

/// Errors raised while opening or migrating a database.
#[derive(Debug)]
pub enum DbError {
    /// Error reported by the storage engine.
    Sqlite(rusqlite::Error),
    /// Database was written by a newer schema than this binary knows.
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "database schema version {db_version} is newer than supported {latest_supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
