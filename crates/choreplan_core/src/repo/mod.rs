//! Repository contracts and SQLite implementations.
//!
//! # Responsibility
//! - Define storage-agnostic contracts consumed by services.
//! - Keep SQL and payload encoding inside the persistence boundary.
//!
//! # Invariants
//! - Write paths validate domain values before any SQL mutation.
//! - Read paths reject invalid persisted state instead of masking it.
//! - SQLite repositories are only built on fully migrated connections.

use crate::db::migrations::{current_version, latest_version};
use crate::db::DbError;
use crate::model::questionnaire::ValidationError;
use crate::model::template::TemplateValidationError;
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub mod household_task_repo;
pub mod questionnaire_repo;
pub mod template_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Error shared by all repositories.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// Questionnaire snapshot failed validation.
    Validation(ValidationError),
    /// Catalog template failed validation.
    InvalidTemplate(TemplateValidationError),
    /// Persisted row cannot be converted into a valid domain value.
    InvalidData(String),
    /// Snapshot payload could not be encoded or decoded.
    Serialization(serde_json::Error),
    /// Connection is not at the migrated schema version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::InvalidTemplate(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::Serialization(err) => write!(f, "payload serialization failed: {err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "repository requires table `{table}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Validation(err) => Some(err),
            Self::InvalidTemplate(err) => Some(err),
            Self::Serialization(err) => Some(err),
            Self::InvalidData(_)
            | Self::UninitializedConnection { .. }
            | Self::MissingRequiredTable(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<TemplateValidationError> for RepoError {
    fn from(value: TemplateValidationError) -> Self {
        Self::InvalidTemplate(value)
    }
}

impl From<serde_json::Error> for RepoError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(value)
    }
}

/// Checks schema version and required tables before a repository is built.
pub(crate) fn ensure_schema_ready(conn: &Connection, tables: &[&'static str]) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for &table in tables {
        let exists: i64 = conn.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table],
            |row| row.get(0),
        )?;
        if exists != 1 {
            return Err(RepoError::MissingRequiredTable(table));
        }
    }

    Ok(())
}

pub(crate) fn parse_uuid(value: &str, column: &'static str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid `{value}` in {column}")))
}
