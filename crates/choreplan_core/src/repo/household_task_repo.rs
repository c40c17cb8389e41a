//! Household task repository and the replace-all write path.
//!
//! # Responsibility
//! - Persist materialized `(household, template)` links.
//! - Replace a household's full task list as one logical operation.
//!
//! # Invariants
//! - `(household_id, template_id)` is unique; the schema enforces it.
//! - The SQLite replace deletes and inserts in one transaction, so a failed
//!   insert never loses existing rows.
//! - The provided (non-transactional) replace reports whether the delete was
//!   already committed when the insert fails.

use crate::model::household_task::HouseholdTask;
use crate::model::questionnaire::HouseholdId;
use crate::repo::{ensure_schema_ready, parse_uuid, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Step of a replace operation that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplaceStage {
    Delete,
    Insert,
    Commit,
}

impl ReplaceStage {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Delete => "delete",
            Self::Insert => "insert",
            Self::Commit => "commit",
        }
    }
}

/// Failure of `replace_household_tasks`.
#[derive(Debug)]
pub struct ReplaceError {
    pub stage: ReplaceStage,
    /// `true` when previous rows are already gone and nothing replaced them.
    pub delete_committed: bool,
    pub source: RepoError,
}

impl Display for ReplaceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "household task replace failed at {} (delete_committed={}): {}",
            self.stage.as_str(),
            self.delete_committed,
            self.source
        )
    }
}

impl Error for ReplaceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.source)
    }
}

/// Storage contract for household tasks.
pub trait HouseholdTaskRepository {
    fn list_household_tasks(&self, household_id: HouseholdId) -> RepoResult<Vec<HouseholdTask>>;

    /// Deletes every row of the household; returns the number removed.
    fn delete_household_tasks(&mut self, household_id: HouseholdId) -> RepoResult<usize>;

    fn insert_household_tasks(&mut self, tasks: &[HouseholdTask]) -> RepoResult<()>;

    /// Replaces the household's rows with `tasks`; returns rows removed.
    ///
    /// The provided implementation is two independent writes. Stores that
    /// support transactions should override it.
    fn replace_household_tasks(
        &mut self,
        household_id: HouseholdId,
        tasks: &[HouseholdTask],
    ) -> Result<usize, ReplaceError> {
        let deleted = self
            .delete_household_tasks(household_id)
            .map_err(|source| ReplaceError {
                stage: ReplaceStage::Delete,
                delete_committed: false,
                source,
            })?;
        self.insert_household_tasks(tasks)
            .map_err(|source| ReplaceError {
                stage: ReplaceStage::Insert,
                delete_committed: true,
                source,
            })?;
        Ok(deleted)
    }
}

/// SQLite-backed household task store.
pub struct SqliteHouseholdTaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteHouseholdTaskRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema_ready(conn, &["task_templates", "household_tasks"])?;
        Ok(Self { conn })
    }
}

impl HouseholdTaskRepository for SqliteHouseholdTaskRepository<'_> {
    fn list_household_tasks(&self, household_id: HouseholdId) -> RepoResult<Vec<HouseholdTask>> {
        let mut stmt = self.conn.prepare(
            "SELECT
                id,
                household_id,
                template_id,
                is_active,
                points_value,
                interval_days
             FROM household_tasks
             WHERE household_id = ?1
             ORDER BY created_at ASC, id ASC;",
        )?;
        let mut rows = stmt.query([household_id.to_string()])?;
        let mut tasks = Vec::new();
        while let Some(row) = rows.next()? {
            tasks.push(parse_household_task_row(row)?);
        }
        Ok(tasks)
    }

    fn delete_household_tasks(&mut self, household_id: HouseholdId) -> RepoResult<usize> {
        delete_rows(self.conn, household_id)
    }

    fn insert_household_tasks(&mut self, tasks: &[HouseholdTask]) -> RepoResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        insert_rows(&tx, tasks)?;
        tx.commit()?;
        Ok(())
    }

    fn replace_household_tasks(
        &mut self,
        household_id: HouseholdId,
        tasks: &[HouseholdTask],
    ) -> Result<usize, ReplaceError> {
        let failed = |stage| {
            move |source: RepoError| ReplaceError {
                stage,
                delete_committed: false,
                source,
            }
        };

        let tx = self
            .conn
            .unchecked_transaction()
            .map_err(RepoError::from)
            .map_err(failed(ReplaceStage::Delete))?;
        let deleted = delete_rows(&tx, household_id).map_err(failed(ReplaceStage::Delete))?;
        insert_rows(&tx, tasks).map_err(failed(ReplaceStage::Insert))?;
        tx.commit()
            .map_err(RepoError::from)
            .map_err(failed(ReplaceStage::Commit))?;
        Ok(deleted)
    }
}

fn delete_rows(conn: &Connection, household_id: HouseholdId) -> RepoResult<usize> {
    let deleted = conn.execute(
        "DELETE FROM household_tasks WHERE household_id = ?1;",
        [household_id.to_string()],
    )?;
    Ok(deleted)
}

fn insert_rows(conn: &Connection, tasks: &[HouseholdTask]) -> RepoResult<()> {
    let mut stmt = conn.prepare(
        "INSERT INTO household_tasks (
            id,
            household_id,
            template_id,
            is_active,
            points_value,
            interval_days
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
    )?;
    for task in tasks {
        if task.interval_days == 0 {
            return Err(RepoError::InvalidData(format!(
                "household task `{}` has a zero interval",
                task.id
            )));
        }
        stmt.execute(params![
            task.id.to_string(),
            task.household_id.to_string(),
            task.template_id.to_string(),
            task.is_active,
            task.points_value,
            task.interval_days,
        ])?;
    }
    Ok(())
}

fn parse_household_task_row(row: &Row<'_>) -> RepoResult<HouseholdTask> {
    let id = parse_uuid(&row.get::<_, String>("id")?, "household_tasks.id")?;
    let household_id = parse_uuid(
        &row.get::<_, String>("household_id")?,
        "household_tasks.household_id",
    )?;
    let template_id = parse_uuid(
        &row.get::<_, String>("template_id")?,
        "household_tasks.template_id",
    )?;

    let is_active = match row.get::<_, i64>("is_active")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid is_active value `{other}` in household_tasks.is_active"
            )));
        }
    };

    Ok(HouseholdTask {
        id,
        household_id,
        template_id,
        is_active,
        points_value: row.get("points_value")?,
        interval_days: row.get("interval_days")?,
    })
}
