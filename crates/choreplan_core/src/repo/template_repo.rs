//! Task template catalog repository.
//!
//! # Invariants
//! - Catalog order is `category, name, id` so resolution output is stable.
//! - Condition expressions are parsed when rows are loaded, not per evaluation.

use crate::model::template::{TaskTemplate, TemplateId};
use crate::repo::{ensure_schema_ready, parse_uuid, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

const TEMPLATE_SELECT_SQL: &str = "SELECT
    id,
    name,
    category,
    base_points,
    duration_minutes,
    difficulty,
    default_interval_days,
    condition_code
FROM task_templates";

/// Read access to the shared template catalog.
pub trait TemplateRepository {
    /// Lists every template in stable catalog order.
    fn list_task_templates(&self) -> RepoResult<Vec<TaskTemplate>>;
}

/// SQLite-backed catalog.
pub struct SqliteTemplateRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTemplateRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema_ready(conn, &["task_templates"])?;
        Ok(Self { conn })
    }

    /// Inserts a template, or replaces the catalog row with the same id.
    ///
    /// Household tasks linked to a replaced row are kept; callers re-run
    /// assignment to pick up changed conditions.
    pub fn upsert_template(&self, template: &TaskTemplate) -> RepoResult<TemplateId> {
        template.validate()?;

        self.conn.execute(
            "INSERT INTO task_templates (
                id,
                name,
                category,
                base_points,
                duration_minutes,
                difficulty,
                default_interval_days,
                condition_code
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                category = excluded.category,
                base_points = excluded.base_points,
                duration_minutes = excluded.duration_minutes,
                difficulty = excluded.difficulty,
                default_interval_days = excluded.default_interval_days,
                condition_code = excluded.condition_code;",
            params![
                template.id.to_string(),
                template.name.as_str(),
                template.category.as_str(),
                template.base_points,
                template.duration_minutes,
                template.difficulty,
                template.default_interval_days,
                template.condition_code(),
            ],
        )?;

        Ok(template.id)
    }

    /// Upserts a whole catalog in one transaction.
    pub fn import_templates(&self, templates: &[TaskTemplate]) -> RepoResult<usize> {
        for template in templates {
            template.validate()?;
        }

        let tx = self.conn.unchecked_transaction()?;
        let scoped = SqliteTemplateRepository { conn: &tx };
        for template in templates {
            scoped.upsert_template(template)?;
        }
        tx.commit()?;

        Ok(templates.len())
    }
}

impl TemplateRepository for SqliteTemplateRepository<'_> {
    fn list_task_templates(&self) -> RepoResult<Vec<TaskTemplate>> {
        let mut stmt = self.conn.prepare(&format!(
            "{TEMPLATE_SELECT_SQL} ORDER BY category ASC, name ASC, id ASC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut templates = Vec::new();
        while let Some(row) = rows.next()? {
            templates.push(parse_template_row(row)?);
        }
        Ok(templates)
    }
}

fn parse_template_row(row: &Row<'_>) -> RepoResult<TaskTemplate> {
    let id_text: String = row.get("id")?;
    let id = parse_uuid(&id_text, "task_templates.id")?;
    let condition_code: Option<String> = row.get("condition_code")?;

    let template = TaskTemplate::with_id(id, row.get::<_, String>("name")?, row.get("base_points")?)
        .with_category(row.get::<_, String>("category")?)
        .with_duration(row.get("duration_minutes")?)
        .with_difficulty(row.get("difficulty")?)
        .with_interval_days(row.get("default_interval_days")?)
        .with_condition(condition_code.as_deref());

    template.validate().map_err(|err| {
        RepoError::InvalidData(format!("template `{id_text}` failed validation: {err}"))
    })?;
    Ok(template)
}
