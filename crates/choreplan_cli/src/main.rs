//! Operator CLI over `choreplan_core`.
//!
//! # Responsibility
//! - Import the task catalog and drive questionnaire submissions from JSON files.
//! - Print plans and persisted household tasks as JSON on stdout.

use anyhow::{bail, Context};
use choreplan_core::db::open_db;
use choreplan_core::{
    AssignmentPlan, CatalogEntry, HouseholdId, QuestionnaireResponse, QuestionnaireService,
    SqliteHouseholdTaskRepository, SqliteQuestionnaireRepository, SqliteTemplateRepository,
    SubmitOutcome, TaskTemplate, WizardAnswers,
};
use clap::{Parser, Subcommand};
use log::info;
use rusqlite::Connection;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "choreplan")]
#[command(about = "Questionnaire-driven household task assignment")]
struct Cli {
    /// SQLite database file
    #[arg(long, env = "CHOREPLAN_DB", default_value = "choreplan.db")]
    db: PathBuf,

    /// Log level (trace|debug|info|warn|error)
    #[arg(long, env = "CHOREPLAN_LOG_LEVEL")]
    log_level: Option<String>,

    /// Absolute directory for rotating log files; logging is off when unset
    #[arg(long, env = "CHOREPLAN_LOG_DIR")]
    log_dir: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print core health-check and version
    Ping,
    /// Insert or update catalog templates from a JSON array
    ImportCatalog { path: PathBuf },
    /// Submit raw wizard answers for a household and apply tasks
    Submit { household: HouseholdId, answers: PathBuf },
    /// Re-run assignment for a household's stored questionnaire
    Reassign { household: HouseholdId },
    /// Resolve a structured questionnaire without writing tasks
    Preview {
        responses: PathBuf,
        /// Household id to bind when the file carries none
        #[arg(long)]
        household: Option<HouseholdId>,
    },
    /// List persisted tasks of a household
    Tasks { household: HouseholdId },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli
            .log_level
            .as_deref()
            .unwrap_or(choreplan_core::default_log_level());
        choreplan_core::init_logging(level, log_dir).context("failed to initialize logging")?;
    }

    let output = match cli.command {
        Commands::Ping => json!({
            "ping": choreplan_core::ping(),
            "version": choreplan_core::core_version(),
        }),
        command => {
            let conn = open_db(&cli.db)
                .with_context(|| format!("failed to open database `{}`", cli.db.display()))?;
            run(&conn, command)?
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn run(conn: &Connection, command: Commands) -> anyhow::Result<Value> {
    let output = match command {
        Commands::Ping => json!({ "ping": choreplan_core::ping() }),
        Commands::ImportCatalog { path } => import_catalog(conn, &path)?,
        Commands::Submit { household, answers } => {
            let answers: WizardAnswers = read_json(&answers)?;
            let outcome = service(conn)?.submit(household, &answers)?;
            outcome_json(household, &outcome)
        }
        Commands::Reassign { household } => {
            let outcome = service(conn)?.reassign(household)?;
            outcome_json(household, &outcome)
        }
        Commands::Preview {
            responses,
            household,
        } => {
            let mut responses: QuestionnaireResponse = read_json(&responses)?;
            if let Some(household) = household {
                responses.household_id = household;
            }
            plan_json(&service(conn)?.preview(&responses)?)
        }
        Commands::Tasks { household } => {
            serde_json::to_value(service(conn)?.list_household_tasks(household)?)?
        }
    };
    Ok(output)
}

type SqliteService<'conn> = QuestionnaireService<
    SqliteTemplateRepository<'conn>,
    SqliteHouseholdTaskRepository<'conn>,
    SqliteQuestionnaireRepository<'conn>,
>;

fn service(conn: &Connection) -> anyhow::Result<SqliteService<'_>> {
    Ok(QuestionnaireService::new(
        SqliteTemplateRepository::try_new(conn)?,
        SqliteHouseholdTaskRepository::try_new(conn)?,
        SqliteQuestionnaireRepository::try_new(conn)?,
    ))
}

fn import_catalog(conn: &Connection, path: &Path) -> anyhow::Result<Value> {
    let entries: Vec<CatalogEntry> = read_json(path)?;
    if entries.is_empty() {
        bail!("catalog `{}` contains no templates", path.display());
    }

    let templates = entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            entry
                .into_template()
                .with_context(|| format!("catalog entry #{index} is invalid"))
        })
        .collect::<anyhow::Result<Vec<TaskTemplate>>>()?;

    let repo = SqliteTemplateRepository::try_new(conn)?;
    let imported = repo.import_templates(&templates)?;
    info!("event=catalog_import module=cli status=ok count={imported}");
    Ok(json!({ "imported": imported }))
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read `{}`", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("invalid JSON in `{}`", path.display()))
}

fn plan_json(plan: &AssignmentPlan) -> Value {
    let assigned: Vec<Value> = plan
        .assigned()
        .map(|assignment| {
            json!({
                "template_id": assignment.template_id,
                "name": assignment.template_name,
                "points_multiplier": assignment.points_multiplier,
                "frequency_adjustment": assignment.frequency_adjustment,
                "points": assignment.resolved_points,
                "interval_days": assignment.interval_days,
            })
        })
        .collect();

    json!({
        "assigned_count": plan.assigned_count,
        "total_count": plan.total_count,
        "active_conditions": plan.active_conditions,
        "estimated_daily_minutes": plan.estimated_daily_minutes,
        "available_minutes_daily": plan.available_minutes_daily,
        "exceeds_available_time": plan.exceeds_available_time(),
        "assigned": assigned,
    })
}

fn outcome_json(household: HouseholdId, outcome: &SubmitOutcome) -> Value {
    json!({
        "household_id": household,
        "created": outcome.applied.created,
        "updated": outcome.applied.updated,
        "deleted_implicitly": outcome.applied.deleted_implicitly,
        "plan": plan_json(&outcome.plan),
    })
}
