//! Core domain logic for ChorePlan.
//! Turns household questionnaire answers into a reconciled list of
//! household tasks drawn from a shared template catalog.

pub mod db;
pub mod engine;
pub mod logging;
pub mod model;
pub mod questionnaire;
pub mod repo;
pub mod service;

pub use engine::conditions::{derive_condition_codes, ConditionCode, ConditionSet};
pub use engine::expression::{should_assign_task, ConditionExpr};
pub use engine::resolver::{resolve_assignments, AssignmentPlan, TaskAssignment};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::household_task::{HouseholdTask, HouseholdTaskId};
pub use model::questionnaire::{HouseholdId, QuestionnaireResponse, ValidationError};
pub use model::template::{CatalogEntry, TaskTemplate, TemplateId, TemplateValidationError};
pub use questionnaire::{AnswerValue, WizardAnswers};
pub use repo::household_task_repo::{
    HouseholdTaskRepository, ReplaceError, ReplaceStage, SqliteHouseholdTaskRepository,
};
pub use repo::questionnaire_repo::{QuestionnaireRepository, SqliteQuestionnaireRepository};
pub use repo::template_repo::{SqliteTemplateRepository, TemplateRepository};
pub use repo::{RepoError, RepoResult};
pub use service::assignment_service::{ApplyOutcome, AssignmentError, AssignmentService};
pub use service::questionnaire_service::{QuestionnaireService, SubmitOutcome};

/// Minimal health-check API.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
