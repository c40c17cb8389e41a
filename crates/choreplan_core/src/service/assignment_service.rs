//! Assignment preview and reconciliation service.
//!
//! # Responsibility
//! - Resolve a questionnaire snapshot against the injected catalog.
//! - Reconcile a household's persisted tasks with resolved assignments.
//!
//! # Invariants
//! - Apply is a full replace: after success the household holds exactly one
//!   active row per assigned template, and nothing else.
//! - Per-task customizations on existing rows do not survive an apply.
//! - Duplicate template ids in one apply collapse to the first occurrence.
//! - No retry is attempted; failures surface with their stage.

use crate::engine::resolver::{resolve_assignments, AssignmentPlan, TaskAssignment};
use crate::model::household_task::HouseholdTask;
use crate::model::questionnaire::{HouseholdId, QuestionnaireResponse, ValidationError};
use crate::repo::household_task_repo::{HouseholdTaskRepository, ReplaceError, ReplaceStage};
use crate::repo::template_repo::TemplateRepository;
use crate::repo::{RepoError, RepoResult};
use log::{error, info};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Error for assignment and questionnaire use-cases.
#[derive(Debug)]
pub enum AssignmentError {
    /// Input was rejected before any derivation or write.
    Validation(ValidationError),
    /// Template catalog could not be loaded.
    Catalog(RepoError),
    /// Snapshot could not be stored or loaded.
    Questionnaire(RepoError),
    /// No snapshot is stored for the household.
    QuestionnaireNotFound(HouseholdId),
    /// Household task replace failed.
    Persistence {
        stage: ReplaceStage,
        delete_committed: bool,
        source: RepoError,
    },
}

impl Display for AssignmentError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "invalid questionnaire: {err}"),
            Self::Catalog(err) => write!(f, "task catalog unavailable: {err}"),
            Self::Questionnaire(err) => write!(f, "questionnaire storage failed: {err}"),
            Self::QuestionnaireNotFound(household_id) => {
                write!(f, "no questionnaire stored for household {household_id}")
            }
            Self::Persistence {
                stage,
                delete_committed,
                source,
            } => write!(
                f,
                "household task {} failed (delete_committed={delete_committed}): {source}",
                stage.as_str()
            ),
        }
    }
}

impl Error for AssignmentError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Catalog(err) | Self::Questionnaire(err) => Some(err),
            Self::Persistence { source, .. } => Some(source),
            Self::QuestionnaireNotFound(_) => None,
        }
    }
}

impl From<ValidationError> for AssignmentError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<ReplaceError> for AssignmentError {
    fn from(value: ReplaceError) -> Self {
        Self::Persistence {
            stage: value.stage,
            delete_committed: value.delete_committed,
            source: value.source,
        }
    }
}

/// Row counts of one apply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyOutcome {
    pub created: usize,
    /// Always 0 under the replace policy.
    pub updated: usize,
    /// Rows removed by the replace.
    pub deleted_implicitly: usize,
}

/// Service facade over catalog and household task repositories.
pub struct AssignmentService<T: TemplateRepository, H: HouseholdTaskRepository> {
    templates: T,
    tasks: H,
}

impl<T: TemplateRepository, H: HouseholdTaskRepository> AssignmentService<T, H> {
    pub fn new(templates: T, tasks: H) -> Self {
        Self { templates, tasks }
    }

    /// Resolves `responses` against the current catalog without writing.
    pub fn preview(&self, responses: &QuestionnaireResponse) -> Result<AssignmentPlan, AssignmentError> {
        responses.validate()?;
        let catalog = self
            .templates
            .list_task_templates()
            .map_err(AssignmentError::Catalog)?;
        Ok(resolve_assignments(responses, &catalog))
    }

    /// Replaces the household's tasks with the assigned subset of `assignments`.
    ///
    /// Runs even when nothing is assigned, which clears the household.
    pub fn apply_assignments(
        &mut self,
        household_id: HouseholdId,
        assignments: &[TaskAssignment],
    ) -> Result<ApplyOutcome, AssignmentError> {
        if household_id.is_nil() {
            return Err(ValidationError::MissingHouseholdId.into());
        }

        let started_at = Instant::now();
        let mut seen = HashSet::new();
        let rows: Vec<HouseholdTask> = assignments
            .iter()
            .filter(|assignment| assignment.should_assign)
            .filter(|assignment| seen.insert(assignment.template_id))
            .map(|assignment| HouseholdTask::from_assignment(household_id, assignment))
            .collect();

        info!(
            "event=assignment_apply module=service status=start household_id={household_id} rows={}",
            rows.len()
        );

        match self.tasks.replace_household_tasks(household_id, &rows) {
            Ok(deleted) => {
                info!(
                    "event=assignment_apply module=service status=ok household_id={household_id} created={} deleted={deleted} duration_ms={}",
                    rows.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(ApplyOutcome {
                    created: rows.len(),
                    updated: 0,
                    deleted_implicitly: deleted,
                })
            }
            Err(err) => {
                let error_code = if err.delete_committed {
                    "tasks_deleted_not_replaced"
                } else {
                    "replace_failed"
                };
                error!(
                    "event=assignment_apply module=service status=error household_id={household_id} stage={} delete_committed={} duration_ms={} error_code={error_code} error={}",
                    err.stage.as_str(),
                    err.delete_committed,
                    started_at.elapsed().as_millis(),
                    err.source
                );
                Err(err.into())
            }
        }
    }

    pub fn list_household_tasks(&self, household_id: HouseholdId) -> RepoResult<Vec<HouseholdTask>> {
        self.tasks.list_household_tasks(household_id)
    }
}
