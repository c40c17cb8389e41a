//! Questionnaire submission and reassignment use-cases.
//!
//! # Responsibility
//! - Turn wizard answers into a stored snapshot and a reconciled task list.
//! - Re-run assignment for a stored snapshot after catalog changes.
//!
//! # Invariants
//! - Validation runs before derivation and before any write.
//! - The snapshot is stored before tasks are replaced; a later failure
//!   leaves the snapshot in place so `reassign` can finish the job.

use crate::engine::resolver::AssignmentPlan;
use crate::model::household_task::HouseholdTask;
use crate::model::questionnaire::{HouseholdId, QuestionnaireResponse};
use crate::questionnaire::WizardAnswers;
use crate::repo::household_task_repo::HouseholdTaskRepository;
use crate::repo::questionnaire_repo::QuestionnaireRepository;
use crate::repo::template_repo::TemplateRepository;
use crate::repo::RepoResult;
use crate::service::assignment_service::{ApplyOutcome, AssignmentError, AssignmentService};
use log::{error, info, warn};
use std::time::Instant;

/// Result of a submit or reassign.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitOutcome {
    pub plan: AssignmentPlan,
    pub applied: ApplyOutcome,
}

pub struct QuestionnaireService<T, H, Q>
where
    T: TemplateRepository,
    H: HouseholdTaskRepository,
    Q: QuestionnaireRepository,
{
    assignments: AssignmentService<T, H>,
    questionnaires: Q,
}

impl<T, H, Q> QuestionnaireService<T, H, Q>
where
    T: TemplateRepository,
    H: HouseholdTaskRepository,
    Q: QuestionnaireRepository,
{
    pub fn new(templates: T, tasks: H, questionnaires: Q) -> Self {
        Self {
            assignments: AssignmentService::new(templates, tasks),
            questionnaires,
        }
    }

    /// Validates raw wizard answers, stores the snapshot and applies tasks.
    pub fn submit(
        &mut self,
        household_id: HouseholdId,
        answers: &WizardAnswers,
    ) -> Result<SubmitOutcome, AssignmentError> {
        let responses = QuestionnaireResponse::from_answers(household_id, answers).map_err(
            |err| {
                warn!(
                    "event=questionnaire_submit module=service status=error household_id={household_id} error_code=invalid_answers"
                );
                AssignmentError::Validation(err)
            },
        )?;
        self.submit_response(&responses)
    }

    /// Same flow as [`Self::submit`] for an already structured snapshot.
    pub fn submit_response(
        &mut self,
        responses: &QuestionnaireResponse,
    ) -> Result<SubmitOutcome, AssignmentError> {
        responses.validate()?;
        let household_id = responses.household_id;
        let started_at = Instant::now();
        info!("event=questionnaire_submit module=service status=start household_id={household_id}");

        let result = self
            .questionnaires
            .upsert_questionnaire_response(responses)
            .map_err(AssignmentError::Questionnaire)
            .and_then(|()| self.resolve_and_apply(responses));

        log_outcome("questionnaire_submit", household_id, started_at, &result);
        result
    }

    /// Re-resolves the stored snapshot against the current catalog.
    pub fn reassign(&mut self, household_id: HouseholdId) -> Result<SubmitOutcome, AssignmentError> {
        let started_at = Instant::now();
        info!("event=assignment_reassign module=service status=start household_id={household_id}");

        let result = self
            .questionnaires
            .get_questionnaire_response(household_id)
            .map_err(AssignmentError::Questionnaire)
            .and_then(|stored| stored.ok_or(AssignmentError::QuestionnaireNotFound(household_id)))
            .and_then(|responses| self.resolve_and_apply(&responses));

        log_outcome("assignment_reassign", household_id, started_at, &result);
        result
    }

    pub fn preview(&self, responses: &QuestionnaireResponse) -> Result<AssignmentPlan, AssignmentError> {
        self.assignments.preview(responses)
    }

    pub fn list_household_tasks(&self, household_id: HouseholdId) -> RepoResult<Vec<HouseholdTask>> {
        self.assignments.list_household_tasks(household_id)
    }

    pub fn stored_response(
        &self,
        household_id: HouseholdId,
    ) -> RepoResult<Option<QuestionnaireResponse>> {
        self.questionnaires.get_questionnaire_response(household_id)
    }

    fn resolve_and_apply(
        &mut self,
        responses: &QuestionnaireResponse,
    ) -> Result<SubmitOutcome, AssignmentError> {
        let plan = self.assignments.preview(responses)?;
        let applied = self
            .assignments
            .apply_assignments(responses.household_id, &plan.assignments)?;
        Ok(SubmitOutcome { plan, applied })
    }
}

fn log_outcome(
    event: &str,
    household_id: HouseholdId,
    started_at: Instant,
    result: &Result<SubmitOutcome, AssignmentError>,
) {
    let duration_ms = started_at.elapsed().as_millis();
    match result {
        Ok(outcome) => info!(
            "event={event} module=service status=ok household_id={household_id} assigned={} total={} over_budget={} duration_ms={duration_ms}",
            outcome.plan.assigned_count,
            outcome.plan.total_count,
            outcome.plan.exceeds_available_time()
        ),
        Err(err) => error!(
            "event={event} module=service status=error household_id={household_id} duration_ms={duration_ms} error_code={}",
            error_code(err)
        ),
    }
}

fn error_code(err: &AssignmentError) -> &'static str {
    match err {
        AssignmentError::Validation(_) => "invalid_questionnaire",
        AssignmentError::Catalog(_) => "catalog_unavailable",
        AssignmentError::Questionnaire(_) => "questionnaire_storage_failed",
        AssignmentError::QuestionnaireNotFound(_) => "questionnaire_not_found",
        AssignmentError::Persistence { .. } => "task_persistence_failed",
    }
}
