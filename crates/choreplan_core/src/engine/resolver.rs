//! Catalog-wide assignment resolution.
//!
//! # Responsibility
//! - Derive active conditions once and evaluate every template against them.
//! - Attach household multipliers, resolved points and adjusted intervals.
//! - Aggregate assignment counts and a coarse daily time estimate.
//!
//! # Invariants
//! - Output order equals catalog order; templates are evaluated independently.
//! - Identical inputs yield identical plans.
//! - Templates that do not apply carry neutral factors (1.0).

use crate::engine::adjust::{
    calculate_frequency_adjustment, calculate_interval_days, calculate_points_multiplier,
    calculate_task_points,
};
use crate::engine::conditions::{derive_condition_codes, ConditionCode};
use crate::model::questionnaire::QuestionnaireResponse;
use crate::model::template::{TaskTemplate, TemplateId};
use log::{debug, warn};

const DAYS_PER_WEEK: f64 = 7.0;

/// Per-template resolution result. Consumed by the apply step, never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskAssignment {
    pub template_id: TemplateId,
    pub template_name: String,
    pub should_assign: bool,
    pub points_multiplier: f64,
    pub frequency_adjustment: f64,
    /// `round(base_points * points_multiplier)`.
    pub resolved_points: u32,
    /// Template base interval scaled by `frequency_adjustment`.
    pub interval_days: u32,
}

/// Resolution output for one household against one catalog snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentPlan {
    pub assignments: Vec<TaskAssignment>,
    pub assigned_count: usize,
    pub total_count: usize,
    /// Sorted active condition codes.
    pub active_conditions: Vec<ConditionCode>,
    /// Sum of `duration / 7` over assigned templates. Ignores declared
    /// recurrence, so it is only a weekly-average approximation.
    pub estimated_daily_minutes: f64,
    pub available_minutes_daily: u32,
}

impl AssignmentPlan {
    /// Iterates assignments that should be materialized.
    pub fn assigned(&self) -> impl Iterator<Item = &TaskAssignment> {
        self.assignments
            .iter()
            .filter(|assignment| assignment.should_assign)
    }

    /// Returns whether the estimate exceeds the household's daily budget.
    pub fn exceeds_available_time(&self) -> bool {
        self.estimated_daily_minutes > f64::from(self.available_minutes_daily)
    }
}

/// Resolves every catalog template for one household.
pub fn resolve_assignments(
    responses: &QuestionnaireResponse,
    templates: &[TaskTemplate],
) -> AssignmentPlan {
    let active = derive_condition_codes(responses);
    let mut assignments = Vec::with_capacity(templates.len());
    let mut assigned_count = 0;
    let mut estimated_daily_minutes = 0.0;

    for template in templates {
        let condition = template.condition();
        let unknown = condition.unknown_operands();
        if condition.is_malformed() {
            warn!(
                "event=condition_parse module=engine status=error template_id={} error_code=malformed_condition",
                template.id
            );
        } else if !unknown.is_empty() {
            warn!(
                "event=condition_parse module=engine status=warn template_id={} error_code=unknown_condition_code count={}",
                template.id,
                unknown.len()
            );
        }

        let should_assign = condition.evaluate(&active);
        let (points_multiplier, frequency_adjustment) = if should_assign {
            (
                calculate_points_multiplier(responses, template.difficulty),
                calculate_frequency_adjustment(responses, template.condition_code()),
            )
        } else {
            (1.0, 1.0)
        };

        if should_assign {
            assigned_count += 1;
            estimated_daily_minutes += f64::from(template.duration_minutes) / DAYS_PER_WEEK;
        }

        assignments.push(TaskAssignment {
            template_id: template.id,
            template_name: template.name.clone(),
            should_assign,
            points_multiplier,
            frequency_adjustment,
            resolved_points: calculate_task_points(template.base_points, points_multiplier),
            interval_days: calculate_interval_days(
                template.default_interval_days,
                frequency_adjustment,
            ),
        });
    }

    debug!(
        "event=assignment_resolve module=engine status=ok assigned={} total={} conditions={}",
        assigned_count,
        templates.len(),
        active.len()
    );

    AssignmentPlan {
        assignments,
        assigned_count,
        total_count: templates.len(),
        active_conditions: active.into_iter().collect(),
        estimated_daily_minutes,
        available_minutes_daily: responses.available_minutes_daily,
    }
}

#[cfg(test)]
mod tests {
    use super::resolve_assignments;
    use crate::model::questionnaire::QuestionnaireResponse;
    use crate::model::template::TaskTemplate;
    use uuid::Uuid;

    fn catalog() -> Vec<TaskTemplate> {
        vec![
            TaskTemplate::new("Sortir les poubelles", 5).with_duration(14),
            TaskTemplate::new("Vider le lave-vaisselle", 5)
                .with_duration(7)
                .with_condition(Some("lave_vaisselle")),
            TaskTemplate::new("Passer l'aspirateur", 10)
                .with_duration(21)
                .with_condition(Some("pas_robot_aspirateur")),
            TaskTemplate::new("Cas invalide", 10).with_condition(Some("a+b|c")),
        ]
    }

    #[test]
    fn plan_preserves_catalog_order_and_counts() {
        let responses = QuestionnaireResponse::for_household(Uuid::new_v4());
        let templates = catalog();
        let plan = resolve_assignments(&responses, &templates);

        assert_eq!(plan.total_count, 4);
        assert_eq!(plan.assigned_count, 2);
        let names: Vec<_> = plan
            .assignments
            .iter()
            .map(|assignment| assignment.template_name.as_str())
            .collect();
        assert_eq!(
            names,
            vec![
                "Sortir les poubelles",
                "Vider le lave-vaisselle",
                "Passer l'aspirateur",
                "Cas invalide"
            ]
        );
        assert_eq!(plan.assigned().count(), 2);
        assert!((plan.estimated_daily_minutes - 5.0).abs() < 1e-9);
    }

    #[test]
    fn unassigned_templates_keep_neutral_factors() {
        let mut responses = QuestionnaireResponse::for_household(Uuid::new_v4());
        responses.cleanliness_level = 1;
        let plan = resolve_assignments(&responses, &catalog());
        let skipped = &plan.assignments[1];
        assert!(!skipped.should_assign);
        assert_eq!(skipped.points_multiplier, 1.0);
        assert_eq!(skipped.frequency_adjustment, 1.0);
        assert_eq!(skipped.resolved_points, 5);
    }

    #[test]
    fn resolution_is_idempotent() {
        let mut responses = QuestionnaireResponse::for_household(Uuid::new_v4());
        responses.animals = vec!["dog".to_string()];
        let templates = catalog();
        let first = resolve_assignments(&responses, &templates);
        let second = resolve_assignments(&responses, &templates);
        assert_eq!(first, second);
    }

    #[test]
    fn time_budget_flag_compares_estimate_with_availability() {
        let mut responses = QuestionnaireResponse::for_household(Uuid::new_v4());
        responses.available_minutes_daily = 4;
        let plan = resolve_assignments(&responses, &catalog());
        assert!(plan.exceeds_available_time());

        responses.available_minutes_daily = 45;
        let plan = resolve_assignments(&responses, &catalog());
        assert!(!plan.exceeds_available_time());
    }
}
