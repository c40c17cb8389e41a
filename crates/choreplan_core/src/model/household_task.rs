//! Materialized household task.
//!
//! # Responsibility
//! - Link one household to one catalog template with resolved values.
//!
//! # Invariants
//! - At most one row exists per `(household_id, template_id)`.
//! - `points_value` is the resolved integer (base × multiplier), never a
//!   deferred override.
//! - `interval_days >= 1`.

use crate::engine::resolver::TaskAssignment;
use crate::model::questionnaire::HouseholdId;
use crate::model::template::TemplateId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a household task row.
pub type HouseholdTaskId = Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HouseholdTask {
    pub id: HouseholdTaskId,
    pub household_id: HouseholdId,
    pub template_id: TemplateId,
    pub is_active: bool,
    /// Points awarded per completion.
    pub points_value: u32,
    /// Adjusted recurrence interval consumed by the scheduler.
    pub interval_days: u32,
}

impl HouseholdTask {
    /// Materializes an active row from one resolved assignment.
    pub fn from_assignment(household_id: HouseholdId, assignment: &TaskAssignment) -> Self {
        Self {
            id: Uuid::new_v4(),
            household_id,
            template_id: assignment.template_id,
            is_active: true,
            points_value: assignment.resolved_points,
            interval_days: assignment.interval_days.max(1),
        }
    }
}
