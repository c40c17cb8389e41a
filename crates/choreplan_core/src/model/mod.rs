//! Domain model for questionnaire answers, catalog templates and household
//! task assignments.
//!
//! # Responsibility
//! - Define canonical data structures used by the assignment engine.
//! - Own field-level validation for answers and templates.
//!
//! # Invariants
//! - Templates are shared read-only catalog data; households never own them.
//! - Household tasks are created and removed only by the apply step.

pub mod household_task;
pub mod questionnaire;
pub mod template;
