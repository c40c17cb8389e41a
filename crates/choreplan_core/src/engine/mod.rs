//! Questionnaire-to-task assignment engine.
//!
//! # Responsibility
//! - Derive condition codes from questionnaire answers.
//! - Evaluate template condition expressions.
//! - Compute point multipliers and frequency adjustments.
//! - Resolve a full catalog into a per-household assignment plan.
//!
//! # Invariants
//! - Everything in this module is synchronous, pure and storage-agnostic;
//!   it is safe to call from any number of threads without locking.

pub mod adjust;
pub mod conditions;
pub mod expression;
pub mod resolver;
