//! Onboarding questionnaire: wizard schema and answer folding.
//!
//! # Responsibility
//! - Publish the ordered question list with conditional visibility.
//! - Turn raw wizard answers into a validated [`QuestionnaireResponse`].
//!
//! # See also
//! - `model::questionnaire` for the persisted snapshot shape.
//!
//! [`QuestionnaireResponse`]: crate::model::questionnaire::QuestionnaireResponse

mod answers;
pub mod schema;

pub use schema::{
    find_question, questionnaire, validate_answers, AnswerValue, Question, QuestionOption,
    QuestionType, VisibilityRule, VisibleWhen, WizardAnswers,
};
