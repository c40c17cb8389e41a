//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate engine and repository calls into use-case level APIs.
//! - Keep the CLI decoupled from storage details.

pub mod assignment_service;
pub mod questionnaire_service;
