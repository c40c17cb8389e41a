//! Task template catalog entry.
//!
//! # Responsibility
//! - Define the shared (non household-owned) chore definition.
//! - Parse the condition expression once, when the template is built.
//!
//! # Invariants
//! - `condition` always reflects `condition_code`; both are private and only
//!   change together through `with_condition`.
//! - `difficulty` is within `1..=5` and `default_interval_days >= 1` for any
//!   template that passed `validate()`.

use crate::engine::expression::ConditionExpr;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a catalog template.
pub type TemplateId = Uuid;

pub const DIFFICULTY_RANGE: (u8, u8) = (1, 5);

const DEFAULT_CATEGORY: &str = "general";
const DEFAULT_DURATION_MINUTES: u32 = 10;
const DEFAULT_INTERVAL_DAYS: u32 = 7;

/// Validation errors for catalog templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateValidationError {
    EmptyName,
    EmptyCategory,
    DifficultyOutOfRange(u8),
    ZeroInterval,
}

impl Display for TemplateValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "template name must not be blank"),
            Self::EmptyCategory => write!(f, "template category must not be blank"),
            Self::DifficultyOutOfRange(value) => write!(
                f,
                "template difficulty must be within {}..={}, got {value}",
                DIFFICULTY_RANGE.0, DIFFICULTY_RANGE.1
            ),
            Self::ZeroInterval => write!(f, "template interval must be at least one day"),
        }
    }
}

impl Error for TemplateValidationError {}

/// Catalog definition of one chore.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskTemplate {
    pub id: TemplateId,
    pub name: String,
    pub category: String,
    pub base_points: u32,
    pub duration_minutes: u32,
    /// 1 (trivial) to 5 (heavy).
    pub difficulty: u8,
    /// Base recurrence interval before household frequency adjustment.
    pub default_interval_days: u32,
    condition_code: Option<String>,
    condition: ConditionExpr,
}

impl TaskTemplate {
    /// Creates a universal template with a generated id and default metadata.
    pub fn new(name: impl Into<String>, base_points: u32) -> Self {
        Self::with_id(Uuid::new_v4(), name, base_points)
    }

    /// Creates a universal template with a caller-provided id.
    ///
    /// Used by storage read paths and catalog imports.
    pub fn with_id(id: TemplateId, name: impl Into<String>, base_points: u32) -> Self {
        Self {
            id,
            name: name.into(),
            category: DEFAULT_CATEGORY.to_string(),
            base_points,
            duration_minutes: DEFAULT_DURATION_MINUTES,
            difficulty: DIFFICULTY_RANGE.0,
            default_interval_days: DEFAULT_INTERVAL_DAYS,
            condition_code: None,
            condition: ConditionExpr::Universal,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_duration(mut self, duration_minutes: u32) -> Self {
        self.duration_minutes = duration_minutes;
        self
    }

    pub fn with_difficulty(mut self, difficulty: u8) -> Self {
        self.difficulty = difficulty;
        self
    }

    pub fn with_interval_days(mut self, default_interval_days: u32) -> Self {
        self.default_interval_days = default_interval_days;
        self
    }

    /// Sets the raw condition expression and re-parses it.
    pub fn with_condition(mut self, condition_code: Option<&str>) -> Self {
        self.condition = ConditionExpr::parse(condition_code);
        self.condition_code = condition_code.map(str::to_string);
        self
    }

    /// Raw expression as stored in the catalog.
    pub fn condition_code(&self) -> Option<&str> {
        self.condition_code.as_deref()
    }

    /// Parsed expression used for evaluation.
    pub fn condition(&self) -> &ConditionExpr {
        &self.condition
    }

    pub fn validate(&self) -> Result<(), TemplateValidationError> {
        if self.name.trim().is_empty() {
            return Err(TemplateValidationError::EmptyName);
        }
        if self.category.trim().is_empty() {
            return Err(TemplateValidationError::EmptyCategory);
        }
        if self.difficulty < DIFFICULTY_RANGE.0 || self.difficulty > DIFFICULTY_RANGE.1 {
            return Err(TemplateValidationError::DifficultyOutOfRange(
                self.difficulty,
            ));
        }
        if self.default_interval_days == 0 {
            return Err(TemplateValidationError::ZeroInterval);
        }
        Ok(())
    }
}

/// Import/export shape for catalog files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    #[serde(default)]
    pub id: Option<TemplateId>,
    pub name: String,
    #[serde(default = "default_category")]
    pub category: String,
    pub base_points: u32,
    #[serde(default = "default_duration")]
    pub duration_minutes: u32,
    #[serde(default = "default_difficulty")]
    pub difficulty: u8,
    #[serde(default = "default_interval")]
    pub default_interval_days: u32,
    #[serde(default)]
    pub condition_code: Option<String>,
}

impl CatalogEntry {
    /// Builds a validated template; a missing id is generated.
    pub fn into_template(self) -> Result<TaskTemplate, TemplateValidationError> {
        let template = TaskTemplate::with_id(
            self.id.unwrap_or_else(Uuid::new_v4),
            self.name,
            self.base_points,
        )
        .with_category(self.category)
        .with_duration(self.duration_minutes)
        .with_difficulty(self.difficulty)
        .with_interval_days(self.default_interval_days)
        .with_condition(self.condition_code.as_deref());
        template.validate()?;
        Ok(template)
    }
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

fn default_duration() -> u32 {
    DEFAULT_DURATION_MINUTES
}

fn default_difficulty() -> u8 {
    DIFFICULTY_RANGE.0
}

fn default_interval() -> u32 {
    DEFAULT_INTERVAL_DAYS
}
