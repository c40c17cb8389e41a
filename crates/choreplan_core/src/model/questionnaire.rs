//! Household questionnaire snapshot.
//!
//! # Responsibility
//! - Define the flat answer record that feeds condition derivation.
//! - Validate numeric ranges before any derivation runs.
//!
//! # Invariants
//! - Exactly one snapshot exists per household; re-submission replaces it.
//! - `animals` and `allergies` may contain the sentinel `none`; consumers must
//!   filter it before asking "has any".
//! - Missing fields in stored snapshots fall back to `Default` values.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a household.
pub type HouseholdId = Uuid;

/// Sentinel option meaning "nothing selected" in exclusive multi-choice lists.
pub const NONE_SENTINEL: &str = "none";

pub const ROOM_COUNT_RANGE: (u32, u32) = (1, 15);
pub const BATHROOM_COUNT_RANGE: (u32, u32) = (1, 5);
pub const HOUSEHOLD_SIZE_RANGE: (u32, u32) = (1, 15);
pub const CLEANLINESS_RANGE: (u8, u8) = (1, 5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HousingType {
    #[default]
    Apartment,
    House,
}

impl HousingType {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "apartment" => Some(Self::Apartment),
            "house" => Some(Self::House),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CookingFrequency {
    Never,
    Rare,
    #[default]
    Regular,
    Daily,
}

impl CookingFrequency {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "never" => Some(Self::Never),
            "rare" => Some(Self::Rare),
            "regular" => Some(Self::Regular),
            "daily" => Some(Self::Daily),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FloorType {
    #[default]
    Tile,
    Wood,
    Carpet,
    Mixed,
}

impl FloorType {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "tile" => Some(Self::Tile),
            "wood" => Some(Self::Wood),
            "carpet" => Some(Self::Carpet),
            "mixed" => Some(Self::Mixed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutdoorType {
    Balcony,
    Garden,
    Terrace,
}

impl OutdoorType {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "balcony" => Some(Self::Balcony),
            "garden" => Some(Self::Garden),
            "terrace" => Some(Self::Terrace),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaterHardness {
    Soft,
    #[default]
    Medium,
    Hard,
}

impl WaterHardness {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "soft" => Some(Self::Soft),
            "medium" => Some(Self::Medium),
            "hard" => Some(Self::Hard),
            _ => None,
        }
    }
}

/// Validation errors for questionnaire answers and snapshots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Snapshot is not bound to a household.
    MissingHouseholdId,
    /// A visible single-choice or numeric question has no answer.
    MissingAnswer(&'static str),
    /// Answer shape does not match the question type.
    WrongAnswerType(&'static str),
    /// Answer value is not one of the question options.
    UnknownOption { question: &'static str, value: String },
    /// Numeric field is outside its accepted range.
    OutOfRange {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingHouseholdId => write!(f, "questionnaire has no household id"),
            Self::MissingAnswer(question) => write!(f, "missing answer for `{question}`"),
            Self::WrongAnswerType(question) => {
                write!(f, "answer for `{question}` has the wrong type")
            }
            Self::UnknownOption { question, value } => {
                write!(f, "unknown option `{value}` for `{question}`")
            }
            Self::OutOfRange {
                field,
                value,
                min,
                max,
            } => write!(f, "`{field}` must be within {min}..={max}, got {value}"),
        }
    }
}

impl Error for ValidationError {}

/// Latest questionnaire snapshot for one household.
///
/// Field names mirror the persisted JSON payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuestionnaireResponse {
    pub household_id: HouseholdId,

    pub housing_type: HousingType,
    pub room_count: u32,
    pub has_stairs: bool,
    pub has_fireplace: bool,
    pub has_dressing: bool,
    pub has_office: bool,

    pub kitchen_equipment: Vec<String>,
    pub cooking_frequency: CookingFrequency,

    pub bathroom_count: u32,
    pub bathroom_features: Vec<String>,

    pub has_washing_machine: bool,
    pub has_dryer: bool,
    pub laundry_features: Vec<String>,

    pub furniture_types: Vec<String>,
    pub floor_type: FloorType,

    pub robots: Vec<String>,

    pub has_outdoor_space: bool,
    pub outdoor_type: Option<OutdoorType>,
    pub outdoor_features: Vec<String>,

    pub animals: Vec<String>,

    pub has_children: bool,
    pub has_baby: bool,
    pub children_play_outside: bool,

    pub household_size: u32,
    pub is_shared_housing: bool,
    pub works_from_home: bool,

    pub water_hardness: WaterHardness,
    pub high_dust_area: bool,
    pub high_pollen_area: bool,
    pub allergies: Vec<String>,

    /// 1 = very relaxed, 5 = spotless.
    pub cleanliness_level: u8,
    pub available_minutes_daily: u32,
}

impl Default for QuestionnaireResponse {
    fn default() -> Self {
        Self {
            household_id: Uuid::nil(),
            housing_type: HousingType::Apartment,
            room_count: 3,
            has_stairs: false,
            has_fireplace: false,
            has_dressing: false,
            has_office: false,
            kitchen_equipment: Vec::new(),
            cooking_frequency: CookingFrequency::Regular,
            bathroom_count: 1,
            bathroom_features: Vec::new(),
            has_washing_machine: true,
            has_dryer: false,
            laundry_features: Vec::new(),
            furniture_types: Vec::new(),
            floor_type: FloorType::Tile,
            robots: Vec::new(),
            has_outdoor_space: false,
            outdoor_type: None,
            outdoor_features: Vec::new(),
            animals: Vec::new(),
            has_children: false,
            has_baby: false,
            children_play_outside: false,
            household_size: 2,
            is_shared_housing: false,
            works_from_home: false,
            water_hardness: WaterHardness::Medium,
            high_dust_area: false,
            high_pollen_area: false,
            allergies: Vec::new(),
            cleanliness_level: 3,
            available_minutes_daily: 45,
        }
    }
}

impl QuestionnaireResponse {
    /// Creates a default snapshot bound to `household_id`.
    pub fn for_household(household_id: HouseholdId) -> Self {
        Self {
            household_id,
            ..Self::default()
        }
    }

    /// Checks household binding and numeric ranges.
    ///
    /// # Errors
    /// - `MissingHouseholdId` when the id is nil.
    /// - `OutOfRange` for the first numeric field outside its range.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.household_id.is_nil() {
            return Err(ValidationError::MissingHouseholdId);
        }
        check_range("room_count", self.room_count, ROOM_COUNT_RANGE)?;
        check_range("bathroom_count", self.bathroom_count, BATHROOM_COUNT_RANGE)?;
        check_range("household_size", self.household_size, HOUSEHOLD_SIZE_RANGE)?;
        check_range(
            "cleanliness_level",
            u32::from(self.cleanliness_level),
            (
                u32::from(CLEANLINESS_RANGE.0),
                u32::from(CLEANLINESS_RANGE.1),
            ),
        )?;
        if self.available_minutes_daily == 0 {
            return Err(ValidationError::OutOfRange {
                field: "available_minutes_daily",
                value: 0,
                min: 1,
                max: i64::from(u32::MAX),
            });
        }
        Ok(())
    }

    /// Returns whether at least one animal other than `none` is listed.
    pub fn has_real_animals(&self) -> bool {
        has_real_entries(&self.animals)
    }

    /// Returns whether at least one allergy other than `none` is listed.
    pub fn has_real_allergies(&self) -> bool {
        has_real_entries(&self.allergies)
    }
}

/// Normalizes an exclusive multi-choice list.
///
/// Selecting `none` clears every other entry. Duplicates are dropped while
/// keeping first-seen order.
pub fn normalize_exclusive_selection(values: &[String]) -> Vec<String> {
    if values.iter().any(|value| value == NONE_SENTINEL) {
        return Vec::new();
    }
    let mut normalized: Vec<String> = Vec::with_capacity(values.len());
    for value in values {
        if !normalized.contains(value) {
            normalized.push(value.clone());
        }
    }
    normalized
}

fn has_real_entries(values: &[String]) -> bool {
    values.iter().any(|value| value != NONE_SENTINEL)
}

fn check_range(field: &'static str, value: u32, range: (u32, u32)) -> Result<(), ValidationError> {
    if value < range.0 || value > range.1 {
        return Err(ValidationError::OutOfRange {
            field,
            value: i64::from(value),
            min: i64::from(range.0),
            max: i64::from(range.1),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{normalize_exclusive_selection, QuestionnaireResponse, ValidationError};
    use uuid::Uuid;

    #[test]
    fn default_snapshot_requires_household_id() {
        let response = QuestionnaireResponse::default();
        assert_eq!(
            response.validate(),
            Err(ValidationError::MissingHouseholdId)
        );
        QuestionnaireResponse::for_household(Uuid::new_v4())
            .validate()
            .expect("defaults should be valid once bound");
    }

    #[test]
    fn validate_rejects_out_of_range_cleanliness() {
        let mut response = QuestionnaireResponse::for_household(Uuid::new_v4());
        response.cleanliness_level = 6;
        let err = response.validate().unwrap_err();
        assert!(matches!(
            err,
            ValidationError::OutOfRange {
                field: "cleanliness_level",
                ..
            }
        ));
    }

    #[test]
    fn none_only_lists_have_no_real_entries() {
        let mut response = QuestionnaireResponse::for_household(Uuid::new_v4());
        response.animals = vec!["none".to_string()];
        response.allergies = vec!["none".to_string()];
        assert!(!response.has_real_animals());
        assert!(!response.has_real_allergies());

        response.animals.push("cat".to_string());
        assert!(response.has_real_animals());
    }

    #[test]
    fn none_clears_other_selected_entries() {
        let selected = vec!["cat".to_string(), "none".to_string()];
        assert!(normalize_exclusive_selection(&selected).is_empty());

        let selected = vec!["dog".to_string(), "cat".to_string(), "dog".to_string()];
        assert_eq!(
            normalize_exclusive_selection(&selected),
            vec!["dog".to_string(), "cat".to_string()]
        );
    }

    #[test]
    fn missing_payload_fields_fall_back_to_defaults() {
        let household_id = Uuid::new_v4();
        let payload = format!(r#"{{"household_id":"{household_id}","cleanliness_level":5}}"#);
        let response: QuestionnaireResponse =
            serde_json::from_str(&payload).expect("partial payload should deserialize");
        assert_eq!(response.cleanliness_level, 5);
        assert_eq!(response.room_count, 3);
        assert!(response.has_washing_machine);
    }
}
